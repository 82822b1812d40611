pub mod api;
pub mod hooks;
pub mod http_client;
pub mod plugins;

#[cfg(test)]
pub mod test_utils;

pub use api::*;
pub use hooks::*;
pub use http_client::*;
pub use plugins::*;
