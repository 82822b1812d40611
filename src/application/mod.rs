pub mod app;
pub mod cli;
pub mod config;
pub mod controller;
pub mod editor;
pub mod logging;
pub mod navigation;
pub mod requests;
pub mod status;
pub mod store;
pub mod tui;

pub use app::*;
pub use cli::*;
pub use config::*;
pub use controller::*;
pub use editor::*;
pub use logging::*;
pub use navigation::*;
pub use requests::*;
pub use status::*;
pub use store::*;
pub use tui::*;
