pub mod calendar;
pub mod date_key;
pub mod entry;
pub mod error;
pub mod mood;

pub use calendar::*;
pub use date_key::*;
pub use entry::*;
pub use error::*;
pub use mood::*;
