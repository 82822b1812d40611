pub mod month_view;
pub mod theme;
pub mod tui_debug;

pub use month_view::*;
pub use theme::*;
pub use tui_debug::*;
