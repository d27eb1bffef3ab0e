pub mod session;
pub mod tui;

pub use session::Session;
pub use tui::TuiApplication;
