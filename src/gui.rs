mod app;
mod display;
pub mod state;

pub use app::AutoIntellApp;
pub use display::{display_size, DisplaySink};
pub use state::{Action, AppState, Mode};
