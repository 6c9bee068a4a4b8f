//! Process-wide state stores: app state with observer fan-out, and the
//! cursor capture/restore store. Everything else is injected.

mod app;
mod cursor;

pub use app::{AppState, Mode, SharedAppState};
pub use cursor::{CursorState, SharedCursorState};
