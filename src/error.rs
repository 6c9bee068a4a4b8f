//! Crate-wide error type
//!
//! One variant per failure kind. Errors inside an engine's key handler
//! deactivate the mode; errors during activation leave the app idle; errors
//! during deactivation are logged and swallowed so deactivation always
//! completes.

use thiserror::Error;

/// Failure kinds surfaced by the core.
#[derive(Debug, Error)]
pub enum Error {
    /// A configuration constraint was violated. The previous snapshot is
    /// kept and the message is surfaced to the user.
    #[error("config error: {0}")]
    Config(String),

    /// Element fetch failed or accessibility permission was denied.
    #[error("accessibility error: {0}")]
    Accessibility(String),

    /// Overlay create/draw/resize failed. Fatal for the current activation.
    #[error("overlay error: {0}")]
    Overlay(String),

    /// The pointer sink rejected a move or click.
    #[error("pointer error: {0}")]
    Pointer(String),

    /// An awaited collaborator exceeded its deadline.
    #[error("timed out waiting for {0}")]
    Timeout(&'static str),

    /// The app was disabled or shutdown was requested mid-operation.
    /// Silent: no user-facing message.
    #[error("operation canceled")]
    Canceled,

    /// The hotkey router or IPC handler received an unknown action.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Whether the error should be hidden from the user (cancellation is
    /// an expected outcome, not a failure).
    pub fn is_silent(&self) -> bool {
        matches!(self, Error::Canceled)
    }
}
