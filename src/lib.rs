//! Neru: keyboard-driven cursor control
//!
//! A global hotkey overlays the screen with selectable targets: labeled
//! hints over accessible UI elements, a flat row-by-column grid, or a
//! recursively-subdividing grid. Typing a short character sequence picks a
//! target; the pointer moves there and an optional mouse event fires.
//!
//! The crate is the interactive mode engine plus its control surface. The
//! native overlay renderer, OS input hooks, accessibility tree walker, and
//! pointer synthesis live behind the traits in [`overlay`], [`input`],
//! [`accessibility`], and [`pointer`]; the daemon wires a backend in and
//! the engines never touch a platform API directly.

pub mod accessibility;
pub mod action;
pub mod config;
pub mod controller;
pub mod daemon;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod hints;
pub mod hotkeys;
pub mod input;
pub mod ipc;
pub mod overlay;
pub mod platform;
pub mod pointer;
pub mod scroll;
pub mod state;

pub use config::Config;
pub use error::{Error, Result};
pub use state::Mode;
