//! Pending pointer actions
//!
//! A hotkey arms the action before or during target selection; when the
//! selection completes, the controller consumes it exactly once and plays
//! the matching pointer-event sequence at the target point.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::config::SmoothCursorConfig;
use crate::error::Result;
use crate::geometry::Point;
use crate::pointer::{Button, PointerSink};

/// The pointer-event kind to execute once a target point is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PendingAction {
    /// Move the pointer only.
    #[default]
    MoveOnly,
    LeftClick,
    RightClick,
    MiddleClick,
    /// Left button down, staying down; pairs with a later `MouseUp`.
    MouseDown,
    MouseUp,
}

impl PendingAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MoveOnly => "move",
            Self::LeftClick => "left_click",
            Self::RightClick => "right_click",
            Self::MiddleClick => "middle_click",
            Self::MouseDown => "mouse_down",
            Self::MouseUp => "mouse_up",
        }
    }

    /// Actions whose side effects should leave the pointer at the
    /// selection instead of restoring the captured position.
    pub fn leaves_pointer(&self) -> bool {
        matches!(self, Self::MouseDown | Self::MouseUp)
    }
}

/// Holds the armed action and plays event sequences.
#[derive(Default)]
pub struct ActionEngine {
    pending: Mutex<Option<PendingAction>>,
}

pub type SharedActionEngine = Arc<ActionEngine>;

impl ActionEngine {
    pub fn new() -> SharedActionEngine {
        Arc::new(Self::default())
    }

    pub fn arm(&self, kind: PendingAction) {
        log::info!("armed pending action {}", kind.as_str());
        *self.pending.lock().unwrap() = Some(kind);
    }

    /// Take the armed action, or `MoveOnly` when nothing was armed.
    pub fn consume(&self) -> PendingAction {
        self.pending.lock().unwrap().take().unwrap_or_default()
    }

    pub fn peek(&self) -> Option<PendingAction> {
        *self.pending.lock().unwrap()
    }

    /// Move the pointer to `target` and synthesise the event sequence for
    /// `kind`. The move is smooth when the configuration enables it.
    pub fn execute(
        &self,
        kind: PendingAction,
        target: Point,
        sink: &dyn PointerSink,
        smooth: &SmoothCursorConfig,
    ) -> Result<()> {
        log::info!("executing {} at ({}, {})", kind.as_str(), target.x, target.y);
        if smooth.move_mouse_enabled {
            sink.move_smooth(target, smooth.steps, Duration::from_millis(smooth.delay))?;
        } else {
            sink.move_to(target)?;
        }
        match kind {
            PendingAction::MoveOnly => {}
            PendingAction::LeftClick => {
                sink.press(Button::Left)?;
                sink.release(Button::Left)?;
            }
            PendingAction::RightClick => {
                sink.press(Button::Right)?;
                sink.release(Button::Right)?;
            }
            PendingAction::MiddleClick => {
                sink.press(Button::Middle)?;
                sink.release(Button::Middle)?;
            }
            PendingAction::MouseDown => sink.press(Button::Left)?,
            PendingAction::MouseUp => sink.release(Button::Left)?,
        }
        Ok(())
    }
}
