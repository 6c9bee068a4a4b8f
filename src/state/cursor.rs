//! Cursor state store
//!
//! Captures the pointer position when a mode session starts so it can be
//! restored when the session ends. The one-shot skip bit suppresses the
//! next restore (for actions whose side effects should leave the pointer
//! at the selection); it is cleared by `reset`, not by consumption, so two
//! `should_restore` reads agree until the session is torn down.

use std::sync::{Arc, RwLock};

use crate::geometry::{Point, Rect};

#[derive(Debug, Default)]
struct Inner {
    captured: Option<Captured>,
    restore_enabled: bool,
    skip_once: bool,
}

#[derive(Debug, Clone, Copy)]
struct Captured {
    position: Point,
    screen_bounds: Rect,
}

#[derive(Default)]
pub struct CursorState {
    inner: RwLock<Inner>,
}

pub type SharedCursorState = Arc<CursorState>;

impl CursorState {
    pub fn new() -> SharedCursorState {
        Arc::new(Self::default())
    }

    /// Record the pointer position and screen bounds at session start.
    pub fn capture(&self, position: Point, screen_bounds: Rect) {
        let mut inner = self.inner.write().unwrap();
        inner.captured = Some(Captured {
            position,
            screen_bounds,
        });
    }

    /// The restore flag comes from the configuration snapshot; the
    /// controller refreshes it at every activation.
    pub fn set_restore_enabled(&self, enabled: bool) {
        self.inner.write().unwrap().restore_enabled = enabled;
    }

    /// Clear everything, including the one-shot skip bit.
    pub fn reset(&self) {
        let mut inner = self.inner.write().unwrap();
        inner.captured = None;
        inner.skip_once = false;
    }

    pub fn should_restore(&self) -> bool {
        let inner = self.inner.read().unwrap();
        inner.restore_enabled && inner.captured.is_some() && !inner.skip_once
    }

    /// Suppress the next restore. Cleared by `reset`.
    pub fn skip_next_restore(&self) {
        self.inner.write().unwrap().skip_once = true;
    }

    pub fn captured_position(&self) -> Option<Point> {
        self.inner.read().unwrap().captured.map(|c| c.position)
    }

    pub fn captured_screen_bounds(&self) -> Option<Rect> {
        self.inner.read().unwrap().captured.map(|c| c.screen_bounds)
    }
}
