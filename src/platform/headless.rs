//! Headless collaborator stand-ins
//!
//! Log what a native backend would do. The keystroke source accepts
//! subscriptions and exposes an injection hook so the daemon can be driven
//! end-to-end (IPC activation, key routing, pointer events) without OS
//! hooks.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crate::accessibility::{Accessibility, Element, RoleFilter, ScreenChangeCallback};
use crate::config::{GridStyle, HintStyle};
use crate::error::Result;
use crate::geometry::{Point, Rect};
use crate::grid::GridCell;
use crate::hints::Hint;
use crate::input::{KeyCallback, KeyDisposition, KeyToken, KeystrokeSource, SubscriptionId};
use crate::overlay::{Overlay, ResizeDone};
use crate::pointer::{smooth_path, Button, PointerSink};

use super::Collaborators;

pub fn collaborators() -> Collaborators {
    Collaborators {
        keys: Arc::new(HeadlessKeys::default()),
        accessibility: Arc::new(HeadlessAccessibility::default()),
        overlay: Arc::new(HeadlessOverlay),
        pointer: Arc::new(HeadlessPointer::default()),
    }
}

/// Keystroke source with no OS tap behind it. Tokens are injected
/// programmatically; any subscriber swallowing wins, as a real tap would
/// suppress the event.
#[derive(Default)]
pub struct HeadlessKeys {
    subscribers: Mutex<HashMap<SubscriptionId, KeyCallback>>,
    next: AtomicU64,
}

impl HeadlessKeys {
    pub fn inject(&self, token: KeyToken) -> KeyDisposition {
        let subscribers: Vec<KeyCallback> =
            self.subscribers.lock().unwrap().values().cloned().collect();
        let mut disposition = KeyDisposition::PassThrough;
        for cb in subscribers {
            if cb(&token) == KeyDisposition::Swallow {
                disposition = KeyDisposition::Swallow;
            }
        }
        disposition
    }
}

impl KeystrokeSource for HeadlessKeys {
    fn subscribe(&self, cb: KeyCallback) -> SubscriptionId {
        let id = self.next.fetch_add(1, Ordering::Relaxed) + 1;
        self.subscribers.lock().unwrap().insert(id, cb);
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.subscribers.lock().unwrap().remove(&id);
    }
}

/// Reports a fixed screen and no clickable elements.
pub struct HeadlessAccessibility {
    bounds: Rect,
    subscribers: Mutex<HashMap<SubscriptionId, ScreenChangeCallback>>,
    next: AtomicU64,
}

impl Default for HeadlessAccessibility {
    fn default() -> Self {
        Self {
            bounds: Rect::new(0, 0, 1920, 1080),
            subscribers: Mutex::new(HashMap::new()),
            next: AtomicU64::new(1),
        }
    }
}

impl Accessibility for HeadlessAccessibility {
    fn clickable_elements(&self, _filter: &RoleFilter) -> Result<Vec<Element>> {
        Ok(Vec::new())
    }

    fn screen_bounds(&self) -> Result<Rect> {
        Ok(self.bounds)
    }

    fn frontmost_app_id(&self) -> Option<String> {
        None
    }

    fn on_screen_change(&self, cb: ScreenChangeCallback) -> SubscriptionId {
        let id = self.next.fetch_add(1, Ordering::Relaxed);
        self.subscribers.lock().unwrap().insert(id, cb);
        id
    }

    fn unsubscribe_screen_change(&self, id: SubscriptionId) {
        self.subscribers.lock().unwrap().remove(&id);
    }
}

/// Renders to the log.
pub struct HeadlessOverlay;

impl Overlay for HeadlessOverlay {
    fn resize_to_active_screen(&self, done: ResizeDone) {
        done();
    }

    fn show(&self) {
        log::debug!("overlay: show");
    }

    fn hide(&self) {
        log::debug!("overlay: hide");
    }

    fn clear(&self) {
        log::debug!("overlay: clear");
    }

    fn draw_hints(&self, hints: &[Hint], _style: &HintStyle) {
        log::debug!("overlay: {} hints", hints.len());
    }

    fn draw_grid_cells(&self, cells: &[GridCell], _style: &GridStyle) {
        log::debug!("overlay: {} grid cells", cells.len());
    }

    fn draw_recursive_frame(
        &self,
        parent: Rect,
        children: &[Rect],
        _labels: &[String],
        _style: &GridStyle,
    ) {
        log::debug!("overlay: frame {parent:?} with {} children", children.len());
    }

    fn draw_scroll_highlight(&self, rect: Rect, color: &str, width: f64) {
        log::debug!("overlay: scroll highlight {rect:?} {color} {width}");
    }

    fn notify_error(&self, message: &str) {
        log::warn!("overlay notification: {message}");
    }
}

/// Tracks a virtual pointer position.
#[derive(Default)]
pub struct HeadlessPointer {
    position: Mutex<Point>,
}

impl PointerSink for HeadlessPointer {
    fn position(&self) -> Result<Point> {
        Ok(*self.position.lock().unwrap())
    }

    fn move_to(&self, point: Point) -> Result<()> {
        log::debug!("pointer: move to ({}, {})", point.x, point.y);
        *self.position.lock().unwrap() = point;
        Ok(())
    }

    fn move_smooth(&self, point: Point, steps: u32, delay: std::time::Duration) -> Result<()> {
        let from = *self.position.lock().unwrap();
        for hop in smooth_path(from, point, steps) {
            *self.position.lock().unwrap() = hop;
            std::thread::sleep(delay);
        }
        log::debug!("pointer: smooth move to ({}, {})", point.x, point.y);
        Ok(())
    }

    fn press(&self, button: Button) -> Result<()> {
        log::debug!("pointer: press {button:?}");
        Ok(())
    }

    fn release(&self, button: Button) -> Result<()> {
        log::debug!("pointer: release {button:?}");
        Ok(())
    }

    fn click(&self, button: Button) -> Result<()> {
        self.press(button)?;
        self.release(button)
    }

    fn scroll(&self, dx: i32, dy: i32) -> Result<()> {
        log::debug!("pointer: scroll dx={dx} dy={dy}");
        Ok(())
    }
}
