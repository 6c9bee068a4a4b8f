//! Common contract shared by the four mode engines.

use crate::accessibility::Element;
use crate::error::Result;
use crate::geometry::{Point, Rect};
use crate::input::KeyToken;
use crate::overlay::Overlay;
use crate::state::Mode;

/// Outcome of feeding one key token to an engine.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineResult {
    /// Stay in the mode; redraw the overlay when `redraw` is set.
    Continue { redraw: bool },
    /// A target was picked. Hints carry the picked element.
    Complete {
        point: Point,
        element: Option<Element>,
    },
    /// Leave the mode without a pick.
    Exit,
}

impl EngineResult {
    pub fn proceed() -> Self {
        EngineResult::Continue { redraw: false }
    }

    pub fn redraw() -> Self {
        EngineResult::Continue { redraw: true }
    }
}

/// One engine instance exists per non-idle session; no state is shared
/// between variants. The engine is mutated only from the worker thread
/// that processes keystrokes.
pub trait ModeEngine: Send {
    fn mode(&self) -> Mode;

    /// Process one key token, in OS delivery order.
    fn handle_key(&mut self, token: &KeyToken) -> Result<EngineResult>;

    /// Push the current render payload to the overlay.
    fn draw(&self, overlay: &dyn Overlay);

    /// The active screen changed mid-session. Grids rebuild to the new
    /// rectangle and reset any in-progress selection; hints rebuild from
    /// `elements` preserving whatever typed prefix is still matchable;
    /// scroll ignores the change.
    fn on_screen_change(&mut self, bounds: Rect, elements: Option<Vec<Element>>) -> Result<()>;
}
