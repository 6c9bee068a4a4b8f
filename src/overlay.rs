//! Overlay surface contract
//!
//! The overlay renderer lives on the platform's UI thread; these calls are
//! non-blocking and may be invoked from any thread. The renderer may
//! coalesce consecutive redraws but must preserve last-write-wins.
//! `resize_to_active_screen` is the one asynchronous call: it invokes the
//! completion callback once the surface matches the active screen.

use crate::config::{GridStyle, HintStyle};
use crate::geometry::Rect;
use crate::grid::GridCell;
use crate::hints::Hint;

/// Completion callback for `resize_to_active_screen`. Owned boxed closure;
/// no raw context pointers cross the collaborator boundary.
pub type ResizeDone = Box<dyn FnOnce() + Send>;

pub trait Overlay: Send + Sync {
    fn resize_to_active_screen(&self, done: ResizeDone);

    fn show(&self);
    fn hide(&self);
    fn clear(&self);

    /// Render the full hint list. Each hint carries its matched-prefix
    /// length; matched characters render in the matched-text colour.
    fn draw_hints(&self, hints: &[Hint], style: &HintStyle);

    fn draw_grid_cells(&self, cells: &[GridCell], style: &GridStyle);

    fn draw_recursive_frame(
        &self,
        parent: Rect,
        children: &[Rect],
        labels: &[String],
        style: &GridStyle,
    );

    fn draw_scroll_highlight(&self, rect: Rect, color: &str, width: f64);

    /// Surface a user-visible failure through the overlay's notification
    /// channel.
    fn notify_error(&self, message: &str);
}
