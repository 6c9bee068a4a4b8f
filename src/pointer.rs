//! Pointer sink contract
//!
//! The platform backend synthesises pointer events. Calls are synchronous
//! from the worker thread; a sink that talks to an async OS API applies its
//! own queuing and reports failures as `Error::Pointer`.

use crate::error::Result;
use crate::geometry::Point;

/// Pointer buttons the core synthesises events for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Left,
    Right,
    Middle,
}

pub trait PointerSink: Send + Sync {
    /// Current pointer position (used for cursor capture at activation).
    fn position(&self) -> Result<Point>;

    fn move_to(&self, point: Point) -> Result<()>;

    /// Move along a straight line in `steps` hops spaced `delay` apart.
    fn move_smooth(&self, point: Point, steps: u32, delay: std::time::Duration) -> Result<()>;

    fn press(&self, button: Button) -> Result<()>;
    fn release(&self, button: Button) -> Result<()>;
    fn click(&self, button: Button) -> Result<()>;

    /// Scroll by signed deltas; up and left are positive.
    fn scroll(&self, dx: i32, dy: i32) -> Result<()>;
}

/// Intermediate positions for a smooth move, endpoint included. Backends
/// share this so every sink interpolates the same way.
pub fn smooth_path(from: Point, to: Point, steps: u32) -> Vec<Point> {
    let steps = steps.max(1);
    let mut path = Vec::with_capacity(steps as usize);
    for i in 1..=steps {
        let t = i as f64 / steps as f64;
        path.push(Point::new(
            from.x + ((to.x - from.x) as f64 * t).round() as i32,
            from.y + ((to.y - from.y) as f64 * t).round() as i32,
        ));
    }
    path
}
