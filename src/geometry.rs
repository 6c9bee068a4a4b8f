//! Screen geometry primitives
//!
//! All coordinates are absolute screen pixels of the active screen at the
//! time a mode session starts. Rectangles are half-open on neither edge:
//! `min` and `max` are both corners, `width = max_x - min_x`.

use serde::{Deserialize, Serialize};

/// A point in absolute screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle in absolute screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

impl Rect {
    pub fn new(min_x: i32, min_y: i32, max_x: i32, max_y: i32) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    pub fn width(&self) -> i32 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> i32 {
        self.max_y - self.min_y
    }

    /// Geometric center, rounded down on odd extents.
    pub fn center(&self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2,
            (self.min_y + self.max_y) / 2,
        )
    }

    /// True when the point lies inside the rectangle (edges inclusive).
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }

    pub fn is_empty(&self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }
}

/// Integer breakpoints splitting `[min, max]` into `parts` spans.
///
/// Offsets use round-half-up so the spans tile the range exactly; the final
/// breakpoint is snapped to `max` so rounding can never leave a sliver at
/// the far edge. Returns `parts + 1` values starting at `min` and ending at
/// `max`.
pub fn breakpoints(min: i32, max: i32, parts: u32) -> Vec<i32> {
    debug_assert!(parts > 0);
    let span = (max - min) as f64;
    let mut points = Vec::with_capacity(parts as usize + 1);
    points.push(min);
    for i in 1..parts {
        let offset = (span * i as f64 / parts as f64).round() as i32;
        points.push(min + offset);
    }
    points.push(max);
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center() {
        assert_eq!(Rect::new(0, 0, 200, 100).center(), Point::new(100, 50));
        // Odd extents round down
        assert_eq!(Rect::new(125, 125, 150, 150).center(), Point::new(137, 137));
    }

    #[test]
    fn test_contains() {
        let r = Rect::new(10, 10, 50, 50);
        assert!(r.contains(Point::new(10, 10)));
        assert!(r.contains(Point::new(30, 30)));
        assert!(r.contains(Point::new(50, 50)));
        assert!(!r.contains(Point::new(51, 30)));
        assert!(!r.contains(Point::new(30, 9)));
    }

    #[test]
    fn test_breakpoints_tile_exactly() {
        for parts in 1..=13u32 {
            for span in [1, 7, 100, 1437, 2560] {
                let pts = breakpoints(0, span, parts);
                assert_eq!(pts.len(), parts as usize + 1);
                assert_eq!(pts[0], 0);
                assert_eq!(*pts.last().unwrap(), span);
                // Strictly increasing when the span allows it
                if span >= parts as i32 {
                    for w in pts.windows(2) {
                        assert!(w[1] > w[0], "non-increasing at parts={parts} span={span}");
                    }
                }
            }
        }
    }

    #[test]
    fn test_breakpoints_round_half_up() {
        // 100 / 8 = 12.5 -> first interior breakpoint rounds up to 13
        let pts = breakpoints(0, 100, 8);
        assert_eq!(pts[1], 13);
    }

    #[test]
    fn test_breakpoints_offset_origin() {
        let pts = breakpoints(100, 200, 2);
        assert_eq!(pts, vec![100, 150, 200]);
    }
}
