//! Recursive grid mode
//!
//! The active rectangle is subdivided into a fixed NxM lattice labelled by
//! a keyset in reading order. Each pick either pushes a new frame or, once
//! the next frame would fall below the minimum cell size or the depth
//! limit, completes with the picked child's center.

use crate::accessibility::Element;
use crate::config::{GridStyle, RecursiveGridConfig};
use crate::engine::{EngineResult, ModeEngine};
use crate::error::Result;
use crate::geometry::Rect;
use crate::grid::subdivide;
use crate::input::{KeyToken, NamedKey};
use crate::overlay::Overlay;
use crate::state::Mode;

/// One level of the subdivision stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Frame {
    rect: Rect,
    depth: u32,
}

/// Recursive grid engine.
pub struct RecursiveGridEngine {
    config: RecursiveGridConfig,
    style: GridStyle,
    keys: Vec<char>,
    reset_key: KeyToken,
    stack: Vec<Frame>,
}

impl RecursiveGridEngine {
    pub fn new(bounds: Rect, config: RecursiveGridConfig, style: GridStyle) -> Result<Self> {
        let reset_key = KeyToken::parse(&config.reset_key)?;
        let keys = config.keys.chars().map(|c| c.to_ascii_uppercase()).collect();
        log::info!(
            "recursive grid: {}x{} over {:?}, max depth {}",
            config.grid_cols,
            config.grid_rows,
            bounds,
            config.max_depth
        );
        Ok(Self {
            keys,
            reset_key,
            stack: vec![Frame {
                rect: bounds,
                depth: 1,
            }],
            config,
            style,
        })
    }

    fn top(&self) -> Frame {
        *self.stack.last().expect("stack never empties")
    }

    pub fn depth(&self) -> u32 {
        self.top().depth
    }

    pub fn active_rect(&self) -> Rect {
        self.top().rect
    }

    /// Child rectangles of the top frame, reading order.
    pub fn children(&self) -> Vec<Rect> {
        subdivide(
            self.top().rect,
            self.config.grid_cols,
            self.config.grid_rows,
        )
    }

    pub fn labels(&self) -> Vec<String> {
        self.keys.iter().map(|c| c.to_string()).collect()
    }

    fn below_minimum(&self, child: Rect) -> bool {
        child.width() < self.config.min_size_width || child.height() < self.config.min_size_height
    }
}

impl ModeEngine for RecursiveGridEngine {
    fn mode(&self) -> Mode {
        Mode::RecursiveGrid
    }

    fn handle_key(&mut self, token: &KeyToken) -> Result<EngineResult> {
        if token.is_named(NamedKey::Escape) {
            return Ok(EngineResult::Exit);
        }
        if token.matches(&self.reset_key) {
            if self.stack.len() > 1 {
                self.stack.truncate(1);
                return Ok(EngineResult::redraw());
            }
            return Ok(EngineResult::proceed());
        }
        if token.is_erase() {
            if self.stack.len() > 1 {
                self.stack.pop();
                return Ok(EngineResult::redraw());
            }
            return Ok(EngineResult::proceed());
        }

        let Some(c) = token.printable_char() else {
            return Ok(EngineResult::proceed());
        };
        let c = c.to_ascii_uppercase();
        let Some(index) = self.keys.iter().position(|&k| k == c) else {
            return Ok(EngineResult::proceed());
        };

        let frame = self.top();
        let child = self.children()[index];
        if frame.depth == self.config.max_depth || self.below_minimum(child) {
            log::info!("recursive grid pick at depth {}: {:?}", frame.depth, child);
            return Ok(EngineResult::Complete {
                point: child.center(),
                element: None,
            });
        }
        self.stack.push(Frame {
            rect: child,
            depth: frame.depth + 1,
        });
        Ok(EngineResult::redraw())
    }

    fn draw(&self, overlay: &dyn Overlay) {
        overlay.draw_recursive_frame(
            self.active_rect(),
            &self.children(),
            &self.labels(),
            &self.style,
        );
    }

    fn on_screen_change(&mut self, bounds: Rect, _elements: Option<Vec<Element>>) -> Result<()> {
        // Rebuild to the new rectangle; in-progress subdivision resets.
        self.stack = vec![Frame {
            rect: bounds,
            depth: 1,
        }];
        Ok(())
    }
}
