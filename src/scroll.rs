//! Scroll mode
//!
//! Directional keys translate into scroll deltas through the pointer sink.
//! Bindings may be single characters, named keys, modifier combos, or
//! two-letter sequences like `gg`. Sequences are matched case-sensitively
//! with a pending-buffer window; everything else matches letters
//! case-insensitively. Up and left produce positive deltas.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::accessibility::Element;
use crate::config::{ScrollConfig, ScrollStyle};
use crate::engine::{EngineResult, ModeEngine};
use crate::error::Result;
use crate::geometry::Rect;
use crate::input::{KeyToken, NamedKey};
use crate::overlay::Overlay;
use crate::pointer::PointerSink;
use crate::state::Mode;

/// The eight scroll actions a key can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollAction {
    ScrollUp,
    ScrollDown,
    ScrollLeft,
    ScrollRight,
    GoTop,
    GoBottom,
    PageUp,
    PageDown,
}

impl ScrollAction {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "scroll_up" => Some(Self::ScrollUp),
            "scroll_down" => Some(Self::ScrollDown),
            "scroll_left" => Some(Self::ScrollLeft),
            "scroll_right" => Some(Self::ScrollRight),
            "go_top" => Some(Self::GoTop),
            "go_bottom" => Some(Self::GoBottom),
            "page_up" => Some(Self::PageUp),
            "page_down" => Some(Self::PageDown),
            _ => None,
        }
    }

    /// Signed `(dx, dy)` delta: directional steps use `scroll_step`,
    /// half-page actions `scroll_step_half`, go-to-end actions
    /// `scroll_step_full`.
    pub fn delta(&self, config: &ScrollConfig) -> (i32, i32) {
        match self {
            Self::ScrollUp => (0, config.scroll_step),
            Self::ScrollDown => (0, -config.scroll_step),
            Self::ScrollLeft => (config.scroll_step, 0),
            Self::ScrollRight => (-config.scroll_step, 0),
            Self::PageUp => (0, config.scroll_step_half),
            Self::PageDown => (0, -config.scroll_step_half),
            Self::GoTop => (0, config.scroll_step_full),
            Self::GoBottom => (0, -config.scroll_step_full),
        }
    }
}

/// One parsed binding.
#[derive(Debug, Clone, PartialEq)]
enum Binding {
    /// Single token: character, named key, or modifier combo.
    Token(KeyToken),
    /// Multi-key sequence, matched case-sensitively.
    Sequence(Vec<KeyToken>),
}

fn parse_binding(token: &str) -> Result<Binding> {
    let chars: Vec<char> = token.chars().collect();
    let is_sequence =
        chars.len() == 2 && chars.iter().all(|c| c.is_ascii_graphic() && *c != '+');
    if is_sequence {
        Ok(Binding::Sequence(
            chars.into_iter().map(KeyToken::char).collect(),
        ))
    } else {
        Ok(Binding::Token(KeyToken::parse(token)?))
    }
}

/// Scroll mode engine. Stays active until explicitly exited.
pub struct ScrollEngine {
    bindings: Vec<(ScrollAction, Binding)>,
    config: ScrollConfig,
    style: ScrollStyle,
    bounds: Rect,
    sink: Arc<dyn PointerSink>,
    /// Pending keys of a partially-typed sequence.
    buffer: Vec<KeyToken>,
    deadline: Option<Instant>,
}

impl ScrollEngine {
    pub fn new(
        bounds: Rect,
        config: ScrollConfig,
        style: ScrollStyle,
        sink: Arc<dyn PointerSink>,
    ) -> Result<Self> {
        let mut bindings = Vec::new();
        for (name, tokens) in &config.key_bindings {
            let Some(action) = ScrollAction::parse(name) else {
                continue;
            };
            for token in tokens {
                bindings.push((action, parse_binding(token)?));
            }
        }
        Ok(Self {
            bindings,
            config,
            style,
            bounds,
            sink,
            buffer: Vec::new(),
            deadline: None,
        })
    }

    fn timeout(&self) -> Duration {
        Duration::from_millis(self.config.sequence_timeout_ms)
    }

    fn expire_stale_buffer(&mut self) {
        if let Some(deadline) = self.deadline {
            if Instant::now() > deadline {
                log::debug!("scroll: pending sequence timed out, discarding");
                self.buffer.clear();
                self.deadline = None;
            }
        }
    }

    fn sequence_exact(&self, candidate: &[KeyToken]) -> Option<ScrollAction> {
        self.bindings.iter().find_map(|(action, binding)| {
            matches!(binding, Binding::Sequence(seq) if seq.as_slice() == candidate)
                .then_some(*action)
        })
    }

    fn is_sequence_prefix(&self, candidate: &[KeyToken]) -> bool {
        self.bindings.iter().any(|(_, binding)| {
            matches!(binding, Binding::Sequence(seq)
                if seq.len() > candidate.len() && seq.starts_with(candidate))
        })
    }

    fn single_match(&self, token: &KeyToken) -> Option<ScrollAction> {
        self.bindings.iter().find_map(|(action, binding)| {
            matches!(binding, Binding::Token(t) if t.matches(token)).then_some(*action)
        })
    }

    fn fire(&self, action: ScrollAction) -> Result<()> {
        let (dx, dy) = action.delta(&self.config);
        log::debug!("scroll {action:?}: dx={dx} dy={dy}");
        self.sink.scroll(dx, dy)
    }

    fn buffer_key(&mut self, token: KeyToken) {
        self.buffer.push(token);
        self.deadline = Some(Instant::now() + self.timeout());
    }

    fn handle_char(&mut self, token: &KeyToken) -> Result<EngineResult> {
        if !self.buffer.is_empty() {
            let mut candidate = self.buffer.clone();
            candidate.push(*token);
            if let Some(action) = self.sequence_exact(&candidate) {
                self.buffer.clear();
                self.deadline = None;
                self.fire(action)?;
                return Ok(EngineResult::proceed());
            }
            if self.is_sequence_prefix(&candidate) {
                self.buffer = candidate;
                self.deadline = Some(Instant::now() + self.timeout());
                return Ok(EngineResult::proceed());
            }
            // Mismatch: discard the buffer and examine the key on its own
            self.buffer.clear();
            self.deadline = None;
        }

        // A key that could start a longer sequence is buffered even when
        // it is itself a binding.
        if self.is_sequence_prefix(std::slice::from_ref(token)) {
            self.buffer_key(*token);
            return Ok(EngineResult::proceed());
        }
        if let Some(action) = self.single_match(token) {
            self.fire(action)?;
        }
        Ok(EngineResult::proceed())
    }
}

impl ModeEngine for ScrollEngine {
    fn mode(&self) -> Mode {
        Mode::Scroll
    }

    fn handle_key(&mut self, token: &KeyToken) -> Result<EngineResult> {
        if token.is_named(NamedKey::Escape) {
            return Ok(EngineResult::Exit);
        }
        self.expire_stale_buffer();

        if token.printable_char().is_some() {
            return self.handle_char(token);
        }
        // Named keys and chords cannot extend a character sequence
        self.buffer.clear();
        self.deadline = None;
        if let Some(action) = self.single_match(token) {
            self.fire(action)?;
        }
        Ok(EngineResult::proceed())
    }

    fn draw(&self, overlay: &dyn Overlay) {
        overlay.draw_scroll_highlight(
            self.bounds,
            &self.style.highlight_color,
            self.style.highlight_width,
        );
    }

    fn on_screen_change(&mut self, _bounds: Rect, _elements: Option<Vec<Element>>) -> Result<()> {
        Ok(())
    }
}
