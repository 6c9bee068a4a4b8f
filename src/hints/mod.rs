//! Hint mode: labeled overlays over clickable elements
//!
//! The engine owns the hint collection for one session. Typing narrows the
//! prefix tree; a key that matches no surviving label is ignored, and the
//! first exact match completes the session with the hint's render center.

pub mod labels;

use crate::accessibility::{self, Element};
use crate::config::{HintStyle, HintsConfig};
use crate::engine::{EngineResult, ModeEngine};
use crate::error::{Error, Result};
use crate::geometry::{Point, Rect};
use crate::input::{KeyToken, NamedKey};
use crate::overlay::Overlay;
use crate::state::Mode;

pub use labels::generate_labels;

/// One labeled hint over an element. Lives only inside a hint-mode
/// session; discarded on exit or reset.
#[derive(Debug, Clone, PartialEq)]
pub struct Hint {
    /// Uppercase label the user types.
    pub label: String,
    pub element: Element,
    /// Render top-left anchor.
    pub position: Point,
    /// Render size in pixels, from label length and style font metrics.
    pub size: (i32, i32),
    /// How many leading label characters the typed prefix matches.
    pub matched_len: usize,
}

impl Hint {
    fn new(label: String, element: Element, style: &HintStyle) -> Self {
        let size = style.label_size(label.chars().count());
        let dot = element.dot_position;
        Self {
            label,
            element,
            position: Point::new(dot.x - size.0 / 2, dot.y - size.1 / 2),
            size,
            matched_len: 0,
        }
    }

    /// Center of the rendered label; this is the completion target point.
    pub fn render_center(&self) -> Point {
        Point::new(
            self.position.x + self.size.0 / 2,
            self.position.y + self.size.1 / 2,
        )
    }
}

/// The hint list plus the typed prefix.
#[derive(Debug, Default)]
pub struct HintCollection {
    hints: Vec<Hint>,
    prefix: String,
}

impl HintCollection {
    /// Build hints for `elements`, rejecting zero-area rectangles.
    /// Fails when nothing remains to hint.
    pub fn build(elements: Vec<Element>, chars: &str, style: &HintStyle) -> Result<Self> {
        let elements = accessibility::ingest(elements);
        if elements.is_empty() {
            return Err(Error::Accessibility(
                "no clickable elements on the active screen".to_string(),
            ));
        }
        let labels = labels::generate_labels(elements.len(), chars)?;
        let hints = labels
            .into_iter()
            .zip(elements)
            .map(|(label, element)| Hint::new(label, element, style))
            .collect();
        Ok(Self {
            hints,
            prefix: String::new(),
        })
    }

    pub fn hints(&self) -> &[Hint] {
        &self.hints
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn is_empty(&self) -> bool {
        self.hints.is_empty()
    }

    fn refresh_matched_lens(&mut self) {
        for hint in &mut self.hints {
            hint.matched_len = if hint.label.starts_with(&self.prefix) {
                self.prefix.chars().count()
            } else {
                0
            };
        }
    }

    fn set_prefix(&mut self, prefix: String) {
        self.prefix = prefix;
        self.refresh_matched_lens();
    }

    /// Hints that survive the current prefix.
    pub fn surviving(&self) -> impl Iterator<Item = &Hint> {
        self.hints
            .iter()
            .filter(|h| h.label.starts_with(&self.prefix))
    }

    fn exact_match(&self, candidate: &str) -> Option<&Hint> {
        self.hints.iter().find(|h| h.label == candidate)
    }

    fn has_proper_prefix(&self, candidate: &str) -> bool {
        self.hints
            .iter()
            .any(|h| h.label.len() > candidate.len() && h.label.starts_with(candidate))
    }
}

/// Hint mode engine.
pub struct HintEngine {
    collection: HintCollection,
    config: HintsConfig,
    style: HintStyle,
    reset_key: KeyToken,
}

impl HintEngine {
    pub fn new(elements: Vec<Element>, config: HintsConfig, style: HintStyle) -> Result<Self> {
        let reset_key = KeyToken::parse(&config.reset_key)?;
        let collection = HintCollection::build(elements, &config.hint_characters, &style)?;
        log::info!("hint mode: {} hints", collection.hints().len());
        Ok(Self {
            collection,
            config,
            style,
            reset_key,
        })
    }

    pub fn collection(&self) -> &HintCollection {
        &self.collection
    }

    /// Hints handed to the overlay: everything, or only survivors when
    /// `hide_unmatched` is set and a prefix is typed.
    pub fn visible_hints(&self) -> Vec<Hint> {
        if self.config.hide_unmatched && !self.collection.prefix().is_empty() {
            self.collection.surviving().cloned().collect()
        } else {
            self.collection.hints().to_vec()
        }
    }
}

impl ModeEngine for HintEngine {
    fn mode(&self) -> Mode {
        Mode::Hints
    }

    fn handle_key(&mut self, token: &KeyToken) -> Result<EngineResult> {
        if token.is_named(NamedKey::Escape) {
            return Ok(EngineResult::Exit);
        }
        if token.is_erase() {
            if self.collection.prefix().is_empty() {
                return Ok(EngineResult::proceed());
            }
            let mut prefix = self.collection.prefix().to_string();
            prefix.pop();
            self.collection.set_prefix(prefix);
            return Ok(EngineResult::redraw());
        }
        if token.matches(&self.reset_key) {
            self.collection.set_prefix(String::new());
            return Ok(EngineResult::redraw());
        }

        let Some(c) = token.printable_char() else {
            return Ok(EngineResult::proceed());
        };
        let mut candidate = self.collection.prefix().to_string();
        candidate.push(c.to_ascii_uppercase());

        if let Some(hint) = self.collection.exact_match(&candidate) {
            let point = hint.render_center();
            log::info!("hint pick {:?} -> element {}", hint.label, hint.element.id);
            return Ok(EngineResult::Complete {
                point,
                element: Some(hint.element.clone()),
            });
        }
        if self.collection.has_proper_prefix(&candidate) {
            self.collection.set_prefix(candidate);
            return Ok(EngineResult::redraw());
        }
        // Miss: prefix unchanged
        log::debug!("hint mode: {c:?} matches nothing, ignored");
        Ok(EngineResult::proceed())
    }

    fn draw(&self, overlay: &dyn Overlay) {
        overlay.draw_hints(&self.visible_hints(), &self.style);
    }

    fn on_screen_change(&mut self, _bounds: Rect, elements: Option<Vec<Element>>) -> Result<()> {
        let Some(elements) = elements else {
            return Ok(());
        };
        let prefix = self.collection.prefix().to_string();
        let mut collection =
            HintCollection::build(elements, &self.config.hint_characters, &self.style)?;
        // Keep the typed prefix only while it can still narrow to a label
        if !prefix.is_empty() && collection.has_proper_prefix(&prefix) {
            collection.set_prefix(prefix);
        }
        self.collection = collection;
        Ok(())
    }
}
