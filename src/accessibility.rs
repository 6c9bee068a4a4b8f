//! Accessibility collaborator contract
//!
//! The platform backend walks the accessibility tree of the frontmost app
//! and reports clickable elements in absolute screen coordinates of the
//! active screen (the screen containing the pointer at query time).

use crate::geometry::{Point, Rect};
use crate::input::SubscriptionId;

/// A clickable UI element discovered by the tree walker.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Stable identifier, opaque to the core.
    pub id: String,
    /// Bounding rectangle in absolute screen coordinates.
    pub bounds: Rect,
    /// Role tag: button, link, menu-item, ...
    pub role: String,
    /// Where the pointer should land; usually the rectangle's center.
    pub dot_position: Point,
}

impl Element {
    pub fn new(id: impl Into<String>, bounds: Rect, role: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            bounds,
            role: role.into(),
            dot_position: bounds.center(),
        }
    }
}

/// Role filter for element queries; empty means every clickable role.
#[derive(Debug, Clone, Default)]
pub struct RoleFilter {
    pub roles: Vec<String>,
}

impl RoleFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn accepts(&self, role: &str) -> bool {
        self.roles.is_empty() || self.roles.iter().any(|r| r == role)
    }
}

/// Drop elements the core cannot target. Zero-area rectangles are rejected
/// at ingestion; collaborators occasionally report collapsed nodes.
pub fn ingest(elements: Vec<Element>) -> Vec<Element> {
    let before = elements.len();
    let kept: Vec<Element> = elements.into_iter().filter(|e| !e.bounds.is_empty()).collect();
    if kept.len() < before {
        log::debug!("dropped {} zero-area elements at ingestion", before - kept.len());
    }
    kept
}

pub type ScreenChangeCallback = std::sync::Arc<dyn Fn(Rect) + Send + Sync>;

/// The accessibility collaborator consumed by the mode controller.
pub trait Accessibility: Send + Sync {
    /// Clickable elements on the active screen matching the role filter.
    fn clickable_elements(&self, filter: &RoleFilter) -> crate::error::Result<Vec<Element>>;

    /// Rectangle of the active screen.
    fn screen_bounds(&self) -> crate::error::Result<Rect>;

    /// Bundle identifier of the frontmost application, when known.
    fn frontmost_app_id(&self) -> Option<String>;

    /// Notifies when the active-screen rectangle changes.
    fn on_screen_change(&self, cb: ScreenChangeCallback) -> SubscriptionId;

    fn unsubscribe_screen_change(&self, id: SubscriptionId);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ingest_rejects_zero_area() {
        let elements = vec![
            Element::new("a", Rect::new(0, 0, 10, 10), "button"),
            Element::new("b", Rect::new(5, 5, 5, 25), "link"),
            Element::new("c", Rect::new(5, 5, 25, 5), "link"),
        ];
        let kept = ingest(elements);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, "a");
    }

    #[test]
    fn test_dot_position_defaults_to_center() {
        let e = Element::new("a", Rect::new(60, 10, 100, 50), "button");
        assert_eq!(e.dot_position, Point::new(80, 30));
    }

    #[test]
    fn test_role_filter() {
        let filter = RoleFilter {
            roles: vec!["button".to_string()],
        };
        assert!(filter.accepts("button"));
        assert!(!filter.accepts("link"));
        assert!(RoleFilter::all().accepts("link"));
    }
}
