//! Platform collaborators
//!
//! Real backends implement [`crate::input::KeystrokeSource`],
//! [`crate::accessibility::Accessibility`], [`crate::overlay::Overlay`],
//! and [`crate::pointer::PointerSink`] on top of the OS input hooks, the
//! accessibility tree, and a native overlay window. The headless backend
//! here stands in for them during development and in integration tests.

pub mod headless;

use std::sync::Arc;

use crate::accessibility::Accessibility;
use crate::input::KeystrokeSource;
use crate::overlay::Overlay;
use crate::pointer::PointerSink;

/// The collaborator bundle the daemon wires into the controller.
#[derive(Clone)]
pub struct Collaborators {
    pub keys: Arc<dyn KeystrokeSource>,
    pub accessibility: Arc<dyn Accessibility>,
    pub overlay: Arc<dyn Overlay>,
    pub pointer: Arc<dyn PointerSink>,
}

/// The backend for this build. Native backends replace this behind the
/// same signature.
pub fn default_collaborators() -> Collaborators {
    headless::collaborators()
}
