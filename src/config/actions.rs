use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// In-mode hotkeys that arm a pending pointer action before or during
/// target selection.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ActionConfig {
    pub key_bindings: ActionBindings,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ActionBindings {
    pub left_click: Vec<String>,
    pub right_click: Vec<String>,
    pub middle_click: Vec<String>,
    pub mouse_down: Vec<String>,
    pub mouse_up: Vec<String>,
}

impl Default for ActionBindings {
    fn default() -> Self {
        let bind = |keys: &[&str]| keys.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        Self {
            left_click: bind(&["Ctrl+n"]),
            right_click: bind(&["Ctrl+r"]),
            middle_click: bind(&["Ctrl+m"]),
            mouse_down: bind(&["Ctrl+d"]),
            mouse_up: bind(&["Ctrl+u"]),
        }
    }
}

impl ActionConfig {
    pub fn validate(&self) -> Result<()> {
        let b = &self.key_bindings;
        for tokens in [
            &b.left_click,
            &b.right_click,
            &b.middle_click,
            &b.mouse_down,
            &b.mouse_up,
        ] {
            for token in tokens {
                crate::input::KeyToken::parse(token)?;
            }
        }
        Ok(())
    }
}

/// Smooth cursor movement: interpolated steps instead of a single jump.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SmoothCursorConfig {
    pub move_mouse_enabled: bool,
    /// Number of intermediate positions along the straight line.
    pub steps: u32,
    /// Milliseconds between intermediate positions.
    pub delay: u64,
}

impl Default for SmoothCursorConfig {
    fn default() -> Self {
        Self {
            move_mouse_enabled: false,
            steps: 20,
            delay: 2,
        }
    }
}

impl SmoothCursorConfig {
    pub fn validate(&self) -> Result<()> {
        if self.move_mouse_enabled && self.steps == 0 {
            return Err(Error::Config(
                "smooth_cursor.steps must be positive when enabled".to_string(),
            ));
        }
        Ok(())
    }
}
