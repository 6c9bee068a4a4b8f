use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::scroll::ScrollAction;

/// Settings for scroll mode.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScrollConfig {
    pub enabled: bool,
    /// Delta for a single directional step.
    pub scroll_step: i32,
    /// Delta for half-page actions.
    pub scroll_step_half: i32,
    /// Delta for go-to-end actions; large enough to exceed any document.
    pub scroll_step_full: i32,
    /// Milliseconds a multi-key sequence may stay pending.
    pub sequence_timeout_ms: u64,
    /// Action name to list of key tokens. Tokens may be single characters,
    /// named keys, modifier combos, or two-letter sequences like `gg`.
    pub key_bindings: BTreeMap<String, Vec<String>>,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        let mut key_bindings = BTreeMap::new();
        let bind = |keys: &[&str]| keys.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        key_bindings.insert("scroll_up".to_string(), bind(&["k", "Up"]));
        key_bindings.insert("scroll_down".to_string(), bind(&["j", "Down"]));
        key_bindings.insert("scroll_left".to_string(), bind(&["h", "Left"]));
        key_bindings.insert("scroll_right".to_string(), bind(&["l", "Right"]));
        key_bindings.insert("go_top".to_string(), bind(&["gg", "Home"]));
        key_bindings.insert("go_bottom".to_string(), bind(&["G", "End"]));
        key_bindings.insert("page_up".to_string(), bind(&["u", "PageUp"]));
        key_bindings.insert("page_down".to_string(), bind(&["d", "PageDown"]));
        Self {
            enabled: true,
            scroll_step: 40,
            scroll_step_half: 400,
            scroll_step_full: 1_000_000,
            sequence_timeout_ms: 500,
            key_bindings,
        }
    }
}

impl ScrollConfig {
    pub fn validate(&self) -> Result<()> {
        if self.scroll_step < 1 || self.scroll_step_half < 1 || self.scroll_step_full < 1 {
            return Err(Error::Config(
                "scroll steps must be positive".to_string(),
            ));
        }
        if self.sequence_timeout_ms == 0 {
            return Err(Error::Config(
                "scroll.sequence_timeout_ms must be positive".to_string(),
            ));
        }
        for (action, tokens) in &self.key_bindings {
            if ScrollAction::parse(action).is_none() {
                return Err(Error::Config(format!(
                    "unknown scroll action {action:?}"
                )));
            }
            for token in tokens {
                // A two-letter sequence is two printable characters; anything
                // else must parse as a single token.
                let is_sequence = token.chars().count() == 2
                    && token.chars().all(|c| c.is_ascii_graphic() && c != '+');
                if !is_sequence {
                    crate::input::KeyToken::parse(token)?;
                }
            }
        }
        Ok(())
    }
}
