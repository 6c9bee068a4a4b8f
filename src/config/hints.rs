use serde::{Deserialize, Serialize};

use crate::error::Result;

use super::validate_charset;

/// Settings for hint mode.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HintsConfig {
    /// Gates hint mode activation.
    pub enabled: bool,
    /// Alphabet for hint labels, home row first.
    pub hint_characters: String,
    /// Hide hints that no longer match the typed prefix.
    pub hide_unmatched: bool,
    /// Key that clears the typed prefix without exiting.
    pub reset_key: String,
}

impl Default for HintsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            hint_characters: "asdfghjklqwertyuiopzxcvbnm".to_string(),
            hide_unmatched: false,
            reset_key: ",".to_string(),
        }
    }
}

impl HintsConfig {
    pub fn validate(&self) -> Result<()> {
        validate_charset("hints.hint_characters", &self.hint_characters, 2)?;
        crate::input::KeyToken::parse(&self.reset_key)?;
        Ok(())
    }
}
