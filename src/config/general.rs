use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Controller-wide behaviour.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GeneralConfig {
    /// Keys that exit any active mode.
    pub mode_exit_keys: Vec<String>,
    /// Hide the overlay window while a screen share is detected, without
    /// deactivating the mode.
    pub hide_overlay_in_screen_share: bool,
    /// Move the pointer back to its captured position when a mode ends.
    pub restore_cursor_position: bool,
    /// Bundle identifiers of apps in which activation is rejected.
    pub excluded_apps: Vec<String>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            mode_exit_keys: vec!["Escape".to_string()],
            hide_overlay_in_screen_share: true,
            restore_cursor_position: true,
            excluded_apps: vec![],
        }
    }
}

impl GeneralConfig {
    pub fn validate(&self) -> Result<()> {
        if self.mode_exit_keys.is_empty() {
            return Err(Error::Config(
                "general.mode_exit_keys must not be empty".to_string(),
            ));
        }
        for key in &self.mode_exit_keys {
            crate::input::KeyToken::parse(key)?;
        }
        Ok(())
    }
}

/// Global hotkey bindings: hotkey string to action string. An action is a
/// mode name (`hints`, `grid`, `recursive_grid`, `scroll`) or `exec <cmd>`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HotkeysConfig {
    pub bindings: BTreeMap<String, String>,
}

impl Default for HotkeysConfig {
    fn default() -> Self {
        let mut bindings = BTreeMap::new();
        bindings.insert("Cmd+Shift+Space".to_string(), "hints".to_string());
        bindings.insert("Cmd+Shift+g".to_string(), "grid".to_string());
        bindings.insert("Cmd+Shift+f".to_string(), "recursive_grid".to_string());
        bindings.insert("Cmd+Shift+j".to_string(), "scroll".to_string());
        Self { bindings }
    }
}

impl HotkeysConfig {
    pub fn validate(&self) -> Result<()> {
        for (hotkey, action) in &self.bindings {
            crate::input::KeyToken::parse(hotkey)?;
            let known_mode = matches!(
                action.as_str(),
                "hints" | "grid" | "recursive_grid" | "scroll"
            );
            let is_exec = action
                .strip_prefix("exec ")
                .is_some_and(|cmd| !cmd.trim().is_empty());
            if !known_mode && !is_exec {
                return Err(Error::Config(format!(
                    "hotkey {hotkey:?} is bound to unknown action {action:?}"
                )));
            }
        }
        Ok(())
    }
}
