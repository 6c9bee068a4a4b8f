//! Configuration snapshot
//!
//! Settings are loaded from a TOML file into one immutable snapshot that
//! sessions capture at activation. Reloads swap the snapshot in the app
//! state and notify subscribers; an active session keeps the snapshot it
//! started with. A reload that fails validation keeps the previous snapshot.

mod actions;
mod general;
mod grid;
mod hints;
mod scroll;
mod style;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub use actions::{ActionBindings, ActionConfig, SmoothCursorConfig};
pub use general::{GeneralConfig, HotkeysConfig};
pub use grid::{GridConfig, RecursiveGridConfig};
pub use hints::HintsConfig;
pub use scroll::ScrollConfig;
pub use style::{GridStyle, HintStyle, ScrollStyle, StyleConfig};

/// The full configuration snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub hints: HintsConfig,
    pub grid: GridConfig,
    pub recursive_grid: RecursiveGridConfig,
    pub scroll: ScrollConfig,
    pub action: ActionConfig,
    pub smooth_cursor: SmoothCursorConfig,
    pub general: GeneralConfig,
    pub hotkeys: HotkeysConfig,
    pub style: StyleConfig,
}

impl Config {
    /// Default config file location.
    pub fn file_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("neru").join("config.toml"))
    }

    /// Load and validate a snapshot from `path`. A missing file yields the
    /// defaults; a file that fails to parse or validate is an error and the
    /// caller keeps whatever snapshot it already has.
    pub fn load(path: &std::path::Path) -> Result<Self> {
        let config = match std::fs::read_to_string(path) {
            Ok(contents) => toml::from_str::<Config>(&contents)
                .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("no config file at {}, using defaults", path.display());
                Config::default()
            }
            Err(e) => return Err(Error::Config(format!("{}: {e}", path.display()))),
        };
        config.validate()?;
        Ok(config)
    }

    /// Whether the configuration gates `mode` on.
    pub fn mode_enabled(&self, mode: crate::state::Mode) -> bool {
        match mode {
            crate::state::Mode::Idle => false,
            crate::state::Mode::Hints => self.hints.enabled,
            crate::state::Mode::FlatGrid => self.grid.enabled,
            crate::state::Mode::RecursiveGrid => self.recursive_grid.enabled,
            crate::state::Mode::Scroll => self.scroll.enabled,
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.hints.validate()?;
        self.grid.validate()?;
        self.recursive_grid.validate()?;
        self.scroll.validate()?;
        self.action.validate()?;
        self.smooth_cursor.validate()?;
        self.general.validate()?;
        self.hotkeys.validate()?;
        Ok(())
    }
}

/// Require `s` to be at least `min_len` distinct printable ASCII characters.
fn validate_charset(option: &str, s: &str, min_len: usize) -> Result<()> {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() < min_len {
        return Err(Error::Config(format!(
            "{option} needs at least {min_len} characters, got {}",
            chars.len()
        )));
    }
    if let Some(c) = chars.iter().find(|c| !c.is_ascii_graphic()) {
        return Err(Error::Config(format!(
            "{option} contains non-ASCII or non-printable character {c:?}"
        )));
    }
    let mut seen = std::collections::HashSet::new();
    if let Some(c) = chars.iter().find(|c| !seen.insert(c.to_ascii_uppercase())) {
        return Err(Error::Config(format!(
            "{option} contains duplicate character {c:?}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        Config::default().validate().unwrap();
    }

    #[test]
    fn test_duplicate_hint_characters_rejected() {
        let mut config = Config::default();
        config.hints.hint_characters = "aab".to_string();
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_case_insensitive_duplicates_rejected() {
        let mut config = Config::default();
        config.hints.hint_characters = "aA".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_short_charset_rejected() {
        let mut config = Config::default();
        config.hints.hint_characters = "a".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_recursive_keys_must_match_dimensions() {
        let mut config = Config::default();
        config.recursive_grid.grid_cols = 3;
        config.recursive_grid.grid_rows = 2;
        config.recursive_grid.keys = "uijk".to_string();
        assert!(config.validate().is_err());
        config.recursive_grid.keys = "uiopjk".to_string();
        config.validate().unwrap();
    }

    #[test]
    fn test_unknown_hotkey_action_rejected() {
        let mut config = Config::default();
        config
            .hotkeys
            .bindings
            .insert("Cmd+x".to_string(), "teleport".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_exec_hotkey_accepted() {
        let mut config = Config::default();
        config
            .hotkeys
            .bindings
            .insert("Cmd+x".to_string(), "exec open -a Terminal".to_string());
        config.validate().unwrap();
    }

    #[test]
    fn test_unknown_scroll_action_rejected() {
        let mut config = Config::default();
        config
            .scroll
            .key_bindings
            .insert("warp".to_string(), vec!["w".to_string()]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_parse_with_defaults() {
        let text = r#"
            [hints]
            hint_characters = "asdf"

            [grid]
            row_labels = "12"
            col_labels = "ab"

            [general]
            restore_cursor_position = false
        "#;
        let config: Config = toml::from_str(text).unwrap();
        assert_eq!(config.hints.hint_characters, "asdf");
        assert_eq!(config.grid.row_labels, "12");
        assert!(!config.general.restore_cursor_position);
        // Unspecified sections fall back to defaults
        assert_eq!(config.recursive_grid.keys, "uijk");
        config.validate().unwrap();
    }
}
