use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

use super::validate_charset;

/// Settings for the flat row-by-column grid.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GridConfig {
    /// Gates flat-grid mode activation.
    pub enabled: bool,
    /// Fallback alphabet when explicit row/col labels are not set; both
    /// axes then use this set, giving a square lattice.
    pub characters: String,
    /// One character per row; empty derives rows from `characters`.
    pub row_labels: String,
    /// One character per column; empty derives columns from `characters`.
    pub col_labels: String,
    /// Keys for the 3x3 sub-selection inside a picked cell, in reading
    /// order. Empty disables the subgrid refinement.
    pub sublayer_keys: String,
    /// Key that clears the in-progress selection without exiting.
    pub reset_key: String,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            characters: "asdfghjkl".to_string(),
            row_labels: String::new(),
            col_labels: String::new(),
            sublayer_keys: String::new(),
            reset_key: ",".to_string(),
        }
    }
}

impl GridConfig {
    pub fn validate(&self) -> Result<()> {
        validate_charset("grid.characters", &self.characters, 2)?;
        if !self.row_labels.is_empty() {
            validate_charset("grid.row_labels", &self.row_labels, 2)?;
        }
        if !self.col_labels.is_empty() {
            validate_charset("grid.col_labels", &self.col_labels, 2)?;
        }
        if !self.sublayer_keys.is_empty() {
            validate_charset("grid.sublayer_keys", &self.sublayer_keys, 9)?;
        }
        crate::input::KeyToken::parse(&self.reset_key)?;
        Ok(())
    }
}

/// Settings for the recursively-subdividing grid.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RecursiveGridConfig {
    pub enabled: bool,
    pub grid_cols: u32,
    pub grid_rows: u32,
    /// Exactly `grid_cols x grid_rows` keys, in reading order.
    pub keys: String,
    /// Subdivision stops once a child would be narrower than this.
    pub min_size_width: i32,
    pub min_size_height: i32,
    pub max_depth: u32,
    pub reset_key: String,
}

impl Default for RecursiveGridConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            grid_cols: 2,
            grid_rows: 2,
            keys: "uijk".to_string(),
            min_size_width: 25,
            min_size_height: 25,
            max_depth: 5,
            reset_key: ",".to_string(),
        }
    }
}

impl RecursiveGridConfig {
    pub fn validate(&self) -> Result<()> {
        if self.grid_cols < 2 || self.grid_rows < 2 {
            return Err(Error::Config(format!(
                "recursive_grid requires at least 2x2, got {}x{}",
                self.grid_cols, self.grid_rows
            )));
        }
        let expected = (self.grid_cols * self.grid_rows) as usize;
        validate_charset("recursive_grid.keys", &self.keys, expected)?;
        if self.keys.chars().count() != expected {
            return Err(Error::Config(format!(
                "recursive_grid.keys must have exactly {} characters for a {}x{} grid, got {}",
                expected,
                self.grid_cols,
                self.grid_rows,
                self.keys.chars().count()
            )));
        }
        if self.min_size_width < 1 || self.min_size_height < 1 {
            return Err(Error::Config(
                "recursive_grid minimum cell size must be positive".to_string(),
            ));
        }
        if self.max_depth < 1 {
            return Err(Error::Config(
                "recursive_grid.max_depth must be at least 1".to_string(),
            ));
        }
        crate::input::KeyToken::parse(&self.reset_key)?;
        Ok(())
    }
}
