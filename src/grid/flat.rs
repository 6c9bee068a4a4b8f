//! Flat grid mode
//!
//! A uniform row-by-column lattice over the active screen. The user picks a
//! row key and a column key (in either order), then optionally refines the
//! cell through a 3x3 subgrid. Cell labels concatenate the row label and
//! the column label.

use crate::accessibility::Element;
use crate::config::{GridConfig, GridStyle};
use crate::engine::{EngineResult, ModeEngine};
use crate::error::Result;
use crate::geometry::Rect;
use crate::grid::{subdivide, GridCell};
use crate::input::{KeyToken, NamedKey};
use crate::overlay::Overlay;
use crate::state::Mode;

/// The lattice for one flat-grid session.
#[derive(Debug)]
struct Grid {
    rows: Vec<char>,
    cols: Vec<char>,
    cells: Vec<Rect>,
}

impl Grid {
    fn build(bounds: Rect, config: &GridConfig) -> Self {
        // Explicit labels win; otherwise both axes derive from the
        // character set, giving a square lattice (minimum 2x2).
        let axis = |labels: &str| -> Vec<char> {
            let source = if labels.is_empty() {
                &config.characters
            } else {
                labels
            };
            source.chars().map(|c| c.to_ascii_uppercase()).collect()
        };
        let rows = axis(&config.row_labels);
        let cols = axis(&config.col_labels);
        let cells = subdivide(bounds, cols.len() as u32, rows.len() as u32);
        Self { rows, cols, cells }
    }

    fn cell(&self, row: usize, col: usize) -> Rect {
        self.cells[row * self.cols.len() + col]
    }

    fn label(&self, row: usize, col: usize) -> String {
        format!("{}{}", self.rows[row], self.cols[col])
    }
}

/// In-progress 3x3 refinement of a picked cell.
#[derive(Debug)]
struct Subgrid {
    cells: Vec<Rect>,
    keys: Vec<char>,
    /// Keyboard-walker position; Tab advances it, Return confirms.
    highlighted: Option<usize>,
}

impl Subgrid {
    fn enter(cell: Rect, sublayer_keys: &str) -> Self {
        Self {
            cells: subdivide(cell, 3, 3),
            keys: sublayer_keys
                .chars()
                .take(9)
                .map(|c| c.to_ascii_uppercase())
                .collect(),
            highlighted: None,
        }
    }
}

/// Flat grid engine.
pub struct FlatGridEngine {
    grid: Grid,
    config: GridConfig,
    style: GridStyle,
    reset_key: KeyToken,
    selected_row: Option<usize>,
    selected_col: Option<usize>,
    subgrid: Option<Subgrid>,
}

impl FlatGridEngine {
    pub fn new(bounds: Rect, config: GridConfig, style: GridStyle) -> Result<Self> {
        let reset_key = KeyToken::parse(&config.reset_key)?;
        let grid = Grid::build(bounds, &config);
        log::info!(
            "flat grid: {}x{} over {:?}",
            grid.rows.len(),
            grid.cols.len(),
            bounds
        );
        Ok(Self {
            grid,
            config,
            style,
            reset_key,
            selected_row: None,
            selected_col: None,
            subgrid: None,
        })
    }

    /// The characters accepted so far; never exceeds 4.
    pub fn typed_prefix(&self) -> String {
        let mut prefix = String::new();
        if let Some(r) = self.selected_row {
            prefix.push(self.grid.rows[r]);
        }
        if let Some(c) = self.selected_col {
            prefix.push(self.grid.cols[c]);
        }
        prefix
    }

    fn clear_selection(&mut self) {
        self.selected_row = None;
        self.selected_col = None;
        self.subgrid = None;
    }

    fn selected_cell(&self) -> Option<Rect> {
        Some(self.grid.cell(self.selected_row?, self.selected_col?))
    }

    /// Render payload: the lattice, or the 3x3 refinement once a cell is
    /// fully selected with the sublayer enabled.
    pub fn cells(&self) -> Vec<GridCell> {
        if let Some(sub) = &self.subgrid {
            return sub
                .cells
                .iter()
                .zip(&sub.keys)
                .enumerate()
                .map(|(i, (rect, key))| GridCell {
                    rect: *rect,
                    label: key.to_string(),
                    is_subgrid: true,
                    highlighted: sub.highlighted == Some(i),
                })
                .collect();
        }
        let mut cells = Vec::with_capacity(self.grid.cells.len());
        for r in 0..self.grid.rows.len() {
            for c in 0..self.grid.cols.len() {
                cells.push(GridCell {
                    rect: self.grid.cell(r, c),
                    label: self.grid.label(r, c),
                    is_subgrid: false,
                    highlighted: false,
                });
            }
        }
        cells
    }

    fn handle_subgrid_key(&mut self, token: &KeyToken) -> Result<EngineResult> {
        let Some(sub) = self.subgrid.as_mut() else {
            return Ok(EngineResult::proceed());
        };
        if token.is_named(NamedKey::Tab) {
            // Round-robin keyboard walker over the 9 sub-cells
            sub.highlighted = Some(sub.highlighted.map_or(0, |i| (i + 1) % sub.cells.len()));
            return Ok(EngineResult::redraw());
        }
        if token.is_named(NamedKey::Return) || token.is_named(NamedKey::Enter) {
            let Some(i) = sub.highlighted else {
                return Ok(EngineResult::proceed());
            };
            return Ok(EngineResult::Complete {
                point: sub.cells[i].center(),
                element: None,
            });
        }
        if let Some(c) = token.printable_char() {
            let c = c.to_ascii_uppercase();
            if let Some(i) = sub.keys.iter().position(|&k| k == c) {
                return Ok(EngineResult::Complete {
                    point: sub.cells[i].center(),
                    element: None,
                });
            }
        }
        Ok(EngineResult::proceed())
    }

    fn complete_or_refine(&mut self) -> EngineResult {
        let Some(cell) = self.selected_cell() else {
            return EngineResult::proceed();
        };
        if !self.config.sublayer_keys.is_empty() {
            self.subgrid = Some(Subgrid::enter(cell, &self.config.sublayer_keys));
            EngineResult::redraw()
        } else {
            EngineResult::Complete {
                point: cell.center(),
                element: None,
            }
        }
    }
}

impl ModeEngine for FlatGridEngine {
    fn mode(&self) -> Mode {
        Mode::FlatGrid
    }

    fn handle_key(&mut self, token: &KeyToken) -> Result<EngineResult> {
        if token.is_named(NamedKey::Escape) {
            return Ok(EngineResult::Exit);
        }
        if token.matches(&self.reset_key) {
            self.clear_selection();
            return Ok(EngineResult::redraw());
        }
        if token.is_erase() {
            // Undo the most recent step: subgrid, then column, then row
            if self.subgrid.take().is_some() {
                return Ok(EngineResult::redraw());
            }
            if self.selected_col.take().is_some() || self.selected_row.take().is_some() {
                return Ok(EngineResult::redraw());
            }
            return Ok(EngineResult::proceed());
        }
        if self.subgrid.is_some() {
            return self.handle_subgrid_key(token);
        }

        let Some(c) = token.printable_char() else {
            return Ok(EngineResult::proceed());
        };
        let c = c.to_ascii_uppercase();
        if self.selected_row.is_none() {
            if let Some(r) = self.grid.rows.iter().position(|&k| k == c) {
                self.selected_row = Some(r);
                if self.selected_col.is_some() {
                    return Ok(self.complete_or_refine());
                }
                return Ok(EngineResult::redraw());
            }
        }
        if self.selected_col.is_none() {
            if let Some(col) = self.grid.cols.iter().position(|&k| k == c) {
                self.selected_col = Some(col);
                if self.selected_row.is_some() {
                    return Ok(self.complete_or_refine());
                }
                return Ok(EngineResult::redraw());
            }
        }
        Ok(EngineResult::proceed())
    }

    fn draw(&self, overlay: &dyn Overlay) {
        overlay.draw_grid_cells(&self.cells(), &self.style);
    }

    fn on_screen_change(&mut self, bounds: Rect, _elements: Option<Vec<Element>>) -> Result<()> {
        // Rebuild to the new rectangle; any in-progress selection resets.
        self.grid = Grid::build(bounds, &self.config);
        self.clear_selection();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;

    fn config_2x2() -> GridConfig {
        GridConfig {
            characters: "AB".to_string(),
            row_labels: "12".to_string(),
            col_labels: "ab".to_string(),
            sublayer_keys: String::new(),
            ..GridConfig::default()
        }
    }

    fn engine(config: GridConfig) -> FlatGridEngine {
        FlatGridEngine::new(Rect::new(0, 0, 200, 100), config, GridStyle::default()).unwrap()
    }

    #[test]
    fn test_cell_layout() {
        let engine = engine(config_2x2());
        let cells = engine.cells();
        assert_eq!(cells.len(), 4);
        assert_eq!(cells[0].label, "1A");
        assert_eq!(cells[0].rect, Rect::new(0, 0, 100, 50));
        assert_eq!(cells[3].label, "2B");
        assert_eq!(cells[3].rect, Rect::new(100, 50, 200, 100));
    }

    #[test]
    fn test_row_then_column_completes() {
        let mut engine = engine(config_2x2());
        assert_eq!(
            engine.handle_key(&KeyToken::char('2')).unwrap(),
            EngineResult::Continue { redraw: true }
        );
        let result = engine.handle_key(&KeyToken::char('b')).unwrap();
        assert_eq!(
            result,
            EngineResult::Complete {
                point: Point::new(150, 75),
                element: None
            }
        );
    }

    #[test]
    fn test_column_then_row_completes() {
        let mut engine = engine(config_2x2());
        engine.handle_key(&KeyToken::char('a')).unwrap();
        let result = engine.handle_key(&KeyToken::char('1')).unwrap();
        assert_eq!(
            result,
            EngineResult::Complete {
                point: Point::new(50, 25),
                element: None
            }
        );
    }

    #[test]
    fn test_unknown_key_ignored() {
        let mut engine = engine(config_2x2());
        assert_eq!(
            engine.handle_key(&KeyToken::char('z')).unwrap(),
            EngineResult::Continue { redraw: false }
        );
        assert_eq!(engine.typed_prefix(), "");
    }

    #[test]
    fn test_backspace_unwinds_selection() {
        let mut engine = engine(config_2x2());
        engine.handle_key(&KeyToken::char('2')).unwrap();
        assert_eq!(engine.typed_prefix(), "2");
        engine
            .handle_key(&KeyToken::named(NamedKey::Backspace))
            .unwrap();
        assert_eq!(engine.typed_prefix(), "");
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut engine = engine(config_2x2());
        engine.handle_key(&KeyToken::char('2')).unwrap();
        engine.handle_key(&KeyToken::char(',')).unwrap();
        assert_eq!(engine.typed_prefix(), "");
    }

    fn config_with_subgrid() -> GridConfig {
        GridConfig {
            sublayer_keys: "qweasdzxc".to_string(),
            ..config_2x2()
        }
    }

    #[test]
    fn test_subgrid_refinement() {
        let mut engine = engine(config_with_subgrid());
        engine.handle_key(&KeyToken::char('2')).unwrap();
        let result = engine.handle_key(&KeyToken::char('b')).unwrap();
        // Sublayer enabled: cell selection enters the 3x3 subgrid
        assert_eq!(result, EngineResult::Continue { redraw: true });
        let cells = engine.cells();
        assert_eq!(cells.len(), 9);
        assert!(cells.iter().all(|c| c.is_subgrid));

        // 'q' is the top-left sub-cell of cell 2B = (100,50)-(200,100)
        let result = engine.handle_key(&KeyToken::char('q')).unwrap();
        let EngineResult::Complete { point, element } = result else {
            panic!("expected completion");
        };
        assert_eq!(element, None);
        let top_left = subdivide(Rect::new(100, 50, 200, 100), 3, 3)[0];
        assert_eq!(point, top_left.center());
    }

    #[test]
    fn test_subgrid_tab_walker() {
        let mut engine = engine(config_with_subgrid());
        engine.handle_key(&KeyToken::char('2')).unwrap();
        engine.handle_key(&KeyToken::char('b')).unwrap();

        // Return without a highlight does nothing
        assert_eq!(
            engine
                .handle_key(&KeyToken::named(NamedKey::Return))
                .unwrap(),
            EngineResult::Continue { redraw: false }
        );

        engine.handle_key(&KeyToken::named(NamedKey::Tab)).unwrap();
        engine.handle_key(&KeyToken::named(NamedKey::Tab)).unwrap();
        let cells = engine.cells();
        assert!(cells[1].highlighted);

        let result = engine
            .handle_key(&KeyToken::named(NamedKey::Return))
            .unwrap();
        let EngineResult::Complete { point, .. } = result else {
            panic!("expected completion");
        };
        assert_eq!(point, cells[1].rect.center());
    }

    #[test]
    fn test_tab_wraps_around() {
        let mut engine = engine(config_with_subgrid());
        engine.handle_key(&KeyToken::char('2')).unwrap();
        engine.handle_key(&KeyToken::char('b')).unwrap();
        for _ in 0..10 {
            engine.handle_key(&KeyToken::named(NamedKey::Tab)).unwrap();
        }
        // 10 tabs from None: positions 0..8 then back to 0
        assert!(engine.cells()[0].highlighted);
    }

    #[test]
    fn test_fallback_square_lattice() {
        let config = GridConfig {
            characters: "abc".to_string(),
            row_labels: String::new(),
            col_labels: String::new(),
            sublayer_keys: String::new(),
            ..GridConfig::default()
        };
        let engine =
            FlatGridEngine::new(Rect::new(0, 0, 300, 300), config, GridStyle::default()).unwrap();
        assert_eq!(engine.cells().len(), 9);
        assert_eq!(engine.cells()[0].label, "AA");
    }

    #[test]
    fn test_screen_change_resets_selection() {
        let mut engine = engine(config_2x2());
        engine.handle_key(&KeyToken::char('2')).unwrap();
        engine
            .on_screen_change(Rect::new(0, 0, 400, 400), None)
            .unwrap();
        assert_eq!(engine.typed_prefix(), "");
        assert_eq!(engine.cells()[3].rect, Rect::new(200, 200, 400, 400));
    }
}
