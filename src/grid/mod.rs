//! Grid modes: a flat row-by-column lattice and a recursively-subdividing
//! frame stack. Both tile their parent rectangle exactly using the shared
//! breakpoint rounding in [`crate::geometry::breakpoints`].

pub mod flat;
pub mod recursive;

use crate::geometry::{breakpoints, Rect};

pub use flat::FlatGridEngine;
pub use recursive::RecursiveGridEngine;

/// One selectable cell handed to the overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct GridCell {
    pub rect: Rect,
    /// 2-4 uppercase characters.
    pub label: String,
    /// True for the 3x3 refinement cells inside a picked parent cell.
    pub is_subgrid: bool,
    /// True for the cell the keyboard walker currently rests on.
    pub highlighted: bool,
}

/// Subdivide `rect` into `cols x rows` child rectangles, row-major.
/// The children tile `rect` exactly.
pub fn subdivide(rect: Rect, cols: u32, rows: u32) -> Vec<Rect> {
    let xs = breakpoints(rect.min_x, rect.max_x, cols);
    let ys = breakpoints(rect.min_y, rect.max_y, rows);
    let mut cells = Vec::with_capacity((cols * rows) as usize);
    for r in 0..rows as usize {
        for c in 0..cols as usize {
            cells.push(Rect::new(xs[c], ys[r], xs[c + 1], ys[r + 1]));
        }
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_tiles_exactly(parent: Rect, cols: u32, rows: u32) {
        let cells = subdivide(parent, cols, rows);
        assert_eq!(cells.len(), (cols * rows) as usize);

        // Row-major adjacency: widths along each row sum to the parent
        // width, heights along each column to the parent height.
        for r in 0..rows as usize {
            let row = &cells[r * cols as usize..(r + 1) * cols as usize];
            assert_eq!(row[0].min_x, parent.min_x);
            assert_eq!(row.last().unwrap().max_x, parent.max_x);
            for pair in row.windows(2) {
                assert_eq!(pair[0].max_x, pair[1].min_x, "gap or overlap in row {r}");
            }
        }
        for c in 0..cols as usize {
            let col: Vec<Rect> = (0..rows as usize)
                .map(|r| cells[r * cols as usize + c])
                .collect();
            assert_eq!(col[0].min_y, parent.min_y);
            assert_eq!(col.last().unwrap().max_y, parent.max_y);
            for pair in col.windows(2) {
                assert_eq!(pair[0].max_y, pair[1].min_y, "gap or overlap in column {c}");
            }
        }

        // Area conservation catches any remaining mis-tiling
        let total: i64 = cells
            .iter()
            .map(|r| r.width() as i64 * r.height() as i64)
            .sum();
        assert_eq!(total, parent.width() as i64 * parent.height() as i64);
    }

    #[test]
    fn test_partition_is_exact() {
        for (cols, rows) in [(2, 2), (3, 3), (7, 5), (9, 4), (13, 11)] {
            assert_tiles_exactly(Rect::new(0, 0, 2560, 1440), cols, rows);
            assert_tiles_exactly(Rect::new(-1280, 23, 1279, 1463), cols, rows);
            assert_tiles_exactly(Rect::new(0, 0, 101, 97), cols, rows);
        }
    }

    #[test]
    fn test_subdivide_reading_order() {
        let cells = subdivide(Rect::new(0, 0, 200, 200), 2, 2);
        assert_eq!(cells[0], Rect::new(0, 0, 100, 100));
        assert_eq!(cells[1], Rect::new(100, 0, 200, 100));
        assert_eq!(cells[2], Rect::new(0, 100, 100, 200));
        assert_eq!(cells[3], Rect::new(100, 100, 200, 200));
    }
}
