use thiserror::Error;

use crate::models::board::BoardSize;
use crate::models::card::Cell;

/// A stored card violates the one-cell-per-position invariant.
///
/// This is a data-integrity error, not a user error: creation writes the
/// full grid in one transaction, so a hole or duplicate means corruption.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("no cell at position ({row}, {col})")]
    MissingCell { row: i32, col: i32 },

    #[error("cell ({row}, {col}) is outside the {side}x{side} board")]
    OutOfBounds { row: i32, col: i32, side: i32 },

    #[error("more than one cell at position ({row}, {col})")]
    DuplicateCell { row: i32, col: i32 },
}

/// A card's cells arranged as a `side x side` matrix, indexed `[row][col]`.
#[derive(Debug, Clone)]
pub struct Grid {
    size: BoardSize,
    rows: Vec<Vec<Cell>>,
}

impl Grid {
    /// Places every cell at its `(row, col)` position.
    ///
    /// Every position must be covered exactly once; anything else is a
    /// [`GridError`] and must be surfaced, never papered over.
    pub fn build(size: BoardSize, cells: Vec<Cell>) -> Result<Self, GridError> {
        let side = size.side() as usize;
        let mut slots: Vec<Vec<Option<Cell>>> = vec![vec![None; side]; side];

        for cell in cells {
            if !size.contains(cell.row, cell.col) {
                return Err(GridError::OutOfBounds {
                    row: cell.row,
                    col: cell.col,
                    side: size.side(),
                });
            }
            let slot = &mut slots[cell.row as usize][cell.col as usize];
            if slot.is_some() {
                return Err(GridError::DuplicateCell {
                    row: cell.row,
                    col: cell.col,
                });
            }
            *slot = Some(cell);
        }

        let mut rows = Vec::with_capacity(side);
        for (r, slot_row) in slots.into_iter().enumerate() {
            let mut row = Vec::with_capacity(side);
            for (c, slot) in slot_row.into_iter().enumerate() {
                match slot {
                    Some(cell) => row.push(cell),
                    None => {
                        return Err(GridError::MissingCell {
                            row: r as i32,
                            col: c as i32,
                        });
                    }
                }
            }
            rows.push(row);
        }

        Ok(Self { size, rows })
    }

    #[must_use]
    pub const fn size(&self) -> BoardSize {
        self.size
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    #[must_use]
    pub fn into_rows(self) -> Vec<Vec<Cell>> {
        self.rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_board(size: BoardSize) -> Vec<Cell> {
        let mut cells = Vec::new();
        let mut id = 1;
        for row in 0..size.side() {
            for col in 0..size.side() {
                let free = size.is_center(row, col);
                cells.push(Cell {
                    id,
                    row,
                    col,
                    text: if free { "FREE".into() } else { format!("cell {id}") },
                    is_free: free,
                    is_marked: free,
                });
                id += 1;
            }
        }
        cells
    }

    #[test]
    fn test_build_full_grid() {
        for size in BoardSize::ALL {
            let grid = Grid::build(size, full_board(size)).expect("full board should build");
            assert_eq!(grid.rows().len(), size.side() as usize);
            for row in grid.rows() {
                assert_eq!(row.len(), size.side() as usize);
            }

            let free: Vec<&Cell> = grid
                .rows()
                .iter()
                .flatten()
                .filter(|c| c.is_free)
                .collect();
            assert_eq!(free.len(), 1);
            assert_eq!(free[0].row, size.center());
            assert_eq!(free[0].col, size.center());
            assert!(free[0].is_marked);
        }
    }

    #[test]
    fn test_missing_cell_is_an_error() {
        let mut cells = full_board(BoardSize::Five);
        cells.retain(|c| !(c.row == 1 && c.col == 3));

        let err = Grid::build(BoardSize::Five, cells).unwrap_err();
        assert_eq!(err, GridError::MissingCell { row: 1, col: 3 });
    }

    #[test]
    fn test_out_of_bounds_cell_is_an_error() {
        let mut cells = full_board(BoardSize::Five);
        cells[0].row = 5;

        let err = Grid::build(BoardSize::Five, cells).unwrap_err();
        assert_eq!(
            err,
            GridError::OutOfBounds {
                row: 5,
                col: 0,
                side: 5
            }
        );
    }

    #[test]
    fn test_duplicate_cell_is_an_error() {
        let mut cells = full_board(BoardSize::Five);
        let dup = cells[7].clone();
        cells.push(dup);

        let err = Grid::build(BoardSize::Five, cells).unwrap_err();
        assert!(matches!(err, GridError::DuplicateCell { .. }));
    }
}
