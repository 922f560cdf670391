//! Cell positions and grid ranges.
//!
//! Callers address cells with 1-based inclusive `(row, column)` positions,
//! the way they appear in the sheet UI. Batch requests address them with
//! 0-based half-open [`GridRange`]s. [`to_grid_range`] is the only place the
//! two conventions meet.

/// A 1-based `(row, column)` cell position. `A1` is `CellPosition::new(1, 1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellPosition {
    pub row: i32,
    pub column: i32,
}

impl CellPosition {
    pub fn new(row: i32, column: i32) -> Self {
        Self { row, column }
    }
}

/// An inclusive rectangle between two 1-based corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellSpan {
    pub start: CellPosition,
    pub end: CellPosition,
}

impl CellSpan {
    pub fn new(start: CellPosition, end: CellPosition) -> Self {
        Self { start, end }
    }

    /// A span covering exactly one cell.
    pub fn single(cell: CellPosition) -> Self {
        Self {
            start: cell,
            end: cell,
        }
    }
}

/// A 0-based half-open rectangle on one sheet, as batch requests address it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridRange {
    pub sheet_id: i32,
    pub start_row_index: i32,
    pub end_row_index: i32,
    pub start_column_index: i32,
    pub end_column_index: i32,
}

/// Convert an inclusive 1-based span into a half-open 0-based grid range.
///
/// Start indices drop by one; end indices pass through unchanged, since the
/// last 1-based position equals the exclusive 0-based end. Positions are not
/// validated here; out-of-range values are left for the service to reject.
///
/// # Examples
///
/// ```
/// use gsheets_core::{to_grid_range, CellPosition, CellSpan};
///
/// // A1:C2
/// let span = CellSpan::new(CellPosition::new(1, 1), CellPosition::new(2, 3));
/// let grid = to_grid_range(7, span);
/// assert_eq!((grid.start_row_index, grid.end_row_index), (0, 2));
/// assert_eq!((grid.start_column_index, grid.end_column_index), (0, 3));
/// ```
pub fn to_grid_range(sheet_id: i32, span: CellSpan) -> GridRange {
    GridRange {
        sheet_id,
        start_row_index: span.start.row - 1,
        end_row_index: span.end.row,
        start_column_index: span.start.column - 1,
        end_column_index: span.end.column,
    }
}
