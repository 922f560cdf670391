use crate::error::{GSheetError, Result};

/// A single loosely typed cell value (string, number or boolean).
pub type CellValue = serde_json::Value;

/// Row-major matrix of cell values, as exchanged with the Sheets API.
pub type ValueMatrix = Vec<Vec<CellValue>>;

/// Swap the row and column axes of a rectangular matrix.
///
/// `result[c][r] == matrix[r][c]`. The input must have at least one row and
/// one column, and every row must have the same length as the first.
///
/// # Errors
///
/// Returns `GSheetError::Shape` for an empty matrix or a ragged one.
///
/// # Examples
///
/// ```
/// use gsheets_core::transpose;
///
/// let rows = vec![vec![1, 2, 3], vec![4, 5, 6]];
/// let columns = transpose(&rows).unwrap();
/// assert_eq!(columns, vec![vec![1, 4], vec![2, 5], vec![3, 6]]);
/// ```
pub fn transpose<T: Clone>(matrix: &[Vec<T>]) -> Result<Vec<Vec<T>>> {
    let Some(first) = matrix.first() else {
        return Err(GSheetError::Shape("cannot transpose an empty matrix".to_string()));
    };
    let width = first.len();
    if width == 0 {
        return Err(GSheetError::Shape("cannot transpose rows with no cells".to_string()));
    }

    if let Some((row, cells)) = matrix
        .iter()
        .enumerate()
        .find(|(_, cells)| cells.len() != width)
    {
        return Err(GSheetError::Shape(format!(
            "ragged matrix: row {row} has {} cells, expected {width}",
            cells.len()
        )));
    }

    let transposed = (0..width)
        .map(|col| matrix.iter().map(|cells| cells[col].clone()).collect())
        .collect();

    Ok(transposed)
}
