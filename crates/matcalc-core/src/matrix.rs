//! The calculator's matrix type and its textual notation.
//!
//! Rows are separated by `;` and cells within a row by `,`. Whitespace around
//! cells is ignored, so `"1, 2; 3, 4"` and `"1,2;3,4"` parse to the same 2x2
//! matrix.

use std::fmt;
use std::str::FromStr;

use nalgebra::DMatrix;
use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::error::{CalcError, CalcResult};

/// A dense, immutable grid of `f64` values.
///
/// Matrices built by [`Matrix::parse`] always have at least one row and one
/// column. Results of some operations (an empty null-space basis) may have
/// zero columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix(DMatrix<f64>);

impl Matrix {
    /// Parses delimited text into a matrix.
    ///
    /// Rows are checked for a consistent cell count before their cells are
    /// parsed, so the first reported problem follows row/column scan order.
    pub fn parse(text: &str) -> CalcResult<Self> {
        let mut data = Vec::new();
        let mut width = None;
        let mut height = 0;

        for row in text.split(';') {
            let cells: Vec<&str> = row.trim().split(',').collect();
            match width {
                None => width = Some(cells.len()),
                Some(w) if w != cells.len() => return Err(CalcError::InconsistentRowLengths),
                Some(_) => {}
            }
            for cell in cells {
                data.push(parse_cell(cell)?);
            }
            height += 1;
        }

        let width = width.unwrap_or(0);
        Ok(Self(DMatrix::from_row_slice(height, width, &data)))
    }

    /// Builds a matrix from row-major data.
    ///
    /// # Panics
    ///
    /// Panics if `data.len() != rows * cols`.
    pub fn from_row_slice(rows: usize, cols: usize, data: &[f64]) -> Self {
        Self(DMatrix::from_row_slice(rows, cols, data))
    }

    pub(crate) fn from_inner(inner: DMatrix<f64>) -> Self {
        Self(inner)
    }

    pub(crate) fn inner(&self) -> &DMatrix<f64> {
        &self.0
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.0.nrows()
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.0.ncols()
    }

    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        self.0.shape()
    }

    /// A matrix is a vector iff it has exactly one row or exactly one column.
    #[inline]
    pub fn is_vector(&self) -> bool {
        self.rows() == 1 || self.cols() == 1
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.0[(row, col)]
    }

    /// Returns the entries in row-major order.
    ///
    /// For a vector this is its element sequence, regardless of whether it
    /// is stored as a row or as a column.
    pub fn to_row_major(&self) -> Vec<f64> {
        self.0.transpose().as_slice().to_vec()
    }

    pub fn row_vecs(&self) -> Vec<Vec<f64>> {
        self.0
            .row_iter()
            .map(|row| row.iter().copied().collect())
            .collect()
    }

    /// Renders the matrix in the input notation (`1,2;3,4`).
    ///
    /// Values are printed with Rust's shortest round-tripping float format, so
    /// `Matrix::parse(&m.to_notation())` reproduces `m` exactly.
    pub fn to_notation(&self) -> String {
        self.0
            .row_iter()
            .map(|row| {
                row.iter()
                    .map(|v| v.to_string())
                    .collect::<Vec<_>>()
                    .join(",")
            })
            .collect::<Vec<_>>()
            .join(";")
    }

    /// Renders the matrix as right-aligned rows, one line per row.
    ///
    /// With `precision` set, every value is printed with that many decimals.
    pub fn render(&self, precision: Option<usize>) -> String {
        if self.cols() == 0 || self.rows() == 0 {
            return format!("(empty {}x{})", self.rows(), self.cols());
        }

        let cells: Vec<Vec<String>> = self
            .0
            .row_iter()
            .map(|row| row.iter().map(|&v| format_value(v, precision)).collect())
            .collect();

        let widths: Vec<usize> = (0..self.cols())
            .map(|c| cells.iter().map(|row| row[c].len()).max().unwrap_or(0))
            .collect();

        cells
            .iter()
            .map(|row| {
                let padded: Vec<String> = row
                    .iter()
                    .zip(&widths)
                    .map(|(cell, &w)| format!("{cell:>w$}"))
                    .collect();
                format!("[ {} ]", padded.join(", "))
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Formats a scalar for display; negative zero is shown as `0`.
pub fn format_value(value: f64, precision: Option<usize>) -> String {
    let value = if value == 0.0 { 0.0 } else { value };
    match precision {
        Some(p) => format!("{value:.p$}"),
        None => value.to_string(),
    }
}

fn parse_cell(cell: &str) -> CalcResult<f64> {
    let trimmed = cell.trim();
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(CalcError::InvalidNumber(trimmed.to_string())),
    }
}

impl FromStr for Matrix {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(None))
    }
}

impl Serialize for Matrix {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Matrix", 3)?;
        s.serialize_field("rows", &self.rows())?;
        s.serialize_field("cols", &self.cols())?;
        s.serialize_field("data", &self.row_vecs())?;
        s.end()
    }
}
