//! Stateless linear-algebra operations over [`Matrix`] values.
//!
//! Every function checks its domain preconditions up front and reports a
//! violation as a [`CalcError`] instead of panicking inside the kernel.

use nalgebra::{DMatrix, DVector};
use serde::Serialize;
use tracing::warn;

use crate::error::{CalcError, CalcResult};
use crate::matrix::{format_value, Matrix};
use crate::operation::Operation;
use crate::settings::{NullspaceBasis, Settings};

/// Upper bound on SVD sweeps before the factorization is reported as failed.
const SVD_MAX_ITERATIONS: usize = 10_000;

// ---------------------------------------------------------------------------
// Unary operations
// ---------------------------------------------------------------------------

pub fn determinant(a: &Matrix) -> CalcResult<f64> {
    if a.is_vector() {
        return Err(CalcError::DeterminantOfVector);
    }
    let (rows, cols) = a.shape();
    if rows != cols {
        return Err(CalcError::NotSquare { rows, cols });
    }
    Ok(a.inner().determinant())
}

/// Spectral norm: the largest singular value, which for a vector is its
/// Euclidean length.
pub fn norm(a: &Matrix) -> f64 {
    if a.is_vector() {
        return a.inner().norm();
    }
    a.inner().singular_values().max()
}

/// Computes a basis for the null space, one basis vector per column.
///
/// When no singular value is within `settings.zero_tolerance` of zero the
/// result has zero columns.
pub fn nullspace(a: &Matrix, settings: &Settings) -> CalcResult<Matrix> {
    let basis = match settings.nullspace_basis {
        NullspaceBasis::Right => right_null_vectors(a.inner(), settings.zero_tolerance)?,
        NullspaceBasis::Left => left_null_vectors(a.inner(), settings.zero_tolerance)?,
    };
    Ok(Matrix::from_inner(basis))
}

fn right_null_vectors(a: &DMatrix<f64>, tolerance: f64) -> CalcResult<DMatrix<f64>> {
    let (rows, cols) = a.shape();
    // A wide matrix is padded with zero rows: the null space is unchanged and
    // the thin SVD then yields all `cols` right singular vectors.
    let square = if rows < cols {
        DMatrix::from_fn(cols, cols, |r, c| if r < rows { a[(r, c)] } else { 0.0 })
    } else {
        a.clone()
    };

    let svd = square
        .try_svd(false, true, f64::EPSILON, SVD_MAX_ITERATIONS)
        .ok_or_else(svd_failed)?;
    let v_t = svd.v_t.ok_or_else(svd_failed)?;

    let picked = near_zero_indices(svd.singular_values.as_slice(), tolerance);
    Ok(DMatrix::from_fn(cols, picked.len(), |r, c| v_t[(picked[c], r)]))
}

fn left_null_vectors(a: &DMatrix<f64>, tolerance: f64) -> CalcResult<DMatrix<f64>> {
    let rows = a.nrows();
    let svd = a
        .clone()
        .try_svd(true, false, f64::EPSILON, SVD_MAX_ITERATIONS)
        .ok_or_else(svd_failed)?;
    let u = svd.u.ok_or_else(svd_failed)?;

    let picked = near_zero_indices(svd.singular_values.as_slice(), tolerance);
    Ok(DMatrix::from_fn(rows, picked.len(), |r, c| u[(r, picked[c])]))
}

fn near_zero_indices(singular_values: &[f64], tolerance: f64) -> Vec<usize> {
    singular_values
        .iter()
        .enumerate()
        .filter(|&(_, &s)| s <= tolerance)
        .map(|(i, _)| i)
        .collect()
}

fn svd_failed() -> CalcError {
    warn!("SVD factorization did not converge");
    CalcError::Computation("SVD factorization failed".into())
}

// ---------------------------------------------------------------------------
// Binary operations
// ---------------------------------------------------------------------------

/// Dot product of two vectors, each read as a flat sequence regardless of
/// row or column orientation.
pub fn inner_product(a: &Matrix, b: &Matrix) -> CalcResult<f64> {
    let (x, y) = flatten_pair(a, b, "inner product")?;
    if x.len() != y.len() {
        return Err(CalcError::LengthMismatch {
            left: x.len(),
            right: y.len(),
        });
    }
    Ok(x.dot(&y))
}

/// Matrix of shape `(len(a), len(b))` with entry `(i, j) = a_i * b_j`.
pub fn outer_product(a: &Matrix, b: &Matrix) -> CalcResult<Matrix> {
    let (x, y) = flatten_pair(a, b, "outer product")?;
    Ok(Matrix::from_inner(&x * y.transpose()))
}

pub fn multiply(a: &Matrix, b: &Matrix) -> CalcResult<Matrix> {
    if a.is_vector() || b.is_vector() {
        return Err(CalcError::MatricesOnly);
    }
    if a.cols() != b.rows() {
        return Err(CalcError::IncompatibleDimensions {
            lhs_rows: a.rows(),
            lhs_cols: a.cols(),
            rhs_rows: b.rows(),
            rhs_cols: b.cols(),
        });
    }
    Ok(Matrix::from_inner(a.inner() * b.inner()))
}

fn flatten_pair(
    a: &Matrix,
    b: &Matrix,
    what: &'static str,
) -> CalcResult<(DVector<f64>, DVector<f64>)> {
    if !(a.is_vector() && b.is_vector()) {
        return Err(CalcError::NotVectors(what));
    }
    Ok((
        DVector::from_vec(a.to_row_major()),
        DVector::from_vec(b.to_row_major()),
    ))
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// The value produced by a successful operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    Scalar { operation: Operation, value: f64 },
    Matrix { operation: Operation, matrix: Matrix },
}

impl Outcome {
    pub fn operation(&self) -> Operation {
        match self {
            Self::Scalar { operation, .. } | Self::Matrix { operation, .. } => *operation,
        }
    }

    /// Result text such as `Determinant: -2` or `Matrix Product:\n[ .. ]`.
    pub fn render(&self, precision: Option<usize>) -> String {
        let label = result_label(self.operation());
        match self {
            Self::Scalar { value, .. } => format!("{label}: {}", format_value(*value, precision)),
            Self::Matrix { matrix, .. } => format!("{label}:\n{}", matrix.render(precision)),
        }
    }
}

fn result_label(op: Operation) -> &'static str {
    match op {
        Operation::Multiply => "Matrix Product",
        other => other.title(),
    }
}

/// Runs `op` against `a` (and `b` for binary operations).
pub fn evaluate(
    op: Operation,
    a: &Matrix,
    b: Option<&Matrix>,
    settings: &Settings,
) -> CalcResult<Outcome> {
    let second = || b.ok_or(CalcError::MissingOperand(op.title()));
    let outcome = match op {
        Operation::Det => Outcome::Scalar {
            operation: op,
            value: determinant(a)?,
        },
        Operation::Norm => Outcome::Scalar {
            operation: op,
            value: norm(a),
        },
        Operation::Nullspace => Outcome::Matrix {
            operation: op,
            matrix: nullspace(a, settings)?,
        },
        Operation::Inner => Outcome::Scalar {
            operation: op,
            value: inner_product(a, second()?)?,
        },
        Operation::Outer => Outcome::Matrix {
            operation: op,
            matrix: outer_product(a, second()?)?,
        },
        Operation::Multiply => Outcome::Matrix {
            operation: op,
            matrix: multiply(a, second()?)?,
        },
    };
    Ok(outcome)
}
