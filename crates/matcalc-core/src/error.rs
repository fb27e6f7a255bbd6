use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    // --- parse ---
    #[error("inconsistent row lengths")]
    InconsistentRowLengths,

    #[error("invalid number: {0}")]
    InvalidNumber(String),

    // --- domain ---
    #[error("determinant undefined for vectors")]
    DeterminantOfVector,

    #[error("determinant requires a square matrix, got {rows}x{cols}")]
    NotSquare { rows: usize, cols: usize },

    #[error("{0} is only defined for vectors")]
    NotVectors(&'static str),

    #[error("multiplication only defined for matrices")]
    MatricesOnly,

    #[error("matrices are not compatible for multiplication: {lhs_rows}x{lhs_cols} times {rhs_rows}x{rhs_cols}")]
    IncompatibleDimensions {
        lhs_rows: usize,
        lhs_cols: usize,
        rhs_rows: usize,
        rhs_cols: usize,
    },

    #[error("vectors must have the same dimension ({left} vs {right})")]
    LengthMismatch { left: usize, right: usize },

    #[error("{0} needs a second operand")]
    MissingOperand(&'static str),

    // --- computation ---
    #[error("computation failed: {0}")]
    Computation(String),
}

/// Coarse classification of a [`CalcError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or inconsistent matrix text.
    Parse,
    /// Operands violate an operation's precondition.
    Domain,
    /// The numeric kernel failed to factorize.
    Computation,
}

impl CalcError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InconsistentRowLengths | Self::InvalidNumber(_) => ErrorKind::Parse,
            Self::DeterminantOfVector
            | Self::NotSquare { .. }
            | Self::NotVectors(_)
            | Self::MatricesOnly
            | Self::IncompatibleDimensions { .. }
            | Self::LengthMismatch { .. }
            | Self::MissingOperand(_) => ErrorKind::Domain,
            Self::Computation(_) => ErrorKind::Computation,
        }
    }
}

pub type CalcResult<T> = Result<T, CalcError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classification() {
        assert_eq!(CalcError::InconsistentRowLengths.kind(), ErrorKind::Parse);
        assert_eq!(CalcError::InvalidNumber("x".into()).kind(), ErrorKind::Parse);
        assert_eq!(CalcError::MatricesOnly.kind(), ErrorKind::Domain);
        assert_eq!(
            CalcError::Computation("svd".into()).kind(),
            ErrorKind::Computation
        );
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            CalcError::InvalidNumber("abc".into()).to_string(),
            "invalid number: abc"
        );
        assert_eq!(
            CalcError::NotVectors("outer product").to_string(),
            "outer product is only defined for vectors"
        );
        assert_eq!(
            CalcError::IncompatibleDimensions {
                lhs_rows: 2,
                lhs_cols: 3,
                rhs_rows: 2,
                rhs_cols: 2
            }
            .to_string(),
            "matrices are not compatible for multiplication: 2x3 times 2x2"
        );
    }
}
