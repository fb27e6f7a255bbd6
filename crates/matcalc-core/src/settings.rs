use std::fmt;

use serde::Deserialize;

/// Singular values at or below this are treated as zero.
pub const DEFAULT_ZERO_TOLERANCE: f64 = 1e-12;

/// Which SVD factor the null-space basis is taken from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NullspaceBasis {
    /// Right singular vectors: the basis spans `{x : A·x = 0}` and has
    /// `A.cols` rows.
    #[default]
    Right,
    /// Left singular vectors of the thin SVD, i.e. the null space of `Aᵀ`.
    /// Matches the calculator's historical output.
    Left,
}

impl fmt::Display for NullspaceBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Right => write!(f, "right"),
            Self::Left => write!(f, "left"),
        }
    }
}

impl std::str::FromStr for NullspaceBasis {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "right" => Ok(Self::Right),
            "left" => Ok(Self::Left),
            _ => Err(format!("invalid nullspace basis: {s}")),
        }
    }
}

/// Numeric and display knobs consumed by the operations and the session.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub zero_tolerance: f64,
    pub nullspace_basis: NullspaceBasis,
    /// Fixed number of decimals for rendered values; `None` prints the
    /// shortest exact representation.
    pub precision: Option<usize>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            zero_tolerance: DEFAULT_ZERO_TOLERANCE,
            nullspace_basis: NullspaceBasis::Right,
            precision: None,
        }
    }
}
