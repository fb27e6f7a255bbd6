use std::fmt;

use serde::Serialize;

/// Operation keywords accepted at the selection prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Det,
    Norm,
    Nullspace,
    Inner,
    Outer,
    Multiply,
}

impl Operation {
    pub const ALL: [Operation; 6] = [
        Self::Det,
        Self::Norm,
        Self::Nullspace,
        Self::Inner,
        Self::Outer,
        Self::Multiply,
    ];

    pub const BINARY: [Operation; 3] = [Self::Inner, Self::Outer, Self::Multiply];

    /// Whether the operation needs a second operand.
    pub fn is_binary(self) -> bool {
        matches!(self, Self::Inner | Self::Outer | Self::Multiply)
    }

    pub fn keyword(self) -> &'static str {
        match self {
            Self::Det => "det",
            Self::Norm => "norm",
            Self::Nullspace => "nullspace",
            Self::Inner => "inner",
            Self::Outer => "outer",
            Self::Multiply => "multiply",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Det => "Determinant",
            Self::Norm => "Norm",
            Self::Nullspace => "Nullspace",
            Self::Inner => "Inner Product",
            Self::Outer => "Outer Product",
            Self::Multiply => "Matrix Multiplication",
        }
    }

    /// Menu text such as `det (Determinant), norm (Norm)`.
    pub fn menu(ops: &[Operation]) -> String {
        ops.iter()
            .map(|op| format!("{} ({})", op.keyword(), op.title()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Keywords are matched case-sensitively and without trimming.
impl std::str::FromStr for Operation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|op| op.keyword() == s)
            .ok_or_else(|| format!("invalid operation: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keywords() {
        for op in Operation::ALL {
            assert_eq!(op.keyword().parse::<Operation>(), Ok(op));
        }
    }

    #[test]
    fn test_parse_is_case_sensitive() {
        assert!("Det".parse::<Operation>().is_err());
        assert!("NORM".parse::<Operation>().is_err());
        assert!(" det".parse::<Operation>().is_err());
        assert!("".parse::<Operation>().is_err());
    }

    #[test]
    fn test_binary_set() {
        for op in Operation::ALL {
            assert_eq!(op.is_binary(), Operation::BINARY.contains(&op));
        }
    }

    #[test]
    fn test_menu() {
        assert_eq!(
            Operation::menu(&Operation::BINARY),
            "inner (Inner Product), outer (Outer Product), multiply (Matrix Multiplication)"
        );
    }
}
