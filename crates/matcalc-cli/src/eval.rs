//! Non-interactive evaluation of a single operation.

use anyhow::{bail, Context, Result};
use tracing::warn;

use matcalc_core::{evaluate, Matrix, Operation, Outcome, Settings};

/// Parses the operands and runs `op`.
pub fn run_eval(a: &str, op: Operation, b: Option<&str>, settings: &Settings) -> Result<Outcome> {
    let first = Matrix::parse(a).context("parsing first operand")?;

    let second = match (op.is_binary(), b) {
        (true, Some(text)) => Some(Matrix::parse(text).context("parsing second operand")?),
        (true, None) => bail!("`{op}` needs a second operand (--b)"),
        (false, Some(_)) => {
            warn!(%op, "ignoring second operand for unary operation");
            None
        }
        (false, None) => None,
    };

    evaluate(op, &first, second.as_ref(), settings).with_context(|| format!("computing {op}"))
}

pub fn cmd_eval(
    a: &str,
    op: Operation,
    b: Option<&str>,
    json: bool,
    settings: &Settings,
) -> Result<()> {
    let outcome = run_eval(a, op, b, settings)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        println!("{}", outcome.render(settings.precision));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use matcalc_core::{CalcError, ErrorKind};

    #[test]
    fn test_eval_unary() {
        let outcome = run_eval("3,4", Operation::Norm, None, &Settings::default()).unwrap();
        assert_eq!(outcome.render(None), "Norm: 5");
    }

    #[test]
    fn test_eval_binary() {
        let outcome = run_eval(
            "1,2;3,4",
            Operation::Multiply,
            Some("1,0;0,1"),
            &Settings::default(),
        )
        .unwrap();
        assert_eq!(outcome.render(None), "Matrix Product:\n[ 1, 2 ]\n[ 3, 4 ]");
    }

    #[test]
    fn test_eval_missing_second_operand() {
        let err = run_eval("1,2", Operation::Inner, None, &Settings::default()).unwrap_err();
        assert!(err.to_string().contains("needs a second operand"));
    }

    #[test]
    fn test_eval_ignores_second_operand_for_unary() {
        let outcome =
            run_eval("1,0;0,1", Operation::Det, Some("junk"), &Settings::default()).unwrap();
        assert_eq!(outcome.render(None), "Determinant: 1");
    }

    #[test]
    fn test_eval_errors_keep_their_kind() {
        let err = run_eval("1,2;3", Operation::Norm, None, &Settings::default()).unwrap_err();
        let calc = err.downcast_ref::<CalcError>().unwrap();
        assert_eq!(calc.kind(), ErrorKind::Parse);

        let err = run_eval("1,2,3", Operation::Det, None, &Settings::default()).unwrap_err();
        let calc = err.downcast_ref::<CalcError>().unwrap();
        assert_eq!(calc, &CalcError::DeterminantOfVector);
    }

    #[test]
    fn test_outcome_json() {
        let outcome = run_eval("1;2", Operation::Outer, Some("3,4"), &Settings::default()).unwrap();
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["kind"], "matrix");
        assert_eq!(json["operation"], "outer");
        assert_eq!(json["matrix"]["rows"], 2);
        assert_eq!(json["matrix"]["data"][1][1], 8.0);
    }
}
