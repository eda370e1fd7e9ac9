//! Errors that can occur while evaluating an expression.

use ariadne::Fmt;
use symhop_attrs::ErrorKind;
use symhop_error::EXPR;
use std::fmt;

/// Formats a list of suggested names as a help message.
fn did_you_mean(kind: &str, suggestions: &[String]) -> Option<String> {
    match suggestions {
        [] => None,
        [suggestion] => Some(format!("did you mean the `{}` {}?", suggestion.fg(EXPR), kind)),
        suggestions => Some(format!(
            "did you mean one of these {}s? {}",
            kind,
            suggestions
                .iter()
                .map(|s| format!("`{}`", s.fg(EXPR)))
                .collect::<Vec<_>>()
                .join(", ")
        )),
    }
}

/// The variable is not bound in the context.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("`{}` is not defined", self.name),
    labels = ["this variable"],
    help = did_you_mean("variable", &self.suggestions)
        .unwrap_or_else(|| format!("add `{}` to the evaluation context", (&self.name).fg(EXPR))),
)]
pub struct UndefinedVariable {
    /// The name of the variable.
    pub name: String,

    /// Similarly named variables in the context, if any.
    pub suggestions: Vec<String>,
}

/// No builtin or user function with this name accepts the given number of arguments, and the
/// call is not bound as a variable either.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("the `{}` function with {} argument(s) does not exist", self.name, self.arity),
    labels = ["this function"],
    help = did_you_mean("function", &self.suggestions)
        .unwrap_or_else(|| "see `consts::SUPPORTED_FUNCTIONS` for the available functions".to_string()),
)]
pub struct UndefinedFunction {
    /// The name of the function.
    pub name: String,

    /// The number of arguments given to the function.
    pub arity: usize,

    /// Similarly named functions, if any.
    pub suggestions: Vec<String>,
}

/// Equations have no numerical value.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "cannot evaluate an equation",
    labels = ["this equation"],
    help = "evaluate one side of the equation instead",
)]
pub struct Equation;

/// `der()` calls have no numerical value until they are discretized.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "cannot evaluate a time derivative",
    labels = ["this derivative"],
    help = format!("discretize the expression first, for example with `{}`", "bilinear_transform".fg(EXPR)),
)]
pub struct Derivative;

/// A user function could not produce a value.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("the user function `{}` failed", self.name),
    labels = ["this function call"],
)]
pub struct UserFunction {
    /// The name of the function.
    pub name: String,
}

/// An error that occurred while evaluating an expression. The first failing sub-expression
/// fails the whole evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum EvalError {
    UndefinedVariable(UndefinedVariable),
    UndefinedFunction(UndefinedFunction),
    Equation(Equation),
    Derivative(Derivative),
    UserFunction(UserFunction),
}

impl EvalError {
    /// Returns the kind of the error, which can build a report.
    pub fn kind(&self) -> &dyn symhop_error::ErrorKind {
        match self {
            EvalError::UndefinedVariable(kind) => kind,
            EvalError::UndefinedFunction(kind) => kind,
            EvalError::Equation(kind) => kind,
            EvalError::Derivative(kind) => kind,
            EvalError::UserFunction(kind) => kind,
        }
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind().message())
    }
}

impl std::error::Error for EvalError {}

macro_rules! from_kind {
    ($($kind:ident),*) => {
        $(
            impl From<$kind> for EvalError {
                fn from(kind: $kind) -> Self {
                    EvalError::$kind(kind)
                }
            }
        )*
    };
}

from_kind!(UndefinedVariable, UndefinedFunction, Equation, Derivative, UserFunction);

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn messages() {
        let err = EvalError::from(UndefinedVariable { name: "x".to_string(), suggestions: vec![] });
        assert_eq!(err.to_string(), "`x` is not defined");

        let err = EvalError::from(UndefinedFunction {
            name: "foo".to_string(),
            arity: 2,
            suggestions: vec![],
        });
        assert_eq!(err.to_string(), "the `foo` function with 2 argument(s) does not exist");
        assert_eq!(EvalError::from(Equation).to_string(), "cannot evaluate an equation");
    }

    #[test]
    fn suggestions_in_help() {
        assert_eq!(did_you_mean("variable", &[]), None);
        let help = did_you_mean("variable", &["x1".to_string(), "x2".to_string()]).unwrap();
        assert!(help.starts_with("did you mean one of these variables?"));
    }
}
