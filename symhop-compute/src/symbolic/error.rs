//! Errors returned by operations that require a particular kind of expression.

use symhop_attrs::ErrorKind;
use symhop_error::ErrorKind as _;
use std::fmt;

/// The operation is only defined for equations.
#[derive(Debug, Clone, ErrorKind, PartialEq, Eq)]
#[error(
    message = format!("only equations can be {}", self.operation),
    help = "write the expression as `left = right`",
)]
pub struct NotAnEquation {
    /// What was attempted, such as `linearized`.
    pub operation: &'static str,
}

/// Attempted to divide an expression by the number zero.
#[derive(Debug, Clone, ErrorKind, PartialEq, Eq)]
#[error(message = "cannot divide an expression by zero")]
pub struct DivisionByZero;

/// No order of the equations of a system puts a non-zero entry on every diagonal element of its
/// Jacobian.
#[derive(Debug, Clone, ErrorKind, PartialEq, Eq)]
#[error(
    message = "failed to find a sorting path for the equation system",
    help = "every state variable must appear in at least one equation",
)]
pub struct NoSortingPath;

impl fmt::Display for NotAnEquation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl fmt::Display for DivisionByZero {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl fmt::Display for NoSortingPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for NotAnEquation {}
impl std::error::Error for DivisionByZero {}
impl std::error::Error for NoSortingPath {}
