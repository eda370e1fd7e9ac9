use ariadne::Fmt;
use symhop_attrs::ErrorKind;
use symhop_error::EXPR;
use crate::tokenizer::TokenKind;

/// An intentionally useless error, used internally to reject a parse attempt without information.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "an internal non-fatal error occurred while parsing",
    labels = ["here"],
    help = "you should never see this error; please report this as a bug"
)]
pub struct NonFatal;

/// The expression string was empty, or contained only whitespace.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "empty expression",
    labels = [format!("add an {} here", "expression".fg(EXPR))],
)]
pub struct EmptyExpression;

/// The end of the source code was reached unexpectedly.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "unexpected end of expression",
    labels = [format!("you might need to add another {} here", "expression".fg(EXPR))],
)]
pub struct UnexpectedEof;

/// The end of the source code was expected, but something else was found.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "expected end of expression",
    labels = [format!("I could not understand the remaining {} here", "expression".fg(EXPR))],
)]
pub struct ExpectedEof;

/// An unexpected token was encountered.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "unexpected token",
    labels = [format!("expected one of: {}", expected.iter().map(|t| format!("{:?}", t)).collect::<Vec<_>>().join(", "))],
    help = format!("found {:?}", found),
)]
pub struct UnexpectedToken {
    /// The token(s) that were expected.
    pub expected: &'static [TokenKind],

    /// The token that was found.
    pub found: TokenKind,
}

/// A parenthesis was not closed, or a closing parenthesis had no matching opening one.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "unbalanced parentheses",
    labels = [if *opening {
        "this parenthesis is never closed"
    } else {
        "this parenthesis has no matching opening parenthesis"
    }],
    help = if *opening {
        format!("add a {} to close it", ")".fg(EXPR))
    } else {
        format!("remove it, or add a {} before it", "(".fg(EXPR))
    },
)]
pub struct UnclosedParenthesis {
    /// Whether the unmatched parenthesis is an opening parenthesis.
    pub opening: bool,
}

/// A pair of parentheses with nothing inside, used outside a function call.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "empty parentheses",
    labels = ["there is nothing inside these parentheses"],
    help = format!("only function calls such as {} may have empty parentheses", "pi()".fg(EXPR)),
)]
pub struct EmptyParenthesis;

/// A binary operator is missing its right-hand operand.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("missing operand for `{}`", op),
    labels = [format!("add an {} after this operator", "expression".fg(EXPR))],
)]
pub struct MissingOperand {
    /// The operator that is missing an operand.
    pub op: &'static str,
}

/// A character that is not part of any token was found.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("invalid character `{}`", character),
    labels = ["this character cannot be used in an expression"],
)]
pub struct InvalidCharacter {
    /// The offending character(s).
    pub character: String,
}

/// A number literal too large to be represented.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("number `{}` is out of range", lexeme),
    labels = ["this number does not fit in a 64-bit float"],
    help = format!("numbers must be smaller than {}", "1.8e308".fg(EXPR)),
)]
pub struct NumberOutOfRange {
    /// The number as written in the source.
    pub lexeme: String,
}
