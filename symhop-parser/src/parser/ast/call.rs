use crate::{
    parser::{
        ast::{expr::Expr, literal::LitSym},
        error::{kind, Error},
        token::{CloseParen, Comma, OpenParen},
        Parse,
        Parser,
    },
    tokenizer::TokenKind,
};
use std::{fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A function call, such as `sin(x)`, `atan2(y, x)` or `pi()`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Call {
    /// The name of the function to call.
    pub name: LitSym,

    /// The arguments to the function, in order.
    pub args: Vec<Expr>,

    /// The region of the source code that this function call was parsed from.
    pub span: Range<usize>,
}

impl Call {
    /// Returns the span of the function call.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }
}

impl Parse for Call {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let name = input.try_parse::<LitSym>()?;
        let open_paren = input.try_parse::<OpenParen>()?;
        let unclosed = || {
            Error::new(vec![open_paren.span.clone()], kind::UnclosedParenthesis { opening: true })
        };

        let mut args = Vec::new();
        if input.peek_token().map(|token| token.kind) != Some(TokenKind::CloseParen) {
            loop {
                args.push(input.try_parse::<Expr>()?);

                if input.try_parse::<Comma>().is_err() {
                    break;
                }

                // a trailing comma, or two commas in a row
                match input.peek_token() {
                    Some(token) if matches!(token.kind, TokenKind::CloseParen | TokenKind::Comma) => {
                        return Err(Error::new(
                            vec![input.prev_token().map_or(input.span(), |t| t.span.clone())],
                            kind::MissingOperand { op: "," },
                        ));
                    },
                    None => return Err(unclosed()),
                    _ => {},
                }
            }
        }

        if input.peek_token().is_none() {
            return Err(unclosed());
        }
        let close_paren = input.try_parse::<CloseParen>()?;

        Ok(Self {
            span: name.span.start..close_paren.span.end,
            name,
            args,
        })
    }
}

impl fmt::Display for Call {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        if let Some((last, args)) = self.args.split_last() {
            for arg in args {
                write!(f, "{}, ", arg)?;
            }
            write!(f, "{}", last)?;
        }
        write!(f, ")")
    }
}
