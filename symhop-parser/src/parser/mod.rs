pub mod ast;
pub mod error;
pub mod token;

use error::{kind, Error};
use super::tokenizer::{tokenize_complete, Token, TokenKind};
use std::ops::Range;
use symhop_error::ErrorKind;

/// A high-level parser for expression strings. This is the type to use to parse an arbitrary
/// expression into an abstract syntax tree.
#[derive(Debug, Clone)]
pub struct Parser<'source> {
    /// The tokens that this parser is currently parsing.
    tokens: Box<[Token<'source>]>,

    /// The index of the **next** token to be parsed.
    cursor: usize,
}

impl<'source> Parser<'source> {
    /// Create a new parser for the given source.
    pub fn new(source: &'source str) -> Self {
        Self {
            tokens: tokenize_complete(source),
            cursor: 0,
        }
    }

    /// Creates an error that points at the current token, or the end of the source code if the
    /// cursor is at the end of the stream.
    pub fn error(&self, kind: impl ErrorKind + 'static) -> Error {
        Error::new(vec![self.span()], kind)
    }

    /// Returns a span pointing at the end of the source code.
    pub fn eof_span(&self) -> Range<usize> {
        self.tokens.last().map_or(0..0, |token| token.span.end..token.span.end)
    }

    /// Returns the span of the current token, or the end of the source code if the cursor is at
    /// the end of the stream.
    pub fn span(&self) -> Range<usize> {
        self.tokens
            .get(self.cursor)
            .map_or(self.eof_span(), |token| token.span.clone())
    }

    /// Returns the previous token. The cursor is not moved. Returns [`None`] if the cursor is at
    /// the beginning of the stream.
    pub fn prev_token(&self) -> Option<&Token<'source>> {
        self.tokens.get(self.cursor.checked_sub(1)?)
    }

    /// Returns the next non-whitespace token without moving the cursor. Returns [`None`] if only
    /// whitespace remains.
    pub fn peek_token(&self) -> Option<&Token<'source>> {
        self.peek_nth_token(0)
    }

    /// Returns the `n`-th upcoming non-whitespace token (starting from zero) without moving the
    /// cursor.
    pub fn peek_nth_token(&self, n: usize) -> Option<&Token<'source>> {
        self.tokens[self.cursor.min(self.tokens.len())..]
            .iter()
            .filter(|token| !token.is_whitespace())
            .nth(n)
    }

    /// Returns the next token to be parsed, then advances the cursor. Whitespace tokens are
    /// skipped.
    ///
    /// Returns an EOF error if there are no more tokens.
    pub fn next_token(&mut self) -> Result<Token<'source>, Error> {
        while self.cursor < self.tokens.len() {
            let token = &self.tokens[self.cursor];
            self.cursor += 1;
            if token.is_whitespace() {
                continue;
            } else {
                // cloning is cheap: only Range<_> is cloned
                return Ok(token.clone());
            }
        }

        Err(self.error(kind::UnexpectedEof))
    }

    /// Speculatively parses a value from the given stream of tokens. This function can be used
    /// in the [`Parse::parse`] implementation of a type with the given [`Parser`], as it will
    /// automatically backtrack the cursor position if parsing fails.
    ///
    /// If parsing is successful, the stream is advanced past the consumed tokens and the parsed
    /// value is returned. Otherwise, the stream is left unchanged and an error is returned.
    pub fn try_parse<T: Parse>(&mut self) -> Result<T, Error> {
        self.try_parse_with_fn(T::parse)
    }

    /// Parses a value from the given stream of tokens without consuming anything, whether
    /// parsing succeeds or not.
    pub fn peek<T: Parse>(&mut self) -> Result<T, Error> {
        let start = self.cursor;
        let result = T::parse(self);
        self.cursor = start;
        result
    }

    /// Speculatively parses a value from the given stream of tokens, using a custom parsing
    /// function to parse the value. This function can be used in the [`Parse::parse`]
    /// implementation of a type with the given [`Parser`], as it will automatically backtrack the
    /// cursor position if parsing fails.
    ///
    /// If parsing is successful, the stream is advanced past the consumed tokens and the parsed
    /// value is returned. Otherwise, the stream is left unchanged and an error is returned.
    pub fn try_parse_with_fn<T, F>(&mut self, f: F) -> Result<T, Error>
    where
        F: FnOnce(&mut Parser<'source>) -> Result<T, Error>,
    {
        let start = self.cursor;
        match f(self) {
            Ok(value) => Ok(value),
            err => {
                self.cursor = start;
                err
            },
        }
    }

    /// Speculatively parses a value from the given stream of tokens, with a validation predicate.
    /// The value must parse successfully, **and** the predicate must return [`Ok`] for this
    /// function to return successfully.
    ///
    /// If parsing is successful, the stream is advanced past the consumed tokens and the parsed
    /// value is returned. Otherwise, the stream is left unchanged and an error is returned.
    pub fn try_parse_then<T: Parse, F>(&mut self, predicate: F) -> Result<T, Error>
    where
        F: FnOnce(&T, &Parser) -> Result<(), Error>,
    {
        let start = self.cursor;

        // closure workaround allows us to use `?` in the closure
        let compute = || {
            let value = T::parse(self)?;
            predicate(&value, self)?;
            Ok(value)
        };

        match compute() {
            Ok(value) => Ok(value),
            err => {
                self.cursor = start;
                err
            },
        }
    }

    /// Attempts to parse a value from the given stream of tokens. All the tokens must be consumed
    /// by the parser; if not, an error is returned.
    ///
    /// A stream made only of whitespace is reported as an empty expression, a character that is
    /// not part of any token as an invalid character, a number literal that overflows `f64` as out
    /// of range, and a leftover closing parenthesis as an unbalanced one.
    pub fn try_parse_full<T: Parse>(&mut self) -> Result<T, Error> {
        if self.peek_token().is_none() {
            return Err(self.error(kind::EmptyExpression));
        }

        if let Some(token) = self.tokens.iter().find(|token| token.kind == TokenKind::Symbol) {
            return Err(Error::new(vec![token.span.clone()], kind::InvalidCharacter {
                character: token.lexeme.to_owned(),
            }));
        }

        if let Some(token) = self.tokens.iter().find(|token| {
            token.kind == TokenKind::Number
                && token.lexeme.parse::<f64>().map_or(false, |value| !value.is_finite())
        }) {
            return Err(Error::new(vec![token.span.clone()], kind::NumberOutOfRange {
                lexeme: token.lexeme.to_owned(),
            }));
        }

        let value = T::parse(self)?;
        match self.peek_token() {
            None => {
                self.cursor = self.tokens.len();
                Ok(value)
            },
            Some(token) if token.kind == TokenKind::CloseParen => Err(Error::new(
                vec![token.span.clone()],
                kind::UnclosedParenthesis { opening: false },
            )),
            Some(token) => Err(Error::new(vec![token.span.clone()], kind::ExpectedEof)),
        }
    }
}

/// Any type that can be parsed from a source of tokens.
pub trait Parse: Sized {
    /// Parses a value from the given stream of tokens, advancing the stream past the consumed
    /// tokens if parsing is successful.
    ///
    /// This function should be used by consumers of the library.
    fn parse(input: &mut Parser) -> Result<Self, Error>;
}

/// The associativity of a binary or unary operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Associativity {
    /// The binary / unary operation is left-associative.
    ///
    /// For binary operations, this means `a op b op c` is evaluated as `(a op b) op c`.
    Left,

    /// The binary / unary operation is right-associative.
    ///
    /// For binary operations, this means `a op b op c` is evaluated as `a op (b op c)`. For unary
    /// operations, this means `op op a` is evaluated as `op (op a)` (the operators appear to the
    /// left of the operand).
    Right,
}

/// The precedence of an operation, in order from lowest precedence (evaluated last) to highest
/// precedence (evaluated first).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Precedence {
    /// Any precedence.
    Any,

    /// Precedence of the equation sign (`=`).
    Equation,

    /// Precedence of logical or (`||`).
    Or,

    /// Precedence of logical and (`&&`).
    And,

    /// Precedence of comparisons (`>`, `>=`, `<`, `<=`, `==`, and `!=`).
    Compare,

    /// Precedence of addition (`+`) and subtraction (`-`), which separate terms.
    Term,

    /// Precedence of multiplication (`*`) and division (`/`), which separate factors.
    Factor,

    /// Precedence of unary negation (`-`) and unary plus (`+`).
    Neg,

    /// Precedence of exponentiation (`^`).
    Exp,

    /// Precedence of the modulus operator (`%`).
    Mod,
}

impl PartialOrd for Precedence {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        let left = *self as u8;
        let right = *other as u8;
        left.partial_cmp(&right)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    use ast::{
        binary::Binary,
        call::Call,
        expr::Expr,
        literal::{Literal, LitNum, LitSym},
        paren::Paren,
        unary::Unary,
    };
    use token::op::{BinOp, BinOpKind, UnaryOp, UnaryOpKind};

    /// Parses the input and prints it back with every operation parenthesized.
    fn structure(input: &str) -> String {
        let mut parser = Parser::new(input);
        parser.try_parse_full::<Expr>().unwrap().to_string()
    }

    /// Parses the input, expecting an error, and returns its message.
    fn error_message(input: &str) -> String {
        let mut parser = Parser::new(input);
        parser.try_parse_full::<Expr>().unwrap_err().kind.message()
    }

    #[test]
    fn literal_number() {
        let mut parser = Parser::new("16");
        let expr = parser.try_parse_full::<Expr>().unwrap();

        assert_eq!(expr, Expr::Literal(Literal::Number(LitNum {
            value: "16".to_string(),
            span: 0..2,
        })));
    }

    #[test]
    fn binary_with_unary() {
        let mut parser = Parser::new("a - -2");
        let expr = parser.try_parse_full::<Expr>().unwrap();

        assert_eq!(expr, Expr::Binary(Binary {
            lhs: Box::new(Expr::Literal(Literal::Symbol(LitSym {
                name: "a".to_string(),
                span: 0..1,
            }))),
            op: BinOp {
                kind: BinOpKind::Sub,
                span: 2..3,
            },
            rhs: Box::new(Expr::Unary(Unary {
                operand: Box::new(Expr::Literal(Literal::Number(LitNum {
                    value: "2".to_string(),
                    span: 5..6,
                }))),
                op: UnaryOp {
                    kind: UnaryOpKind::Neg,
                    span: 4..5,
                },
                span: 4..6,
            })),
            span: 0..6,
        }));
    }

    #[test]
    fn call_with_arguments() {
        let mut parser = Parser::new("atan2(y, x)");
        let expr = parser.try_parse_full::<Expr>().unwrap();

        assert_eq!(expr, Expr::Call(Call {
            name: LitSym {
                name: "atan2".to_string(),
                span: 0..5,
            },
            args: vec![
                Expr::Literal(Literal::Symbol(LitSym {
                    name: "y".to_string(),
                    span: 6..7,
                })),
                Expr::Literal(Literal::Symbol(LitSym {
                    name: "x".to_string(),
                    span: 9..10,
                })),
            ],
            span: 0..11,
        }));
    }

    #[test]
    fn call_without_arguments() {
        let mut parser = Parser::new("mDelay0.getOldest()");
        let expr = parser.try_parse_full::<Expr>().unwrap();

        assert_eq!(expr, Expr::Call(Call {
            name: LitSym {
                name: "mDelay0.getOldest".to_string(),
                span: 0..17,
            },
            args: vec![],
            span: 0..19,
        }));
    }

    #[test]
    fn parenthesized() {
        let mut parser = Parser::new("(x)");
        let expr = parser.try_parse_full::<Expr>().unwrap();

        assert_eq!(expr, Expr::Paren(Paren {
            expr: Box::new(Expr::Literal(Literal::Symbol(LitSym {
                name: "x".to_string(),
                span: 1..2,
            }))),
            span: 0..3,
        }));
    }

    #[test]
    fn precedence_of_arithmetic() {
        assert_eq!(structure("1 + 2 * 3"), "(1 + (2 * 3))");
        assert_eq!(structure("1 * 2 + 3"), "((1 * 2) + 3)");
        assert_eq!(structure("a - b - c"), "((a - b) - c)");
        assert_eq!(structure("a / b / c"), "((a / b) / c)");
        assert_eq!(structure("a / b * c"), "((a / b) * c)");
    }

    #[test]
    fn exponent_is_right_associative() {
        assert_eq!(structure("a ^ b ^ c"), "(a ^ (b ^ c))");
        assert_eq!(structure("2 * x ^ 2"), "(2 * (x ^ 2))");
        assert_eq!(structure("-x ^ 2"), "(-(x ^ 2))");
        assert_eq!(structure("x ^ -1"), "(x ^ (-1))");
    }

    #[test]
    fn modulus_binds_tightest() {
        assert_eq!(structure("x ^ 2 % 3"), "(x ^ (2 % 3))");
        assert_eq!(structure("a * b % c"), "(a * (b % c))");
    }

    #[test]
    fn equation_binds_loosest() {
        assert_eq!(structure("y = a + b"), "(y = (a + b))");
        assert_eq!(structure("a*b = c"), "((a * b) = c)");
        assert_eq!(structure("a = b || c"), "(a = (b || c))");
    }

    #[test]
    fn relational_and_logical_operators() {
        assert_eq!(structure("a > b && c <= d"), "((a > b) && (c <= d))");
        assert_eq!(structure("a || b && c"), "(a || (b && c))");
        assert_eq!(structure("a + 1 == b"), "((a + 1) == b)");
        assert_eq!(structure("a != b"), "(a != b)");
    }

    #[test]
    fn repeated_signs() {
        assert_eq!(structure("a--b"), "(a - (-b))");
        assert_eq!(structure("a+-b"), "(a + (-b))");
        assert_eq!(structure("+a"), "(+a)");
        assert_eq!(structure("--a"), "(-(-a))");
    }

    #[test]
    fn nested_calls_and_parentheses() {
        assert_eq!(structure("sin((x))"), "sin((x))");
        assert_eq!(structure("pow(a+b, 2)*c"), "(pow((a + b), 2) * c)");
        assert_eq!(structure("f(g(x), -y, 1e-5)"), "f(g(x), (-y), 1e-5)");
    }

    #[test]
    fn empty_input() {
        assert_eq!(error_message(""), "empty expression");
        assert_eq!(error_message("   "), "empty expression");
    }

    #[test]
    fn unbalanced_parentheses() {
        assert_eq!(error_message("(a + b"), "unbalanced parentheses");
        assert_eq!(error_message("a + b)"), "unbalanced parentheses");
        assert_eq!(error_message("sin(x"), "unbalanced parentheses");
    }

    #[test]
    fn missing_operand() {
        assert_eq!(error_message("a +"), "missing operand for `+`");
        assert_eq!(error_message("a * / b"), "missing operand for `*`");
        assert_eq!(error_message("(a = )"), "missing operand for `=`");
        assert_eq!(error_message("f(a, )"), "missing operand for `,`");
    }

    #[test]
    fn other_errors() {
        assert_eq!(error_message("()"), "empty parentheses");
        assert_eq!(error_message("a $ b"), "invalid character `$`");
        assert_eq!(error_message("a b"), "expected end of expression");
    }

    #[test]
    fn overflowing_number() {
        assert_eq!(error_message("1e400*x"), "number `1e400` is out of range");

        let mut parser = Parser::new("x + 2e308");
        let err = parser.try_parse_full::<Expr>().unwrap_err();
        assert_eq!(err.spans, vec![4..9]);

        // underflow rounds to zero and is accepted
        assert_eq!(structure("1e-400"), "1e-400");
    }

    #[test]
    fn error_spans() {
        let mut parser = Parser::new("(a + b");
        let err = parser.try_parse_full::<Expr>().unwrap_err();
        assert_eq!(err.spans, vec![0..1]);

        let mut parser = Parser::new("a + b)");
        let err = parser.try_parse_full::<Expr>().unwrap_err();
        assert_eq!(err.spans, vec![5..6]);
    }
}
