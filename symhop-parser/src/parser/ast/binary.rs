use crate::{
    parser::{
        ast::{expr::Expr, unary::Unary},
        error::{kind, Error},
        token::op::{BinOp, BinOpKind},
        Associativity,
        Parser,
        Precedence,
    },
    tokenizer::TokenKind,
};
use std::{fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A binary expression, such as `1 + 2`. Binary expressions can include nested expressions.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Binary {
    /// The left-hand side of the binary expression.
    pub lhs: Box<Expr>,

    /// The operator of the binary expression.
    pub op: BinOp,

    /// The right-hand side of the binary expression.
    pub rhs: Box<Expr>,

    /// The region of the source code that this binary expression was parsed from.
    pub span: Range<usize>,
}

impl Binary {
    /// Returns the span of the binary expression.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    /// Parses the operand to the right of `op`. An operand is missing if the expression ends, or
    /// continues with a closing parenthesis, a comma, or an operator that cannot start an
    /// expression.
    fn parse_rhs(input: &mut Parser, op: &BinOp) -> Result<Expr, Error> {
        let missing = match input.peek_token() {
            None => true,
            Some(token) => !matches!(
                token.kind,
                TokenKind::Name | TokenKind::Number | TokenKind::OpenParen
                    | TokenKind::Sub | TokenKind::Add
            ),
        };

        if missing {
            return Err(Error::new(vec![op.span.clone()], kind::MissingOperand {
                op: op.kind.symbol(),
            }));
        }

        Unary::parse_or_lower(input)
    }

    /// After parsing the left-hand-side, the operator, and the right-hand-side of a potential
    /// binary expression, parse ahead to see if the right-hand-side is incomplete.
    fn complete_rhs(input: &mut Parser, lhs: Expr, op: BinOp, mut rhs: Expr) -> Result<Expr, Error> {
        let precedence = op.precedence();

        loop {
            // before creating the `lhs op rhs` node, we should check the precedence of the
            // following operator, if any
            // this is because we can't parse an expression like `3 + 4 * 5`, as (3 + 4) * 5
            let next_op = match input.peek::<BinOp>() {
                Ok(next_op) => next_op,
                Err(_) => break,
            };

            if next_op.precedence() > precedence
                || (next_op.precedence() == precedence && next_op.associativity() == Associativity::Right)
            {
                // this operator has a higher precedence or it is right associative, so we should
                // parse its expression starting with `rhs` first
                rhs = Self::parse_expr(input, rhs, next_op.precedence())?;
            } else {
                // this operator has lower precedence, or equal precedence and
                // left-associativity; this is in scenarios like:
                // `1 * 2 + 3` or `1 * 2 * 3`
                //
                // so just break out of the loop and let `lhs` become `1 * 2`
                // we will parse this operator on the next iteration of the outside loop
                break;
            }
        }

        // create the binary node representing `lhs op rhs`
        let span = lhs.span().start..rhs.span().end;
        Ok(Expr::Binary(Binary {
            lhs: Box::new(lhs),
            op,
            rhs: Box::new(rhs),
            span,
        }))
    }

    /// Parses a binary expression starting with the given left-hand side, consuming every
    /// operator whose precedence is at least `precedence`.
    pub fn parse_expr(input: &mut Parser, mut lhs: Expr, precedence: Precedence) -> Result<Expr, Error> {
        while let Ok(op) = input.try_parse_then::<BinOp, _>(|bin_op, input| {
            if bin_op.precedence() >= precedence {
                Ok(())
            } else {
                Err(input.error(kind::NonFatal))
            }
        }) {
            let rhs = Self::parse_rhs(input, &op)?;
            lhs = Self::complete_rhs(input, lhs, op, rhs)?;
        }

        Ok(lhs)
    }

    /// Returns true if this is an equation, `lhs = rhs`.
    pub fn is_equation(&self) -> bool {
        self.op.kind == BinOpKind::Equation
    }
}

impl fmt::Display for Binary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({} {} {})", self.lhs, self.op.kind, self.rhs)
    }
}
