//! The abstract syntax tree produced by the parser.
//!
//! The tree mirrors the source text: parentheses are kept as [`paren::Paren`] nodes, every
//! binary operator is a [`binary::Binary`] node with exactly two operands, and numbers keep their
//! original lexeme. Every node records the span of the source it was parsed from, so that later
//! stages can point errors at the right place.

pub mod binary;
pub mod call;
pub mod expr;
pub mod literal;
pub mod paren;
pub mod unary;

pub use binary::Binary;
pub use call::Call;
pub use expr::{Expr, Primary};
pub use literal::{Literal, LitNum, LitSym};
pub use paren::Paren;
pub use unary::Unary;
