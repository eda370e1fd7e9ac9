//! Tokenizer and parser for the textual form of SymHop expressions.
//!
//! The parser turns strings such as `der(x) = -k*x + pow(y, 2)` into an abstract syntax tree
//! ([`parser::ast::Expr`]) that keeps the shape of the source, including parentheses and the
//! exact lexemes of numbers. Turning that tree into an algebraic expression (flattening sums and
//! products, normalizing numbers) is the job of the `symhop-compute` crate.

pub mod parser;
pub mod tokenizer;
