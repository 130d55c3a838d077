//! formula evaluation for IfCondition entries
//!
//! the engine only depends on the [`ExpressionParser`] trait; [`MathParser`]
//! is the bundled implementation:
//! - arithmetic: + - * / % ^ and unary minus
//! - comparisons: = == != <> < <= > >= (1 for true, 0 for false)
//! - logic: && || ! and the ternary `cond ? a : b`
//! - functions such as min, max, clamp, round, abs, sqrt
//! - any other name is resolved through the caller's lookup

mod ast;
mod lexer;
mod parser;

pub use ast::Expr;
pub use parser::{parse_expr, MAX_DEPTH};

use thiserror::Error;

/// failure to parse or evaluate a formula
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExpressionError {
    #[error("Empty expression")]
    Empty,

    #[error("Unexpected character '{ch}' at position {position}")]
    UnexpectedChar { ch: char, position: usize },

    #[error("Invalid number '{0}'")]
    InvalidNumber(String),

    #[error("Unexpected token '{0}'")]
    UnexpectedToken(String),

    #[error("Unexpected end of expression")]
    UnexpectedEnd,

    #[error("Unknown name '{0}'")]
    UnknownName(String),

    #[error("Function '{name}' expects {expected} argument(s), got {got}")]
    ArgumentCount {
        name: String,
        expected: &'static str,
        got: usize,
    },

    #[error("Division by 0")]
    DivisionByZero,

    #[error("Expression nested deeper than {0} levels")]
    TooDeep(usize),

    /// diagnostic from a foreign parser implementation
    #[error("{0}")]
    Other(String),
}

/// evaluates formula text to a number
pub trait ExpressionParser {
    /// `lookup` resolves names referenced by the formula (e.g. the subject's
    /// own name to its current value)
    fn parse(
        &self,
        text: &str,
        lookup: &dyn Fn(&str) -> Option<f64>,
    ) -> Result<f64, ExpressionError>;
}

/// bundled formula evaluator
#[derive(Debug, Clone, Copy, Default)]
pub struct MathParser;

impl ExpressionParser for MathParser {
    fn parse(
        &self,
        text: &str,
        lookup: &dyn Fn(&str) -> Option<f64>,
    ) -> Result<f64, ExpressionError> {
        parse_expr(text)?.eval(lookup)
    }
}
