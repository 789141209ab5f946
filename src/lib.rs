//! A tiny embedded rule language.
//!
//! Rules are fully parenthesized prefix expressions such as
//! `(if (>= sale.Shop.ShopID 1) 10.1 0)`. A rule is parsed once into an
//! [`Expr`] tree and can then be evaluated any number of times against an
//! [`Environment`] under one of four projections: native integer, 64-bit
//! integer, float or boolean.
//!
//! ```
//! use ruleexpr::{Environment, parse};
//!
//! let rule = parse("(+ (- id 1) 2 (+ 3 4))").unwrap();
//! let env = Environment::new().with("id", 10);
//! assert_eq!(rule.eval_int(&env).unwrap(), 18);
//! ```

use thiserror::Error;

use crate::operators::Arity;

/// Error types for scanning, parsing and evaluating rules
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuleError {
    #[error("Parse error: unexpected character '{ch}' at position {position}")]
    UnexpectedCharacter { ch: char, position: usize },

    #[error("Parse error: unexpected token '{token}' at position {position}")]
    UnexpectedToken { token: String, position: usize },

    #[error("Parse error: invalid operator '{0}'")]
    InvalidOperator(String),

    #[error("Parse error: missing closing parenthesis for '{0}' group")]
    UnterminatedGroup(&'static str),

    #[error("Parse error: malformed identifier '{0}'")]
    MalformedIdentifier(String),

    #[error("Parse error: unexpected remaining input at position {0}")]
    TrailingInput(usize),

    #[error("Parse error: groups nested deeper than {0}")]
    NestingTooDeep(usize),

    #[error("Arity error: '{operator}' expected {expected} arguments, got {got}")]
    ArityError {
        operator: &'static str,
        expected: Arity,
        got: usize,
    },

    #[error("Literal error: '{text}' is not a valid {target}")]
    InvalidLiteral { text: String, target: &'static str },

    #[error("Unbound variable: {0}")]
    UnboundVariable(String),

    #[error("Type error: '{operator}' cannot be evaluated as {projection}")]
    UnsupportedProjection {
        operator: &'static str,
        projection: &'static str,
    },

    #[error("Evaluation error: division by zero")]
    DivisionByZero,

    #[error("Evaluation error: integer overflow in '{0}'")]
    Overflow(&'static str),

    #[error("Evaluation error: {value} is out of range for {target}")]
    OutOfRange { value: String, target: &'static str },

    #[error("Environment error: {0}")]
    Environment(String),
}

impl RuleError {
    /// True for faults raised while turning rule text into a tree
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            RuleError::UnexpectedCharacter { .. }
                | RuleError::UnexpectedToken { .. }
                | RuleError::InvalidOperator(_)
                | RuleError::UnterminatedGroup(_)
                | RuleError::MalformedIdentifier(_)
                | RuleError::TrailingInput(_)
                | RuleError::NestingTooDeep(_)
        )
    }
}

pub mod ast;
pub mod evaluator;
#[cfg(feature = "json")]
pub mod flatten;
pub mod operators;
pub mod parser;
pub mod scanner;
pub mod value;

pub use ast::{Expr, LiteralKind};
pub use evaluator::Environment;
pub use operators::Operator;
pub use parser::{ParseOptions, parse, parse_with_options};
pub use value::Scalar;
