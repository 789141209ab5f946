use std::collections::HashMap;

use log::trace;

use crate::RuleError;
use crate::ast::{Expr, LiteralKind};
use crate::operators::Operator;
use crate::value::{Numeric, Scalar, parse_float_text, parse_int_text};

/// Flat mapping from dotted paths to scalar values
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Environment {
    bindings: HashMap<String, Scalar>,
}

impl Environment {
    pub fn new() -> Self {
        Environment {
            bindings: HashMap::new(),
        }
    }

    pub fn define(&mut self, name: impl Into<String>, value: impl Into<Scalar>) {
        self.bindings.insert(name.into(), value.into());
    }

    /// Builder form of [`Environment::define`]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Scalar>) -> Self {
        self.define(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<Scalar> {
        self.bindings.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Scalar)> {
        self.bindings.iter().map(|(name, value)| (name.as_str(), *value))
    }

    fn lookup(&self, name: &str) -> Result<Scalar, RuleError> {
        self.get(name).ok_or_else(|| {
            trace!("unbound variable {}", name);
            RuleError::UnboundVariable(name.to_string())
        })
    }
}

impl<K: Into<String>, V: Into<Scalar>> FromIterator<(K, V)> for Environment {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut env = Environment::new();
        env.extend(iter);
        env
    }
}

impl<K: Into<String>, V: Into<Scalar>> Extend<(K, V)> for Environment {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (name, value) in iter {
            self.define(name, value);
        }
    }
}

impl Expr {
    /// Evaluate under the native integer projection
    pub fn eval_int(&self, env: &Environment) -> Result<isize, RuleError> {
        eval_numeric(self, env)
    }

    /// Evaluate under the 64-bit integer projection
    pub fn eval_int64(&self, env: &Environment) -> Result<i64, RuleError> {
        eval_numeric(self, env)
    }

    /// Evaluate under the floating-point projection
    pub fn eval_float(&self, env: &Environment) -> Result<f64, RuleError> {
        eval_numeric(self, env)
    }

    /// Evaluate under the boolean projection
    pub fn eval_bool(&self, env: &Environment) -> Result<bool, RuleError> {
        eval_bool(self, env)
    }
}

/// Evaluate an expression under one of the numeric projections
fn eval_numeric<N: Numeric>(expr: &Expr, env: &Environment) -> Result<N, RuleError> {
    match expr {
        Expr::Literal {
            kind: LiteralKind::Int,
            text,
        } => N::from_int_text(text),
        Expr::Literal {
            kind: LiteralKind::Float,
            text,
        } => N::from_float_text(text),
        Expr::Variable { name } => env.lookup(name).and_then(N::from_scalar),
        Expr::Operation { op, operands } => eval_numeric_operation(*op, operands, env),
    }
}

fn eval_numeric_operation<N: Numeric>(
    op: Operator,
    operands: &[Expr],
    env: &Environment,
) -> Result<N, RuleError> {
    if op.is_boolean_only() {
        trace!("'{}' evaluated under the {} projection", op, N::NAME);
        return Err(RuleError::UnsupportedProjection {
            operator: op.symbol(),
            projection: N::NAME,
        });
    }
    op.validate_arity(operands.len())?;

    match (op, operands) {
        (Operator::Add, _) => fold(N::ZERO, operands, env, N::add),
        (Operator::Mul, _) => fold(N::ONE, operands, env, N::mul),
        (Operator::Sub, [first, rest @ ..]) => fold(eval_numeric(first, env)?, rest, env, N::sub),
        (Operator::Div, [first, rest @ ..]) => fold(eval_numeric(first, env)?, rest, env, N::div),
        (Operator::If, [condition, then_expr, else_expr]) => {
            if eval_bool(condition, env)? {
                eval_numeric(then_expr, env)
            } else {
                eval_numeric(else_expr, env)
            }
        }
        // Arity validation rules out every other shape
        _ => Err(RuleError::ArityError {
            operator: op.symbol(),
            expected: op.arity(),
            got: operands.len(),
        }),
    }
}

/// Left-fold operands into an accumulator
fn fold<N: Numeric>(
    init: N,
    operands: &[Expr],
    env: &Environment,
    step: fn(N, N) -> Result<N, RuleError>,
) -> Result<N, RuleError> {
    operands
        .iter()
        .try_fold(init, |acc, operand| step(acc, eval_numeric(operand, env)?))
}

/// Evaluate an expression under the boolean projection
fn eval_bool(expr: &Expr, env: &Environment) -> Result<bool, RuleError> {
    match expr {
        Expr::Literal {
            kind: LiteralKind::Int,
            text,
        } => parse_int_text(text).map(|i| i != 0),
        Expr::Literal {
            kind: LiteralKind::Float,
            text,
        } => parse_float_text(text).map(|f| f != 0.0),
        Expr::Variable { name } => env.lookup(name).map(Scalar::is_truthy),
        Expr::Operation { op, operands } => eval_bool_operation(*op, operands, env),
    }
}

fn eval_bool_operation(
    op: Operator,
    operands: &[Expr],
    env: &Environment,
) -> Result<bool, RuleError> {
    op.validate_arity(operands.len())?;

    match (op, operands) {
        (Operator::Add | Operator::Sub | Operator::Mul | Operator::Div, _) => {
            Ok(eval_numeric_operation::<f64>(op, operands, env)? != 0.0)
        }
        (Operator::Gt, [a, b]) => compare(a, b, env, f64::gt),
        (Operator::Ge, [a, b]) => compare(a, b, env, f64::ge),
        (Operator::Lt, [a, b]) => compare(a, b, env, f64::lt),
        (Operator::Le, [a, b]) => compare(a, b, env, f64::le),
        (Operator::Eq, [a, b]) => compare(a, b, env, f64::eq),
        (Operator::Ne, [a, b]) => compare(a, b, env, f64::ne),
        (Operator::And, _) => {
            for operand in operands {
                if !eval_bool(operand, env)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        (Operator::Or, _) => {
            for operand in operands {
                if eval_bool(operand, env)? {
                    return Ok(true);
                }
            }
            Ok(false)
        }
        (Operator::In, [needle, candidates @ ..]) => {
            let needle = eval_numeric::<f64>(needle, env)?;
            for candidate in candidates {
                if eval_numeric::<f64>(candidate, env)? == needle {
                    return Ok(true);
                }
            }
            Ok(false)
        }
        (Operator::If, [condition, then_expr, else_expr]) => {
            if eval_bool(condition, env)? {
                eval_bool(then_expr, env)
            } else {
                eval_bool(else_expr, env)
            }
        }
        _ => Err(RuleError::ArityError {
            operator: op.symbol(),
            expected: op.arity(),
            got: operands.len(),
        }),
    }
}

/// Comparisons are float-typed whatever the operand kinds
fn compare(
    a: &Expr,
    b: &Expr,
    env: &Environment,
    cmp: fn(&f64, &f64) -> bool,
) -> Result<bool, RuleError> {
    Ok(cmp(&eval_numeric(a, env)?, &eval_numeric(b, env)?))
}
