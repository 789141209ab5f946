use crate::operators::Operator;

/// Lexical kind of a numeric literal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    Int,
    Float,
}

/// A node of a parsed rule.
///
/// A tree is built once by the parser and never mutated afterwards. Variables
/// hold only their name and literals keep their source text, so the same tree
/// can be evaluated against any number of environments.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// An operator applied to its operands, e.g. `(+ a 1)`
    Operation { op: Operator, operands: Vec<Expr> },
    /// A numeric literal, parsed at evaluation time into the requested projection
    Literal { kind: LiteralKind, text: String },
    /// A dotted path resolved against the environment, e.g. `sale.Shop.ShopID`
    Variable { name: String },
}

impl Expr {
    pub fn operation(op: Operator, operands: Vec<Expr>) -> Self {
        Expr::Operation { op, operands }
    }

    pub fn int(text: impl Into<String>) -> Self {
        Expr::Literal {
            kind: LiteralKind::Int,
            text: text.into(),
        }
    }

    pub fn float(text: impl Into<String>) -> Self {
        Expr::Literal {
            kind: LiteralKind::Float,
            text: text.into(),
        }
    }

    pub fn variable(name: impl Into<String>) -> Self {
        Expr::Variable { name: name.into() }
    }

    /// Collect every variable name referenced by this tree, in source order
    pub fn variables(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_variables(&mut names);
        names
    }

    fn collect_variables<'a>(&'a self, names: &mut Vec<&'a str>) {
        match self {
            Expr::Operation { operands, .. } => {
                for operand in operands {
                    operand.collect_variables(names);
                }
            }
            Expr::Variable { name } => names.push(name),
            Expr::Literal { .. } => {}
        }
    }
}

impl std::fmt::Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expr::Operation { op, operands } => {
                write!(f, "({}", op)?;
                for operand in operands {
                    write!(f, " {}", operand)?;
                }
                write!(f, ")")
            }
            Expr::Literal { text, .. } => write!(f, "{}", text),
            Expr::Variable { name } => write!(f, "{}", name),
        }
    }
}
