//! Operator registry for the rule language.
//!
//! The operator vocabulary is closed: every spelling a rule may use is listed
//! once in [`OPERATORS`] and resolved to an [`Operator`] when the rule is
//! parsed, so evaluation only ever matches on the enum.
//!
//! ```text
//! (+ 1 2 3)            ; arithmetic folds over any number of operands
//! (>= price 10)        ; comparisons are always float-typed
//! (and a (|| b c))     ; word and symbol spellings share one operator
//! (if cond then else)  ; ternary
//! (in x 1 5 9)         ; membership by exact float equality
//! ```
//!
//! ## Boolean-only operators
//!
//! Comparisons, `and`, `or` and `in` produce truth values. They are legal
//! anywhere a boolean is expected (the condition of `if`, operands of `and`)
//! but evaluating one under a numeric projection is an error.

use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use crate::RuleError;

/// Represents the expected number of operands for an operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Exactly n operands required
    Exact(usize),
    /// At least n operands required
    AtLeast(usize),
}

impl Arity {
    /// Check if the given number of operands is valid for this arity constraint
    pub fn validate(&self, operator: Operator, operand_count: usize) -> Result<(), RuleError> {
        let valid = match self {
            Arity::Exact(n) => operand_count == *n,
            Arity::AtLeast(n) => operand_count >= *n,
        };

        if valid {
            Ok(())
        } else {
            Err(RuleError::ArityError {
                operator: operator.symbol(),
                expected: *self,
                got: operand_count,
            })
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exact(n) => write!(f, "exactly {}", n),
            Arity::AtLeast(n) => write!(f, "at least {}", n),
        }
    }
}

/// The closed set of operators a rule can apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
    Gt,
    Ge,
    Lt,
    Le,
    Eq,
    Ne,
    And,
    Or,
    If,
    In,
}

/// Definition of an operator: its spellings and operand constraints
#[derive(Debug, Clone, PartialEq)]
pub struct OperatorDef {
    pub operator: Operator,
    /// Canonical spelling, used when printing a rule
    pub symbol: &'static str,
    /// Additional spellings that resolve to the same operator
    pub aliases: &'static [&'static str],
    pub arity: Arity,
    /// Only defined under the boolean projection
    pub boolean_only: bool,
}

static OPERATORS: &[OperatorDef] = &[
    // Arithmetic
    OperatorDef {
        operator: Operator::Add,
        symbol: "+",
        aliases: &[],
        arity: Arity::AtLeast(0),
        boolean_only: false,
    },
    OperatorDef {
        operator: Operator::Sub,
        symbol: "-",
        aliases: &[],
        arity: Arity::AtLeast(1),
        boolean_only: false,
    },
    OperatorDef {
        operator: Operator::Mul,
        symbol: "*",
        aliases: &[],
        arity: Arity::AtLeast(0),
        boolean_only: false,
    },
    OperatorDef {
        operator: Operator::Div,
        symbol: "/",
        aliases: &[],
        arity: Arity::AtLeast(1),
        boolean_only: false,
    },
    // Comparison: extra operands would be silently ignored, so reject them
    OperatorDef {
        operator: Operator::Gt,
        symbol: ">",
        aliases: &[],
        arity: Arity::Exact(2),
        boolean_only: true,
    },
    OperatorDef {
        operator: Operator::Ge,
        symbol: ">=",
        aliases: &[],
        arity: Arity::Exact(2),
        boolean_only: true,
    },
    OperatorDef {
        operator: Operator::Lt,
        symbol: "<",
        aliases: &[],
        arity: Arity::Exact(2),
        boolean_only: true,
    },
    OperatorDef {
        operator: Operator::Le,
        symbol: "<=",
        aliases: &[],
        arity: Arity::Exact(2),
        boolean_only: true,
    },
    OperatorDef {
        operator: Operator::Eq,
        symbol: "==",
        aliases: &[],
        arity: Arity::Exact(2),
        boolean_only: true,
    },
    OperatorDef {
        operator: Operator::Ne,
        symbol: "!=",
        aliases: &[],
        arity: Arity::Exact(2),
        boolean_only: true,
    },
    // Logic
    OperatorDef {
        operator: Operator::And,
        symbol: "and",
        aliases: &["&&"],
        arity: Arity::AtLeast(0),
        boolean_only: true,
    },
    OperatorDef {
        operator: Operator::Or,
        symbol: "or",
        aliases: &["||"],
        arity: Arity::AtLeast(0),
        boolean_only: true,
    },
    // Control flow
    OperatorDef {
        operator: Operator::If,
        symbol: "if",
        aliases: &[],
        arity: Arity::Exact(3),
        boolean_only: false,
    },
    OperatorDef {
        operator: Operator::In,
        symbol: "in",
        aliases: &[],
        arity: Arity::AtLeast(1),
        boolean_only: true,
    },
];

/// Lazy static map from every accepted spelling to its definition
static BY_SPELLING: LazyLock<HashMap<&'static str, &'static OperatorDef>> = LazyLock::new(|| {
    OPERATORS
        .iter()
        .flat_map(|def| {
            std::iter::once(def.symbol)
                .chain(def.aliases.iter().copied())
                .map(move |spelling| (spelling, def))
        })
        .collect()
});

/// Get all operator definitions
pub fn get_operators() -> &'static [OperatorDef] {
    OPERATORS
}

/// Find an operator by any of its spellings
pub fn find_operator(spelling: &str) -> Option<Operator> {
    BY_SPELLING.get(spelling).map(|def| def.operator)
}

impl Operator {
    pub fn def(self) -> &'static OperatorDef {
        // The registry lists the variants in declaration order
        &OPERATORS[self as usize]
    }

    pub fn symbol(self) -> &'static str {
        self.def().symbol
    }

    pub fn arity(self) -> Arity {
        self.def().arity
    }

    pub fn is_boolean_only(self) -> bool {
        self.def().boolean_only
    }

    /// Check an operand count against this operator's arity
    pub fn validate_arity(self, operand_count: usize) -> Result<(), RuleError> {
        self.arity().validate(self, operand_count)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
