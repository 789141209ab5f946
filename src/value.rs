use std::fmt;

use crate::RuleError;

/// A scalar stored in an environment
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar {
    /// Native machine-width integer
    Int(isize),
    /// 64-bit integer
    Int64(i64),
    /// Double-precision float
    Float(f64),
}

// Truncate a float toward zero, rejecting NaN, infinities and values whose
// integral part does not fit the target
macro_rules! float_to_integer {
    ($fn_name:ident, $ty:ty, $target:expr) => {
        pub(crate) fn $fn_name(v: f64) -> Result<$ty, RuleError> {
            let t = v.trunc();
            // MIN is a power of two, so both bounds are exact in f64
            let min = <$ty>::MIN as f64;
            if t.is_finite() && t >= min && t < -min {
                Ok(t as $ty)
            } else {
                Err(RuleError::OutOfRange {
                    value: format!("{:?}", v),
                    target: $target,
                })
            }
        }
    };
}

float_to_integer!(float_to_isize, isize, "int");
float_to_integer!(float_to_i64, i64, "int64");

impl Scalar {
    /// Convert to a native integer; floats truncate toward zero
    pub fn to_int(self) -> Result<isize, RuleError> {
        match self {
            Scalar::Int(v) => Ok(v),
            Scalar::Int64(v) => isize::try_from(v).map_err(|_| RuleError::OutOfRange {
                value: v.to_string(),
                target: "int",
            }),
            Scalar::Float(v) => float_to_isize(v),
        }
    }

    /// Convert to a 64-bit integer; floats truncate toward zero
    pub fn to_int64(self) -> Result<i64, RuleError> {
        match self {
            Scalar::Int(v) => i64::try_from(v).map_err(|_| RuleError::OutOfRange {
                value: v.to_string(),
                target: "int64",
            }),
            Scalar::Int64(v) => Ok(v),
            Scalar::Float(v) => float_to_i64(v),
        }
    }

    pub fn to_float(self) -> f64 {
        match self {
            Scalar::Int(v) => v as f64,
            Scalar::Int64(v) => v as f64,
            Scalar::Float(v) => v,
        }
    }

    /// Non-zero test in the scalar's own kind
    pub fn is_truthy(self) -> bool {
        match self {
            Scalar::Int(v) => v != 0,
            Scalar::Int64(v) => v != 0,
            Scalar::Float(v) => v != 0.0,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Int(v) => write!(f, "{}", v),
            Scalar::Int64(v) => write!(f, "{}", v),
            Scalar::Float(v) => write!(f, "{:?}", v),
        }
    }
}

impl From<i32> for Scalar {
    fn from(v: i32) -> Self {
        Scalar::Int(v as isize)
    }
}

impl From<isize> for Scalar {
    fn from(v: isize) -> Self {
        Scalar::Int(v)
    }
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Self {
        Scalar::Int64(v)
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Scalar::Float(v)
    }
}

/// Parse a float literal's text; literals too large for `f64` are rejected
pub(crate) fn parse_float_text(text: &str) -> Result<f64, RuleError> {
    match text.parse::<f64>() {
        Ok(f) if f.is_finite() => Ok(f),
        _ => Err(RuleError::InvalidLiteral {
            text: text.to_string(),
            target: "float",
        }),
    }
}

/// Parse an integer literal's text as a 64-bit integer
pub(crate) fn parse_int_text(text: &str) -> Result<i64, RuleError> {
    text.parse::<i64>().map_err(|_| RuleError::InvalidLiteral {
        text: text.to_string(),
        target: "int64",
    })
}

/// A numeric projection target.
///
/// The three numeric projections share one evaluator; this trait supplies
/// the identities, conversions and arithmetic of each target type.
pub(crate) trait Numeric: Copy + Sized {
    /// Projection name used in error messages
    const NAME: &'static str;
    const ZERO: Self;
    const ONE: Self;

    fn from_scalar(scalar: Scalar) -> Result<Self, RuleError>;
    fn from_int_text(text: &str) -> Result<Self, RuleError>;
    fn from_float_text(text: &str) -> Result<Self, RuleError>;

    fn add(self, rhs: Self) -> Result<Self, RuleError>;
    fn sub(self, rhs: Self) -> Result<Self, RuleError>;
    fn mul(self, rhs: Self) -> Result<Self, RuleError>;
    fn div(self, rhs: Self) -> Result<Self, RuleError>;
}

// Macro to generate the integer projections with checked arithmetic
macro_rules! integer_numeric {
    ($ty:ty, $name:expr, $convert:ident, $from_float:ident) => {
        impl Numeric for $ty {
            const NAME: &'static str = $name;
            const ZERO: Self = 0;
            const ONE: Self = 1;

            fn from_scalar(scalar: Scalar) -> Result<Self, RuleError> {
                scalar.$convert()
            }

            fn from_int_text(text: &str) -> Result<Self, RuleError> {
                text.parse::<$ty>().map_err(|_| RuleError::InvalidLiteral {
                    text: text.to_string(),
                    target: $name,
                })
            }

            fn from_float_text(text: &str) -> Result<Self, RuleError> {
                parse_float_text(text).and_then($from_float)
            }

            fn add(self, rhs: Self) -> Result<Self, RuleError> {
                self.checked_add(rhs).ok_or(RuleError::Overflow("+"))
            }

            fn sub(self, rhs: Self) -> Result<Self, RuleError> {
                self.checked_sub(rhs).ok_or(RuleError::Overflow("-"))
            }

            fn mul(self, rhs: Self) -> Result<Self, RuleError> {
                self.checked_mul(rhs).ok_or(RuleError::Overflow("*"))
            }

            fn div(self, rhs: Self) -> Result<Self, RuleError> {
                if rhs == 0 {
                    return Err(RuleError::DivisionByZero);
                }
                self.checked_div(rhs).ok_or(RuleError::Overflow("/"))
            }
        }
    };
}

integer_numeric!(isize, "int", to_int, float_to_isize);
integer_numeric!(i64, "int64", to_int64, float_to_i64);

impl Numeric for f64 {
    const NAME: &'static str = "float";
    const ZERO: Self = 0.0;
    const ONE: Self = 1.0;

    fn from_scalar(scalar: Scalar) -> Result<Self, RuleError> {
        Ok(scalar.to_float())
    }

    fn from_int_text(text: &str) -> Result<Self, RuleError> {
        parse_int_text(text).map(|i| i as f64)
    }

    fn from_float_text(text: &str) -> Result<Self, RuleError> {
        parse_float_text(text)
    }

    fn add(self, rhs: Self) -> Result<Self, RuleError> {
        Ok(self + rhs)
    }

    fn sub(self, rhs: Self) -> Result<Self, RuleError> {
        Ok(self - rhs)
    }

    fn mul(self, rhs: Self) -> Result<Self, RuleError> {
        Ok(self * rhs)
    }

    fn div(self, rhs: Self) -> Result<Self, RuleError> {
        Ok(self / rhs)
    }
}
