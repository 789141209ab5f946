//! Building an [`Environment`] from structured host data.
//!
//! A host value is serialized with serde and walked recursively. Every
//! numeric leaf is bound under its dotted path, e.g. a `Sale` whose `shop`
//! field holds `{ "ShopID": 3 }` yields `sale.shop.ShopID = 3` for the
//! receiver name `sale`.

use log::trace;
use serde::Serialize;

use crate::RuleError;
use crate::evaluator::Environment;
use crate::value::Scalar;

impl Environment {
    /// Flatten any serializable value into a new environment rooted at `receiver`
    pub fn from_serialize<T: Serialize + ?Sized>(
        value: &T,
        receiver: &str,
    ) -> Result<Self, RuleError> {
        let json = serde_json::to_value(value)
            .map_err(|e| RuleError::Environment(format!("Cannot serialize value: {}", e)))?;

        let mut env = Environment::new();
        env.extend_from_json(receiver, &json);
        Ok(env)
    }

    /// Bind every numeric leaf of `json` under `prefix`.
    ///
    /// Integers become [`Scalar::Int64`] and other numbers [`Scalar::Float`].
    /// Objects are walked recursively; nulls, booleans, strings, arrays and
    /// integers that do not fit in an `i64` are skipped.
    ///
    /// `serde_json` keeps no record of the host's integer width, so every
    /// integer leaf is bound as [`Scalar::Int64`], including `i32` and
    /// `isize` fields; [`Scalar::Int`] never comes out of flattening. Bind a
    /// native integer with [`Environment::define`] when that kind matters.
    /// Non-finite floats serialize as `null` and are therefore skipped.
    pub fn extend_from_json(&mut self, prefix: &str, json: &serde_json::Value) {
        match json {
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    self.define(prefix, Scalar::Int64(i));
                } else if n.is_f64() {
                    if let Some(f) = n.as_f64() {
                        self.define(prefix, Scalar::Float(f));
                    }
                } else {
                    trace!("skipping {}: {} does not fit in an i64", prefix, n);
                }
            }
            serde_json::Value::Object(fields) => {
                for (name, field) in fields {
                    let path = if prefix.is_empty() {
                        name.clone()
                    } else {
                        format!("{}.{}", prefix, name)
                    };
                    self.extend_from_json(&path, field);
                }
            }
            other => trace!("skipping {}: unsupported value {}", prefix, other),
        }
    }
}
