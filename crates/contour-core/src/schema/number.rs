//! Number nodes.

use super::error::SchemaError;
use super::js::{self, format_number};
use super::Schema;
use serde_json::Value;

/// Constraints of a number node.
///
/// Every bound that was set is enforced, including bounds of zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NumberSchema {
    pub(crate) gt: Option<f64>,
    pub(crate) gte: Option<f64>,
    pub(crate) lt: Option<f64>,
    pub(crate) lte: Option<f64>,
    pub(crate) integer: bool,
    positive: bool,
    nonnegative: bool,
    negative: bool,
    nonpositive: bool,
    pub(crate) multiple_of: Option<f64>,
}

impl NumberSchema {
    /// Requires a value strictly greater than `bound`.
    #[must_use]
    pub fn gt(mut self, bound: f64) -> Self {
        self.gt = Some(bound);
        self
    }

    /// Requires a value greater than or equal to `bound`.
    #[must_use]
    pub fn gte(mut self, bound: f64) -> Self {
        self.gte = Some(bound);
        self
    }

    /// Requires a value strictly less than `bound`.
    #[must_use]
    pub fn lt(mut self, bound: f64) -> Self {
        self.lt = Some(bound);
        self
    }

    /// Requires a value less than or equal to `bound`.
    #[must_use]
    pub fn lte(mut self, bound: f64) -> Self {
        self.lte = Some(bound);
        self
    }

    /// Requires a whole number.
    #[must_use]
    pub fn integer(mut self) -> Self {
        self.integer = true;
        self
    }

    /// Requires a value above zero.
    #[must_use]
    pub fn positive(mut self) -> Self {
        self.positive = true;
        self
    }

    /// Requires a value of zero or more.
    #[must_use]
    pub fn nonnegative(mut self) -> Self {
        self.nonnegative = true;
        self
    }

    /// Requires a value below zero.
    #[must_use]
    pub fn negative(mut self) -> Self {
        self.negative = true;
        self
    }

    /// Requires a value of zero or less.
    #[must_use]
    pub fn nonpositive(mut self) -> Self {
        self.nonpositive = true;
        self
    }

    /// Requires an exact multiple of `step`. A zero or NaN step sets no
    /// constraint.
    #[must_use]
    pub fn multiple_of(mut self, step: f64) -> Self {
        self.multiple_of = Some(step).filter(|step| *step != 0.0 && !step.is_nan());
        self
    }

    /// Marks the node optional.
    #[must_use]
    pub fn optional(self) -> Schema {
        Schema::from(self).optional()
    }

    /// Lower bound implied by the sign constraints, as `(bound, exclusive)`.
    pub(crate) fn sign_minimum(&self) -> Option<(f64, bool)> {
        if self.positive {
            Some((0.0, true))
        } else if self.nonnegative {
            Some((0.0, false))
        } else {
            None
        }
    }

    /// Upper bound implied by the sign constraints, as `(bound, exclusive)`.
    pub(crate) fn sign_maximum(&self) -> Option<(f64, bool)> {
        if self.negative {
            Some((0.0, true))
        } else if self.nonpositive {
            Some((0.0, false))
        } else {
            None
        }
    }

    pub(crate) fn check(&self, value: Option<&Value>) -> Option<SchemaError> {
        let n = match value {
            Some(Value::Number(n)) => n.as_f64(),
            _ => None,
        };
        let Some(n) = n else {
            return Some(SchemaError::message(format!(
                "Expected a number, but found {}",
                js::type_name(value)
            )));
        };
        self.first_violation(n).map(SchemaError::message)
    }

    fn first_violation(&self, n: f64) -> Option<String> {
        if let Some(bound) = self.gt {
            if n <= bound {
                return Some(format!(
                    "Expected a number greater than {}.",
                    format_number(bound)
                ));
            }
        }
        if let Some(bound) = self.gte {
            if n < bound {
                return Some(format!(
                    "Expected a number greater than or equal to {}.",
                    format_number(bound)
                ));
            }
        }
        if let Some(bound) = self.lt {
            if n >= bound {
                return Some(format!(
                    "Expected a number less than {}.",
                    format_number(bound)
                ));
            }
        }
        if let Some(bound) = self.lte {
            if n > bound {
                return Some(format!(
                    "Expected a number less than or equal to {}.",
                    format_number(bound)
                ));
            }
        }
        if self.integer && n.floor() != n {
            return Some("Expected an integer.".to_string());
        }
        if self.positive && n <= 0.0 {
            return Some("Expected a positive number.".to_string());
        }
        if self.nonnegative && n < 0.0 {
            return Some(
                "Expected a non-negative number (greater than or equal to 0).".to_string(),
            );
        }
        if self.negative && n >= 0.0 {
            return Some("Expected a negative number.".to_string());
        }
        if self.nonpositive && n > 0.0 {
            return Some("Expected a non-positive number (less than or equal to 0).".to_string());
        }
        if let Some(step) = self.multiple_of {
            if n % step != 0.0 {
                return Some(format!(
                    "Expected a number that is a multiple of {}.",
                    format_number(step)
                ));
            }
        }
        None
    }
}

pub(crate) fn coerce(value: &Value) -> Result<Value, SchemaError> {
    js::to_js_number(value).map(js::number_value).ok_or_else(|| {
        SchemaError::message(format!(
            "Expected a numeric value, but found {}",
            js::type_name(Some(value))
        ))
    })
}
