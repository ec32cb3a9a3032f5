//! String nodes.

use super::error::SchemaError;
use super::js;
use super::Schema;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

/// Constraints of a string node.
///
/// Checks run in a fixed order and the first failing one wins:
/// max, min, length, url, uuid, regex, includes, starts-with, ends-with.
/// Lengths count UTF-16 code units, which is what JSON clients report.
#[derive(Debug, Clone, Default)]
pub struct StringSchema {
    max: Option<usize>,
    min: Option<usize>,
    length: Option<usize>,
    url: bool,
    uuid: bool,
    regex: Option<Regex>,
    includes: Option<String>,
    starts_with: Option<String>,
    ends_with: Option<String>,
}

impl StringSchema {
    /// Rejects strings longer than `max`.
    #[must_use]
    pub fn max(mut self, max: usize) -> Self {
        self.max = Some(max);
        self
    }

    /// Rejects strings shorter than `min`.
    #[must_use]
    pub fn min(mut self, min: usize) -> Self {
        self.min = Some(min);
        self
    }

    /// Requires exactly `length` characters.
    #[must_use]
    pub fn length(mut self, length: usize) -> Self {
        self.length = Some(length);
        self
    }

    /// Requires an absolute URL.
    #[must_use]
    pub fn url(mut self) -> Self {
        self.url = true;
        self
    }

    /// Requires the `8-4-4-4-12` UUID layout.
    #[must_use]
    pub fn uuid(mut self) -> Self {
        self.uuid = true;
        self
    }

    /// Requires a match of `regex` somewhere in the string.
    ///
    /// The pattern is not anchored; add `^` and `$` to match the whole value.
    #[must_use]
    pub fn regex(mut self, regex: Regex) -> Self {
        self.regex = Some(regex);
        self
    }

    /// Requires `needle` to appear in the string.
    #[must_use]
    pub fn includes(mut self, needle: impl Into<String>) -> Self {
        self.includes = Some(needle.into());
        self
    }

    /// Requires the string to start with `prefix`.
    #[must_use]
    pub fn starts_with(mut self, prefix: impl Into<String>) -> Self {
        self.starts_with = Some(prefix.into());
        self
    }

    /// Requires the string to end with `suffix`.
    #[must_use]
    pub fn ends_with(mut self, suffix: impl Into<String>) -> Self {
        self.ends_with = Some(suffix.into());
        self
    }

    /// Marks the node optional.
    #[must_use]
    pub fn optional(self) -> Schema {
        Schema::from(self).optional()
    }

    pub(crate) fn max_len(&self) -> Option<usize> {
        self.max.or(self.length)
    }

    pub(crate) fn min_len(&self) -> Option<usize> {
        self.min.or(self.length)
    }

    pub(crate) fn pattern(&self) -> Option<&str> {
        self.regex.as_ref().map(Regex::as_str)
    }

    pub(crate) fn format(&self) -> Option<&'static str> {
        if self.uuid {
            Some("uuid")
        } else if self.url {
            Some("uri")
        } else {
            None
        }
    }

    pub(crate) fn check(&self, value: Option<&Value>) -> Option<SchemaError> {
        let Some(Value::String(s)) = value else {
            return Some(SchemaError::message(format!(
                "Expected a string, but found {}",
                js::type_name(value)
            )));
        };
        self.first_violation(s).map(SchemaError::message)
    }

    fn first_violation(&self, s: &str) -> Option<String> {
        let len = s.encode_utf16().count();

        if let Some(max) = self.max {
            if len > max {
                return Some(format!("Exceeded maximum allowed string length of {max}"));
            }
        }
        if let Some(min) = self.min {
            if len < min {
                return Some(format!("String length must be at least {min} characters"));
            }
        }
        if let Some(length) = self.length {
            if len != length {
                return Some(format!("String must be exactly {length} characters long"));
            }
        }
        if self.url && url::Url::parse(s).is_err() {
            return Some("Invalid URL format".to_string());
        }
        if self.uuid && !is_uuid_like(s) {
            return Some("Invalid UUID format".to_string());
        }
        if let Some(regex) = &self.regex {
            if !regex.is_match(s) {
                return Some("String does not match the required pattern".to_string());
            }
        }
        if let Some(needle) = &self.includes {
            if !s.contains(needle.as_str()) {
                return Some(format!("String must contain \"{needle}\""));
            }
        }
        if let Some(prefix) = &self.starts_with {
            if !s.starts_with(prefix.as_str()) {
                return Some(format!("String must start with \"{prefix}\""));
            }
        }
        if let Some(suffix) = &self.ends_with {
            if !s.ends_with(suffix.as_str()) {
                return Some(format!("String must end with \"{suffix}\""));
            }
        }
        None
    }
}

/// Word characters in groups of 8-4-4-4-12. Versions and variants are not
/// checked.
static UUID_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\w{8}-\w{4}-\w{4}-\w{4}-\w{12}$").expect("UUID pattern compiles")
});

fn is_uuid_like(s: &str) -> bool {
    UUID_PATTERN.is_match(s)
}

pub(crate) fn coerce(value: &Value) -> Value {
    Value::String(js::to_js_string(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema;
    use serde_json::json;

    fn message(schema: &Schema, value: Value) -> Option<String> {
        schema
            .validate(&value)
            .and_then(|e| e.as_message().map(str::to_string))
    }

    #[test]
    fn test_type_mismatch() {
        let s = schema::string().into();
        assert_eq!(
            message(&s, json!(1)).as_deref(),
            Some("Expected a string, but found number")
        );
        assert_eq!(
            message(&s, json!(null)).as_deref(),
            Some("Expected a string, but found object")
        );
        assert!(message(&s, json!("ok")).is_none());
    }

    #[test]
    fn test_length_constraints() {
        let s: Schema = schema::string().max(5).min(2).into();
        assert_eq!(
            message(&s, json!("abcdef")).as_deref(),
            Some("Exceeded maximum allowed string length of 5")
        );
        assert_eq!(
            message(&s, json!("a")).as_deref(),
            Some("String length must be at least 2 characters")
        );

        let exact: Schema = schema::string().length(3).into();
        assert_eq!(
            message(&exact, json!("ab")).as_deref(),
            Some("String must be exactly 3 characters long")
        );
        assert!(message(&exact, json!("abc")).is_none());
    }

    #[test]
    fn test_zero_max_is_enforced() {
        let s: Schema = schema::string().max(0).into();
        assert!(message(&s, json!("")).is_none());
        assert!(message(&s, json!("a")).is_some());
    }

    #[test]
    fn test_first_failing_constraint_wins() {
        let s: Schema = schema::string().max(3).starts_with("x").into();
        assert_eq!(
            message(&s, json!("abcdef")).as_deref(),
            Some("Exceeded maximum allowed string length of 3")
        );
        assert_eq!(
            message(&s, json!("abc")).as_deref(),
            Some("String must start with \"x\"")
        );
    }

    #[test]
    fn test_url_and_uuid() {
        let url: Schema = schema::string().url().into();
        assert!(message(&url, json!("https://example.com/a?b=c")).is_none());
        assert_eq!(
            message(&url, json!("example")).as_deref(),
            Some("Invalid URL format")
        );

        let uuid: Schema = schema::string().uuid().into();
        assert!(message(&uuid, json!("123e4567-e89b-12d3-a456-426614174000")).is_none());
        assert_eq!(
            message(&uuid, json!("123e4567e89b12d3a456426614174000")).as_deref(),
            Some("Invalid UUID format")
        );
    }

    #[test]
    fn test_uuid_check_is_loose() {
        let uuid: Schema = schema::string().uuid().into();
        assert!(message(&uuid, json!("zzzzzzzz-____-abcd-0000-xxxxxxxxxxxx")).is_none());
        assert!(message(&uuid, json!(" 123e4567-e89b-12d3-a456-426614174000")).is_some());
        assert!(message(&uuid, json!("123e4567-e89b-12d3-a456-4266141740001")).is_some());
    }

    #[test]
    fn test_regex_is_unanchored() {
        let s: Schema = schema::string()
            .regex(Regex::new("[0-9]+").unwrap())
            .into();
        assert!(message(&s, json!("abc123")).is_none());
        assert_eq!(
            message(&s, json!("abc")).as_deref(),
            Some("String does not match the required pattern")
        );
    }

    #[test]
    fn test_substring_constraints() {
        let s: Schema = schema::string()
            .includes("mid")
            .starts_with("pre")
            .ends_with("post")
            .into();
        assert!(message(&s, json!("pre-mid-post")).is_none());
        assert_eq!(
            message(&s, json!("pre-post")).as_deref(),
            Some("String must contain \"mid\"")
        );
        assert_eq!(
            message(&s, json!("pre-mid")).as_deref(),
            Some("String must end with \"post\"")
        );
    }

    #[test]
    fn test_length_counts_utf16_units() {
        let s: Schema = schema::string().max(2).into();
        assert!(message(&s, json!("é€")).is_none());
        assert!(message(&s, json!("😀😀")).is_some());
    }

    #[test]
    fn test_parse_coerces() {
        let s: Schema = schema::string().into();
        assert_eq!(s.parse(&json!(42)).unwrap(), json!("42"));
        assert_eq!(s.parse(&json!(true)).unwrap(), json!("true"));
        assert_eq!(s.parse(&json!([1, 2])).unwrap(), json!("1,2"));
        assert_eq!(s.parse(&json!({})).unwrap(), json!("[object Object]"));
    }

    #[test]
    fn test_parse_treats_falsy_as_missing() {
        let s: Schema = schema::string().into();
        for value in [json!(null), json!(""), json!(0), json!(false)] {
            assert_eq!(s.parse(&value).unwrap_err(), SchemaError::missing());
        }
    }

    #[test]
    fn test_parse_does_not_check_constraints() {
        let s: Schema = schema::string().max(1).into();
        assert_eq!(s.parse(&json!("long")).unwrap(), json!("long"));
    }
}
