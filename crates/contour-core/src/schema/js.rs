//! JavaScript-compatible value semantics.
//!
//! Error messages and coercions follow the conventions service authors see
//! from JSON clients: `typeof` names, truthiness and `String(value)`.

use serde_json::Value;

/// Returns the `typeof` name of a (possibly absent) JSON value.
pub(crate) fn type_name(value: Option<&Value>) -> &'static str {
    match value {
        None => "undefined",
        Some(Value::String(_)) => "string",
        Some(Value::Number(_)) => "number",
        Some(Value::Bool(_)) => "boolean",
        Some(Value::Null | Value::Array(_) | Value::Object(_)) => "object",
    }
}

/// `true` for an absent field or an explicit `null`.
pub(crate) fn is_absent(value: Option<&Value>) -> bool {
    matches!(value, None | Some(Value::Null))
}

/// `true` for values JavaScript treats as falsy.
pub(crate) fn is_falsy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::Bool(b)) => !b,
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Number(n)) => n.as_f64().map_or(false, |f| f == 0.0 || f.is_nan()),
        Some(Value::Array(_) | Value::Object(_)) => false,
    }
}

/// Formats a number the way JavaScript prints it (`5`, not `5.0`).
pub(crate) fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e21 {
        format!("{n:.0}")
    } else {
        n.to_string()
    }
}

/// `String(value)`.
pub(crate) fn to_js_string(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() => format_number(f),
            _ => n.to_string(),
        },
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => to_js_string(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

/// `Number(value)`, or `None` where JavaScript would produce `NaN`.
pub(crate) fn to_js_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Null => 0.0,
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => parse_numeric_str(s)?,
        Value::Array(items) => match items.as_slice() {
            [] => 0.0,
            [single] => to_js_number(single)?,
            _ => return None,
        },
        Value::Object(_) => return None,
    };
    n.is_finite().then_some(n)
}

fn parse_numeric_str(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }
    if let Some(hex) = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        return u64::from_str_radix(hex, 16).ok().map(|v| v as f64);
    }
    // Rust accepts "inf"/"nan" spellings that JavaScript rejects.
    if trimmed.chars().any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E') {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

/// Builds a JSON number, preferring an integer representation.
pub(crate) fn number_value(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
        Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n).map_or(Value::Null, Value::Number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_type_names() {
        assert_eq!(type_name(None), "undefined");
        assert_eq!(type_name(Some(&json!(null))), "object");
        assert_eq!(type_name(Some(&json!([1]))), "object");
        assert_eq!(type_name(Some(&json!(1.5))), "number");
        assert_eq!(type_name(Some(&json!(true))), "boolean");
    }

    #[test]
    fn test_falsy_values() {
        for value in [json!(null), json!(""), json!(0), json!(0.0), json!(false)] {
            assert!(is_falsy(Some(&value)), "{value} should be falsy");
        }
        for value in [json!("0"), json!(1), json!(true), json!([]), json!({})] {
            assert!(!is_falsy(Some(&value)), "{value} should be truthy");
        }
        assert!(is_falsy(None));
    }

    #[test]
    fn test_to_js_string() {
        assert_eq!(to_js_string(&json!(1337)), "1337");
        assert_eq!(to_js_string(&json!(2.0)), "2");
        assert_eq!(to_js_string(&json!(2.5)), "2.5");
        assert_eq!(to_js_string(&json!(true)), "true");
        assert_eq!(to_js_string(&json!([1, "a", null])), "1,a,");
        assert_eq!(to_js_string(&json!({ "a": 1 })), "[object Object]");
    }

    #[test]
    fn test_to_js_number() {
        assert_eq!(to_js_number(&json!("1337")), Some(1337.0));
        assert_eq!(to_js_number(&json!(" 4.5 ")), Some(4.5));
        assert_eq!(to_js_number(&json!("0x10")), Some(16.0));
        assert_eq!(to_js_number(&json!(true)), Some(1.0));
        assert_eq!(to_js_number(&json!(["7"])), Some(7.0));
        assert_eq!(to_js_number(&json!("abc")), None);
        assert_eq!(to_js_number(&json!("inf")), None);
        assert_eq!(to_js_number(&json!({})), None);
    }

    #[test]
    fn test_number_value_prefers_integers() {
        assert_eq!(number_value(5.0), json!(5));
        assert_eq!(number_value(5.25), json!(5.25));
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(10.0), "10");
        assert_eq!(format_number(0.5), "0.5");
        assert_eq!(format_number(-3.0), "-3");
    }
}
