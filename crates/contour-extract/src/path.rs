//! Path parameter extraction.

use contour_router::Params;
use serde_json::{Map, Value};

/// Percent-decodes captured path parameters into a map of strings.
///
/// Invalid UTF-8 after decoding is replaced lossily.
///
/// # Example
///
/// ```rust
/// use contour_extract::params_map;
/// use contour_router::Params;
/// use serde_json::json;
///
/// let mut params = Params::new();
/// params.push("tag", "rust%20lang");
///
/// assert_eq!(params_map(&params)["tag"], json!("rust lang"));
/// ```
#[must_use]
pub fn params_map(params: &Params) -> Map<String, Value> {
    params
        .iter()
        .map(|(name, raw)| {
            let decoded = urlencoding::decode_binary(raw.as_bytes());
            let value = String::from_utf8_lossy(&decoded).into_owned();
            (name.to_string(), Value::String(value))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plain_values() {
        let mut params = Params::new();
        params.push("username", "Tarin");
        params.push("id", "42");
        let map = params_map(&params);
        assert_eq!(map["username"], json!("Tarin"));
        assert_eq!(map["id"], json!("42"));
    }

    #[test]
    fn test_decodes_utf8() {
        let mut params = Params::new();
        params.push("city", "M%C3%BCnchen");
        assert_eq!(params_map(&params)["city"], json!("München"));
    }

    #[test]
    fn test_plus_is_literal() {
        let mut params = Params::new();
        params.push("q", "a+b");
        assert_eq!(params_map(&params)["q"], json!("a+b"));
    }
}
