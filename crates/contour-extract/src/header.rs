//! Header extraction.

use http::HeaderMap;
use serde_json::{Map, Value};

/// Converts request headers into a JSON map keyed by lowercase name.
///
/// A header sent once maps to a string, a repeated header to an array of
/// strings in the order received. Values that are not valid UTF-8 are
/// dropped.
///
/// # Example
///
/// ```rust
/// use contour_extract::header_map;
/// use http::HeaderMap;
/// use serde_json::json;
///
/// let mut headers = HeaderMap::new();
/// headers.insert("x-api-key", "secret".parse().unwrap());
/// headers.append("accept", "text/html".parse().unwrap());
/// headers.append("accept", "application/json".parse().unwrap());
///
/// let map = header_map(&headers);
/// assert_eq!(map["x-api-key"], json!("secret"));
/// assert_eq!(map["accept"], json!(["text/html", "application/json"]));
/// ```
#[must_use]
pub fn header_map(headers: &HeaderMap) -> Map<String, Value> {
    let mut map = Map::new();
    for name in headers.keys() {
        let values: Vec<Value> = headers
            .get_all(name)
            .iter()
            .filter_map(|value| match value.to_str() {
                Ok(value) => Some(Value::String(value.to_string())),
                Err(_) => {
                    tracing::debug!(header = %name, "dropping non UTF-8 header value");
                    None
                }
            })
            .collect();

        let value = match values.len() {
            0 => continue,
            1 => values.into_iter().next().unwrap_or(Value::Null),
            _ => Value::Array(values),
        };
        map.insert(name.as_str().to_string(), value);
    }
    map
}
