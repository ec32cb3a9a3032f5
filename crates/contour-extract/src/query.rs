//! Query string extraction.

use serde_json::{Map, Value};

/// Decodes a query string into a map of strings.
///
/// When a key repeats, the first value wins. A query string that cannot be
/// decoded yields an empty map.
///
/// # Example
///
/// ```rust
/// use contour_extract::query_map;
/// use serde_json::json;
///
/// let query = query_map(Some("tag=a&tag=b&q=rust+lang"));
/// assert_eq!(query["tag"], json!("a"));
/// assert_eq!(query["q"], json!("rust lang"));
/// ```
#[must_use]
pub fn query_map(query: Option<&str>) -> Map<String, Value> {
    let mut map = Map::new();
    let Some(query) = query.filter(|q| !q.is_empty()) else {
        return map;
    };

    let pairs: Vec<(String, String)> = match serde_urlencoded::from_str(query) {
        Ok(pairs) => pairs,
        Err(error) => {
            tracing::debug!(%error, "discarding undecodable query string");
            return map;
        }
    };

    for (key, value) in pairs {
        map.entry(key).or_insert(Value::String(value));
    }
    map
}
