//! Ordered first-match router.

use http::Method;

use crate::error::RouteResult;
use crate::matcher::PathMatcher;
use crate::params::Params;

/// A route match: the registered value plus the captured parameters.
#[derive(Debug, PartialEq, Eq)]
pub struct RouteMatch<'a, T> {
    /// The value registered for the route.
    pub value: &'a T,
    /// Captured path parameters.
    pub params: Params,
}

#[derive(Debug, Clone)]
struct Entry<T> {
    method: Method,
    matcher: PathMatcher,
    value: T,
}

/// Routes in registration order.
///
/// [`find`](Router::find) returns the **first** route whose method and path
/// both match, so more specific routes must be added before general ones
/// that would shadow them.
///
/// # Example
///
/// ```rust
/// use contour_router::Router;
/// use http::Method;
///
/// let mut router = Router::new();
/// router.add(Method::GET, "/users/me", "me").unwrap();
/// router.add(Method::GET, "/users/:id", "user").unwrap();
///
/// let found = router.find(&Method::GET, "/users/me").unwrap();
/// assert_eq!(*found.value, "me");
///
/// let found = router.find(&Method::GET, "/users/42").unwrap();
/// assert_eq!(*found.value, "user");
/// assert_eq!(found.params.get("id"), Some("42"));
///
/// assert!(router.find(&Method::POST, "/users/42").is_none());
/// ```
#[derive(Debug, Clone)]
pub struct Router<T> {
    entries: Vec<Entry<T>>,
}

impl<T> Default for Router<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Router<T> {
    /// Creates an empty router.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Appends a route.
    ///
    /// # Errors
    ///
    /// Fails if `template` is not a valid path template.
    pub fn add(&mut self, method: Method, template: &str, value: T) -> RouteResult<()> {
        let matcher = PathMatcher::new(template)?;
        self.entries.push(Entry {
            method,
            matcher,
            value,
        });
        Ok(())
    }

    /// Finds the first route matching `method` (ASCII case-insensitively)
    /// and `path`.
    #[must_use]
    pub fn find(&self, method: &Method, path: &str) -> Option<RouteMatch<'_, T>> {
        self.entries
            .iter()
            .filter(|entry| entry.method.as_str().eq_ignore_ascii_case(method.as_str()))
            .find_map(|entry| {
                entry.matcher.matches(path).map(|params| RouteMatch {
                    value: &entry.value,
                    params,
                })
            })
    }

    /// Iterates over registered values in registration order.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().map(|entry| &entry.value)
    }

    /// Iterates over `(method, template)` pairs in registration order.
    pub fn routes(&self) -> impl Iterator<Item = (&Method, &str)> {
        self.entries
            .iter()
            .map(|entry| (&entry.method, entry.matcher.template()))
    }

    /// Returns the number of routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no routes are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
