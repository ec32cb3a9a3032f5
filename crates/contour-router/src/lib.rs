//! Ordered router and path matcher for Contour.
//!
//! Routes are checked in the order they were added and the first one whose
//! method and path both match wins. Path templates use `:name` placeholders:
//!
//! ```rust
//! use contour_router::{PathMatcher, Router};
//! use http::Method;
//!
//! let matcher = PathMatcher::new("/users/:id").unwrap();
//! assert_eq!(matcher.matches("/users/42").unwrap().get("id"), Some("42"));
//! assert!(matcher.matches("/users").is_none());
//!
//! let mut router = Router::new();
//! router.add(Method::GET, "/users/:id", "getUser").unwrap();
//! assert!(router.find(&Method::GET, "/posts").is_none());
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod matcher;
mod params;
mod router;

pub use error::{RouteError, RouteResult};
pub use matcher::PathMatcher;
pub use params::Params;
pub use router::{RouteMatch, Router};
