//! # Contour Middleware
//!
//! Runs an endpoint's middleware stages in declaration order between input
//! validation and the handler.
//!
//! Every stage either contributes a partial record, merged into
//! `HandlerInput::middleware` for the stages and handler that follow, or
//! rejects the request. A rejection ends the request with the stage's error
//! value sent back verbatim; a stage whose output does not match its
//! declared schema ends it with a configuration error.

#![doc(html_root_url = "https://docs.rs/contour-middleware/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod chain;

pub use chain::{BoxedMiddleware, MiddlewareChain};
