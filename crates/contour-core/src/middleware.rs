//! Middleware stage contract.
//!
//! A stage runs after input validation and before the handler. It sees the
//! request input plus everything earlier stages produced, and either
//! contributes a partial record or rejects the request with an error value
//! that is sent back verbatim with status 400.
//!
//! # Example
//!
//! ```
//! use contour_core::{middleware::FnMiddleware, schema, HandlerInput};
//! use serde_json::{json, Map};
//!
//! let auth = FnMiddleware::new("auth", |input: &HandlerInput| {
//!     let token = input.header("authorization").map(str::to_string);
//!     async move {
//!         let token = token.ok_or_else(|| json!({ "reason": "missing token" }))?;
//!         let mut out = Map::new();
//!         out.insert("user".to_string(), json!(token.trim_start_matches("Bearer ")));
//!         Ok(out)
//!     }
//! })
//! .output(schema::object().field("user", schema::string()));
//! ```

use crate::handler::{BoxFuture, HandlerInput};
use crate::schema::Schema;
use serde_json::{Map, Value};
use std::future::Future;

/// Outcome of a middleware stage.
pub type MiddlewareResult = Result<Map<String, Value>, Value>;

/// A named, fallible pre-handler stage.
pub trait Middleware: Send + Sync + 'static {
    /// Returns the stage name, used in logs and errors.
    fn name(&self) -> &str;

    /// Returns the schema the stage's output is checked against, if any.
    fn output_schema(&self) -> Option<&Schema> {
        None
    }

    /// Runs the stage.
    fn call<'a>(&'a self, input: &'a HandlerInput) -> BoxFuture<'a, MiddlewareResult>;
}

/// A middleware stage built from a function.
///
/// The function receives the input by reference and returns a future that
/// owns whatever it needs from it.
pub struct FnMiddleware<F> {
    name: String,
    output: Option<Schema>,
    func: F,
}

impl<F> FnMiddleware<F> {
    /// Creates a stage named `name`.
    pub fn new<Fut>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&HandlerInput) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = MiddlewareResult> + Send + 'static,
    {
        Self {
            name: name.into(),
            output: None,
            func,
        }
    }

    /// Declares the schema of the stage's output.
    #[must_use]
    pub fn output(mut self, schema: impl Into<Schema>) -> Self {
        self.output = Some(schema.into());
        self
    }
}

impl<F, Fut> Middleware for FnMiddleware<F>
where
    F: Fn(&HandlerInput) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = MiddlewareResult> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn output_schema(&self) -> Option<&Schema> {
        self.output.as_ref()
    }

    fn call<'a>(&'a self, input: &'a HandlerInput) -> BoxFuture<'a, MiddlewareResult> {
        Box::pin((self.func)(input))
    }
}

impl<F> std::fmt::Debug for FnMiddleware<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnMiddleware")
            .field("name", &self.name)
            .field("output", &self.output)
            .finish_non_exhaustive()
    }
}
