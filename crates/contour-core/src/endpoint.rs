//! Endpoint declarations.
//!
//! An [`Endpoint`] is identified by its method and path template and owns
//! everything the pipeline needs: channel schemas, middleware stages and the
//! handler. It is assembled once at startup and shared read-only afterwards.
//!
//! # Example
//!
//! ```
//! use contour_core::{schema, Endpoint, InputSchemas, Output, OutputSchemas};
//! use serde_json::json;
//!
//! let hello = Endpoint::get("/:username")
//!     .input(InputSchemas::new().params(schema::object().field("username", schema::string())))
//!     .output(OutputSchemas::new().body(schema::object().field("message", schema::string())))
//!     .summary("Greets a user")
//!     .handle_sync(|input| {
//!         let name = input.param("username").unwrap_or_default();
//!         Ok(Output::json(json!({ "message": format!("Hello {name}") })))
//!     });
//!
//! assert_eq!(hello.method(), http::Method::GET);
//! assert_eq!(hello.path(), "/:username");
//! assert!(hello.handler().is_some());
//! ```

use crate::channel::{InputSchemas, OutputSchemas};
use crate::handler::{self, ErasedHandler, HandlerInput, HandlerResult};
use crate::middleware::Middleware;
use crate::schema::Schema;
use http::Method;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// A declared HTTP operation.
#[derive(Clone)]
pub struct Endpoint {
    method: Method,
    path: String,
    summary: Option<String>,
    input: Option<InputSchemas>,
    output: Option<OutputSchemas>,
    error: Option<Schema>,
    middlewares: Vec<Arc<dyn Middleware>>,
    handler: Option<ErasedHandler>,
}

macro_rules! method_constructors {
    ($($(#[$doc:meta])* $name:ident => $method:ident;)*) => {
        $(
            $(#[$doc])*
            #[must_use]
            pub fn $name(path: impl Into<String>) -> Self {
                Self::new(Method::$method, path)
            }
        )*
    };
}

impl Endpoint {
    /// Creates an endpoint for an arbitrary method.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            summary: None,
            input: None,
            output: None,
            error: None,
            middlewares: Vec::new(),
            handler: None,
        }
    }

    method_constructors! {
        /// Creates a `GET` endpoint.
        get => GET;
        /// Creates a `POST` endpoint.
        post => POST;
        /// Creates a `PUT` endpoint.
        put => PUT;
        /// Creates a `PATCH` endpoint.
        patch => PATCH;
        /// Creates a `DELETE` endpoint.
        delete => DELETE;
        /// Creates a `HEAD` endpoint.
        head => HEAD;
        /// Creates an `OPTIONS` endpoint.
        options => OPTIONS;
        /// Creates a `TRACE` endpoint.
        trace => TRACE;
    }

    /// Declares the input channel schemas.
    #[must_use]
    pub fn input(mut self, input: InputSchemas) -> Self {
        self.input = Some(input);
        self
    }

    /// Declares the output channel schemas.
    #[must_use]
    pub fn output(mut self, output: OutputSchemas) -> Self {
        self.output = Some(output);
        self
    }

    /// Declares the schema of the handler's error value.
    #[must_use]
    pub fn error(mut self, schema: impl Into<Schema>) -> Self {
        self.error = Some(schema.into());
        self
    }

    /// Sets a one-line summary for documentation.
    #[must_use]
    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    /// Appends a middleware stage. Stages run in the order they are added.
    #[must_use]
    pub fn middleware(mut self, stage: impl Middleware) -> Self {
        self.middlewares.push(Arc::new(stage));
        self
    }

    /// Sets an async handler, replacing any earlier one.
    #[must_use]
    pub fn handle<F, Fut>(mut self, handler: F) -> Self
    where
        F: Fn(HandlerInput) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        self.handler = Some(handler::erase(handler));
        self
    }

    /// Sets a synchronous handler, replacing any earlier one.
    #[must_use]
    pub fn handle_sync<F>(mut self, handler: F) -> Self
    where
        F: Fn(HandlerInput) -> HandlerResult + Send + Sync + 'static,
    {
        self.handler = Some(handler::erase_sync(handler));
        self
    }

    /// Returns the HTTP method.
    #[must_use]
    pub fn method(&self) -> Method {
        self.method.clone()
    }

    /// Returns the path template, e.g. `/users/:id`.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the summary.
    #[must_use]
    pub fn summary_text(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    /// Returns the input schemas.
    #[must_use]
    pub fn input_schemas(&self) -> Option<&InputSchemas> {
        self.input.as_ref()
    }

    /// Returns the output schemas.
    #[must_use]
    pub fn output_schemas(&self) -> Option<&OutputSchemas> {
        self.output.as_ref()
    }

    /// Returns the error schema.
    #[must_use]
    pub fn error_schema(&self) -> Option<&Schema> {
        self.error.as_ref()
    }

    /// Returns the middleware stages in execution order.
    #[must_use]
    pub fn middlewares(&self) -> &[Arc<dyn Middleware>] {
        &self.middlewares
    }

    /// Returns the handler.
    #[must_use]
    pub fn handler(&self) -> Option<&ErasedHandler> {
        self.handler.as_ref()
    }
}

impl fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stages: Vec<&str> = self.middlewares.iter().map(|m| m.name()).collect();
        f.debug_struct("Endpoint")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("input", &self.input.is_some())
            .field("output", &self.output.is_some())
            .field("middlewares", &stages)
            .field("handler", &self.handler.is_some())
            .finish()
    }
}
