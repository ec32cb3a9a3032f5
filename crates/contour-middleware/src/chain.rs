//! Sequential middleware execution.

use contour_core::{ContourError, ContourResult, Endpoint, HandlerInput, Middleware};
use serde_json::Value;
use std::sync::Arc;

/// A type-erased middleware that can be stored in a vector.
pub type BoxedMiddleware = Arc<dyn Middleware>;

/// An ordered list of middleware stages.
///
/// Stages run one at a time in declaration order. Each stage sees the
/// request input plus the merged output of every stage before it; its own
/// output is merged key by key into `HandlerInput::middleware`, so a later
/// stage overrides a key set by an earlier one. The first failing stage
/// stops the chain.
///
/// # Example
///
/// ```rust
/// use contour_core::{FnMiddleware, HandlerInput};
/// use contour_middleware::MiddlewareChain;
/// use serde_json::{json, Map};
/// use std::sync::Arc;
///
/// # tokio_test::block_on(async {
/// let mut chain = MiddlewareChain::default();
/// chain.push(Arc::new(FnMiddleware::new("one", |_: &HandlerInput| async {
///     let mut out = Map::new();
///     out.insert("n".to_string(), json!(1));
///     Ok(out)
/// })));
/// chain.push(Arc::new(FnMiddleware::new("two", |input: &HandlerInput| {
///     let n = input.middleware_value("n").and_then(|v| v.as_i64()).unwrap_or(0);
///     async move {
///         let mut out = Map::new();
///         out.insert("n".to_string(), json!(n + 1));
///         Ok(out)
///     }
/// })));
///
/// let mut input = HandlerInput::default();
/// chain.run(&mut input).await.unwrap();
/// assert_eq!(input.middleware["n"], json!(2));
/// # });
/// ```
#[derive(Clone, Default)]
pub struct MiddlewareChain {
    stages: Vec<BoxedMiddleware>,
}

impl MiddlewareChain {
    /// Creates a chain from stages in execution order.
    #[must_use]
    pub fn new(stages: Vec<BoxedMiddleware>) -> Self {
        Self { stages }
    }

    /// Appends a stage.
    pub fn push(&mut self, stage: BoxedMiddleware) {
        self.stages.push(stage);
    }

    /// Returns the stage names in execution order.
    #[must_use]
    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|stage| stage.name()).collect()
    }

    /// Returns the number of stages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Returns `true` if the chain has no stages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Runs every stage against `input`, accumulating into
    /// `input.middleware`.
    ///
    /// # Errors
    ///
    /// Returns [`ContourError::Middleware`] carrying the failing stage's
    /// error value, or [`ContourError::MiddlewareOutput`] when a stage's
    /// output does not match its declared schema.
    pub async fn run(&self, input: &mut HandlerInput) -> ContourResult<()> {
        for stage in &self.stages {
            let name = stage.name();
            tracing::debug!(stage = name, "running middleware");

            let output = match stage.call(input).await {
                Ok(output) => output,
                Err(error) => {
                    tracing::debug!(stage = name, "middleware rejected the request");
                    return Err(ContourError::middleware(name, error));
                }
            };

            if let Some(schema) = stage.output_schema() {
                if let Some(error) = schema.validate(&Value::Object(output.clone())) {
                    tracing::warn!(stage = name, %error, "middleware output does not match its schema");
                    return Err(ContourError::MiddlewareOutput {
                        stage: name.to_string(),
                        error,
                    });
                }
            }

            input.middleware.extend(output);
        }
        Ok(())
    }
}

impl FromIterator<BoxedMiddleware> for MiddlewareChain {
    fn from_iter<I: IntoIterator<Item = BoxedMiddleware>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl From<&Endpoint> for MiddlewareChain {
    fn from(endpoint: &Endpoint) -> Self {
        Self::new(endpoint.middlewares().to_vec())
    }
}

impl std::fmt::Debug for MiddlewareChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MiddlewareChain")
            .field("stages", &self.stage_names())
            .finish()
    }
}
