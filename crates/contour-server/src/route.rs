//! The per-endpoint request pipeline.
//!
//! A [`Route`] runs one request through the fixed sequence
//! extract → parse → validate → middleware → handler → encode. The first
//! failing step ends the request with that step's error response.

use std::sync::Arc;

use contour_core::{Channel, ContourError, ContourResult, Endpoint, HandlerInput, Output};
use contour_extract::{ExtractedInput, ExtractionContext};
use contour_middleware::MiddlewareChain;
use serde_json::Value;

use crate::config::PipelineOptions;
use crate::encode::{encode_output, error_response, HttpResponse};

/// A registered endpoint together with its compiled middleware chain.
#[derive(Debug, Clone)]
pub struct Route {
    endpoint: Arc<Endpoint>,
    chain: MiddlewareChain,
}

impl Route {
    /// Creates a route for `endpoint`.
    #[must_use]
    pub fn new(endpoint: Arc<Endpoint>) -> Self {
        let chain = MiddlewareChain::from(endpoint.as_ref());
        Self { endpoint, chain }
    }

    /// Returns the endpoint.
    #[must_use]
    pub fn endpoint(&self) -> &Arc<Endpoint> {
        &self.endpoint
    }

    /// Returns `true` if responses may be sent as multipart.
    #[must_use]
    pub fn declares_files(&self) -> bool {
        self.endpoint
            .output_schemas()
            .and_then(|output| output.files_schema())
            .is_some()
    }

    /// Handles a request whose path already matched this route.
    pub async fn handle(&self, ctx: &ExtractionContext, options: &PipelineOptions) -> HttpResponse {
        let raw = ExtractedInput::extract(ctx, &options.multipart).await;

        let result = match self.run(raw).await {
            Ok(output) => encode_output(output, self.declares_files()),
            Err(error) => Err(error),
        };

        result.unwrap_or_else(|error| {
            tracing::debug!(
                method = %self.endpoint.method(),
                path = self.endpoint.path(),
                category = ?error.category(),
                %error,
                "request failed"
            );
            contour_telemetry::metrics::record_failure(error.category().as_str());
            error_response(&error, options)
        })
    }

    /// Runs every step after extraction and returns the handler's output.
    ///
    /// Channels are parsed in the order body, query, params, headers and
    /// then validated in the order body, query, params, headers, files.
    /// Validation checks the raw extracted values; the handler receives the
    /// parsed value of every channel that has a schema.
    ///
    /// # Errors
    ///
    /// Returns the error of the first failing step.
    pub async fn run(&self, raw: ExtractedInput) -> ContourResult<Output> {
        let endpoint = &self.endpoint;
        let schemas = endpoint.input_schemas();

        if schemas.is_none() && endpoint.output_schemas().is_none() {
            tracing::warn!(
                method = %endpoint.method(),
                path = endpoint.path(),
                "endpoint declares neither input nor output"
            );
            return Err(ContourError::MissingSchemas);
        }

        let mut parsed = Vec::new();
        if let Some(schemas) = schemas {
            for channel in Channel::PARSED {
                let Some(schema) = schemas.get(channel) else {
                    continue;
                };
                match schema.parse(&raw.channel_value(channel)) {
                    Ok(value) => parsed.push((channel, value)),
                    Err(error) => {
                        tracing::debug!(%channel, "channel failed to parse");
                        return Err(ContourError::input(channel, error));
                    }
                }
            }

            for channel in Channel::VALIDATED {
                let Some(schema) = schemas.get(channel) else {
                    continue;
                };
                let failure = match channel {
                    Channel::Files => schema.validate_files(&raw.files),
                    _ => schema.validate(&raw.channel_value(channel)),
                };
                if let Some(error) = failure {
                    tracing::debug!(%channel, "channel failed validation");
                    return Err(ContourError::input(channel, error));
                }
            }
        }

        let mut input = HandlerInput {
            body: raw.body,
            query: Value::Object(raw.query),
            params: Value::Object(raw.params),
            headers: Value::Object(raw.headers),
            files: raw.files,
            middleware: serde_json::Map::new(),
        };
        for (channel, value) in parsed {
            set_channel(&mut input, channel, value);
        }

        self.chain.run(&mut input).await?;

        let Some(handler) = endpoint.handler() else {
            tracing::warn!(
                method = %endpoint.method(),
                path = endpoint.path(),
                "endpoint has no handler"
            );
            return Err(ContourError::MissingHandler);
        };

        handler(input).await.map_err(ContourError::Handler)
    }
}

fn set_channel(input: &mut HandlerInput, channel: Channel, value: Value) {
    match channel {
        Channel::Body => input.body = value,
        Channel::Query => input.query = value,
        Channel::Params => input.params = value,
        Channel::Headers => input.headers = value,
        // Files are never parsed.
        Channel::Files => {}
    }
}
