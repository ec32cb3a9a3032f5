//! Endpoint registry and request dispatch.

use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use contour_core::{ContourError, Endpoint};
use contour_extract::ExtractionContext;
use contour_router::Router;
use http::Request;

use crate::config::PipelineOptions;
use crate::encode::{error_response, HttpResponse};
use crate::error::ServerResult;
use crate::route::Route;

/// A set of endpoints that can answer buffered requests.
///
/// Routes are matched in registration order; the first endpoint whose
/// method and path template match handles the request. Requests that match
/// nothing get a 404 envelope.
///
/// # Example
///
/// ```rust
/// use bytes::Bytes;
/// use contour_core::{schema, Endpoint, InputSchemas, Output};
/// use contour_server::App;
/// use http::{Request, StatusCode};
/// use serde_json::json;
///
/// # tokio_test::block_on(async {
/// let mut app = App::new();
/// app.add(
///     Endpoint::get("/:username")
///         .input(InputSchemas::new().params(schema::object().field("username", schema::string())))
///         .handle_sync(|input| {
///             let name = input.param("username").unwrap_or_default();
///             Ok(Output::json(json!({ "message": format!("Hello {name}") })))
///         }),
/// )
/// .unwrap();
///
/// let request = Request::get("/Tarin").body(Bytes::new()).unwrap();
/// let response = app.handle(request).await;
/// assert_eq!(response.status(), StatusCode::OK);
/// # });
/// ```
#[derive(Debug, Clone, Default)]
pub struct App {
    router: Router<Route>,
    options: PipelineOptions,
}

impl App {
    /// Creates an app with no endpoints and default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an endpoint.
    ///
    /// # Errors
    ///
    /// Fails if the endpoint's path template is invalid.
    pub fn add(&mut self, endpoint: impl Into<Arc<Endpoint>>) -> ServerResult<()> {
        let endpoint = endpoint.into();
        let method = endpoint.method();
        let path = endpoint.path().to_string();
        self.router.add(method.clone(), &path, Route::new(endpoint))?;
        tracing::debug!(%method, %path, "registered endpoint");
        Ok(())
    }

    /// Registers an endpoint, builder style.
    ///
    /// # Errors
    ///
    /// Fails if the endpoint's path template is invalid.
    pub fn with_endpoint(mut self, endpoint: impl Into<Arc<Endpoint>>) -> ServerResult<Self> {
        self.add(endpoint)?;
        Ok(self)
    }

    /// Returns the registered endpoints in registration order.
    #[must_use]
    pub fn endpoints(&self) -> Vec<Arc<Endpoint>> {
        self.router
            .values()
            .map(|route| Arc::clone(route.endpoint()))
            .collect()
    }

    /// Returns the number of registered endpoints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.router.len()
    }

    /// Returns `true` if no endpoints are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.router.is_empty()
    }

    /// Returns the pipeline options.
    #[must_use]
    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Replaces the pipeline options.
    pub fn set_options(&mut self, options: PipelineOptions) {
        self.options = options;
    }

    /// Sets the pipeline options, builder style.
    #[must_use]
    pub fn with_options(mut self, options: PipelineOptions) -> Self {
        self.options = options;
        self
    }

    /// Dispatches one fully buffered request.
    pub async fn handle(&self, request: Request<Bytes>) -> HttpResponse {
        let start = Instant::now();
        let (parts, body) = request.into_parts();
        let method = parts.method.clone();

        tracing::debug!(%method, path = parts.uri.path(), "dispatching request");

        let found = self.router.find(&method, parts.uri.path());
        let response = match found {
            Some(matched) => {
                let ctx = ExtractionContext::new(Request::from_parts(parts, body), matched.params);
                matched.value.handle(&ctx, &self.options).await
            }
            None => {
                tracing::debug!(%method, path = parts.uri.path(), "no route matched");
                let error = ContourError::NotFound;
                contour_telemetry::metrics::record_failure(error.category().as_str());
                error_response(&error, &self.options)
            }
        };

        contour_telemetry::metrics::record_request(
            method.as_str(),
            response.status().as_u16(),
            start.elapsed(),
        );
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contour_core::{schema, OutputSchemas, Output};
    use http::StatusCode;
    use http_body_util::BodyExt;
    use serde_json::{json, Value};

    fn ping(path: &str, reply: &'static str) -> Endpoint {
        Endpoint::get(path)
            .output(OutputSchemas::new().body(schema::object()))
            .handle_sync(move |_| Ok(Output::json(json!({ "reply": reply }))))
    }

    async fn json_body(response: HttpResponse) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_not_found() {
        let app = App::new();
        let request = Request::get("/missing").body(Bytes::new()).unwrap();
        let response = app.handle(request).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            json_body(response).await,
            json!({ "status": "error", "message": "Path Not Found" })
        );
    }

    #[tokio::test]
    async fn test_first_registered_route_wins() {
        let app = App::new()
            .with_endpoint(ping("/users/me", "me"))
            .unwrap()
            .with_endpoint(ping("/users/:id", "user"))
            .unwrap();

        let response = app
            .handle(Request::get("/users/me").body(Bytes::new()).unwrap())
            .await;
        assert_eq!(json_body(response).await, json!({ "reply": "me" }));

        let response = app
            .handle(Request::get("/users/7/").body(Bytes::new()).unwrap())
            .await;
        assert_eq!(json_body(response).await, json!({ "reply": "user" }));
    }

    #[tokio::test]
    async fn test_method_must_match() {
        let app = App::new().with_endpoint(ping("/ping", "pong")).unwrap();
        let response = app
            .handle(Request::post("/ping").body(Bytes::new()).unwrap())
            .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_invalid_template_rejected() {
        let mut app = App::new();
        assert!(app.add(ping("users", "x")).is_err());
        assert!(app.is_empty());
    }

    #[test]
    fn test_endpoints_in_order() {
        let app = App::new()
            .with_endpoint(ping("/a", "a"))
            .unwrap()
            .with_endpoint(ping("/b", "b"))
            .unwrap();
        let paths: Vec<String> = app
            .endpoints()
            .iter()
            .map(|endpoint| endpoint.path().to_string())
            .collect();
        assert_eq!(paths, ["/a", "/b"]);
        assert_eq!(app.len(), 2);
    }
}
