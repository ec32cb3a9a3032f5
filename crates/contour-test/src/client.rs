//! In-memory client.

use std::sync::Arc;

use contour_server::App;
use http::Method;

use crate::request::{TestRequest, TestRequestBuilder};
use crate::response::TestResponse;

/// Drives an [`App`] without binding a socket.
///
/// Requests go through routing, extraction, validation, middleware, the
/// handler and the encoder exactly as they would behind the server.
///
/// # Example
///
/// ```rust
/// use contour_core::{schema, Endpoint, InputSchemas, Output};
/// use contour_server::App;
/// use contour_test::TestClient;
/// use serde_json::json;
///
/// # tokio_test::block_on(async {
/// let app = App::new()
///     .with_endpoint(
///         Endpoint::get("/:username")
///             .input(InputSchemas::new().params(schema::object().field("username", schema::string())))
///             .handle_sync(|input| {
///                 let name = input.param("username").unwrap_or_default();
///                 Ok(Output::json(json!({ "message": format!("Hello {name}") })))
///             }),
///     )
///     .unwrap();
///
/// let client = TestClient::new(app);
/// let response = client.get("/Tarin").send().await;
/// response.assert_json(&json!({ "message": "Hello Tarin" }));
/// # });
/// ```
#[must_use]
#[derive(Debug, Clone)]
pub struct TestClient {
    app: Arc<App>,
    default_headers: Vec<(String, String)>,
}

impl TestClient {
    /// Wraps `app`.
    pub fn new(app: impl Into<Arc<App>>) -> Self {
        Self {
            app: app.into(),
            default_headers: Vec::new(),
        }
    }

    /// Sends `name: value` with every request. Per-request headers of the
    /// same name replace it.
    pub fn with_default_header(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.default_headers.push((name.into(), value.into()));
        self
    }

    /// The app under test.
    #[must_use]
    pub fn app(&self) -> &App {
        &self.app
    }

    /// Starts a request with any method.
    pub fn request(&self, method: Method, uri: impl AsRef<str>) -> TestRequestBuilder {
        self.default_headers.iter().fold(
            TestRequestBuilder::new(method, uri).bind(Arc::clone(&self.app)),
            |builder, (name, value)| builder.header(name, value),
        )
    }

    /// Starts a GET request.
    pub fn get(&self, uri: impl AsRef<str>) -> TestRequestBuilder {
        self.request(Method::GET, uri)
    }

    /// Starts a POST request.
    pub fn post(&self, uri: impl AsRef<str>) -> TestRequestBuilder {
        self.request(Method::POST, uri)
    }

    /// Starts a PUT request.
    pub fn put(&self, uri: impl AsRef<str>) -> TestRequestBuilder {
        self.request(Method::PUT, uri)
    }

    /// Starts a PATCH request.
    pub fn patch(&self, uri: impl AsRef<str>) -> TestRequestBuilder {
        self.request(Method::PATCH, uri)
    }

    /// Starts a DELETE request.
    pub fn delete(&self, uri: impl AsRef<str>) -> TestRequestBuilder {
        self.request(Method::DELETE, uri)
    }

    /// Sends a request built elsewhere, ignoring the default headers.
    pub async fn execute(&self, request: TestRequest) -> TestResponse {
        let response = self.app.handle(request.into_http_request()).await;
        TestResponse::from_http(response).await
    }
}
