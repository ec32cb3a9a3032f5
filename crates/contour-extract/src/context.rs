//! The buffered request that extraction reads from.

use bytes::Bytes;
use contour_router::Params;
use http::{header, HeaderMap, Method, Request};

/// A matched request: its buffered form plus the captured path parameters.
///
/// # Example
///
/// ```rust
/// use bytes::Bytes;
/// use contour_extract::ExtractionContext;
/// use contour_router::Params;
/// use http::Request;
///
/// let mut params = Params::new();
/// params.push("id", "123");
///
/// let request = Request::get("/users/123?verbose=1").body(Bytes::new()).unwrap();
/// let ctx = ExtractionContext::new(request, params);
///
/// assert_eq!(ctx.path(), "/users/123");
/// assert_eq!(ctx.query_string(), Some("verbose=1"));
/// assert_eq!(ctx.params().get("id"), Some("123"));
/// ```
#[derive(Debug)]
pub struct ExtractionContext {
    request: Request<Bytes>,
    params: Params,
}

impl ExtractionContext {
    /// Pairs a request with the parameters its path matched.
    #[must_use]
    pub fn new(request: Request<Bytes>, params: Params) -> Self {
        Self { request, params }
    }

    /// Request method.
    #[must_use]
    pub fn method(&self) -> &Method {
        self.request.method()
    }

    /// Request path, without the query string.
    #[must_use]
    pub fn path(&self) -> &str {
        self.request.uri().path()
    }

    /// Raw query string, if the URI has one.
    #[must_use]
    pub fn query_string(&self) -> Option<&str> {
        self.request.uri().query()
    }

    /// Request headers as received.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        self.request.headers()
    }

    /// The `Content-Type` header. Non UTF-8 values read as absent.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
    }

    /// Buffered body.
    #[must_use]
    pub fn body(&self) -> &Bytes {
        self.request.body()
    }

    /// Path parameters captured by the router, still percent-encoded.
    #[must_use]
    pub fn params(&self) -> &Params {
        &self.params
    }
}
