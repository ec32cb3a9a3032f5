//! Request construction: headers, JSON, form and multipart bodies.

use std::sync::Arc;

use bytes::{BufMut, Bytes, BytesMut};
use contour_core::UploadedFile;
use contour_server::App;
use http::{header, HeaderMap, HeaderName, HeaderValue, Method, Request, Uri};
use serde::Serialize;

use crate::error::{TestError, TestResult};
use crate::response::TestResponse;

/// Boundary used for multipart request bodies.
pub const TEST_BOUNDARY: &str = "contour-test-boundary";

/// A fully built request.
#[derive(Debug, Clone)]
pub struct TestRequest {
    /// Request method.
    pub method: Method,
    /// Path and query.
    pub uri: Uri,
    /// Headers, including the multipart content type when parts were added.
    pub headers: HeaderMap,
    /// Encoded body; multipart parts are already serialised here.
    pub body: Bytes,
}

impl TestRequest {
    /// Starts a GET request that is not bound to any client.
    pub fn get(uri: impl AsRef<str>) -> TestRequestBuilder {
        TestRequestBuilder::new(Method::GET, uri)
    }

    /// Starts an unbound POST request.
    pub fn post(uri: impl AsRef<str>) -> TestRequestBuilder {
        TestRequestBuilder::new(Method::POST, uri)
    }

    /// Starts an unbound PUT request.
    pub fn put(uri: impl AsRef<str>) -> TestRequestBuilder {
        TestRequestBuilder::new(Method::PUT, uri)
    }

    /// Starts an unbound PATCH request.
    pub fn patch(uri: impl AsRef<str>) -> TestRequestBuilder {
        TestRequestBuilder::new(Method::PATCH, uri)
    }

    /// Starts an unbound DELETE request.
    pub fn delete(uri: impl AsRef<str>) -> TestRequestBuilder {
        TestRequestBuilder::new(Method::DELETE, uri)
    }

    /// The buffered form [`App::handle`] takes.
    pub fn into_http_request(self) -> Request<Bytes> {
        let (mut parts, ()) = Request::new(()).into_parts();
        parts.method = self.method;
        parts.uri = self.uri;
        parts.headers = self.headers;
        Request::from_parts(parts, self.body)
    }
}

#[derive(Debug, Clone)]
enum Part {
    Field { name: String, value: String },
    File { name: String, file: UploadedFile },
}

/// Builds a [`TestRequest`], and sends it when created from a
/// [`TestClient`](crate::TestClient).
///
/// Bad input such as an invalid header name does not panic here; the first
/// such error surfaces from [`build`](Self::build) or
/// [`try_send`](Self::try_send).
#[must_use]
#[derive(Debug)]
pub struct TestRequestBuilder {
    method: Method,
    uri: String,
    headers: HeaderMap,
    body: Option<Bytes>,
    parts: Vec<Part>,
    error: Option<TestError>,
    app: Option<Arc<App>>,
}

impl TestRequestBuilder {
    /// Starts an unbound request.
    pub fn new(method: Method, uri: impl AsRef<str>) -> Self {
        Self {
            method,
            uri: uri.as_ref().to_string(),
            headers: HeaderMap::new(),
            body: None,
            parts: Vec::new(),
            error: None,
            app: None,
        }
    }

    pub(crate) fn bind(mut self, app: Arc<App>) -> Self {
        self.app = Some(app);
        self
    }

    /// Sets a header, replacing earlier values of the same name.
    pub fn header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        let name = HeaderName::try_from(name.as_ref());
        let value = HeaderValue::try_from(value.as_ref());
        match (name, value) {
            (Ok(name), Ok(value)) => {
                self.headers.insert(name, value);
            }
            (Err(e), _) => self.fail(TestError::InvalidHeader(e.to_string())),
            (_, Err(e)) => self.fail(TestError::InvalidHeader(e.to_string())),
        }
        self
    }

    /// Appends a header value, keeping earlier values of the same name.
    pub fn append_header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        match (
            HeaderName::try_from(name.as_ref()),
            HeaderValue::try_from(value.as_ref()),
        ) {
            (Ok(name), Ok(value)) => {
                self.headers.append(name, value);
            }
            (Err(e), _) => self.fail(TestError::InvalidHeader(e.to_string())),
            (_, Err(e)) => self.fail(TestError::InvalidHeader(e.to_string())),
        }
        self
    }

    /// Sets the Content-Type header.
    pub fn content_type(self, content_type: impl AsRef<str>) -> Self {
        self.header(header::CONTENT_TYPE.as_str(), content_type)
    }

    /// Sets the Authorization header with a Bearer token.
    pub fn bearer_token(self, token: impl AsRef<str>) -> Self {
        self.header(
            header::AUTHORIZATION.as_str(),
            format!("Bearer {}", token.as_ref()),
        )
    }

    /// Sets the raw request body.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Sets the request body as JSON and the matching Content-Type.
    pub fn json<T: Serialize>(mut self, value: &T) -> Self {
        match serde_json::to_vec(value) {
            Ok(bytes) => self.body = Some(Bytes::from(bytes)),
            Err(e) => self.fail(e.into()),
        }
        self.content_type("application/json")
    }

    /// Sets the request body as form-urlencoded and the matching
    /// Content-Type.
    pub fn form<T: Serialize>(mut self, value: &T) -> Self {
        match serde_urlencoded::to_string(value) {
            Ok(encoded) => self.body = Some(Bytes::from(encoded)),
            Err(e) => self.fail(e.into()),
        }
        self.content_type("application/x-www-form-urlencoded")
    }

    /// Adds a multipart text part. Text parts arrive as string fields of
    /// the body.
    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts.push(Part::Field {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    /// Adds a multipart file part.
    pub fn file(mut self, name: impl Into<String>, file: UploadedFile) -> Self {
        self.parts.push(Part::File {
            name: name.into(),
            file,
        });
        self
    }

    /// Builds the test request.
    ///
    /// # Errors
    ///
    /// Returns the first error recorded while building, an invalid URI, or
    /// a request that mixes a body with multipart parts.
    pub fn build(mut self) -> TestResult<TestRequest> {
        if let Some(error) = self.error.take() {
            return Err(error);
        }

        let uri: Uri = self
            .uri
            .parse()
            .map_err(|e| TestError::RequestBuild(format!("Invalid URI: {e}")))?;

        let body = if self.parts.is_empty() {
            self.body.unwrap_or_default()
        } else {
            if self.body.is_some() {
                return Err(TestError::RequestBuild(
                    "a request cannot have both a body and multipart parts".to_string(),
                ));
            }
            let content_type = format!("multipart/form-data; boundary={TEST_BOUNDARY}");
            let value = HeaderValue::try_from(content_type)
                .map_err(|e| TestError::InvalidHeader(e.to_string()))?;
            self.headers.insert(header::CONTENT_TYPE, value);
            encode_parts(&self.parts)
        };

        Ok(TestRequest {
            method: self.method,
            uri,
            headers: self.headers,
            body,
        })
    }

    /// Runs the request through the bound app.
    ///
    /// # Panics
    ///
    /// Panics where [`try_send`](Self::try_send) would return an error.
    pub async fn send(self) -> TestResponse {
        match self.try_send().await {
            Ok(response) => response,
            Err(e) => panic!("cannot send test request: {e}"),
        }
    }

    /// Runs the request through the bound app.
    ///
    /// # Errors
    ///
    /// Fails when the request cannot be built or was not created by a
    /// [`TestClient`](crate::TestClient).
    pub async fn try_send(mut self) -> TestResult<TestResponse> {
        let app = self.app.take().ok_or_else(|| {
            TestError::RequestBuild("request is not bound to a TestClient".to_string())
        })?;
        let request = self.build()?.into_http_request();
        Ok(TestResponse::from_http(app.handle(request).await).await)
    }

    fn fail(&mut self, error: TestError) {
        self.error.get_or_insert(error);
    }
}

fn encode_parts(parts: &[Part]) -> Bytes {
    let mut out = BytesMut::new();
    for part in parts {
        out.put_slice(format!("--{TEST_BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Field { name, value } => {
                out.put_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
                out.put_slice(value.as_bytes());
            }
            Part::File { name, file } => {
                out.put_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{}\"\r\n\
                         Content-Type: {}\r\n\r\n",
                        file.filename(),
                        file.mimetype()
                    )
                    .as_bytes(),
                );
                out.put_slice(file.buffer());
            }
        }
        out.put_slice(b"\r\n");
    }
    out.put_slice(format!("--{TEST_BOUNDARY}--\r\n").as_bytes());
    out.freeze()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_request() {
        let request = TestRequest::get("/users?page=2").build().unwrap();
        assert_eq!(request.method, Method::GET);
        assert_eq!(request.uri.path(), "/users");
        assert_eq!(request.uri.query(), Some("page=2"));
        assert!(request.body.is_empty());
    }

    #[test]
    fn test_header_and_bearer_token() {
        let request = TestRequest::get("/users")
            .header("X-Trace", "abc")
            .bearer_token("my_token")
            .build()
            .unwrap();

        assert_eq!(request.headers.get("x-trace").unwrap(), "abc");
        assert_eq!(
            request.headers.get("Authorization").unwrap(),
            "Bearer my_token"
        );
    }

    #[test]
    fn test_append_header() {
        let request = TestRequest::get("/")
            .append_header("x-tag", "a")
            .append_header("x-tag", "b")
            .build()
            .unwrap();
        assert_eq!(request.headers.get_all("x-tag").iter().count(), 2);
    }

    #[test]
    fn test_invalid_header_reported_on_build() {
        let result = TestRequest::get("/").header("bad header", "x").build();
        assert!(matches!(result, Err(TestError::InvalidHeader(_))));
    }

    #[test]
    fn test_invalid_uri() {
        let result = TestRequest::get("/has space").build();
        assert!(matches!(result, Err(TestError::RequestBuild(_))));
    }

    #[test]
    fn test_json_body() {
        let request = TestRequest::post("/users")
            .json(&json!({"name": "Alice"}))
            .build()
            .unwrap();

        assert_eq!(
            request.headers.get("Content-Type").unwrap(),
            "application/json"
        );
        assert_eq!(request.body.as_ref(), b"{\"name\":\"Alice\"}");
    }

    #[test]
    fn test_form_body() {
        let request = TestRequest::post("/login")
            .form(&[("user", "ada lovelace"), ("remember", "yes")])
            .build()
            .unwrap();
        assert_eq!(request.body.as_ref(), b"user=ada+lovelace&remember=yes");
    }

    #[test]
    fn test_multipart_body() {
        let request = TestRequest::post("/upload")
            .field("caption", "hi")
            .file("avatar", UploadedFile::new("a.png", "image/png", Bytes::from_static(b"PNG")))
            .build()
            .unwrap();

        assert_eq!(
            request.headers.get("content-type").unwrap(),
            "multipart/form-data; boundary=contour-test-boundary"
        );
        let text = String::from_utf8(request.body.to_vec()).unwrap();
        assert_eq!(
            text,
            "--contour-test-boundary\r\n\
             Content-Disposition: form-data; name=\"caption\"\r\n\r\nhi\r\n\
             --contour-test-boundary\r\n\
             Content-Disposition: form-data; name=\"avatar\"; filename=\"a.png\"\r\n\
             Content-Type: image/png\r\n\r\nPNG\r\n\
             --contour-test-boundary--\r\n"
        );
    }

    #[test]
    fn test_body_and_parts_conflict() {
        let result = TestRequest::post("/upload").body("x").field("a", "b").build();
        assert!(matches!(result, Err(TestError::RequestBuild(_))));
    }

    #[tokio::test]
    async fn test_unbound_request_cannot_send() {
        let result = TestRequest::get("/").try_send().await;
        assert!(matches!(result, Err(TestError::RequestBuild(_))));
    }

    #[test]
    fn test_into_http_request() {
        let request = TestRequest::delete("/users/7")
            .header("X-Test", "value")
            .body("bye")
            .build()
            .unwrap()
            .into_http_request();

        assert_eq!(request.method(), Method::DELETE);
        assert_eq!(request.uri().path(), "/users/7");
        assert_eq!(request.headers().get("X-Test").unwrap(), "value");
        assert_eq!(request.body().as_ref(), b"bye");
    }
}
