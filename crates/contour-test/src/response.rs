//! Test response wrapper.

use bytes::Bytes;
use contour_extract::{decode_multipart, MultipartConfig, MultipartData};
use contour_server::HttpResponse;
use http::{header, HeaderMap, HeaderValue, StatusCode};
use http_body_util::BodyExt;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{TestError, TestResult};

/// A buffered response with helpers for assertions.
#[derive(Debug, Clone)]
pub struct TestResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl TestResponse {
    /// Buffers an app response.
    pub async fn from_http(response: HttpResponse) -> Self {
        let (parts, body) = response.into_parts();
        // `Full` bodies cannot fail.
        let body = match body.collect().await {
            Ok(collected) => collected.to_bytes(),
            Err(never) => match never {},
        };

        Self {
            status: parts.status,
            headers: parts.headers,
            body,
        }
    }

    /// Creates a test response from raw parts.
    pub fn new(status: StatusCode, headers: HeaderMap, body: Bytes) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Returns the status code.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the status code as a u16.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        self.status.as_u16()
    }

    /// Returns a reference to the headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Gets a header value by name.
    #[must_use]
    pub fn header(&self, name: impl AsRef<str>) -> Option<&HeaderValue> {
        self.headers.get(name.as_ref())
    }

    /// Gets a header value as a string.
    #[must_use]
    pub fn header_str(&self, name: impl AsRef<str>) -> Option<&str> {
        self.header(name).and_then(|v| v.to_str().ok())
    }

    /// Gets every value of a repeated header.
    #[must_use]
    pub fn header_all(&self, name: impl AsRef<str>) -> Vec<&str> {
        self.headers
            .get_all(name.as_ref())
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect()
    }

    /// Returns the Content-Type header value.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.header_str(header::CONTENT_TYPE.as_str())
    }

    /// Returns `true` for `multipart/form-data` responses.
    #[must_use]
    pub fn is_multipart(&self) -> bool {
        self.content_type()
            .is_some_and(|ct| ct.starts_with("multipart/form-data"))
    }

    /// Returns the raw body bytes.
    #[must_use]
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Returns the body as a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not valid UTF-8.
    pub fn text(&self) -> TestResult<String> {
        String::from_utf8(self.body.to_vec())
            .map_err(|e| TestError::BodyRead(format!("Invalid UTF-8: {e}")))
    }

    /// Deserializes the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not valid JSON for `T`.
    pub fn json<T: DeserializeOwned>(&self) -> TestResult<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Deserializes the body as a JSON value.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not valid JSON.
    pub fn json_value(&self) -> TestResult<Value> {
        self.json()
    }

    /// Decodes a multipart body into its text and file parts.
    ///
    /// # Errors
    ///
    /// Returns an error if the response is not multipart.
    pub async fn multipart(&self) -> TestResult<MultipartData> {
        let content_type = self
            .content_type()
            .filter(|_| self.is_multipart())
            .ok_or_else(|| TestError::BodyRead("response is not multipart".to_string()))?;
        Ok(decode_multipart(content_type, self.body.clone(), &MultipartConfig::default()).await)
    }

    /// Decodes the JSON `data` part of a multipart body.
    ///
    /// # Errors
    ///
    /// Returns an error if the response is not multipart, has no `data`
    /// part, or the part is not JSON.
    pub async fn multipart_json(&self) -> TestResult<Value> {
        let data = self.multipart().await?;
        let part = data
            .fields
            .get("data")
            .and_then(Value::as_str)
            .ok_or_else(|| TestError::BodyRead("multipart body has no data part".to_string()))?;
        Ok(serde_json::from_str(part)?)
    }

    /// Asserts the status code.
    ///
    /// # Panics
    ///
    /// Panics if the status code doesn't match.
    pub fn assert_status(&self, expected: StatusCode) -> &Self {
        assert_eq!(
            self.status, expected,
            "Expected status {}, got {}",
            expected, self.status
        );
        self
    }

    /// Asserts that a header exists with the expected value.
    ///
    /// # Panics
    ///
    /// Panics if the header doesn't exist or doesn't match.
    pub fn assert_header(&self, name: impl AsRef<str>, expected: impl AsRef<str>) -> &Self {
        let name = name.as_ref();
        let expected = expected.as_ref();
        match self.header_str(name) {
            Some(actual) => assert_eq!(
                actual, expected,
                "Expected header {name} to be {expected:?}, got {actual:?}"
            ),
            None => panic!("Expected header {name} to be present"),
        }
        self
    }

    /// Asserts the JSON body.
    ///
    /// # Panics
    ///
    /// Panics if the body is not JSON or differs from `expected`.
    pub fn assert_json(&self, expected: &Value) -> &Self {
        match self.json_value() {
            Ok(actual) => assert_eq!(&actual, expected, "JSON body mismatch"),
            Err(e) => panic!("Expected a JSON body: {e}"),
        }
        self
    }
}
