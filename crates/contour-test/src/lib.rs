//! # Contour Test
//!
//! In-memory testing for Contour apps: requests are handed straight to
//! [`App::handle`](contour_server::App::handle), so tests exercise the full
//! pipeline without binding a port.
//!
//! - [`TestClient`] - hands out request builders bound to an app
//! - [`TestRequestBuilder`] - headers, JSON, form and multipart bodies, then
//!   `send()`
//! - [`TestResponse`] - status, header, JSON and multipart helpers
//!
//! ## Example
//!
//! ```rust
//! use bytes::Bytes;
//! use contour_core::{schema, Endpoint, InputSchemas, Output, UploadedFile};
//! use contour_server::App;
//! use contour_test::TestClient;
//! use serde_json::json;
//!
//! # tokio_test::block_on(async {
//! let upload = Endpoint::post("/avatar")
//!     .input(InputSchemas::new().files(schema::object().field("avatar", schema::file().max_size(1024))))
//!     .handle_sync(|input| Ok(Output::json(json!({ "size": input.files["avatar"].size() }))));
//!
//! let client = TestClient::new(App::new().with_endpoint(upload).unwrap());
//! let response = client
//!     .post("/avatar")
//!     .file("avatar", UploadedFile::new("me.png", "image/png", Bytes::from_static(b"PNG")))
//!     .send()
//!     .await;
//!
//! response.assert_json(&json!({ "size": 3 }));
//! # });
//! ```

#![doc(html_root_url = "https://docs.rs/contour-test/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod client;
mod error;
mod request;
mod response;

pub use client::TestClient;
pub use error::{TestError, TestResult};
pub use request::{TestRequest, TestRequestBuilder, TEST_BOUNDARY};
pub use response::TestResponse;
