//! # Contour Server
//!
//! The request pipeline and the HTTP server around it.
//!
//! - [`Route`] runs one endpoint's pipeline: extract, parse, validate,
//!   middleware, handler, encode
//! - [`App`] holds the routes and dispatches buffered requests, answering
//!   404 when nothing matches
//! - [`Server`] accepts HTTP/1.1 connections with hyper and drains them on
//!   shutdown
//!
//! # Example
//!
//! ```rust,no_run
//! use contour_core::{schema, Endpoint, InputSchemas, Output};
//! use contour_server::{App, Server, ServerConfig, ShutdownSignal};
//! use serde_json::json;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let mut app = App::new();
//! app.add(
//!     Endpoint::post("/users")
//!         .input(InputSchemas::new().body(schema::object().field("username", schema::string())))
//!         .handle_sync(|input| Ok(Output::json(json!({ "created": input.body["username"] })))),
//! )?;
//!
//! let shutdown = ShutdownSignal::new();
//! Server::new(ServerConfig::default(), app)
//!     .run_with_shutdown(shutdown)
//!     .await?;
//! # Ok(())
//! # }
//! ```

#![doc(html_root_url = "https://docs.rs/contour-server/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod app;
mod config;
mod encode;
mod error;
mod route;
mod server;
mod shutdown;

pub use app::App;
pub use config::{
    PipelineOptions, ServerConfig, ServerConfigBuilder, DEFAULT_HTTP_ADDR,
    DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_SHUTDOWN_TIMEOUT_SECS,
};
pub use encode::{encode_output, error_response, json_response, HttpResponse, ResponseBody};
pub use error::{ServerError, ServerResult};
pub use route::Route;
pub use server::Server;
pub use shutdown::{ConnectionToken, ConnectionTracker, ShutdownSignal};
