//! # Contour
//!
//! **Schema-validated HTTP endpoints.**
//!
//! Each endpoint declares the shape of its body, query, path parameters,
//! headers and files. Every request runs the same fixed pipeline:
//!
//! ```text
//! Request → Route → Extract → Parse → Validate → Middleware → Handler → Encode → Response
//! ```
//!
//! The first step that fails answers the request: bad input gets an
//! `Invalid <channel>` envelope, a rejected middleware or handler sends
//! its error value verbatim with 400, and unknown paths get a 404.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use contour::prelude::*;
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConfigLoader::new()
//!         .with_optional_file("contour.toml")?
//!         .with_env_prefix("CONTOUR")
//!         .load()?;
//!     init_telemetry(&config.telemetry_config())?;
//!
//!     let hello = Endpoint::get("/:username")
//!         .input(InputSchemas::new().params(schema::object().field("username", schema::string())))
//!         .output(OutputSchemas::new().body(schema::object().field("message", schema::string())))
//!         .handle_sync(|input| {
//!             let name = input.param("username").unwrap_or_default();
//!             Ok(Output::json(json!({ "message": format!("Hello {name}") })))
//!         });
//!
//!     let app = App::new().with_endpoint(hello)?;
//!     Server::new(config.server_config()?, app).run().await?;
//!     Ok(())
//! }
//! ```

#![doc(html_root_url = "https://docs.rs/contour/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use contour_core as core;

// Re-export router types
pub use contour_router as router;

// Re-export extraction types
pub use contour_extract as extract;

// Re-export middleware types
pub use contour_middleware as middleware;

// Re-export server types
pub use contour_server as server;

// Re-export documentation generator
pub use contour_docs as docs;

// Re-export telemetry setup
pub use contour_telemetry as telemetry;

// Re-export configuration loading
pub use contour_config as config;

pub use contour_core::schema;

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```rust
/// use contour::prelude::*;
///
/// let endpoint = Endpoint::get("/health").output(OutputSchemas::new().body(schema::object()));
/// assert_eq!(endpoint.path(), "/health");
/// ```
pub mod prelude {
    pub use contour_core::schema::{self, Schema, SchemaError};
    pub use contour_core::{
        Channel, ContourError, ContourResult, Endpoint, FnMiddleware, HandlerInput,
        HandlerResult, InputSchemas, Middleware, MiddlewareResult, Output, OutputSchemas,
        RawBody, UploadedFile,
    };

    pub use contour_server::{App, PipelineOptions, Server, ServerConfig, ShutdownSignal};

    pub use contour_docs::{docs_endpoint, OpenApiGenerator, SwaggerUi};

    pub use contour_telemetry::{init_telemetry, LogConfig, MetricsConfig, TelemetryConfig};

    pub use contour_config::{ConfigLoader, ContourConfig};
}
