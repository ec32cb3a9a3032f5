//! Router errors.

use thiserror::Error;

/// Result type alias using [`RouteError`].
pub type RouteResult<T> = Result<T, RouteError>;

/// A path template that cannot be compiled.
#[derive(Debug, Error)]
pub enum RouteError {
    /// The template does not start with `/`.
    #[error("path template `{0}` must start with `/`")]
    MissingLeadingSlash(String),

    /// A `:` is not followed by a parameter name.
    #[error("path template `{template}` has an unnamed parameter at byte {position}")]
    EmptyParameterName {
        /// The offending template.
        template: String,
        /// Byte offset of the `:`.
        position: usize,
    },

    /// A parameter name appears twice.
    #[error("path template `{template}` declares `{name}` more than once")]
    DuplicateParameter {
        /// The offending template.
        template: String,
        /// The repeated name.
        name: String,
    },

    /// The compiled pattern was rejected.
    #[error("path template `{template}` could not be compiled")]
    Pattern {
        /// The offending template.
        template: String,
        /// The underlying regex error.
        #[source]
        source: regex::Error,
    },
}
