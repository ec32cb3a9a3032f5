//! Path templates.
//!
//! A template is a `/`-separated path in which `:name` marks a parameter.
//! A parameter captures one or more characters up to the next `/` or the
//! next literal text in the same segment, so `/files/:name.:ext` works.
//! Matching ignores ASCII case in literal text and tolerates one trailing
//! slash; segment counts must otherwise agree exactly.

use crate::error::{RouteError, RouteResult};
use crate::params::Params;
use regex::{Regex, RegexBuilder};

/// A compiled path template.
///
/// # Example
///
/// ```rust
/// use contour_router::PathMatcher;
///
/// let matcher = PathMatcher::new("/users/:id").unwrap();
///
/// let params = matcher.matches("/users/42").unwrap();
/// assert_eq!(params.get("id"), Some("42"));
///
/// assert!(matcher.matches("/users").is_none());
/// assert!(matcher.matches("/users/42/posts").is_none());
/// ```
#[derive(Debug, Clone)]
pub struct PathMatcher {
    template: String,
    names: Vec<String>,
    regex: Regex,
}

impl PathMatcher {
    /// Compiles `template`.
    ///
    /// # Errors
    ///
    /// Fails if the template does not start with `/`, has a `:` without a
    /// name, or repeats a parameter name.
    pub fn new(template: impl Into<String>) -> RouteResult<Self> {
        let template = template.into();
        if !template.starts_with('/') {
            return Err(RouteError::MissingLeadingSlash(template));
        }

        let mut pattern = String::from("^");
        let mut names: Vec<String> = Vec::new();
        let mut chars = template.char_indices().peekable();

        while let Some((position, c)) = chars.next() {
            if c != ':' {
                pattern.push_str(&regex::escape(c.encode_utf8(&mut [0; 4])));
                continue;
            }

            let mut name = String::new();
            while let Some(&(_, next)) = chars.peek() {
                if next.is_ascii_alphanumeric() || next == '_' {
                    name.push(next);
                    chars.next();
                } else {
                    break;
                }
            }
            if name.is_empty() {
                return Err(RouteError::EmptyParameterName {
                    template: template.clone(),
                    position,
                });
            }
            if names.contains(&name) {
                return Err(RouteError::DuplicateParameter {
                    template: template.clone(),
                    name,
                });
            }
            pattern.push_str("([^/]+?)");
            names.push(name);
        }

        if !pattern.ends_with('/') {
            pattern.push_str("/?");
        }
        pattern.push('$');

        let regex = RegexBuilder::new(&pattern)
            .case_insensitive(true)
            .build()
            .map_err(|source| RouteError::Pattern {
                template: template.clone(),
                source,
            })?;

        Ok(Self {
            template,
            names,
            regex,
        })
    }

    /// Returns the template this matcher was compiled from.
    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Returns the parameter names in template order.
    #[must_use]
    pub fn param_names(&self) -> &[String] {
        &self.names
    }

    /// Returns `true` if `path` matches.
    #[must_use]
    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    /// Matches `path` and captures its parameters. Values are returned as
    /// they appear in the path, without percent-decoding.
    #[must_use]
    pub fn matches(&self, path: &str) -> Option<Params> {
        let captures = self.regex.captures(path)?;
        Some(
            self.names
                .iter()
                .zip(captures.iter().skip(1))
                .filter_map(|(name, capture)| {
                    capture.map(|m| (name.clone(), m.as_str().to_string()))
                })
                .collect(),
        )
    }
}
