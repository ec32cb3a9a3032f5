//! Interactive Swagger UI.
//!
//! [`SwaggerUi`] renders a page that loads Swagger UI from a CDN and points
//! it at the JSON document served next to it: a UI mounted at `/api-docs`
//! fetches `/api-docs.json`.

use contour_core::{Endpoint, Output, OutputSchemas};

use crate::error::DocsResult;
use crate::openapi::OpenApi;
use crate::serve::docs_endpoint;

/// Default path of the Swagger UI page.
pub const DEFAULT_UI_PATH: &str = "/api-docs";

/// Swagger UI release loaded from the CDN.
pub const DEFAULT_SWAGGER_VERSION: &str = "5.18.2";

/// How far operations are expanded when the page opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DocExpansion {
    /// Everything collapsed.
    None,
    /// Tags expanded, operations collapsed.
    #[default]
    List,
    /// Everything expanded.
    Full,
}

impl DocExpansion {
    fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::List => "list",
            Self::Full => "full",
        }
    }
}

/// A Swagger UI page for one document.
///
/// # Example
///
/// ```rust
/// use contour_docs::{OpenApiGenerator, SwaggerUi};
///
/// let doc = OpenApiGenerator::new().title("Pets").generate(&[]);
/// let ui = SwaggerUi::new("/api-docs", &doc);
///
/// assert_eq!(ui.spec_path(), "/api-docs.json");
/// assert!(ui.html().contains("/api-docs.json"));
///
/// let [page, document] = ui.endpoints().unwrap();
/// assert_eq!(page.path(), "/api-docs");
/// assert_eq!(document.path(), "/api-docs.json");
/// ```
#[derive(Debug, Clone)]
pub struct SwaggerUi {
    path: String,
    document: OpenApi,
    title: String,
    deep_linking: bool,
    doc_expansion: DocExpansion,
    swagger_version: String,
}

impl SwaggerUi {
    /// Mounts the page at `path` for `document`. The page title defaults to
    /// the document title.
    #[must_use]
    pub fn new(path: impl Into<String>, document: &OpenApi) -> Self {
        Self {
            path: path.into(),
            title: format!("{} - Swagger UI", document.info.title),
            document: document.clone(),
            deep_linking: true,
            doc_expansion: DocExpansion::default(),
            swagger_version: DEFAULT_SWAGGER_VERSION.to_string(),
        }
    }

    /// Sets the page title.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Reflects the open operation in the URL fragment.
    #[must_use]
    pub fn deep_linking(mut self, enabled: bool) -> Self {
        self.deep_linking = enabled;
        self
    }

    /// Sets the initial expansion.
    #[must_use]
    pub fn doc_expansion(mut self, expansion: DocExpansion) -> Self {
        self.doc_expansion = expansion;
        self
    }

    /// Pins the CDN release.
    #[must_use]
    pub fn swagger_version(mut self, version: impl Into<String>) -> Self {
        self.swagger_version = version.into();
        self
    }

    /// Path of the page.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Path of the JSON document: the page path plus `.json`.
    #[must_use]
    pub fn spec_path(&self) -> String {
        format!("{}.json", self.path.trim_end_matches('/'))
    }

    /// Renders the page.
    #[must_use]
    pub fn html(&self) -> String {
        // A JSON string literal is also a valid JS string literal.
        let spec_url = serde_json::Value::String(self.spec_path()).to_string();
        format!(
            r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@{version}/swagger-ui.css" />
    <style>body {{ margin: 0; background: #fafafa; }}</style>
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@{version}/swagger-ui-bundle.js"></script>
    <script>
        window.onload = function() {{
            window.ui = SwaggerUIBundle({{
                url: {spec_url},
                dom_id: '#swagger-ui',
                deepLinking: {deep_linking},
                docExpansion: '{doc_expansion}',
                presets: [SwaggerUIBundle.presets.apis]
            }});
        }};
    </script>
</body>
</html>"##,
            title = html_escape(&self.title),
            version = html_escape(&self.swagger_version),
            deep_linking = self.deep_linking,
            doc_expansion = self.doc_expansion.as_str(),
        )
    }

    /// Builds the `GET` endpoints for the page and for the JSON document,
    /// in that order.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be serialized.
    pub fn endpoints(&self) -> DocsResult<[Endpoint; 2]> {
        let document = docs_endpoint(self.spec_path(), &self.document)?;
        let page = self.html();
        let ui = Endpoint::get(self.path.clone())
            .summary("Swagger UI")
            .output(OutputSchemas::new())
            .handle_sync(move |_| Ok(Output::html(page.clone())));
        Ok([ui, document])
    }
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OpenApiGenerator;
    use contour_core::HandlerInput;

    fn document() -> OpenApi {
        OpenApiGenerator::new().title("Pets <v2>").generate(&[])
    }

    #[test]
    fn test_spec_path_follows_page_path() {
        assert_eq!(SwaggerUi::new("/api-docs", &document()).spec_path(), "/api-docs.json");
        assert_eq!(SwaggerUi::new("/docs/", &document()).spec_path(), "/docs.json");
    }

    #[test]
    fn test_page_loads_document_by_url() {
        let html = SwaggerUi::new(DEFAULT_UI_PATH, &document())
            .doc_expansion(DocExpansion::Full)
            .deep_linking(false)
            .html();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains(r#"url: "/api-docs.json""#));
        assert!(html.contains("docExpansion: 'full'"));
        assert!(html.contains("deepLinking: false"));
        assert!(html.contains(&format!("swagger-ui-dist@{DEFAULT_SWAGGER_VERSION}")));
    }

    #[test]
    fn test_title_is_escaped() {
        let html = SwaggerUi::new("/docs", &document()).html();
        assert!(html.contains("<title>Pets &lt;v2&gt; - Swagger UI</title>"));

        let html = SwaggerUi::new("/docs", &document()).title("A & B").html();
        assert!(html.contains("<title>A &amp; B</title>"));
    }

    #[tokio::test]
    async fn test_endpoints_serve_page_and_document() {
        let [page, json] = SwaggerUi::new("/api-docs", &document()).endpoints().unwrap();

        let output = page.handler().unwrap()(HandlerInput::default()).await.unwrap();
        let raw = output.raw.unwrap();
        assert!(raw.content_type.starts_with("text/html"));
        assert!(std::str::from_utf8(&raw.bytes).unwrap().contains("/api-docs.json"));

        let output = json.handler().unwrap()(HandlerInput::default()).await.unwrap();
        assert_eq!(output.body.unwrap()["info"]["title"], "Pets <v2>");
    }
}
