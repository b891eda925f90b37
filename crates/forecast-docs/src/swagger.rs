//! Swagger UI page generation.
//!
//! The viewer lists one entry per declared revision, newest first, each
//! pointing at that revision's document:
//!
//! ```text
//! /swagger                  -> viewer
//! /swagger/v2/swagger.json  -> "Weather Forecast API 2.0"
//! /swagger/v1/swagger.json  -> "Weather Forecast API 1.0"
//! ```

use forecast_core::{Revision, RevisionSet};
use serde::Serialize;

/// One entry in the viewer's document selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SwaggerEntry {
    /// URL of the document.
    pub url: String,
    /// Label shown in the selector.
    pub name: String,
}

/// Swagger UI configuration and HTML generation.
///
/// `SwaggerUi` generates a complete HTML page that loads Swagger UI from a
/// CDN and lets the reader switch between revision documents.
///
/// # Example
///
/// ```rust
/// use forecast_core::{Revision, RevisionSet};
/// use forecast_docs::SwaggerUi;
///
/// let revisions = RevisionSet::new([Revision::new(1, 0), Revision::new(2, 0)]);
/// let swagger = SwaggerUi::for_revisions("/swagger", "Weather Forecast API", &revisions);
///
/// assert_eq!(swagger.entries()[0].name, "Weather Forecast API 2.0");
/// assert_eq!(swagger.entries()[0].url, "/swagger/v2/swagger.json");
/// ```
#[derive(Debug, Clone)]
pub struct SwaggerUi {
    /// Base path where Swagger UI is served (e.g., "/swagger").
    path: String,
    /// Title for the HTML page.
    title: String,
    /// Documents offered in the selector, in display order.
    entries: Vec<SwaggerEntry>,
    /// Whether to use deep linking (URL updates with operations).
    deep_linking: bool,
    /// Default expansion depth for operations.
    doc_expansion: DocExpansion,
    /// Whether to display the request duration.
    display_request_duration: bool,
    /// Swagger UI version to use from CDN.
    swagger_version: String,
}

/// Document expansion level for Swagger UI.
#[derive(Debug, Clone, Copy, Default)]
pub enum DocExpansion {
    /// Show all operations collapsed.
    None,
    /// Show only the list of operations.
    #[default]
    List,
    /// Expand all operations fully.
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

/// Returns the document path for `revision` under `base`.
#[must_use]
pub fn document_path(base: &str, revision: Revision) -> String {
    format!(
        "{}/{}/swagger.json",
        base.trim_end_matches('/'),
        revision.group_name()
    )
}

impl SwaggerUi {
    /// Creates an empty viewer served at `path`.
    #[must_use]
    pub fn new(path: impl Into<String>, api_title: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            title: format!("{} - Swagger UI", api_title.into()),
            entries: Vec::new(),
            deep_linking: true,
            doc_expansion: DocExpansion::List,
            display_request_duration: true,
            swagger_version: "5.18.2".to_string(),
        }
    }

    /// Creates a viewer listing every revision, newest first, labelled
    /// `"{title} {revision}"`.
    #[must_use]
    pub fn for_revisions(path: impl Into<String>, api_title: &str, revisions: &RevisionSet) -> Self {
        let path = path.into();
        let entries = revisions
            .iter()
            .rev()
            .map(|revision| SwaggerEntry {
                url: document_path(&path, *revision),
                name: format!("{api_title} {revision}"),
            })
            .collect();
        Self {
            entries,
            ..Self::new(path, api_title)
        }
    }

    /// Appends a document entry.
    #[must_use]
    pub fn entry(mut self, url: impl Into<String>, name: impl Into<String>) -> Self {
        self.entries.push(SwaggerEntry {
            url: url.into(),
            name: name.into(),
        });
        self
    }

    /// Set the page title.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Enable or disable deep linking.
    #[must_use]
    pub fn deep_linking(mut self, enabled: bool) -> Self {
        self.deep_linking = enabled;
        self
    }

    /// Set the document expansion level.
    #[must_use]
    pub fn doc_expansion(mut self, expansion: DocExpansion) -> Self {
        self.doc_expansion = expansion;
        self
    }

    /// Enable or disable request duration display.
    #[must_use]
    pub fn display_request_duration(mut self, enabled: bool) -> Self {
        self.display_request_duration = enabled;
        self
    }

    /// Set the Swagger UI version to use.
    #[must_use]
    pub fn swagger_version(mut self, version: impl Into<String>) -> Self {
        self.swagger_version = version.into();
        self
    }

    /// Get the base path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Get the selector entries in display order.
    #[must_use]
    pub fn entries(&self) -> &[SwaggerEntry] {
        &self.entries
    }

    /// Generate the HTML for Swagger UI.
    #[must_use]
    pub fn html(&self) -> String {
        let urls = serde_json::to_string(&self.entries)
            .unwrap_or_else(|_| "[]".to_string())
            .replace("</", "<\\/");
        let deep_linking = self.deep_linking.to_string();
        let doc_expansion = self.doc_expansion.as_str();
        let display_duration = self.display_request_duration.to_string();

        format!(
            r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@{version}/swagger-ui.css" />
    <style>
        html {{
            box-sizing: border-box;
            overflow: -moz-scrollbars-vertical;
            overflow-y: scroll;
        }}
        *,
        *:before,
        *:after {{
            box-sizing: inherit;
        }}
        body {{
            margin: 0;
            background: #fafafa;
        }}
    </style>
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@{version}/swagger-ui-bundle.js"></script>
    <script src="https://unpkg.com/swagger-ui-dist@{version}/swagger-ui-standalone-preset.js"></script>
    <script>
        window.onload = function() {{
            window.ui = SwaggerUIBundle({{
                urls: {urls},
                dom_id: '#swagger-ui',
                deepLinking: {deep_linking},
                docExpansion: '{doc_expansion}',
                displayRequestDuration: {display_duration},
                presets: [
                    SwaggerUIBundle.presets.apis,
                    SwaggerUIStandalonePreset
                ],
                plugins: [
                    SwaggerUIBundle.plugins.DownloadUrl
                ],
                layout: "StandaloneLayout"
            }});
        }};
    </script>
</body>
</html>"##,
            title = html_escape(&self.title),
            version = self.swagger_version,
            urls = urls,
            deep_linking = deep_linking,
            doc_expansion = doc_expansion,
            display_duration = display_duration,
        )
    }

    /// Generate the HTML as bytes for use in HTTP responses.
    #[must_use]
    pub fn html_bytes(&self) -> bytes::Bytes {
        bytes::Bytes::from(self.html())
    }
}

/// Simple HTML escape for XSS prevention in the title.
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

    fn revisions() -> RevisionSet {
        RevisionSet::new([Revision::new(1, 0), Revision::new(2, 0), Revision::new(2, 1)])
    }

    #[test]
    fn test_for_revisions_lists_newest_first() {
        let swagger = SwaggerUi::for_revisions("/swagger", "Weather Forecast API", &revisions());
        let names: Vec<_> = swagger.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Weather Forecast API 2.1",
                "Weather Forecast API 2.0",
                "Weather Forecast API 1.0",
            ]
        );
        let urls: Vec<_> = swagger.entries().iter().map(|e| e.url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "/swagger/v2.1/swagger.json",
                "/swagger/v2/swagger.json",
                "/swagger/v1/swagger.json",
            ]
        );
    }

    #[test]
    fn test_document_path_trailing_slash() {
        assert_eq!(
            document_path("/swagger/", Revision::new(1, 0)),
            "/swagger/v1/swagger.json"
        );
    }

    #[test]
    fn test_swagger_ui_customization() {
        let swagger = SwaggerUi::new("/docs", "API")
            .title("Custom Title")
            .deep_linking(false)
            .doc_expansion(DocExpansion::Full)
            .display_request_duration(false)
            .swagger_version("5.0.0")
            .entry("/docs/v1/swagger.json", "API 1.0");

        assert_eq!(swagger.title, "Custom Title");
        assert!(!swagger.deep_linking);
        assert!(!swagger.display_request_duration);
        assert_eq!(swagger.entries().len(), 1);
        assert!(swagger.html().contains("swagger-ui-dist@5.0.0"));
        assert!(swagger.html().contains("docExpansion: 'full'"));
    }

    #[test]
    fn test_swagger_ui_html_generation() {
        let swagger = SwaggerUi::for_revisions("/swagger", "Weather Forecast API", &revisions());
        let html = swagger.html();

        assert!(html.contains("<!DOCTYPE html>"));
        assert!(html.contains("Weather Forecast API - Swagger UI"));
        assert!(html.contains("\"url\":\"/swagger/v1/swagger.json\""));
        assert!(html.contains("\"name\":\"Weather Forecast API 2.1\""));
        assert!(swagger.html_bytes().len() > 100);
    }

    #[test]
    fn test_entries_cannot_close_script() {
        let swagger = SwaggerUi::new("/swagger", "API").entry("/x.json", "</script><b>");
        let html = swagger.html();
        assert!(!html.contains("</script><b>"));
        assert!(html.contains("<\\/script><b>"));
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape("<script>"), "&lt;script&gt;");
        assert_eq!(html_escape("\"test\""), "&quot;test&quot;");
        assert_eq!(html_escape("a & b"), "a &amp; b");
    }
}
