//! Response rendering.
//!
//! # Responsibilities
//! - Render named templates from the template directory into response bytes
//! - Negotiate gzip encoding (config flag AND client Accept-Encoding)
//! - Render error pages with the matching status code
//! - Stamp the `Server` header before any body bytes
//!
//! # Design Decisions
//! - Pages render into a buffer, then compress; the encoder is finished on
//!   every path, including template-load failure
//! - A missing or unreadable page template is an internal error: status 500
//!   with a built-in fallback body, never a silent empty page
//! - Templates are flat `{{key}}` substitutions; values are HTML-escaped

use axum::body::Body;
use axum::http::{header, HeaderMap, Response, StatusCode};
use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::error;

use crate::config::{MetaConfig, ServerConfig};
use crate::http::facts::RequestFacts;

/// Error type for template rendering.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("template {path} unavailable: {source}")]
    Template {
        path: String,
        source: std::io::Error,
    },

    #[error("compression failed: {0}")]
    Compress(std::io::Error),
}

/// Data record consumed by one page render.
#[derive(Debug, Default)]
pub struct PageData {
    pub title: String,
    pub header: String,
    pub message: String,
    pub code: String,
    pub ip: String,
    pub fields: Vec<(String, String)>,
}

impl PageData {
    /// Index page data: the full fact set plus the resolved IP.
    pub fn index(facts: &RequestFacts) -> Self {
        Self {
            title: "ipconf".to_string(),
            ip: facts
                .get(crate::http::facts::fields::IP)
                .unwrap_or_default()
                .to_string(),
            fields: facts
                .iter()
                .map(|(n, v)| (n.to_string(), v.to_string()))
                .collect(),
            ..Self::default()
        }
    }

    /// Error page data for a status code and message.
    pub fn error(status: StatusCode, message: &str) -> Self {
        let reason = status.canonical_reason().unwrap_or("Error");
        Self {
            title: format!("{}: {}", status.as_u16(), reason),
            header: reason.to_string(),
            message: message.to_string(),
            code: status.as_u16().to_string(),
            ..Self::default()
        }
    }
}

/// Renders data records into HTTP responses.
///
/// Holds only read-only configuration; cheap to share across serving tasks.
#[derive(Debug, Clone)]
pub struct Renderer {
    template_dir: PathBuf,
    gzip_enabled: bool,
    server: String,
    meta: MetaConfig,
}

/// Fallback body when a template cannot be loaded.
const FALLBACK_BODY: &str =
    "<html><head><title>ipconf</title></head><body><h1>internal error</h1></body></html>";

impl Renderer {
    pub fn new(config: &ServerConfig) -> Self {
        Self {
            template_dir: PathBuf::from(&config.templates.dir),
            gzip_enabled: config.templates.enable_gzip,
            server: format!("ipconf {}", config.meta.version),
            meta: config.meta.clone(),
        }
    }

    /// The value stamped into the `Server` response header.
    pub fn server_header(&self) -> &str {
        &self.server
    }

    /// Path of a named template inside the template directory.
    pub fn template_path(&self, name: &str) -> PathBuf {
        self.template_dir.join(format!("{name}.html"))
    }

    /// Path of a static asset inside the template directory.
    pub fn asset_path(&self, name: &str) -> PathBuf {
        self.template_dir.join(name)
    }

    /// Render a named template with the given data, status 200.
    ///
    /// Template failure is reported as 500 with the fallback body; the
    /// status-code contract of the route is otherwise preserved.
    pub fn page(&self, request_headers: &HeaderMap, name: &str, data: &PageData) -> Response<Body> {
        match self.render(name, data) {
            Ok(html) => self.finish(request_headers, StatusCode::OK, html),
            Err(e) => {
                error!(template = name, error = %e, "template render failed");
                self.finish(
                    request_headers,
                    StatusCode::INTERNAL_SERVER_ERROR,
                    FALLBACK_BODY.to_string(),
                )
            }
        }
    }

    /// Render the error page with the given status.
    ///
    /// If the error template itself is unavailable the status is kept and
    /// the fallback body is served, so 404 stays 404.
    pub fn error_page(
        &self,
        request_headers: &HeaderMap,
        status: StatusCode,
        message: &str,
    ) -> Response<Body> {
        let data = PageData::error(status, message);
        match self.render("error", &data) {
            Ok(html) => self.finish(request_headers, status, html),
            Err(e) => {
                error!(template = "error", error = %e, "template render failed");
                self.finish(request_headers, status, FALLBACK_BODY.to_string())
            }
        }
    }

    /// A plain-text response carrying a single field value. Not compressed,
    /// matching the raw field endpoints.
    pub fn plain(&self, status: StatusCode, body: String) -> Response<Body> {
        Response::builder()
            .status(status)
            .header(header::SERVER, self.server.as_str())
            .header(header::CONTENT_TYPE, "text/plain; charset=utf-8")
            .body(Body::from(body))
            .unwrap()
    }

    fn render(&self, name: &str, data: &PageData) -> Result<String, RenderError> {
        let path = self.template_path(name);
        let template = load_template(&path)?;
        Ok(substitute(&template, data, &self.meta))
    }

    /// Assemble the final response, applying content negotiation.
    fn finish(&self, request_headers: &HeaderMap, status: StatusCode, html: String) -> Response<Body> {
        let builder = Response::builder()
            .status(status)
            .header(header::SERVER, self.server.as_str())
            .header(header::CONTENT_TYPE, "text/html; charset=utf-8");

        if self.gzip_enabled && accepts_gzip(request_headers) {
            match gzip(html.as_bytes()) {
                Ok(compressed) => {
                    return builder
                        .header(header::CONTENT_ENCODING, "gzip")
                        .body(Body::from(compressed))
                        .unwrap();
                }
                Err(e) => {
                    // Fall through to the identity encoding.
                    error!(error = %e, "gzip encoding failed");
                }
            }
        }

        builder.body(Body::from(html)).unwrap()
    }
}

/// True when the request allows a gzip response body.
pub fn accepts_gzip(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT_ENCODING)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.to_ascii_lowercase().contains("gzip"))
}

fn gzip(bytes: &[u8]) -> Result<Vec<u8>, RenderError> {
    let mut encoder = GzEncoder::new(
        Vec::with_capacity(bytes.len() / 3 + 128),
        Compression::fast(),
    );
    encoder.write_all(bytes).map_err(RenderError::Compress)?;
    encoder.finish().map_err(RenderError::Compress)
}

fn load_template(path: &Path) -> Result<String, RenderError> {
    std::fs::read_to_string(path).map_err(|source| RenderError::Template {
        path: path.display().to_string(),
        source,
    })
}

/// Flat `{{key}}` substitution. Field rows are pre-rendered as table rows
/// under the `clientinfo` key.
fn substitute(template: &str, data: &PageData, meta: &MetaConfig) -> String {
    let mut rows = String::new();
    for (name, value) in &data.fields {
        rows.push_str(&format!(
            "<tr><td>{}</td><td>{}</td></tr>",
            escape_html(name),
            escape_html(value)
        ));
    }

    let pairs = [
        ("{{title}}", escape_html(&data.title)),
        ("{{header}}", escape_html(&data.header)),
        ("{{message}}", escape_html(&data.message)),
        ("{{code}}", escape_html(&data.code)),
        ("{{ip}}", escape_html(&data.ip)),
        ("{{clientinfo}}", rows),
        ("{{version}}", escape_html(&meta.version)),
        ("{{branch}}", escape_html(&meta.branch)),
        ("{{build_date}}", escape_html(&meta.build_date)),
        ("{{author}}", escape_html(&meta.author)),
        ("{{email}}", escape_html(&meta.email)),
    ];

    let mut out = template.to_string();
    for (key, value) in pairs {
        out = out.replace(key, &value);
    }
    out
}

/// Minimal HTML escaping; header values are attacker-controlled.
fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
