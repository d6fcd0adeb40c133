//! Static file routes
//!
//! Every GET path is looked up beneath the site root. An empty path serves
//! `index.html`; anything missing is a plain-text 404.

use axum::{
    extract::State,
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use log::{debug, warn};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Document served for an empty path
pub const INDEX_DOCUMENT: &str = "index.html";

/// Where the site lives on disk and under which URL prefix
#[derive(Debug, Clone)]
pub struct SiteRoot {
    pub root: PathBuf,
    pub base: String,
}

impl SiteRoot {
    pub fn new(root: impl Into<PathBuf>, base: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            base: base.into(),
        }
    }
}

/// Create the static file router
pub fn create_routes(site: SiteRoot) -> Router {
    Router::new()
        .route("/", get(serve_static))
        .route("/*path", get(serve_static))
        .with_state(Arc::new(site))
}

/// Content type for a file, from its extension
pub fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "html" => "text/html",
        "css" => "text/css",
        "js" => "application/javascript",
        "json" | "map" => "application/json",
        "svg" => "image/svg+xml",
        "png" => "image/png",
        "ico" => "image/x-icon",
        _ => "text/plain",
    }
}

/// Strip the site's URL prefix, if the request carries it
fn strip_base<'a>(request_path: &'a str, base: &str) -> &'a str {
    let base = base.trim_matches('/');
    if base.is_empty() {
        return request_path;
    }

    let trimmed = request_path.trim_start_matches('/');
    match trimmed.strip_prefix(base) {
        Some("") => "",
        Some(rest) if rest.starts_with('/') => rest,
        _ => request_path,
    }
}

/// Map a request path to a file beneath `root`
///
/// Returns `None` for paths that try to leave the root.
pub fn resolve_path(root: &Path, base: &str, request_path: &str) -> Option<PathBuf> {
    let path = strip_base(request_path, base);
    let relative = path.trim_start_matches('/');

    let mut resolved = root.to_path_buf();
    for segment in relative.split('/') {
        match segment {
            "" | "." => continue,
            ".." => return None,
            s if s.contains('\\') => return None,
            s => resolved.push(s),
        }
    }

    if relative.is_empty() || relative.ends_with('/') {
        resolved.push(INDEX_DOCUMENT);
    }
    Some(resolved)
}

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        [(header::CONTENT_TYPE, "text/plain")],
        "Not Found",
    )
        .into_response()
}

/// Serve one file from the site root
async fn serve_static(State(site): State<Arc<SiteRoot>>, uri: Uri) -> Response {
    let Some(path) = resolve_path(&site.root, &site.base, uri.path()) else {
        warn!("Rejected path outside site root: {}", uri.path());
        return not_found();
    };

    match tokio::fs::read(&path).await {
        Ok(bytes) => {
            debug!("GET {} -> {:?} ({} bytes)", uri.path(), path, bytes.len());
            ([(header::CONTENT_TYPE, content_type_for(&path))], bytes).into_response()
        }
        Err(e) => {
            if e.kind() != ErrorKind::NotFound {
                debug!("Could not read {:?}: {}", path, e);
            }
            debug!("GET {} -> 404", uri.path());
            not_found()
        }
    }
}
