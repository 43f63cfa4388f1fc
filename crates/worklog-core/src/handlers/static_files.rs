//! Static file serving handler
//!
//! Serves the bundled CSS/JS assets verbatim, with ETag revalidation
//! and path sanitization.

use crate::{Method, Request, Response, ResponseBuilder, StatusCode};
use std::path::{Path, PathBuf};

/// Static file configuration
#[derive(Clone)]
pub struct StaticFileConfig {
    /// Root directory
    pub root: PathBuf,
    /// Cache max-age in seconds
    pub max_age: u32,
    /// Enable ETag
    pub etag: bool,
}

impl Default for StaticFileConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            max_age: 86400, // 1 day
            etag: true,
        }
    }
}

impl StaticFileConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Default::default()
        }
    }

    pub fn max_age(mut self, seconds: u32) -> Self {
        self.max_age = seconds;
        self
    }

    pub fn etag(mut self, enabled: bool) -> Self {
        self.etag = enabled;
        self
    }
}

/// Static file handler
pub struct StaticFiles {
    config: StaticFileConfig,
}

impl StaticFiles {
    pub fn new(config: StaticFileConfig) -> Self {
        Self { config }
    }

    /// Serve static files from directory
    pub fn serve(root: impl Into<PathBuf>) -> Self {
        Self::new(StaticFileConfig::new(root))
    }

    /// Handle request for static file
    ///
    /// Resolves the wildcard `path` route parameter when present,
    /// otherwise the full request path.
    pub async fn handle(&self, req: &Request) -> Response {
        // Only handle GET and HEAD
        if req.method != Method::Get && req.method != Method::Head {
            return ResponseBuilder::new(StatusCode::METHOD_NOT_ALLOWED)
                .header("content-type", "text/plain")
                .body("Method Not Allowed")
                .build();
        }

        let rel = req.param("path").unwrap_or(req.path.as_str());
        let rel = match self.sanitize_path(rel) {
            Some(p) => p,
            None => return Response::not_found(),
        };

        let full_path = self.config.root.join(&rel);
        match tokio::fs::metadata(&full_path).await {
            Ok(meta) if meta.is_file() => self.serve_file(&full_path, &meta, req).await,
            _ => Response::not_found(),
        }
    }

    /// Sanitize request path to prevent directory traversal
    fn sanitize_path(&self, path: &str) -> Option<PathBuf> {
        let path = path.trim_start_matches('/');

        // Dotfiles are never served
        if path.split('/').any(|s| s.starts_with('.')) {
            return None;
        }

        let mut result = PathBuf::new();
        for component in Path::new(path).components() {
            match component {
                std::path::Component::Normal(c) => result.push(c),
                std::path::Component::ParentDir => return None, // Prevent ../
                _ => {}
            }
        }

        if result.as_os_str().is_empty() {
            return None;
        }

        Some(result)
    }

    async fn serve_file(&self, path: &Path, meta: &std::fs::Metadata, req: &Request) -> Response {
        // Check ETag
        if self.config.etag {
            let etag = self.generate_etag(meta);
            if let Some(if_none_match) = req.header("if-none-match") {
                if if_none_match == etag {
                    return ResponseBuilder::new(StatusCode::NOT_MODIFIED).build();
                }
            }
        }

        let content = match tokio::fs::read(path).await {
            Ok(c) => c,
            Err(_) => return Response::not_found(),
        };

        let mut builder = ResponseBuilder::new(StatusCode::OK)
            .header("content-type", self.mime_type(path));

        if self.config.etag {
            builder = builder.header("etag", self.generate_etag(meta));
        }

        if self.config.max_age > 0 {
            builder = builder.header("cache-control", format!("max-age={}", self.config.max_age));
        }

        builder.body(content).build()
    }

    fn generate_etag(&self, meta: &std::fs::Metadata) -> String {
        use std::time::UNIX_EPOCH;

        let mtime = meta
            .modified()
            .ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map(|d| d.as_secs())
            .unwrap_or(0);

        let size = meta.len();
        format!("\"{:x}-{:x}\"", mtime, size)
    }

    fn mime_type(&self, path: &Path) -> &'static str {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        match ext.to_lowercase().as_str() {
            "html" | "htm" => "text/html; charset=utf-8",
            "css" => "text/css; charset=utf-8",
            "js" | "mjs" => "text/javascript; charset=utf-8",
            "json" | "map" => "application/json",
            "txt" => "text/plain; charset=utf-8",
            "png" => "image/png",
            "svg" => "image/svg+xml",
            "ico" => "image/x-icon",
            "woff2" => "font/woff2",
            _ => "application/octet-stream",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RequestBuilder;
    use std::collections::HashMap;

    fn request_for(rel: &str) -> Request {
        let mut params = HashMap::new();
        params.insert("path".to_string(), rel.to_string());
        RequestBuilder::new(Method::Get, format!("/static/{rel}"))
            .params(params)
            .build()
    }

    #[test]
    fn test_sanitize_path() {
        let handler = StaticFiles::serve(".");

        assert!(handler.sanitize_path("/js/app.js").is_some());
        assert!(handler.sanitize_path("css/style.css").is_some());
        assert!(handler.sanitize_path("/../etc/passwd").is_none());
        assert!(handler.sanitize_path("js/../../secret").is_none());
        assert!(handler.sanitize_path("/.hidden").is_none());
        assert!(handler.sanitize_path("/").is_none());
    }

    #[test]
    fn test_config_builders() {
        let config = StaticFileConfig::new("/srv/assets").max_age(600).etag(false);
        assert_eq!(config.root, Path::new("/srv/assets"));
        assert_eq!(config.max_age, 600);
        assert!(!config.etag);
    }

    #[tokio::test]
    async fn test_etag_disabled() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("style.css"), "body{}").unwrap();

        let handler = StaticFiles::new(StaticFileConfig::new(dir.path()).etag(false));
        let res = handler.handle(&request_for("style.css")).await;
        assert_eq!(res.status, StatusCode::OK);
        assert!(res.header("etag").is_none());
    }

    #[test]
    fn test_mime_type() {
        let handler = StaticFiles::serve(".");

        assert_eq!(
            handler.mime_type(Path::new("index.html")),
            "text/html; charset=utf-8"
        );
        assert_eq!(
            handler.mime_type(Path::new("css/style.css")),
            "text/css; charset=utf-8"
        );
        assert_eq!(
            handler.mime_type(Path::new("js/app.js")),
            "text/javascript; charset=utf-8"
        );
        assert_eq!(
            handler.mime_type(Path::new("unknown")),
            "application/octet-stream"
        );
    }

    #[tokio::test]
    async fn test_serve_and_revalidate() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("js")).unwrap();
        std::fs::write(dir.path().join("js/app.js"), "console.log('hi');").unwrap();

        let handler = StaticFiles::serve(dir.path());

        let res = handler.handle(&request_for("js/app.js")).await;
        assert_eq!(res.status, StatusCode::OK);
        assert_eq!(res.content_type(), Some("text/javascript; charset=utf-8"));
        let etag = res.header("etag").unwrap().to_string();

        // Conditional GET with the returned ETag short-circuits to 304
        let mut params = HashMap::new();
        params.insert("path".to_string(), "js/app.js".to_string());
        let req = RequestBuilder::new(Method::Get, "/static/js/app.js")
            .header("if-none-match", etag)
            .params(params)
            .build();
        let res = handler.handle(&req).await;
        assert_eq!(res.status, StatusCode::NOT_MODIFIED);
        assert!(res.body.is_empty());
    }

    #[tokio::test]
    async fn test_missing_file_is_404() {
        let dir = tempfile::tempdir().unwrap();
        let handler = StaticFiles::serve(dir.path());

        let res = handler.handle(&request_for("nope.css")).await;
        assert_eq!(res.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_traversal_is_404() {
        let dir = tempfile::tempdir().unwrap();
        let handler = StaticFiles::serve(dir.path());

        let res = handler.handle(&request_for("../Cargo.toml")).await;
        assert_eq!(res.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_post_is_405() {
        let dir = tempfile::tempdir().unwrap();
        let handler = StaticFiles::serve(dir.path());

        let req = RequestBuilder::new(Method::Post, "/static/js/app.js").build();
        let res = handler.handle(&req).await;
        assert_eq!(res.status, StatusCode::METHOD_NOT_ALLOWED);
    }
}
