//! Route registration for the page server.
//!
//! Two routes exist: the pre-rendered index page and the wildcard static
//! asset handler. The index template is read once at startup, so every
//! `GET /` returns identical bytes and a missing template fails fast
//! instead of surfacing per-request.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use worklog_core::{DynamicHandler, Method, Response, ServerState, StaticFiles};

/// Build the shared server state from the asset root.
pub fn build_state(assets: &Path) -> Result<Arc<ServerState>> {
    let index_path = assets.join("index.html");
    let index = std::fs::read(&index_path)
        .with_context(|| format!("reading template {}", index_path.display()))?;
    info!(template = %index_path.display(), bytes = index.len(), "index template loaded");

    let state = Arc::new(ServerState::new());
    state.add_static(Method::Get, "/", Response::html(index))?;

    let files = Arc::new(StaticFiles::serve(assets.join("static")));
    let handler: DynamicHandler = Arc::new(move |req| {
        let files = files.clone();
        Box::pin(async move { files.handle(&req).await })
    });
    state.add_dynamic(Method::Get, "/static/{*path}", handler)?;

    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use worklog_core::{RequestBuilder, StatusCode};

    fn fixture_assets() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("index.html"),
            "<!DOCTYPE html><title>Work Hours Logger</title>",
        )
        .unwrap();
        std::fs::create_dir_all(dir.path().join("static/js")).unwrap();
        std::fs::write(dir.path().join("static/js/app.js"), "// client").unwrap();
        dir
    }

    #[tokio::test]
    async fn test_index_route() {
        let dir = fixture_assets();
        let state = build_state(dir.path()).unwrap();

        let res = state
            .handle(RequestBuilder::new(Method::Get, "/").build())
            .await;
        assert_eq!(res.status, StatusCode::OK);
        assert_eq!(res.content_type(), Some("text/html; charset=utf-8"));
        assert!(std::str::from_utf8(&res.body)
            .unwrap()
            .contains("Work Hours Logger"));
    }

    #[tokio::test]
    async fn test_static_route() {
        let dir = fixture_assets();
        let state = build_state(dir.path()).unwrap();

        let res = state
            .handle(RequestBuilder::new(Method::Get, "/static/js/app.js").build())
            .await;
        assert_eq!(res.status, StatusCode::OK);
        assert_eq!(res.content_type(), Some("text/javascript; charset=utf-8"));
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let dir = fixture_assets();
        let state = build_state(dir.path()).unwrap();

        let res = state
            .handle(RequestBuilder::new(Method::Get, "/api/entries").build())
            .await;
        assert_eq!(res.status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_missing_template_fails_startup() {
        let dir = tempfile::tempdir().unwrap();
        assert!(build_state(dir.path()).is_err());
    }
}
