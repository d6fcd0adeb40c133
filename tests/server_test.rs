//! Static file server tests
//!
//! Most requests go straight to the router with `oneshot`, no socket needed.

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use spell_it::server::{create_routes, ServerConfig, SiteRoot, StaticServer};
use spell_it::SpellError;
use std::fs;
use tower::ServiceExt;

fn site() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("index.html"), "<h1>spell</h1>").unwrap();
    fs::create_dir(dir.path().join("assets")).unwrap();
    fs::write(dir.path().join("assets/app.js"), "console.log(1)").unwrap();
    fs::write(dir.path().join("assets/style.css"), "body{}").unwrap();
    fs::write(dir.path().join("manifest.json"), "{}").unwrap();
    fs::write(dir.path().join("notes.md"), "# notes").unwrap();
    dir
}

async fn get(router: Router, uri: &str) -> (StatusCode, Option<String>, Vec<u8>) {
    let response = router
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .map(|v| v.to_str().unwrap().to_string());
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, content_type, body.to_vec())
}

#[tokio::test]
async fn test_root_serves_index() {
    let dir = site();
    let router = create_routes(SiteRoot::new(dir.path(), "/"));

    let (status, content_type, body) = get(router, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("text/html"));
    assert_eq!(body, b"<h1>spell</h1>");
}

#[tokio::test]
async fn test_content_types() {
    let dir = site();
    let cases = [
        ("/index.html", "text/html"),
        ("/assets/app.js", "application/javascript"),
        ("/assets/style.css", "text/css"),
        ("/manifest.json", "application/json"),
        ("/notes.md", "text/plain"),
    ];

    for (uri, expected) in cases {
        let router = create_routes(SiteRoot::new(dir.path(), "/"));
        let (status, content_type, _) = get(router, uri).await;
        assert_eq!(status, StatusCode::OK, "{}", uri);
        assert_eq!(content_type.as_deref(), Some(expected), "{}", uri);
    }
}

#[tokio::test]
async fn test_missing_file_is_404() {
    let dir = site();
    let router = create_routes(SiteRoot::new(dir.path(), "/"));

    let (status, _, body) = get(router, "/nope.js").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, b"Not Found");
}

#[tokio::test]
async fn test_directory_without_index_is_404() {
    let dir = site();
    let router = create_routes(SiteRoot::new(dir.path(), "/"));

    let (status, _, _) = get(router, "/assets/").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_traversal_is_404() {
    let outer = tempfile::tempdir().unwrap();
    fs::write(outer.path().join("secret.txt"), "secret").unwrap();
    let root = outer.path().join("dist");
    fs::create_dir(&root).unwrap();
    fs::write(root.join("index.html"), "ok").unwrap();

    let router = create_routes(SiteRoot::new(&root, "/"));
    let (status, _, body) = get(router, "/../secret.txt").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_ne!(body, b"secret");
}

#[tokio::test]
async fn test_base_prefix() {
    let dir = site();

    let router = create_routes(SiteRoot::new(dir.path(), "/spell-it/"));
    let (status, content_type, _) = get(router, "/spell-it/assets/app.js").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("application/javascript"));

    let router = create_routes(SiteRoot::new(dir.path(), "/spell-it/"));
    let (status, _, body) = get(router, "/spell-it/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"<h1>spell</h1>");
}

#[tokio::test]
async fn test_post_not_allowed() {
    let dir = site();
    let router = create_routes(SiteRoot::new(dir.path(), "/"));

    let response = router
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/index.html")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_server_router_uses_config() {
    let dir = site();
    let config = ServerConfig {
        root: dir.path().to_path_buf(),
        ..Default::default()
    };
    assert_eq!(config.addr(), "127.0.0.1:3000");

    let router = StaticServer::new(config).build_router();
    let (status, _, _) = get(router, "/manifest.json").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_port_in_use_is_a_server_error() {
    let dir = site();
    let taken = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let config = ServerConfig {
        root: dir.path().to_path_buf(),
        port: taken.local_addr().unwrap().port(),
        ..Default::default()
    };

    let result = StaticServer::new(config).run_with_shutdown(async {}).await;
    assert!(matches!(result, Err(SpellError::Server(_))));
}
