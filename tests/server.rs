//! End-to-end behavior of a filesystem-backed server

mod common;

use std::fs;

use common::{get, get_with, send, HUNDRED};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Response, StatusCode};
use tempfile::TempDir;

use fileserve::{FileHandler, FileServer, FilesystemResolver, RequestContext, ServeHooks, ServerSettings};

fn site() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("hundred.bin"), HUNDRED).unwrap();
    fs::write(dir.path().join("index.html"), "<h1>home</h1>").unwrap();
    fs::create_dir(dir.path().join("docs")).unwrap();
    fs::write(dir.path().join("docs").join("index.html"), "<h1>docs</h1>").unwrap();
    fs::write(dir.path().join("notes.txt"), "plain notes").unwrap();
    dir
}

fn start(handler: FileHandler) -> FileServer {
    FileServer::start("127.0.0.1:0".parse().unwrap(), handler, ServerSettings::default()).unwrap()
}

fn serve(dir: &TempDir) -> FileServer {
    start(FileHandler::new(FilesystemResolver::new(dir.path())))
}

#[tokio::test]
async fn full_body() {
    let dir = site();
    let server = serve(&dir);

    let reply = get(server.local_addr(), "/hundred.bin").await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.header("content-length"), Some("100"));
    assert_eq!(reply.header("content-type"), Some("application/octet-stream"));
    assert_eq!(reply.header("accept-ranges"), Some("bytes"));
    assert!(reply.header("etag").is_some());
    assert_eq!(&reply.body[..], HUNDRED);

    let reply = get(server.local_addr(), "/notes.txt").await;
    assert_eq!(reply.header("content-type"), Some("text/plain"));
    assert_eq!(&reply.body[..], b"plain notes");

    server.stop().await;
}

#[tokio::test]
async fn conditional_get() {
    let dir = site();
    let server = serve(&dir);
    let addr = server.local_addr();

    let first = get(addr, "/hundred.bin").await;
    let etag = first.header("etag").unwrap().to_string();

    let second = get_with(addr, "/hundred.bin", &[("If-None-Match", &etag)]).await;
    assert_eq!(second.status, StatusCode::NOT_MODIFIED);
    assert!(second.body.is_empty());

    let stale = get_with(addr, "/hundred.bin", &[("If-None-Match", "deadbeef")]).await;
    assert_eq!(stale.status, StatusCode::OK);
    assert_eq!(stale.body.len(), 100);

    server.stop().await;
}

#[tokio::test]
async fn etag_depends_on_query() {
    let dir = site();
    let server = serve(&dir);
    let addr = server.local_addr();

    let plain = get(addr, "/hundred.bin").await;
    let queried = get(addr, "/hundred.bin?v=2").await;
    assert_ne!(plain.header("etag"), queried.header("etag"));

    server.stop().await;
}

#[tokio::test]
async fn bounded_range() {
    let dir = site();
    let server = serve(&dir);

    let reply = get_with(server.local_addr(), "/hundred.bin", &[("Range", "bytes=10-19")]).await;
    assert_eq!(reply.status, StatusCode::PARTIAL_CONTENT);
    assert_eq!(reply.header("content-range"), Some("bytes 10-19/100"));
    assert_eq!(reply.header("content-length"), Some("10"));
    assert_eq!(&reply.body[..], &HUNDRED[10..20]);

    server.stop().await;
}

#[tokio::test]
async fn open_ended_range() {
    let dir = site();
    let server = serve(&dir);

    let reply = get_with(server.local_addr(), "/hundred.bin", &[("Range", "bytes=90-")]).await;
    assert_eq!(reply.status, StatusCode::PARTIAL_CONTENT);
    assert_eq!(reply.header("content-range"), Some("bytes 90-99/100"));
    assert_eq!(reply.header("content-length"), Some("10"));
    assert_eq!(&reply.body[..], &HUNDRED[90..]);

    server.stop().await;
}

#[tokio::test]
async fn unsatisfiable_range() {
    let dir = site();
    let server = serve(&dir);

    let reply = get_with(server.local_addr(), "/hundred.bin", &[("Range", "bytes=500-600")]).await;
    assert_eq!(reply.status, StatusCode::RANGE_NOT_SATISFIABLE);
    assert_eq!(reply.header("content-range"), Some("bytes 0-0/100"));
    assert_eq!(reply.header("content-type"), Some("text/plain"));
    assert!(reply.body.is_empty());

    server.stop().await;
}

#[tokio::test]
async fn directory_redirect_and_index() {
    let dir = site();
    let server = serve(&dir);
    let addr = server.local_addr();

    let reply = get(addr, "/docs").await;
    assert_eq!(reply.status, StatusCode::FOUND);
    assert_eq!(reply.header("location"), Some("/docs/"));

    let reply = get(addr, "/docs/").await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.header("content-type"), Some("text/html"));
    assert_eq!(&reply.body[..], b"<h1>docs</h1>");

    let reply = get(addr, "/").await;
    assert_eq!(&reply.body[..], b"<h1>home</h1>");

    server.stop().await;
}

#[tokio::test]
async fn non_get_is_rejected() {
    let dir = site();
    let server = serve(&dir);
    let addr = server.local_addr();

    for method in [Method::POST, Method::PUT, Method::DELETE] {
        let reply = send(addr, method, "/absent.txt", &[]).await;
        assert_eq!(reply.status, StatusCode::METHOD_NOT_ALLOWED);
        assert!(reply.body.is_empty());
    }

    server.stop().await;
}

#[tokio::test]
async fn missing_resource_is_404() {
    let dir = site();
    let server = serve(&dir);

    let reply = get(server.local_addr(), "/absent.txt").await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert!(reply.body.is_empty());

    server.stop().await;
}

struct BrandedNotFound;

impl ServeHooks for BrandedNotFound {
    fn on_not_found(&self, ctx: &RequestContext) -> Response<Full<Bytes>> {
        Response::builder()
            .status(StatusCode::NOT_FOUND)
            .header("Content-Type", "text/plain")
            .body(Full::new(Bytes::from(format!("no such file: {}", ctx.path()))))
            .unwrap()
    }
}

#[tokio::test]
async fn custom_not_found_hook() {
    let dir = site();
    let server = start(FileHandler::new(FilesystemResolver::new(dir.path())).hooks(BrandedNotFound));

    let reply = get(server.local_addr(), "/absent.txt").await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert_eq!(&reply.body[..], b"no such file: /absent.txt");

    server.stop().await;
}

#[tokio::test]
async fn mounted_below_prefix() {
    let dir = site();
    let server = start(FileHandler::new(FilesystemResolver::new(dir.path())).mount("/static"));
    let addr = server.local_addr();

    let reply = get(addr, "/static/hundred.bin").await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body.len(), 100);

    let reply = get(addr, "/static").await;
    assert_eq!(reply.status, StatusCode::FOUND);
    assert_eq!(reply.header("location"), Some("/static/"));

    let reply = get(addr, "/hundred.bin").await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);

    let reply = get(addr, "/staticfile").await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);

    server.stop().await;
}

#[tokio::test]
async fn parent_segments_stay_inside_root() {
    let outer = tempfile::tempdir().unwrap();
    fs::write(outer.path().join("secret.txt"), "secret").unwrap();
    let root = outer.path().join("public");
    fs::create_dir(&root).unwrap();
    fs::write(root.join("secret.txt"), "public copy").unwrap();

    let server = start(FileHandler::new(FilesystemResolver::new(&root)));
    let reply = get(server.local_addr(), "/../secret.txt").await;
    assert_eq!(&reply.body[..], b"public copy");

    server.stop().await;
}

#[tokio::test]
async fn fresh_server_has_no_connections() {
    let dir = site();
    let server = serve(&dir);
    assert_eq!(server.active_connections(), 0);
    assert_ne!(server.local_addr().port(), 0);
    server.stop().await;
}

#[tokio::test]
async fn percent_encoded_names() {
    let dir = site();
    fs::write(dir.path().join("my file.txt"), "spaced name").unwrap();
    let server = serve(&dir);

    let reply = get(server.local_addr(), "/my%20file.txt").await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.header("content-type"), Some("text/plain"));
    assert_eq!(&reply.body[..], b"spaced name");

    server.stop().await;
}

#[tokio::test]
async fn encoded_parent_segments_stay_inside_root() {
    let outer = tempfile::tempdir().unwrap();
    fs::write(outer.path().join("secret.txt"), "secret").unwrap();
    let root = outer.path().join("public");
    fs::create_dir(&root).unwrap();

    let server = start(FileHandler::new(FilesystemResolver::new(&root)));
    let addr = server.local_addr();

    let reply = get(addr, "/%2e%2e/secret.txt").await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);

    fs::write(root.join("secret.txt"), "public copy").unwrap();
    let reply = get(addr, "/%2E%2E/secret.txt").await;
    assert_eq!(&reply.body[..], b"public copy");

    server.stop().await;
}

#[tokio::test]
async fn several_mounts_on_one_server() {
    let first = site();
    let second = tempfile::tempdir().unwrap();
    fs::write(second.path().join("notes.txt"), "second notes").unwrap();
    fs::write(second.path().join("index.html"), "<h1>second</h1>").unwrap();

    let server = FileServer::builder()
        .mount("/context1", FileHandler::new(FilesystemResolver::new(first.path())))
        .mount("/context2", FileHandler::new(FilesystemResolver::new(second.path())))
        .start("127.0.0.1:0".parse().unwrap(), ServerSettings::default())
        .unwrap();
    let addr = server.local_addr();

    let reply = get(addr, "/context1/notes.txt").await;
    assert_eq!(&reply.body[..], b"plain notes");

    let reply = get(addr, "/context2/notes.txt").await;
    assert_eq!(&reply.body[..], b"second notes");

    let reply = get(addr, "/context2").await;
    assert_eq!(reply.status, StatusCode::FOUND);
    assert_eq!(reply.header("location"), Some("/context2/"));

    let reply = get(addr, "/context2/").await;
    assert_eq!(&reply.body[..], b"<h1>second</h1>");

    let reply = get(addr, "/context3/notes.txt").await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert!(reply.body.is_empty());

    server.stop().await;
}
