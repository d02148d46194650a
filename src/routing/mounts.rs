//! Mount table
//!
//! Several file handlers can share one server, each under its own prefix.

use std::sync::Arc;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Request, Response};

use super::matcher::{normalize_mount, strip_mount};
use crate::handler::FileHandler;
use crate::http;

/// Handlers keyed by mount prefix, longest prefix first
#[derive(Clone, Default)]
pub struct MountTable {
    mounts: Vec<(String, Arc<FileHandler>)>,
}

impl MountTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount `handler` under `prefix`, replacing any handler already there.
    ///
    /// The handler's own mount is set to `prefix`.
    #[must_use]
    pub fn mount(mut self, prefix: &str, handler: FileHandler) -> Self {
        let prefix = normalize_mount(prefix).to_string();
        let handler = Arc::new(handler.mount(prefix.clone()));

        self.mounts.retain(|(existing, _)| *existing != prefix);
        self.mounts.push((prefix, handler));
        self.mounts.sort_by(|(a, _), (b, _)| b.len().cmp(&a.len()));
        self
    }

    /// Mount `handler` under the prefix it was configured with
    #[must_use]
    pub fn with_handler(self, handler: FileHandler) -> Self {
        let prefix = handler.mount_point().to_string();
        self.mount(&prefix, handler)
    }

    pub fn is_empty(&self) -> bool {
        self.mounts.is_empty()
    }

    /// Handler with the longest mount matching `path`
    pub fn find(&self, path: &str) -> Option<&Arc<FileHandler>> {
        self.mounts
            .iter()
            .find(|(prefix, _)| strip_mount(path, prefix).is_some())
            .map(|(_, handler)| handler)
    }

    /// Dispatch to the matching handler; unmatched paths get a plain 404.
    pub async fn handle<B>(&self, req: Request<B>) -> Response<Full<Bytes>> {
        match self.find(req.uri().path()) {
            Some(handler) => handler.handle(req).await,
            None => http::build_404_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    use crate::resource::{EmbeddedResolver, MemoryAssets};

    fn handler(root: &str) -> FileHandler {
        let assets = MemoryAssets::new()
            .with_file("a/name.txt", b"from a")
            .with_file("b/name.txt", b"from b")
            .with_file("nested/name.txt", b"from nested");
        FileHandler::new(EmbeddedResolver::new(assets, root))
    }

    async fn body(table: &MountTable, uri: &str) -> (u16, Bytes) {
        let req = Request::builder().uri(uri).body(()).unwrap();
        let resp = table.handle(req).await;
        let status = resp.status().as_u16();
        (status, resp.into_body().collect().await.unwrap().to_bytes())
    }

    #[tokio::test]
    async fn test_routes_by_prefix() {
        let table = MountTable::new()
            .mount("/a", handler("/a"))
            .mount("/b/", handler("/b"));

        assert_eq!(body(&table, "/a/name.txt").await, (200, Bytes::from("from a")));
        assert_eq!(body(&table, "/b/name.txt").await, (200, Bytes::from("from b")));
        assert_eq!(body(&table, "/c/name.txt").await.0, 404);
        assert_eq!(body(&table, "/ab/name.txt").await.0, 404);
    }

    #[tokio::test]
    async fn test_longest_prefix_wins() {
        let table = MountTable::new()
            .mount("/", handler("/a"))
            .mount("/docs/nested", handler("/nested"));

        assert_eq!(
            body(&table, "/docs/nested/name.txt").await,
            (200, Bytes::from("from nested"))
        );
        assert_eq!(body(&table, "/name.txt").await, (200, Bytes::from("from a")));
    }

    #[test]
    fn test_remount_replaces() {
        let table = MountTable::new()
            .mount("/a", handler("/a"))
            .mount("/a/", handler("/b"));
        assert_eq!(table.mounts.len(), 1);
        assert!(table.find("/a/x").is_some());
        assert!(table.find("/x").is_none());
        assert!(!table.is_empty());
    }

    #[test]
    fn test_with_handler_uses_its_mount() {
        let table = MountTable::new().with_handler(handler("/a").mount("/static"));
        assert!(table.find("/static/name.txt").is_some());
        assert!(table.find("/name.txt").is_none());
    }
}
