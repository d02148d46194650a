//! Filesystem-backed resolution
//!
//! Maps the path info onto a base directory. Directories are served through
//! their index file.

use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use tokio::fs;

use super::{Resolve, ResolveOptions, ResourceDescriptor, ResourceStream};
use crate::error::ServeError;
use crate::http::mime;

/// Serves files below `base_dir`
#[derive(Debug, Clone)]
pub struct FilesystemResolver {
    base_dir: PathBuf,
    options: ResolveOptions,
}

impl FilesystemResolver {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self::with_options(base_dir, ResolveOptions::default())
    }

    pub fn with_options(base_dir: impl Into<PathBuf>, options: ResolveOptions) -> Self {
        Self {
            base_dir: base_dir.into(),
            options,
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Join the `/`-separated path info onto the base directory.
    ///
    /// Empty, `.` and `..` segments are dropped, so the result never leaves
    /// `base_dir` lexically.
    pub fn map_path(&self, path_info: &str) -> PathBuf {
        path_info
            .split('/')
            .filter(|segment| !matches!(*segment, "" | "." | ".."))
            .fold(self.base_dir.clone(), |mut path, segment| {
                path.push(segment);
                path
            })
    }
}

#[async_trait]
impl Resolve for FilesystemResolver {
    async fn resolve(&self, path_info: &str) -> Result<ResourceDescriptor, ServeError> {
        let mut path = self.map_path(path_info);

        let is_directory = fs::metadata(&path).await.is_ok_and(|meta| meta.is_dir());
        if is_directory {
            path.push(&self.options.index_filename);
        }

        let display = path.display().to_string();
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let content_type = mime::lookup_or(&file_name, &self.options.default_content_type).to_string();

        let meta = match fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => meta,
            Ok(_) => return Ok(ResourceDescriptor::missing(display, is_directory, content_type)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Ok(ResourceDescriptor::missing(display, is_directory, content_type));
            }
            Err(e) => return Err(ServeError::resource(display, e)),
        };

        let file = fs::File::open(&path)
            .await
            .map_err(|e| ServeError::resource(display.clone(), e))?;
        let last_modified = meta.modified().map_or(0, epoch_millis);

        Ok(ResourceDescriptor::found(
            display,
            ResourceStream::new(file, meta.len()),
            is_directory,
            last_modified,
            content_type,
        ))
    }
}

fn epoch_millis(time: SystemTime) -> i64 {
    time.duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tokio::io::AsyncReadExt;

    fn site() -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<h1>root</h1>").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "plain notes").unwrap();
        std::fs::create_dir(dir.path().join("docs")).unwrap();
        std::fs::write(dir.path().join("docs").join("index.html"), "<h1>docs</h1>").unwrap();
        std::fs::create_dir(dir.path().join("empty")).unwrap();
        dir
    }

    #[test]
    fn test_map_path_drops_traversal() {
        let resolver = FilesystemResolver::new("/srv/www");
        assert_eq!(resolver.map_path("/a/b.txt"), Path::new("/srv/www/a/b.txt"));
        assert_eq!(resolver.map_path("/../etc/passwd"), Path::new("/srv/www/etc/passwd"));
        assert_eq!(resolver.map_path("//./x/"), Path::new("/srv/www/x"));
        assert_eq!(resolver.map_path(""), Path::new("/srv/www"));
    }

    #[tokio::test]
    async fn test_resolve_file() {
        let dir = site();
        let resolver = FilesystemResolver::new(dir.path());
        let mut descriptor = resolver.resolve("/notes.txt").await.unwrap();

        assert!(descriptor.exists());
        assert!(!descriptor.is_directory);
        assert_eq!(descriptor.content_type, "text/plain");
        assert!(descriptor.last_modified > 0);

        let mut stream = descriptor.take_stream().unwrap().unwrap();
        assert_eq!(stream.available(), 11);
        let mut body = String::new();
        stream.read_to_string(&mut body).await.unwrap();
        assert_eq!(body, "plain notes");
    }

    #[tokio::test]
    async fn test_resolve_directory_uses_its_index() {
        let dir = site();
        let resolver = FilesystemResolver::new(dir.path());
        let mut descriptor = resolver.resolve("/docs/").await.unwrap();

        assert!(descriptor.is_directory);
        assert_eq!(descriptor.content_type, "text/html");
        let mut body = String::new();
        descriptor
            .take_stream()
            .unwrap()
            .unwrap()
            .read_to_string(&mut body)
            .await
            .unwrap();
        assert_eq!(body, "<h1>docs</h1>");
    }

    #[tokio::test]
    async fn test_resolve_base_dir_without_slash_is_directory() {
        let dir = site();
        let resolver = FilesystemResolver::new(dir.path());
        let descriptor = resolver.resolve("").await.unwrap();
        assert!(descriptor.is_directory);
        assert!(descriptor.exists());
    }

    #[tokio::test]
    async fn test_directory_without_index_is_missing() {
        let dir = site();
        let resolver = FilesystemResolver::new(dir.path());
        let descriptor = resolver.resolve("/empty/").await.unwrap();
        assert!(descriptor.is_directory);
        assert!(!descriptor.exists());
        assert_eq!(descriptor.last_modified, 0);
    }

    #[tokio::test]
    async fn test_missing_file() {
        let dir = site();
        let resolver = FilesystemResolver::new(dir.path());
        let descriptor = resolver.resolve("/nope.bin").await.unwrap();
        assert!(!descriptor.exists());
        assert!(!descriptor.is_directory);
    }

    #[tokio::test]
    async fn test_custom_index_and_default_type() {
        let dir = site();
        std::fs::write(dir.path().join("docs").join("README"), "readme").unwrap();
        let options = ResolveOptions {
            index_filename: "README".to_string(),
            default_content_type: "text/plain".to_string(),
        };
        let resolver = FilesystemResolver::with_options(dir.path(), options);
        let descriptor = resolver.resolve("/docs/").await.unwrap();
        assert!(descriptor.exists());
        assert_eq!(descriptor.content_type, "text/plain");
    }
}
