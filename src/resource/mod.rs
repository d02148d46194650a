//! Resource resolution module
//!
//! A resolver maps the path info of a request onto a [`ResourceDescriptor`].
//! Two strategies exist: the local filesystem ([`FilesystemResolver`]) and
//! assets bundled into the program ([`EmbeddedResolver`]).

pub mod embedded;
pub mod fs;

use std::fmt;
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use async_trait::async_trait;
use tokio::io::{AsyncRead, ReadBuf};

use crate::error::ServeError;
use crate::http::mime::DEFAULT_MIME;

pub use embedded::{EmbeddedResolver, EmbeddedSource, MemoryAssets, Probe, RustEmbedSource};
pub use fs::FilesystemResolver;

/// Index file substituted when a request points at a directory
pub const DEFAULT_INDEX_FILENAME: &str = "index.html";

/// Strategy turning a request path into a resource
#[async_trait]
pub trait Resolve: Send + Sync {
    /// Resolve `path_info` (the request path below the mount point).
    ///
    /// A missing resource is not an error: it is a descriptor without a stream.
    async fn resolve(&self, path_info: &str) -> Result<ResourceDescriptor, ServeError>;
}

/// Settings shared by both resolution strategies
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    pub index_filename: String,
    pub default_content_type: String,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            index_filename: DEFAULT_INDEX_FILENAME.to_string(),
            default_content_type: DEFAULT_MIME.to_string(),
        }
    }
}

/// Readable resource body with a byte count snapshot taken at open time
pub struct ResourceStream {
    reader: Box<dyn AsyncRead + Send + Sync + Unpin>,
    available: u64,
}

impl ResourceStream {
    pub fn new(reader: impl AsyncRead + Send + Sync + Unpin + 'static, available: u64) -> Self {
        Self {
            reader: Box::new(reader),
            available,
        }
    }

    /// Stream over an in-memory buffer
    pub fn from_bytes<T>(data: T) -> Self
    where
        T: AsRef<[u8]> + Send + Sync + Unpin + 'static,
    {
        let available = data.as_ref().len() as u64;
        Self::new(io::Cursor::new(data), available)
    }

    /// Best-effort length of the resource, not a guaranteed byte count
    pub const fn available(&self) -> u64 {
        self.available
    }
}

impl AsyncRead for ResourceStream {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        Pin::new(&mut self.reader).poll_read(cx, buf)
    }
}

impl fmt::Debug for ResourceStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceStream")
            .field("available", &self.available)
            .finish_non_exhaustive()
    }
}

#[derive(Debug)]
enum Body {
    Stream(ResourceStream),
    Absent,
    Failed(io::Error),
    Taken,
}

/// Result of resolving one request path
///
/// Lives for a single request. Dropping it closes any stream it still holds.
#[derive(Debug)]
pub struct ResourceDescriptor {
    /// Path the resolver ended up at, after index substitution
    pub resolved_path: String,
    pub is_directory: bool,
    /// Epoch millis, `0` when unknown or immutable
    pub last_modified: i64,
    pub content_type: String,
    body: Body,
}

impl ResourceDescriptor {
    pub fn found(
        resolved_path: impl Into<String>,
        stream: ResourceStream,
        is_directory: bool,
        last_modified: i64,
        content_type: impl Into<String>,
    ) -> Self {
        Self {
            resolved_path: resolved_path.into(),
            is_directory,
            last_modified,
            content_type: content_type.into(),
            body: Body::Stream(stream),
        }
    }

    pub fn missing(resolved_path: impl Into<String>, is_directory: bool, content_type: impl Into<String>) -> Self {
        Self {
            resolved_path: resolved_path.into(),
            is_directory,
            last_modified: 0,
            content_type: content_type.into(),
            body: Body::Absent,
        }
    }

    /// Resolution hit an I/O error; it is raised once the stream is requested
    pub fn failed(resolved_path: impl Into<String>, is_directory: bool, error: io::Error) -> Self {
        Self {
            resolved_path: resolved_path.into(),
            is_directory,
            last_modified: 0,
            content_type: DEFAULT_MIME.to_string(),
            body: Body::Failed(error),
        }
    }

    /// Whether a readable stream backs this descriptor
    pub const fn exists(&self) -> bool {
        matches!(self.body, Body::Stream(_))
    }

    /// Hand the stream to the caller.
    ///
    /// Returns `Ok(None)` for missing resources and a wrapped error for a failed
    /// resolution. A second call yields `Ok(None)`.
    pub fn take_stream(&mut self) -> Result<Option<ResourceStream>, ServeError> {
        match std::mem::replace(&mut self.body, Body::Taken) {
            Body::Stream(stream) => Ok(Some(stream)),
            Body::Absent => {
                self.body = Body::Absent;
                Ok(None)
            }
            Body::Failed(error) => Err(ServeError::resource(self.resolved_path.clone(), error)),
            Body::Taken => Ok(None),
        }
    }
}
