//! Embedded-resource resolution
//!
//! Serves assets compiled into the program. Bundled content cannot change
//! at runtime, so every descriptor reports a last-modified time of `0`.

use std::collections::HashMap;
use std::io;
use std::marker::PhantomData;

use async_trait::async_trait;

use super::{Resolve, ResolveOptions, ResourceDescriptor, ResourceStream};
use crate::error::ServeError;
use crate::http::mime;

/// Outcome of looking up one embedded path
#[derive(Debug)]
pub enum Probe {
    File(ResourceStream),
    Directory,
    Absent,
}

/// Lookup primitive over a bundle of embedded assets
///
/// Paths are `/`-separated. Implementations decide how a leading `/` is
/// treated; the bundled sources ignore it.
pub trait EmbeddedSource: Send + Sync {
    fn probe(&self, path: &str) -> io::Result<Probe>;
}

/// Adapter over a `rust_embed` asset folder
pub struct RustEmbedSource<T: rust_embed::RustEmbed> {
    _assets: PhantomData<fn() -> T>,
}

impl<T: rust_embed::RustEmbed> RustEmbedSource<T> {
    pub const fn new() -> Self {
        Self {
            _assets: PhantomData,
        }
    }
}

impl<T: rust_embed::RustEmbed> Default for RustEmbedSource<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: rust_embed::RustEmbed> EmbeddedSource for RustEmbedSource<T> {
    fn probe(&self, path: &str) -> io::Result<Probe> {
        let key = path.trim_start_matches('/');
        if let Some(file) = T::get(key) {
            return Ok(Probe::File(ResourceStream::from_bytes(file.data)));
        }

        let prefix = format!("{key}/");
        if key.is_empty() || T::iter().any(|name| name.starts_with(&prefix)) {
            Ok(Probe::Directory)
        } else {
            Ok(Probe::Absent)
        }
    }
}

/// In-memory asset table, keyed by `/`-separated names without a leading `/`
#[derive(Debug, Default, Clone)]
pub struct MemoryAssets {
    files: HashMap<String, &'static [u8]>,
}

impl MemoryAssets {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_file(mut self, name: &str, data: &'static [u8]) -> Self {
        self.files
            .insert(name.trim_start_matches('/').to_string(), data);
        self
    }
}

impl EmbeddedSource for MemoryAssets {
    fn probe(&self, path: &str) -> io::Result<Probe> {
        let key = path.trim_start_matches('/');
        if let Some(data) = self.files.get(key) {
            return Ok(Probe::File(ResourceStream::from_bytes(*data)));
        }

        let prefix = format!("{key}/");
        if key.is_empty() || self.files.keys().any(|name| name.starts_with(&prefix)) {
            Ok(Probe::Directory)
        } else {
            Ok(Probe::Absent)
        }
    }
}

/// Serves assets from an [`EmbeddedSource`] below `root`
pub struct EmbeddedResolver<S> {
    source: S,
    root: String,
    options: ResolveOptions,
}

impl<S: EmbeddedSource> EmbeddedResolver<S> {
    pub fn new(source: S, root: impl Into<String>) -> Self {
        Self::with_options(source, root, ResolveOptions::default())
    }

    pub fn with_options(source: S, root: impl Into<String>, options: ResolveOptions) -> Self {
        Self {
            source,
            root: root.into(),
            options,
        }
    }

    /// Embedded path for the request, without trailing `/`
    pub fn embedded_path(&self, path_info: &str) -> String {
        let root = self.root.strip_suffix('/').unwrap_or(&self.root);
        let mut joined = format!("{root}{path_info}");
        if joined.ends_with('/') {
            joined.pop();
        }
        joined
    }
}

#[async_trait]
impl<S: EmbeddedSource> Resolve for EmbeddedResolver<S> {
    async fn resolve(&self, path_info: &str) -> Result<ResourceDescriptor, ServeError> {
        let mut path = self.embedded_path(path_info);

        let probe = match self.source.probe(&path) {
            Ok(probe) => probe,
            Err(e) => return Ok(ResourceDescriptor::failed(path, false, e)),
        };

        let is_directory = matches!(probe, Probe::Directory);
        let probe = if is_directory {
            path = format!("{path}/{}", self.options.index_filename);
            match self.source.probe(&path) {
                Ok(probe) => probe,
                Err(e) => return Ok(ResourceDescriptor::failed(path, true, e)),
            }
        } else {
            probe
        };

        let content_type = mime::lookup_or(&path, &self.options.default_content_type).to_string();
        Ok(match probe {
            Probe::File(stream) => {
                ResourceDescriptor::found(path, stream, is_directory, 0, content_type)
            }
            Probe::Directory | Probe::Absent => {
                ResourceDescriptor::missing(path, is_directory, content_type)
            }
        })
    }
}
