//! Per-request context
//!
//! Carries what the handler extracted from the request plus the memoized
//! resolution result. A context never outlives its request.

use std::borrow::Cow;
use std::collections::HashMap;

use hyper::{Method, Request};
use percent_encoding::percent_decode_str;

use crate::error::ServeError;
use crate::http::request::collect_headers;
use crate::resource::{Resolve, ResourceDescriptor};
use crate::routing::strip_mount;

/// Request context encapsulating information needed for request processing
#[derive(Debug)]
pub struct RequestContext {
    pub method: Method,
    /// Request path as received, without query
    pub request_uri: String,
    /// Decoded path below the mount point. `None` when the request is
    /// outside it or the path is not valid UTF-8 once decoded.
    pub path_info: Option<String>,
    /// Raw query string, empty when absent
    pub query: String,
    pub headers: HashMap<String, String>,
    resolution: Option<ResourceDescriptor>,
}

impl RequestContext {
    pub fn from_request<B>(req: &Request<B>, mount: &str) -> Self {
        let request_uri = req.uri().path().to_string();
        Self {
            method: req.method().clone(),
            path_info: path_info(&request_uri, mount),
            query: req.uri().query().unwrap_or_default().to_string(),
            headers: collect_headers(req.headers()),
            request_uri,
            resolution: None,
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// Path info, or the empty string when the request is outside the mount
    pub fn path(&self) -> &str {
        self.path_info.as_deref().unwrap_or_default()
    }

    /// Resolve the request once; later calls return the cached descriptor.
    pub async fn resolve(
        &mut self,
        resolver: &dyn Resolve,
    ) -> Result<&mut ResourceDescriptor, ServeError> {
        let descriptor = match self.resolution.take() {
            Some(descriptor) => descriptor,
            None => resolver.resolve(self.path()).await?,
        };
        Ok(self.resolution.insert(descriptor))
    }

    /// The cached descriptor, if resolution already ran
    pub const fn resolution(&self) -> Option<&ResourceDescriptor> {
        self.resolution.as_ref()
    }
}

/// Strip the mount prefix from the raw path, then percent-decode the rest.
///
/// `None` when the path is outside the mount or decodes to invalid UTF-8.
fn path_info(path: &str, mount: &str) -> Option<String> {
    let rest = strip_mount(path, mount)?;
    percent_decode_str(rest)
        .decode_utf8()
        .ok()
        .map(Cow::into_owned)
}
