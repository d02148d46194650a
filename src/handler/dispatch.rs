//! Request dispatch module
//!
//! Entry point for HTTP request processing, responsible for method validation,
//! directory redirects, resolution and the error boundary.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures_util::FutureExt;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Request, Response};

use super::context::RequestContext;
use super::hooks::{DefaultHooks, ServeHooks};
use super::serve::{serve_stream, DEFAULT_BUFFER_SIZE};
use crate::error::ServeError;
use crate::http;
use crate::logger;
use crate::resource::Resolve;

/// Serves one mounted file tree through a resolution strategy
#[derive(Clone)]
pub struct FileHandler {
    resolver: Arc<dyn Resolve>,
    hooks: Arc<dyn ServeHooks>,
    mount: String,
    buffer_size: usize,
    access_log: bool,
}

impl FileHandler {
    pub fn new(resolver: impl Resolve + 'static) -> Self {
        Self {
            resolver: Arc::new(resolver),
            hooks: Arc::new(DefaultHooks),
            mount: "/".to_string(),
            buffer_size: DEFAULT_BUFFER_SIZE,
            access_log: false,
        }
    }

    /// Path prefix the handler answers under
    #[must_use]
    pub fn mount(mut self, mount: impl Into<String>) -> Self {
        self.mount = mount.into();
        self
    }

    /// Normalized mount prefix, `""` for the root
    pub fn mount_point(&self) -> &str {
        self.mount.trim_end_matches('/')
    }

    #[must_use]
    pub fn hooks(mut self, hooks: impl ServeHooks + 'static) -> Self {
        self.hooks = Arc::new(hooks);
        self
    }

    #[must_use]
    pub fn buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    #[must_use]
    pub const fn access_log(mut self, enabled: bool) -> Self {
        self.access_log = enabled;
        self
    }

    /// Handle one request. Never fails: errors go through the hooks.
    pub async fn handle<B>(&self, req: Request<B>) -> Response<Full<Bytes>> {
        let mut ctx = RequestContext::from_request(&req, &self.mount);
        drop(req);

        if self.access_log {
            logger::log_request(&ctx.method, &ctx.request_uri, &ctx.query);
        }

        let response = self.route(&mut ctx).await;

        if self.access_log {
            logger::log_response(response.status().as_u16(), &ctx.request_uri);
        }
        response
    }

    async fn route(&self, ctx: &mut RequestContext) -> Response<Full<Bytes>> {
        // 1. Check HTTP method
        if ctx.method != Method::GET {
            logger::log_warning(&format!("Method not allowed: {}", ctx.method));
            return http::build_405_response();
        }

        // 2. Requests outside the mount never reach the resolver
        if ctx.path_info.is_none() {
            return self.hooks.on_not_found(ctx);
        }

        // 3. Resolve and serve; errors and panics both land in the error hook
        let outcome = AssertUnwindSafe(self.dispatch(ctx)).catch_unwind().await;
        match outcome {
            Ok(Ok(Dispatched::Response(response))) => response,
            Ok(Ok(Dispatched::NotFound)) => self.hooks.on_not_found(ctx),
            Ok(Err(error)) => self.hooks.on_uncaught_error(ctx, &error),
            Err(payload) => {
                let error = ServeError::Panicked(panic_message(payload.as_ref()));
                self.hooks.on_uncaught_error(ctx, &error)
            }
        }
    }

    async fn dispatch(&self, ctx: &mut RequestContext) -> Result<Dispatched, ServeError> {
        let is_directory = ctx.resolve(self.resolver.as_ref()).await?.is_directory;

        if is_directory && !ctx.path().ends_with('/') {
            return Ok(Dispatched::Response(http::build_redirect_response(
                &format!("{}/", ctx.request_uri),
            )));
        }

        let descriptor = ctx.resolve(self.resolver.as_ref()).await?;
        let Some(stream) = descriptor.take_stream()? else {
            return Ok(Dispatched::NotFound);
        };
        let content_type = descriptor.content_type.clone();
        let last_modified = descriptor.last_modified;

        let response = serve_stream(ctx, stream, &content_type, self.buffer_size, last_modified).await?;
        Ok(Dispatched::Response(response))
    }
}

enum Dispatched {
    Response(Response<Full<Bytes>>),
    NotFound,
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
