//! Overridable response hooks
//!
//! The dispatch boundary calls these for the two outcomes an embedder may want
//! to shape: a missing resource and a failed request.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

use super::context::RequestContext;
use crate::error::ServeError;
use crate::http;
use crate::logger;

pub trait ServeHooks: Send + Sync {
    /// Called when the path does not resolve to a readable resource.
    fn on_not_found(&self, _ctx: &RequestContext) -> Response<Full<Bytes>> {
        http::build_404_response()
    }

    /// Called when resolution or serving failed.
    ///
    /// The default exposes the error chain in the body, which suits tests and
    /// debugging. Production embedders should override it.
    fn on_uncaught_error(&self, ctx: &RequestContext, error: &ServeError) -> Response<Full<Bytes>> {
        logger::log_error(&format!("{} {}: {error}", ctx.method, ctx.request_uri));
        http::build_500_response(error.stack_trace())
    }
}

/// Hooks with the stock 404 and 500 behavior
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultHooks;

impl ServeHooks for DefaultHooks {}
