//! Logger module
//!
//! Thin facade over `tracing` covering:
//! - Subscriber setup from configuration
//! - Server lifecycle logging
//! - Access logging
//! - Error and warning logging

use std::net::SocketAddr;

use hyper::Method;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::{Config, LoggingConfig};

/// Initialize the global subscriber
///
/// `RUST_LOG` takes precedence over `logging.level`. Calling this more than
/// once keeps the first subscriber.
pub fn init(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    info!(target: "fileserve::server", "Listening on: http://{addr}");
    info!(
        target: "fileserve::server",
        root = %config.files.root,
        mount = %config.files.mount,
        index = %config.files.index_filename,
        buffer_size = config.files.buffer_size,
        "Serving files"
    );
    if let Some(workers) = config.server.workers {
        info!(target: "fileserve::server", "Worker threads: {workers}");
    }
}

pub fn log_server_stop(addr: &SocketAddr) {
    info!(target: "fileserve::server", "Server on {addr} stopped");
}

pub fn log_request(method: &Method, path: &str, query: &str) {
    if query.is_empty() {
        info!(target: "fileserve::access", "{method} {path}");
    } else {
        info!(target: "fileserve::access", "{method} {path}?{query}");
    }
}

pub fn log_response(status: u16, path: &str) {
    info!(target: "fileserve::access", status, "{path} -> {status}");
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    error!(target: "fileserve::server", "Failed to serve connection: {err:?}");
}

pub fn log_error(message: &str) {
    error!(target: "fileserve", "{message}");
}

pub fn log_warning(message: &str) {
    warn!(target: "fileserve", "{message}");
}
