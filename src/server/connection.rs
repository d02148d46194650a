// Connection handling module
// Serves a single accepted TCP connection through the mount table

use std::convert::Infallible;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tokio::net::TcpStream;

use crate::logger;
use crate::routing::MountTable;

/// Handle a single connection in a spawned task.
///
/// The connection is wrapped in `TokioIo`, served over HTTP/1.1 with
/// keep-alive and cut off once `timeout` elapses. `active` counts the
/// connections currently being served.
pub fn handle_connection(
    stream: TcpStream,
    mounts: Arc<MountTable>,
    timeout: Duration,
    active: Arc<AtomicUsize>,
) {
    active.fetch_add(1, Ordering::SeqCst);

    tokio::spawn(async move {
        let io = TokioIo::new(stream);

        let mut builder = http1::Builder::new();
        builder.keep_alive(true);

        let conn = builder.serve_connection(
            io,
            service_fn(move |req| {
                let mounts = Arc::clone(&mounts);
                async move { Ok::<_, Infallible>(mounts.handle(req).await) }
            }),
        );

        match tokio::time::timeout(timeout, conn).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => logger::log_connection_error(&err),
            Err(_) => {
                logger::log_warning(&format!(
                    "Connection timeout after {} seconds",
                    timeout.as_secs()
                ));
            }
        }

        active.fetch_sub(1, Ordering::SeqCst);
    });
}
