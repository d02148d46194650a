// Server loop module
// Accepts connections until the shutdown signal fires

use std::sync::atomic::AtomicUsize;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::Notify;

use super::connection::handle_connection;
use super::ServerSettings;
use crate::logger;
use crate::routing::MountTable;

pub async fn start_server_loop(
    listener: TcpListener,
    mounts: Arc<MountTable>,
    settings: ServerSettings,
    active_connections: Arc<AtomicUsize>,
    shutdown: Arc<Notify>,
) {
    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, _peer_addr)) => {
                        handle_connection(
                            stream,
                            Arc::clone(&mounts),
                            settings.connection_timeout,
                            Arc::clone(&active_connections),
                        );
                    }
                    Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
                }
            }

            () = shutdown.notified() => break,
        }
    }
}
