//! Hosting server
//!
//! Binds a reusable listener and serves every accepted connection through a
//! shared [`MountTable`] until stopped. Each [`FileHandler`] in the table
//! answers below its own mount prefix.

pub mod connection;
pub mod listener;

// `loop` is a keyword, so the module is renamed
#[path = "loop.rs"]
pub mod server_loop;

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;
use tokio::task::JoinHandle;

use crate::handler::FileHandler;
use crate::logger;
use crate::routing::MountTable;

pub use listener::create_reusable_listener;
pub use server_loop::start_server_loop;

/// Connection-level settings for [`FileServer`]
#[derive(Debug, Clone, Copy)]
pub struct ServerSettings {
    pub connection_timeout: Duration,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            connection_timeout: Duration::from_secs(30),
        }
    }
}

/// A running server bound to one address
pub struct FileServer {
    addr: SocketAddr,
    shutdown: Arc<Notify>,
    active_connections: Arc<AtomicUsize>,
    task: JoinHandle<()>,
}

impl FileServer {
    /// Start composing a server hosting several mounts
    pub fn builder() -> FileServerBuilder {
        FileServerBuilder::default()
    }

    /// Bind `addr` and serve `handler` under its configured mount.
    ///
    /// Port `0` binds an ephemeral port; see [`FileServer::local_addr`].
    ///
    /// # Errors
    ///
    /// Returns the bind error if the listener cannot be created.
    pub fn start(
        addr: SocketAddr,
        handler: FileHandler,
        settings: ServerSettings,
    ) -> std::io::Result<Self> {
        Self::builder().handler(handler).start(addr, settings)
    }

    fn spawn(addr: SocketAddr, mounts: MountTable, settings: ServerSettings) -> std::io::Result<Self> {
        let listener = create_reusable_listener(addr)?;
        let addr = listener.local_addr()?;

        let shutdown = Arc::new(Notify::new());
        let active_connections = Arc::new(AtomicUsize::new(0));
        let task = tokio::spawn(start_server_loop(
            listener,
            Arc::new(mounts),
            settings,
            Arc::clone(&active_connections),
            Arc::clone(&shutdown),
        ));

        Ok(Self {
            addr,
            shutdown,
            active_connections,
            task,
        })
    }

    pub const fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Connections currently being served
    pub fn active_connections(&self) -> usize {
        self.active_connections.load(Ordering::SeqCst)
    }

    /// Stop accepting and wait for the accept loop to exit.
    ///
    /// Connections already accepted finish in their own tasks.
    pub async fn stop(self) {
        self.shutdown.notify_one();
        if let Err(e) = self.task.await {
            logger::log_error(&format!("Server task failed: {e}"));
        }
        logger::log_server_stop(&self.addr);
    }
}

/// Collects mounts for a [`FileServer`]
///
/// Requests go to the handler with the longest matching mount prefix; a path
/// no mount matches gets a plain 404.
#[derive(Default)]
pub struct FileServerBuilder {
    mounts: MountTable,
}

impl FileServerBuilder {
    /// Serve `handler` under `prefix`, replacing any earlier mount there
    #[must_use]
    pub fn mount(mut self, prefix: &str, handler: FileHandler) -> Self {
        self.mounts = self.mounts.mount(prefix, handler);
        self
    }

    /// Serve `handler` under the mount it was configured with
    #[must_use]
    pub fn handler(mut self, handler: FileHandler) -> Self {
        self.mounts = self.mounts.with_handler(handler);
        self
    }

    /// Bind `addr` and start accepting in a background task.
    ///
    /// # Errors
    ///
    /// Returns the bind error if the listener cannot be created.
    pub fn start(self, addr: SocketAddr, settings: ServerSettings) -> std::io::Result<FileServer> {
        if self.mounts.is_empty() {
            logger::log_warning("Starting a server without mounts; every request will get 404");
        }
        FileServer::spawn(addr, self.mounts, settings)
    }
}
