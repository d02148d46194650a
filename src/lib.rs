//! Static file serving over HTTP/1.1
//!
//! A [`FileHandler`] answers `GET` requests for resources found through a
//! resolution strategy (filesystem or embedded assets), with conditional GET,
//! single byte ranges and directory index redirects. [`FileServer`] hosts one
//! or more handlers, each under its own mount prefix, on a TCP listener.

pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod resource;
pub mod routing;
pub mod server;

pub use config::Config;
pub use error::ServeError;
pub use handler::{FileHandler, RequestContext, ServeHooks};
pub use resource::{EmbeddedResolver, FilesystemResolver, Resolve, ResolveOptions};
pub use routing::MountTable;
pub use server::{FileServer, FileServerBuilder, ServerSettings};
