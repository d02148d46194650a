//! Request handler module
//!
//! Method gate, per-request context, overridable hooks and the range-aware
//! serving engine.

pub mod context;
pub mod dispatch;
pub mod hooks;
pub mod serve;

// Re-export main entry point
pub use context::RequestContext;
pub use dispatch::FileHandler;
pub use hooks::{DefaultHooks, ServeHooks};
pub use serve::{serve_stream, transfer, DEFAULT_BUFFER_SIZE};
