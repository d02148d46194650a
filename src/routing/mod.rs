//! Routing module
//!
//! Maps request paths onto mounted file handlers:
//! - Mount prefix matching on path segment boundaries
//! - Longest-prefix selection across several mounts

mod matcher;
mod mounts;

pub use matcher::{normalize_mount, strip_mount};
pub use mounts::MountTable;
