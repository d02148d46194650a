//! Error types for request handling
//!
//! Not-found and unsatisfiable ranges are ordinary responses. Everything in
//! here ends up at the dispatch boundary and is handed to the error hook.

use std::error::Error as _;
use std::fmt::Write as _;
use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServeError {
    /// Resolving or opening the backing resource failed
    #[error("failed to access resource '{path}'")]
    Resource {
        path: String,
        #[source]
        source: io::Error,
    },

    /// Reading the resource or writing the body failed mid-transfer
    #[error("failed to transfer '{path}'")]
    Transfer {
        path: String,
        #[source]
        source: io::Error,
    },

    /// A resolver or the engine panicked while handling the request
    #[error("request handler panicked: {0}")]
    Panicked(String),
}

impl ServeError {
    pub fn resource(path: impl Into<String>, source: io::Error) -> Self {
        Self::Resource {
            path: path.into(),
            source,
        }
    }

    pub fn transfer(path: impl Into<String>, source: io::Error) -> Self {
        Self::Transfer {
            path: path.into(),
            source,
        }
    }

    /// Render the error and its full cause chain, one entry per line.
    pub fn stack_trace(&self) -> String {
        let mut trace = format!("{self}\n");
        let mut source = self.source();
        while let Some(cause) = source {
            let _ = writeln!(trace, "Caused by: {cause}");
            source = cause.source();
        }
        trace
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stack_trace_includes_causes() {
        let inner = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
        let err = ServeError::resource("/secret.txt", inner);
        let trace = err.stack_trace();
        assert!(trace.starts_with("failed to access resource '/secret.txt'"));
        assert!(trace.contains("Caused by: access denied"));
    }

    #[test]
    fn test_panicked_has_no_cause() {
        let err = ServeError::Panicked("boom".to_string());
        assert_eq!(err.stack_trace(), "request handler panicked: boom\n");
    }
}
