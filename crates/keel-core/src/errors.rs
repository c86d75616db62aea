//! Unified error taxonomy for configuration compilation
//!
//! Internal components speak `KeelError`. Translation into whatever a transport
//! needs happens once, at the outer edge of the compilation service.

use serde::{Deserialize, Serialize};

/// Domain-level compilation failure
///
/// Produced by a compiler for syntax, semantic or evaluation errors in node
/// data. `trace` holds compiler-provided frames and is only ever written to
/// server-side logs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{message}")]
pub struct CompileError {
    /// Human-readable detail
    pub message: String,

    /// Compiler backtrace frames, innermost first
    pub trace: Vec<String>,
}

impl CompileError {
    /// Create a compile error without a trace
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            trace: Vec::new(),
        }
    }

    /// Attach backtrace frames
    pub fn with_trace(mut self, trace: Vec<String>) -> Self {
        self.trace = trace;
        self
    }
}

/// Failure returned by a compiler
#[derive(Debug, thiserror::Error)]
pub enum CompilerFailure {
    /// Failure inside the domain taxonomy
    #[error(transparent)]
    Domain(#[from] CompileError),

    /// Anything else (resource exhaustion, broken invariants)
    #[error("Fatal compiler failure: {0}")]
    Fatal(#[source] anyhow::Error),
}

/// Unified error type for compilation operations
#[derive(Debug, thiserror::Error)]
pub enum KeelError {
    /// Key did not resolve to any node
    #[error("Could not find node '{key}'")]
    NotFound {
        /// Key that failed to resolve
        key: String,
    },

    /// Domain-level compilation failure
    #[error(transparent)]
    Compile(#[from] CompileError),

    /// Invalid input or configuration
    #[error("Invalid: {message}")]
    Invalid {
        /// Error message describing the invalid input
        message: String,
    },

    /// Failure outside the domain taxonomy
    #[error("Fatal: {0}")]
    Fatal(#[source] anyhow::Error),
}

impl KeelError {
    /// Create a not found error
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound { key: key.into() }
    }

    /// Create an invalid input error
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }

    /// Create a fatal error
    pub fn fatal(err: impl Into<anyhow::Error>) -> Self {
        Self::Fatal(err.into())
    }
}

impl From<CompilerFailure> for KeelError {
    fn from(failure: CompilerFailure) -> Self {
        match failure {
            CompilerFailure::Domain(err) => Self::Compile(err),
            CompilerFailure::Fatal(err) => Self::Fatal(err),
        }
    }
}

/// Standard Result type for compilation operations
pub type Result<T> = std::result::Result<T, KeelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_names_key() {
        let err = KeelError::not_found("web01");
        assert_eq!(err.to_string(), "Could not find node 'web01'");
    }

    #[test]
    fn test_compile_error_displays_message_only() {
        let err = CompileError::new("bad syntax").with_trace(vec!["site.pp:3".into()]);
        assert_eq!(err.to_string(), "bad syntax");
        assert_eq!(err.trace.len(), 1);
    }

    #[test]
    fn test_compiler_failure_conversion() {
        let domain: KeelError = CompilerFailure::from(CompileError::new("oops")).into();
        assert!(matches!(domain, KeelError::Compile(_)));

        let fatal: KeelError = CompilerFailure::Fatal(anyhow::anyhow!("out of memory")).into();
        assert!(matches!(fatal, KeelError::Fatal(_)));
    }
}
