//! Error classification at the transport boundary
//!
//! Internal components return `KeelError`. `classify` runs once, at the outer
//! edge of the service, and decides what a caller gets to see: unknown nodes
//! stay distinguishable, compile errors become a normalized fault carrying
//! only the message, and anything outside the domain taxonomy passes through
//! untranslated as `Fatal`.

use keel_core::KeelError;
use serde::{Deserialize, Serialize};

/// Fault code for compile errors
pub const COMPILE_FAULT_CODE: i32 = 1;

/// Normalized error safe to send across a remote call boundary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("Fault {code}: {message}")]
pub struct TransportFault {
    /// Stable numeric fault code
    pub code: i32,

    /// Human-readable payload
    pub message: String,
}

impl TransportFault {
    /// Create a fault
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Error returned by the compilation service to its callers
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// The key did not resolve to any node
    #[error("Could not find node '{key}'")]
    NotFound {
        /// Key that failed to resolve
        key: String,
    },

    /// Normalized compile failure
    #[error(transparent)]
    Fault(#[from] TransportFault),

    /// Failure outside the domain taxonomy, left for the process supervisor
    #[error("Fatal: {0}")]
    Fatal(#[source] anyhow::Error),
}

impl ServiceError {
    /// The transport fault, if this error is one
    pub fn fault(&self) -> Option<&TransportFault> {
        match self {
            Self::Fault(fault) => Some(fault),
            _ => None,
        }
    }
}

/// Translate an internal error into what the caller receives
pub fn classify(err: KeelError) -> ServiceError {
    match err {
        KeelError::NotFound { key } => ServiceError::NotFound { key },
        KeelError::Compile(err) => {
            ServiceError::Fault(TransportFault::new(COMPILE_FAULT_CODE, err.message))
        }
        KeelError::Invalid { message } => ServiceError::Fatal(anyhow::anyhow!(message)),
        KeelError::Fatal(err) => ServiceError::Fatal(err),
    }
}

impl From<KeelError> for ServiceError {
    fn from(err: KeelError) -> Self {
        classify(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use keel_core::CompileError;

    #[test]
    fn test_compile_error_becomes_fault_with_message_only() {
        let err = KeelError::Compile(
            CompileError::new("bad syntax").with_trace(vec!["site.pp:12".into()]),
        );

        let fault = assert_matches!(classify(err), ServiceError::Fault(fault) => fault);
        assert_eq!(fault.code, COMPILE_FAULT_CODE);
        assert_eq!(fault.message, "bad syntax");
    }

    #[test]
    fn test_not_found_keeps_key() {
        assert_matches!(
            classify(KeelError::not_found("web01")),
            ServiceError::NotFound { key } if key == "web01"
        );
    }

    #[test]
    fn test_fatal_passes_through() {
        let err = classify(KeelError::fatal(anyhow::anyhow!("out of memory")));
        assert_matches!(&err, ServiceError::Fatal(_));
        assert!(err.fault().is_none());
        assert_eq!(err.to_string(), "Fatal: out of memory");
    }
}
