//! Per-call context supplied by the transport layer
//!
//! The surrounding RPC layer decides whether a call is local (in-process) and
//! which client identity, if any, accompanies it. The service consults
//! `is_local` only when logging and encoding.

use serde::{Deserialize, Serialize};

/// Caller information for a single `find` or `version` call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallContext {
    /// Client identity (certificate name) presented by the caller
    pub client: Option<String>,

    /// Client address as seen by the transport. Recorded, not interpreted.
    pub client_ip: Option<String>,

    /// Whether the caller runs in-process
    pub is_local: bool,
}

impl CallContext {
    /// In-process call with no client identity
    pub fn local() -> Self {
        Self {
            client: None,
            client_ip: None,
            is_local: true,
        }
    }

    /// Network call carrying a client identity
    pub fn remote(client: impl Into<String>, client_ip: Option<String>) -> Self {
        Self {
            client: Some(client.into()),
            client_ip,
            is_local: false,
        }
    }

    /// Network call without a client identity
    pub fn anonymous_remote() -> Self {
        Self::default()
    }

    /// Client identity, if supplied
    pub fn client(&self) -> Option<&str> {
        self.client.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        assert!(CallContext::local().is_local);
        assert!(!CallContext::anonymous_remote().is_local);

        let ctx = CallContext::remote("agent.example.com", Some("10.1.1.1".into()));
        assert_eq!(ctx.client(), Some("agent.example.com"));
        assert!(!ctx.is_local);
    }
}
