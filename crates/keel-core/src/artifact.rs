//! Compiled configuration artifacts and version tokens

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque freshness marker for a node's configuration
///
/// Tokens are Unix timestamps in seconds. A client recompiles when the token it
/// receives is newer than the one its cached configuration was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionToken(u64);

impl VersionToken {
    /// Create a token from Unix seconds
    pub const fn from_secs(secs: u64) -> Self {
        Self(secs)
    }

    /// Unix seconds represented by this token
    pub const fn as_secs(self) -> u64 {
        self.0
    }
}

impl fmt::Display for VersionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for VersionToken {
    fn from(secs: u64) -> Self {
        Self(secs)
    }
}

/// Result of compiling a node
///
/// The service never inspects or mutates the document; it is produced by the
/// compiler and ownership passes to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigurationArtifact {
    /// Node the artifact was compiled for
    pub name: String,

    /// Environment the artifact was compiled in
    pub environment: Option<String>,

    /// Configuration version reported by the compiler
    pub version: VersionToken,

    /// Compiler-defined document body
    pub document: serde_json::Value,
}

impl ConfigurationArtifact {
    /// Create an artifact
    pub fn new(name: impl Into<String>, version: VersionToken, document: serde_json::Value) -> Self {
        Self {
            name: name.into(),
            environment: None,
            version,
            document,
        }
    }

    /// Set the environment the artifact was compiled in
    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = Some(environment.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_tokens_order_by_time() {
        assert!(VersionToken::from_secs(10) < VersionToken::from_secs(11));
        assert_eq!(VersionToken::from(5).to_string(), "5");
    }
}
