//! Service configuration
//!
//! Configuration is read from TOML, optionally overridden from `KEEL_*`
//! environment variables, then validated before the service is constructed.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Default safety margin added to local version tokens, in seconds
pub const DEFAULT_LOCAL_VERSION_MARGIN_SECS: u64 = 1000;

/// Error type for configuration operations
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Configuration file could not be read
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path that failed to read
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Configuration text is not valid TOML for this schema
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value failed validation
    #[error("Invalid config value for {key}: {reason}")]
    Invalid {
        /// Offending key
        key: String,
        /// Why the value was rejected
        reason: String,
    },
}

impl From<ConfigError> for crate::KeelError {
    fn from(err: ConfigError) -> Self {
        crate::KeelError::invalid(err.to_string())
    }
}

/// How the lookup key for a node is chosen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeNameMode {
    /// A client identity supplied with the call overrides the lookup key
    #[default]
    Cert,
    /// The lookup key is always used as given
    Facter,
}

impl std::str::FromStr for NodeNameMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cert" => Ok(Self::Cert),
            "facter" => Ok(Self::Facter),
            other => Err(ConfigError::Invalid {
                key: "node_name".to_string(),
                reason: format!("unknown mode '{other}'"),
            }),
        }
    }
}

/// Compilation service configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompileServiceConfig {
    /// Lookup key selection
    pub node_name: NodeNameMode,

    /// Inline code handed to the compiler when it is constructed
    pub code: Option<String>,

    /// Emit compiler backtraces to server-side logs on compile errors
    pub trace: bool,

    /// Record node checkins when a version is requested
    pub store_configs: bool,

    /// Version reported to nodes as `serverversion`
    pub server_version: String,

    /// Seconds added to the current time for local version tokens
    pub local_version_margin_secs: u64,

    /// Facts pinned by the operator, consulted before discovered facts
    pub facts: BTreeMap<String, String>,
}

impl Default for CompileServiceConfig {
    fn default() -> Self {
        Self {
            node_name: NodeNameMode::default(),
            code: None,
            trace: false,
            store_configs: false,
            server_version: env!("CARGO_PKG_VERSION").to_string(),
            local_version_margin_secs: DEFAULT_LOCAL_VERSION_MARGIN_SECS,
            facts: BTreeMap::new(),
        }
    }
}

impl CompileServiceConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load configuration from a TOML file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Apply `KEEL_*` overrides from the process environment
    pub fn merge_with_env(&mut self) -> Result<(), ConfigError> {
        self.merge_with_vars(std::env::vars())
    }

    /// Apply `KEEL_*` overrides from an explicit variable set
    pub fn merge_with_vars<I>(&mut self, vars: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in vars {
            match key.as_str() {
                "KEEL_NODE_NAME" => self.node_name = value.parse()?,
                "KEEL_TRACE" => self.trace = parse_bool(&key, &value)?,
                "KEEL_STORE_CONFIGS" => self.store_configs = parse_bool(&key, &value)?,
                "KEEL_CODE" => self.code = Some(value),
                _ => {}
            }
        }
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server_version.trim().is_empty() {
            return Err(ConfigError::Invalid {
                key: "server_version".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        if self.local_version_margin_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "local_version_margin_secs".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::Invalid {
            key: key.to_string(),
            reason: format!("expected a boolean, got '{other}'"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = CompileServiceConfig::default();
        assert_eq!(config.node_name, NodeNameMode::Cert);
        assert!(!config.trace);
        assert!(!config.store_configs);
        assert_eq!(config.local_version_margin_secs, 1000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = CompileServiceConfig::from_toml_str(
            r#"
            node_name = "facter"
            trace = true

            [facts]
            fqdn = "pinned.example.com"
            "#,
        )
        .unwrap();

        assert_eq!(config.node_name, NodeNameMode::Facter);
        assert!(config.trace);
        assert_eq!(config.code, None);
        assert_eq!(config.facts.get("fqdn").map(String::as_str), Some("pinned.example.com"));
        assert_eq!(config.local_version_margin_secs, 1000);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "code = \"node default {{}}\"\nstore_configs = true").unwrap();

        let config = CompileServiceConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.code.as_deref(), Some("node default {}"));
        assert!(config.store_configs);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = CompileServiceConfig::load_from_file(Path::new("/nonexistent/keel.toml"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = CompileServiceConfig::default();
        config
            .merge_with_vars(vec![
                ("KEEL_NODE_NAME".to_string(), "facter".to_string()),
                ("KEEL_TRACE".to_string(), "yes".to_string()),
                ("KEEL_CODE".to_string(), "include base".to_string()),
                ("UNRELATED".to_string(), "ignored".to_string()),
            ])
            .unwrap();

        assert_eq!(config.node_name, NodeNameMode::Facter);
        assert!(config.trace);
        assert_eq!(config.code.as_deref(), Some("include base"));
    }

    #[test]
    fn test_env_rejects_bad_bool() {
        let mut config = CompileServiceConfig::default();
        let err = config
            .merge_with_vars(vec![("KEEL_TRACE".to_string(), "maybe".to_string())])
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn test_validate_rejects_zero_margin() {
        let config = CompileServiceConfig {
            local_version_margin_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
