//! Result encoding for local and remote callers
//!
//! Local callers share the process and get the artifact itself. Remote callers
//! get a YAML document escaped with form URL encoding so it survives a
//! text-oriented transport unmodified.

use keel_core::{CallContext, ConfigurationArtifact};

/// Error type for result encoding
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    /// Artifact could not be serialized or parsed back
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl From<EncodeError> for crate::ServiceError {
    fn from(err: EncodeError) -> Self {
        crate::ServiceError::Fatal(err.into())
    }
}

/// Artifact in the form handed to the caller
#[derive(Debug, Clone, PartialEq)]
pub enum Translated {
    /// In-process caller: the artifact, untouched
    Local(ConfigurationArtifact),
    /// Network caller: escaped YAML
    Remote(String),
}

impl Translated {
    /// The local artifact, if this is one
    pub fn into_local(self) -> Option<ConfigurationArtifact> {
        match self {
            Self::Local(artifact) => Some(artifact),
            Self::Remote(_) => None,
        }
    }

    /// The encoded text, if this is a remote result
    pub fn as_remote(&self) -> Option<&str> {
        match self {
            Self::Remote(text) => Some(text),
            Self::Local(_) => None,
        }
    }
}

/// Formats artifacts for the calling transport
#[derive(Debug, Clone, Copy, Default)]
pub struct ResultEncoder;

impl ResultEncoder {
    /// Translate an artifact for the caller described by `ctx`
    pub fn translate(
        artifact: ConfigurationArtifact,
        ctx: &CallContext,
    ) -> Result<Translated, EncodeError> {
        if ctx.is_local {
            return Ok(Translated::Local(artifact));
        }
        Ok(Translated::Remote(Self::encode_remote(&artifact)?))
    }

    /// YAML-serialize and URL-escape an artifact
    pub fn encode_remote(artifact: &ConfigurationArtifact) -> Result<String, EncodeError> {
        let yaml = serde_yaml::to_string(artifact)?;
        Ok(form_urlencoded::byte_serialize(yaml.as_bytes()).collect())
    }

    /// Reverse `encode_remote`
    pub fn decode_remote(encoded: &str) -> Result<ConfigurationArtifact, EncodeError> {
        // Encoded text never contains a raw '&' or '=', so it parses as a single key.
        let yaml = form_urlencoded::parse(encoded.as_bytes())
            .next()
            .map(|(text, _)| text.into_owned())
            .unwrap_or_default();
        Ok(serde_yaml::from_str(&yaml)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keel_core::VersionToken;

    fn artifact() -> ConfigurationArtifact {
        ConfigurationArtifact::new(
            "web01.example.com",
            VersionToken::from_secs(1_700_000_000),
            serde_json::json!({
                "classes": ["base", "web server"],
                "motd": "50% off & more = fun\nsecond line",
            }),
        )
        .with_environment("production")
    }

    #[test]
    fn test_local_caller_gets_artifact_unchanged() {
        let original = artifact();
        let translated = ResultEncoder::translate(original.clone(), &CallContext::local()).unwrap();

        assert_eq!(translated, Translated::Local(original));
    }

    #[test]
    fn test_remote_caller_gets_escaped_yaml() {
        let translated =
            ResultEncoder::translate(artifact(), &CallContext::remote("web01", None)).unwrap();
        let text = translated.as_remote().unwrap();

        assert!(!text.contains(' '));
        assert!(!text.contains('\n'));
        assert!(!text.contains('&'));
        assert!(!text.contains('='));
        assert!(text.starts_with("name%3A+web01.example.com"));
    }

    #[test]
    fn test_remote_encoding_decodes_to_same_artifact() {
        let original = artifact();
        let text = ResultEncoder::encode_remote(&original).unwrap();

        assert_eq!(ResultEncoder::decode_remote(&text).unwrap(), original);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(ResultEncoder::decode_remote("%5B%5B%5B").is_err());
    }
}
