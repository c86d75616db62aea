//! Layer 3: Fact Effect Handlers - Production Only
//!
//! `SystemFactHandler` discovers server identity from the host it runs on.
//! `StaticFactHandler` answers from operator-pinned values and falls through to
//! an inner provider for anything it does not know.

use async_trait::async_trait;
use keel_core::effects::{FactEffects, FactError};
use keel_core::facts::{FACT_DOMAIN, FACT_FQDN, FACT_HOSTNAME, FACT_IPADDRESS};
use std::collections::BTreeMap;
use std::net::IpAddr;
use tracing::debug;

/// Fact handler backed by the local host
///
/// Answers `fqdn`, `hostname`, `domain` and `ipaddress`. Any other fact is
/// reported unavailable.
#[derive(Debug, Clone, Default)]
pub struct SystemFactHandler {
    host_name: Option<String>,
}

impl SystemFactHandler {
    /// Read the host name from the operating system
    pub fn new() -> Self {
        let host_name = sysinfo::System::host_name().filter(|name| !name.is_empty());
        if host_name.is_none() {
            debug!("Operating system reported no host name");
        }
        Self { host_name }
    }

    /// Use a fixed host name instead of asking the operating system
    pub fn with_host_name(host_name: impl Into<String>) -> Self {
        Self {
            host_name: Some(host_name.into()),
        }
    }

    fn host_name(&self, fact: &str) -> Result<&str, FactError> {
        self.host_name
            .as_deref()
            .ok_or_else(|| FactError::unavailable(fact))
    }

    async fn ip_address(&self) -> Result<String, FactError> {
        let host = self.host_name(FACT_IPADDRESS)?;
        let addrs = tokio::net::lookup_host((host, 0))
            .await
            .map_err(|e| FactError::ProviderFailed {
                reason: format!("resolving {host}: {e}"),
            })?;

        let mut fallback = None;
        for addr in addrs {
            match addr.ip() {
                IpAddr::V4(ip) if !ip.is_loopback() => return Ok(ip.to_string()),
                ip if fallback.is_none() => fallback = Some(ip),
                _ => {}
            }
        }
        fallback
            .map(|ip| ip.to_string())
            .ok_or_else(|| FactError::unavailable(FACT_IPADDRESS))
    }
}

#[async_trait]
impl FactEffects for SystemFactHandler {
    async fn fact_value(&self, name: &str) -> Result<String, FactError> {
        match name {
            FACT_FQDN => {
                let host = self.host_name(name)?;
                if host.contains('.') {
                    Ok(host.to_string())
                } else {
                    Err(FactError::unavailable(name))
                }
            }
            FACT_HOSTNAME => {
                let host = self.host_name(name)?;
                Ok(host.split('.').next().unwrap_or(host).to_string())
            }
            FACT_DOMAIN => self
                .host_name(name)?
                .split_once('.')
                .map(|(_, domain)| domain.to_string())
                .filter(|domain| !domain.is_empty())
                .ok_or_else(|| FactError::unavailable(name)),
            FACT_IPADDRESS => self.ip_address().await,
            _ => Err(FactError::unavailable(name)),
        }
    }
}

/// Fact handler answering from pinned values first
#[derive(Debug, Clone)]
pub struct StaticFactHandler<F> {
    pinned: BTreeMap<String, String>,
    inner: F,
}

impl<F: FactEffects> StaticFactHandler<F> {
    /// Pin `facts` in front of `inner`
    pub fn new(pinned: BTreeMap<String, String>, inner: F) -> Self {
        Self { pinned, inner }
    }
}

#[async_trait]
impl<F: FactEffects> FactEffects for StaticFactHandler<F> {
    async fn fact_value(&self, name: &str) -> Result<String, FactError> {
        match self.pinned.get(name) {
            Some(value) => Ok(value.clone()),
            None => self.inner.fact_value(name).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_qualified_host_name() {
        let handler = SystemFactHandler::with_host_name("h.example.com");

        assert_eq!(handler.fact_value(FACT_FQDN).await.unwrap(), "h.example.com");
        assert_eq!(handler.fact_value(FACT_HOSTNAME).await.unwrap(), "h");
        assert_eq!(handler.fact_value(FACT_DOMAIN).await.unwrap(), "example.com");
    }

    #[tokio::test]
    async fn test_short_host_name_has_no_fqdn_or_domain() {
        let handler = SystemFactHandler::with_host_name("h");

        assert_eq!(
            handler.fact_value(FACT_FQDN).await,
            Err(FactError::unavailable(FACT_FQDN))
        );
        assert_eq!(handler.fact_value(FACT_HOSTNAME).await.unwrap(), "h");
        assert!(handler.fact_value(FACT_DOMAIN).await.is_err());
    }

    #[tokio::test]
    async fn test_unknown_fact_is_unavailable() {
        let handler = SystemFactHandler::with_host_name("h.example.com");
        assert!(matches!(
            handler.fact_value("kernel").await,
            Err(FactError::Unavailable { .. })
        ));
    }

    #[tokio::test]
    async fn test_pinned_facts_take_precedence() {
        let mut pinned = BTreeMap::new();
        pinned.insert(FACT_FQDN.to_string(), "pinned.example.com".to_string());
        pinned.insert(FACT_IPADDRESS.to_string(), "10.0.0.1".to_string());
        let handler = StaticFactHandler::new(pinned, SystemFactHandler::with_host_name("h.local"));

        assert_eq!(handler.fact_value(FACT_FQDN).await.unwrap(), "pinned.example.com");
        assert_eq!(handler.fact_value(FACT_IPADDRESS).await.unwrap(), "10.0.0.1");
        assert_eq!(handler.fact_value(FACT_HOSTNAME).await.unwrap(), "h");
    }
}
