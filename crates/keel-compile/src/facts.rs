//! Server fact cache
//!
//! Server identity does not change while the service runs, so the facts are
//! gathered once when the service is constructed and then only read. Every
//! request enriches its node from the same immutable `ServerFacts`.

use std::collections::BTreeMap;

use keel_core::effects::FactEffects;
use keel_core::facts::{
    FACT_DOMAIN, FACT_FQDN, FACT_HOSTNAME, FACT_IPADDRESS, SERVER_IP, SERVER_NAME, SERVER_VERSION,
};
use keel_core::{Node, ParamValue, ServerFacts};
use tracing::{debug, warn};

/// Node parameters filled from provider facts, in gathering order
const PROVIDED_FACTS: [(&str, &str); 2] = [(SERVER_NAME, FACT_FQDN), (SERVER_IP, FACT_IPADDRESS)];

/// Write-once cache of server identity facts
#[derive(Debug, Clone, PartialEq)]
pub struct FactCache {
    facts: ServerFacts,
}

impl FactCache {
    /// Gather `serverversion`, `servername` and `serverip`.
    ///
    /// Unavailable facts are logged as warnings and left out. When `fqdn` is
    /// unavailable the server name falls back to `hostname.domain`, or just
    /// `hostname` when the domain is unknown.
    pub async fn gather(provider: &dyn FactEffects, server_version: &str) -> Self {
        let mut facts = BTreeMap::new();
        facts.insert(
            SERVER_VERSION.to_string(),
            ParamValue::from(server_version.to_string()),
        );

        for (param, fact) in PROVIDED_FACTS {
            match lookup(provider, fact).await {
                Some(value) => {
                    facts.insert(param.to_string(), ParamValue::from(value));
                }
                None => warn!(fact, "Could not retrieve fact {}", fact),
            }
        }

        if !facts.contains_key(SERVER_NAME) {
            if let Some(name) = fallback_server_name(provider).await {
                debug!(servername = %name, "Derived server name from hostname and domain");
                facts.insert(SERVER_NAME.to_string(), ParamValue::from(name));
            }
        }

        Self::from_facts(ServerFacts::new(facts))
    }

    /// Wrap an already gathered fact set
    pub fn from_facts(facts: ServerFacts) -> Self {
        Self { facts }
    }

    /// Merge every cached fact into the node, overwriting same-named parameters.
    ///
    /// Idempotent: enriching twice leaves the same values as enriching once.
    pub fn enrich(&self, node: &mut Node) {
        node.merge(&self.facts);
    }

    /// The cached facts
    pub fn facts(&self) -> &ServerFacts {
        &self.facts
    }
}

async fn lookup(provider: &dyn FactEffects, fact: &str) -> Option<String> {
    match provider.fact_value(fact).await {
        Ok(value) if !value.is_empty() => Some(value),
        Ok(_) => None,
        Err(err) => {
            debug!(fact, error = %err, "Fact lookup failed");
            None
        }
    }
}

async fn fallback_server_name(provider: &dyn FactEffects) -> Option<String> {
    let Some(host) = lookup(provider, FACT_HOSTNAME).await else {
        warn!(fact = FACT_HOSTNAME, "Could not retrieve fact {}", FACT_HOSTNAME);
        return None;
    };
    match lookup(provider, FACT_DOMAIN).await {
        Some(domain) => Some(format!("{host}.{domain}")),
        None => Some(host),
    }
}
