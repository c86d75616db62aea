//! Server fact names and the immutable fact set
//!
//! `ServerFacts` is built once when the service starts and shared read-only by
//! every request afterwards.

use crate::node::ParamValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Node parameter carrying the service version
pub const SERVER_VERSION: &str = "serverversion";
/// Node parameter carrying the server's fully qualified name
pub const SERVER_NAME: &str = "servername";
/// Node parameter carrying the server's IP address
pub const SERVER_IP: &str = "serverip";

/// Provider fact used for the server name
pub const FACT_FQDN: &str = "fqdn";
/// Provider fact used for the server IP address
pub const FACT_IPADDRESS: &str = "ipaddress";
/// Provider fact used when `fqdn` is unavailable
pub const FACT_HOSTNAME: &str = "hostname";
/// Provider fact joined to `hostname` when `fqdn` is unavailable
pub const FACT_DOMAIN: &str = "domain";

/// Immutable mapping of server fact name to value
///
/// Cloning is cheap: the underlying map is shared.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerFacts {
    facts: Arc<BTreeMap<String, ParamValue>>,
}

impl ServerFacts {
    /// Freeze a fact map
    pub fn new(facts: BTreeMap<String, ParamValue>) -> Self {
        Self {
            facts: Arc::new(facts),
        }
    }

    /// Look up a fact
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.facts.get(name)
    }

    /// Look up a fact as a string
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(ParamValue::as_str)
    }

    /// Whether a fact is present
    pub fn contains(&self, name: &str) -> bool {
        self.facts.contains_key(name)
    }

    /// Number of facts held
    pub fn len(&self) -> usize {
        self.facts.len()
    }

    /// Whether no facts are held
    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    /// Iterate over all facts in name order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &ParamValue)> + '_ {
        self.facts.iter()
    }
}

impl<'a> IntoIterator for &'a ServerFacts {
    type Item = (&'a String, &'a ParamValue);
    type IntoIter = std::collections::btree_map::Iter<'a, String, ParamValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.facts.iter()
    }
}
