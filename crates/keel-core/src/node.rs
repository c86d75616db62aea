//! Node records
//!
//! A `Node` is created by the resolver for a single request, enriched with
//! server facts, consumed by the compiler and then dropped.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Parameter value carried by a node
pub type ParamValue = serde_json::Value;

/// Per-request node record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Identity key the node was resolved under
    pub name: String,

    /// Environment the node belongs to, if any
    pub environment: Option<String>,

    /// Node parameters (facts, classifier data). Keys are unique.
    pub parameters: BTreeMap<String, ParamValue>,
}

impl Node {
    /// Create a bare node with no environment and no parameters
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            environment: None,
            parameters: BTreeMap::new(),
        }
    }

    /// Set the node's environment
    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = Some(environment.into());
        self
    }

    /// Add a single parameter
    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    /// Merge parameters into the node in place.
    ///
    /// Incoming keys overwrite existing keys of the same name; keys not named
    /// by `params` are left untouched.
    pub fn merge<'a, I>(&mut self, params: I)
    where
        I: IntoIterator<Item = (&'a String, &'a ParamValue)>,
    {
        for (key, value) in params {
            self.parameters.insert(key.clone(), value.clone());
        }
    }

    /// Look up a parameter as a string
    pub fn parameter_str(&self, key: &str) -> Option<&str> {
        self.parameters.get(key).and_then(ParamValue::as_str)
    }
}
