//! Keel Core - Configuration Compilation Foundation
//!
//! This crate provides the pure data types and effect interfaces shared by every
//! layer of the configuration compilation service. It contains no I/O and no
//! orchestration logic.
//!
//! # Architecture Layers
//!
//! ## Data Types
//! - `Node`: per-request record of a client's identity, environment and parameters
//! - `ServerFacts`: immutable server identity facts merged into every node
//! - `ConfigurationArtifact`: the compiled result handed back to the caller
//! - `VersionToken`: opaque freshness marker used to decide on recompilation
//! - `CallContext`: who is calling and whether the call is in-process
//!
//! ## Effect Interfaces (Pure Signatures)
//! - `NodeSearchEffects`: `search`
//! - `CompilerEffects`: `compile`, `configuration_version`
//! - `FactEffects`: `fact_value`
//! - `CheckinEffects`: `record_checkin`
//! - `PhysicalTimeEffects`: `now_secs`
//!
//! Handlers live in `keel-effects` (production) and `keel-testkit` (mocks).

#![allow(missing_docs)]
#![forbid(unsafe_code)]

// === Core Modules ===

/// Compiled configuration artifacts and version tokens
pub mod artifact;

/// Service configuration and loading
pub mod config;

/// Per-call context supplied by the transport layer
pub mod context;

/// Effect trait definitions for external collaborators
pub mod effects;

/// Unified error taxonomy
pub mod errors;

/// Server fact names and the immutable fact set
pub mod facts;

/// Node records
pub mod node;

// === Re-exports ===

pub use artifact::{ConfigurationArtifact, VersionToken};
pub use config::{CompileServiceConfig, ConfigError, NodeNameMode};
pub use context::CallContext;
pub use errors::{CompileError, CompilerFailure, KeelError, Result};
pub use facts::ServerFacts;
pub use node::{Node, ParamValue};
