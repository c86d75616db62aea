//! Layer 1: Collaborator Effect Trait Definitions
//!
//! Pure trait definitions for every external collaborator of the compilation
//! service. This module defines **what** the service may ask for; handlers in
//! `keel-effects` and `keel-testkit` define **how**.
//!
//! # Effect Classification
//!
//! ## Infrastructure Effects (`keel-effects`)
//! - **Facts**: server identity facts (`fqdn`, `ipaddress`, `hostname`, `domain`)
//! - **Time**: wall-clock seconds for version tokens and checkins
//! - **Checkin**: best-effort record of when a node last asked for its version
//!
//! ## External Engines (supplied by the embedding application)
//! - **NodeSearch**: identity key to node record
//! - **Compiler**: node record to configuration artifact

pub mod checkin;
pub mod compiler;
pub mod facts;
pub mod node;
pub mod time;

pub use checkin::{CheckinEffects, CheckinError};
pub use compiler::{CompilerEffects, CompilerFactory, CompilerOptions};
pub use facts::{FactEffects, FactError};
pub use node::NodeSearchEffects;
pub use time::PhysicalTimeEffects;
