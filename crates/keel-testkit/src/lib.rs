//! Keel Testkit - Deterministic Mock Collaborators
//!
//! Mock implementations of every collaborator effect with invocation counters
//! and recorded inputs, plus a tracing layer that captures log events for
//! assertions.
//!
//! Mocks use `parking_lot` locks and are cheap to clone; clones share state so
//! a test can keep a handle after moving one into the service.

#![allow(missing_docs)]
#![allow(clippy::unwrap_used, clippy::expect_used)]

pub mod checkin;
pub mod compiler;
pub mod facts;
pub mod logs;
pub mod node;
pub mod time;

pub use checkin::MockCheckinRecorder;
pub use compiler::{MockCompiler, MockCompilerFactory};
pub use facts::MockFactProvider;
pub use logs::{CapturedEvent, LogCapture};
pub use node::MockNodeResolver;
pub use time::MockClock;

/// Fixed: 2022-01-01 00:00:00 UTC
pub const FIXED_NOW_SECS: u64 = 1_640_995_200;
