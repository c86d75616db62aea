//! Layer 3: Production Effect Handlers
//!
//! Stateless (or minimally stateful) implementations of the collaborator
//! effects defined in `keel-core`. Mock handlers belong in `keel-testkit`.

#![forbid(unsafe_code)]

pub mod checkin;
pub mod facts;
pub mod logging;
pub mod node;
pub mod time;

pub use checkin::MemoryCheckinHandler;
pub use facts::{StaticFactHandler, SystemFactHandler};
pub use logging::init_tracing;
pub use node::PlainNodeResolver;
pub use time::RealTimeHandler;
