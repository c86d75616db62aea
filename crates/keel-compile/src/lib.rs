//! Keel-Compile: Configuration Compilation Orchestration
//!
//! This crate is the request-handling layer of the configuration compilation
//! service. Given a client identity it resolves the node, enriches it with
//! server facts, delegates to the compiler and hands the artifact (or a version
//! token) back in a transport-appropriate form.
//!
//! # Architecture Overview
//!
//! ```text
//! key ─► NodeSearchEffects ─► Node ─► FactCache::enrich ─► CompilerEffects::compile
//!                                                                 │
//!                      caller ◄─ ResultEncoder ◄─ classify ◄──────┘
//! ```
//!
//! - **FactCache**: server identity facts gathered once at construction
//! - **CompilationService**: `find`, the single compile entry point
//! - **VersionOracle**: `version`, freshness tokens and checkin recording
//! - **ResultEncoder**: identity for local callers, YAML + URL escaping for remote ones
//! - **fault**: the one place internal errors become transport faults
//!
//! # Usage
//!
//! ```rust,no_run
//! use keel_compile::{CompilationService, ResultEncoder};
//! use keel_core::{CallContext, CompileServiceConfig};
//! use keel_effects::PlainNodeResolver;
//! # use keel_core::effects::CompilerFactory;
//!
//! # async fn example(factory: impl CompilerFactory + 'static) -> anyhow::Result<()> {
//! let service = CompilationService::builder()
//!     .with_config(CompileServiceConfig::default())
//!     .with_resolver(PlainNodeResolver::new())
//!     .with_compiler_factory(factory)
//!     .build()
//!     .await?;
//!
//! let ctx = CallContext::remote("web01.example.com", None);
//! let artifact = service.find("web01.example.com", &ctx).await?;
//! let wire = ResultEncoder::translate(artifact, &ctx)?;
//! # let _ = wire;
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![forbid(unsafe_code)]

/// Server fact cache
pub mod facts;

/// Error classification at the transport boundary
pub mod fault;

/// Result encoding for local and remote callers
pub mod encoder;

/// Compile timing and statistics
pub mod instrument;

/// The compilation service
pub mod service;

/// Configuration freshness tokens
pub mod version;

pub use encoder::{EncodeError, ResultEncoder, Translated};
pub use facts::FactCache;
pub use fault::{classify, ServiceError, TransportFault, COMPILE_FAULT_CODE};
pub use instrument::{CompileStats, CompileStatsSnapshot};
pub use service::{CompilationService, CompilationServiceBuilder};
pub use version::VersionOracle;
