//! The compilation service
//!
//! `find` is the single entry point that turns a key into a configuration
//! artifact:
//!
//! 1. pick the effective key (a client identity overrides it in `cert` mode)
//! 2. resolve the node, failing with `NotFound` when the resolver has none
//! 3. merge the cached server facts into the node
//! 4. compile under instrumentation, logging and classifying failures
//!
//! Each step completes before the next begins. The compiler and fact cache are
//! built once by `CompilationServiceBuilder::build` and shared by all requests.

use std::sync::Arc;

use keel_core::effects::{
    CheckinEffects, CompilerEffects, CompilerFactory, CompilerOptions, FactEffects,
    NodeSearchEffects, PhysicalTimeEffects,
};
use keel_core::{
    CallContext, CompileError, CompileServiceConfig, CompilerFailure, ConfigurationArtifact,
    KeelError, Node, NodeNameMode, VersionToken,
};
use keel_effects::{RealTimeHandler, StaticFactHandler, SystemFactHandler};
use tracing::{error, info_span, Instrument};
use uuid::Uuid;

use crate::encoder::{ResultEncoder, Translated};
use crate::facts::FactCache;
use crate::fault::{classify, ServiceError};
use crate::instrument::{benchmark, compile_message, CompileStats, CompileStatsSnapshot};
use crate::version::VersionOracle;

/// Log target for compiler backtraces
pub const TRACE_TARGET: &str = "keel::trace";

// =============================================================================
// Compilation Service
// =============================================================================

/// Resolves, enriches and compiles nodes on behalf of callers
///
/// Stateless per request: the only shared state is the write-once fact cache,
/// the compiler instance and the statistics counters.
pub struct CompilationService {
    config: CompileServiceConfig,
    resolver: Arc<dyn NodeSearchEffects>,
    compiler: Arc<dyn CompilerEffects>,
    fact_cache: FactCache,
    version_oracle: VersionOracle,
    stats: CompileStats,
}

impl CompilationService {
    /// Start building a service
    pub fn builder() -> CompilationServiceBuilder {
        CompilationServiceBuilder::default()
    }

    /// Compile the configuration for `key`.
    ///
    /// Fails with `ServiceError::NotFound` when no node resolves, and with a
    /// `ServiceError::Fault` carrying the compiler's message when compilation
    /// fails inside the domain taxonomy.
    pub async fn find(
        &self,
        key: &str,
        ctx: &CallContext,
    ) -> Result<ConfigurationArtifact, ServiceError> {
        let request_id = Uuid::new_v4();
        let span = info_span!(
            "find",
            %request_id,
            key,
            client = ctx.client(),
            client_ip = ctx.client_ip.as_deref(),
            local = ctx.is_local,
        );
        self.find_configuration(key, ctx)
            .instrument(span)
            .await
            .map_err(classify)
    }

    /// `find`, then translate the artifact for the caller's transport
    pub async fn find_translated(
        &self,
        key: &str,
        ctx: &CallContext,
    ) -> Result<Translated, ServiceError> {
        let artifact = self.find(key, ctx).await?;
        Ok(ResultEncoder::translate(artifact, ctx)?)
    }

    /// Version token for the caller; see `VersionOracle::version`
    pub async fn version(&self, ctx: &CallContext) -> Result<VersionToken, ServiceError> {
        self.version_oracle.version(ctx).await.map_err(classify)
    }

    /// The key a node is looked up under
    pub fn effective_key<'a>(&self, key: &'a str, ctx: &'a CallContext) -> &'a str {
        match (self.config.node_name, ctx.client()) {
            (NodeNameMode::Cert, Some(client)) => client,
            _ => key,
        }
    }

    /// Server facts merged into every node
    pub fn fact_cache(&self) -> &FactCache {
        &self.fact_cache
    }

    /// Version oracle sharing this service's resolver and compiler
    pub fn version_oracle(&self) -> &VersionOracle {
        &self.version_oracle
    }

    /// Configuration the service was built with
    pub fn config(&self) -> &CompileServiceConfig {
        &self.config
    }

    /// Compile counters since construction
    pub fn stats(&self) -> CompileStatsSnapshot {
        self.stats.snapshot()
    }

    async fn find_configuration(
        &self,
        key: &str,
        ctx: &CallContext,
    ) -> keel_core::Result<ConfigurationArtifact> {
        let key = self.effective_key(key, ctx);

        let mut node = self
            .resolver
            .search(key)
            .await
            .ok_or_else(|| KeelError::not_found(key))?;

        self.fact_cache.enrich(&mut node);

        self.compile(&node, ctx).await
    }

    async fn compile(&self, node: &Node, ctx: &CallContext) -> keel_core::Result<ConfigurationArtifact> {
        let message = compile_message(node);
        let result = benchmark(ctx, &message, &self.stats, self.compiler.compile(node)).await;

        match result {
            Ok(artifact) => Ok(artifact),
            Err(CompilerFailure::Domain(err)) => {
                self.report_compile_error(node, &err, ctx);
                Err(KeelError::Compile(err))
            }
            Err(CompilerFailure::Fatal(err)) => Err(KeelError::Fatal(err)),
        }
    }

    fn report_compile_error(&self, node: &Node, err: &CompileError, ctx: &CallContext) {
        if self.config.trace {
            for frame in &err.trace {
                error!(target: TRACE_TARGET, node = %node.name, "{}", frame);
            }
        }
        if !ctx.is_local {
            error!(node = %node.name, "{}", err);
        }
    }
}

impl std::fmt::Debug for CompilationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompilationService")
            .field("config", &self.config)
            .field("fact_cache", &self.fact_cache)
            .field("stats", &self.stats.snapshot())
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Builder for `CompilationService`
#[derive(Default)]
pub struct CompilationServiceBuilder {
    config: Option<CompileServiceConfig>,
    resolver: Option<Arc<dyn NodeSearchEffects>>,
    compiler_factory: Option<Arc<dyn CompilerFactory>>,
    facts: Option<Arc<dyn FactEffects>>,
    clock: Option<Arc<dyn PhysicalTimeEffects>>,
    checkins: Option<Arc<dyn CheckinEffects>>,
}

impl CompilationServiceBuilder {
    /// Set configuration
    pub fn with_config(mut self, config: CompileServiceConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the node resolver (required)
    pub fn with_resolver(mut self, resolver: impl NodeSearchEffects + 'static) -> Self {
        self.resolver = Some(Arc::new(resolver));
        self
    }

    /// Set the compiler factory (required)
    pub fn with_compiler_factory(mut self, factory: impl CompilerFactory + 'static) -> Self {
        self.compiler_factory = Some(Arc::new(factory));
        self
    }

    /// Set the fact provider. Defaults to the local host.
    pub fn with_fact_provider(mut self, provider: impl FactEffects + 'static) -> Self {
        self.facts = Some(Arc::new(provider));
        self
    }

    /// Set the clock. Defaults to the system clock.
    pub fn with_clock(mut self, clock: impl PhysicalTimeEffects + 'static) -> Self {
        self.clock = Some(Arc::new(clock));
        self
    }

    /// Set the checkin recorder used when `store_configs` is enabled
    pub fn with_checkin_recorder(mut self, recorder: impl CheckinEffects + 'static) -> Self {
        self.checkins = Some(Arc::new(recorder));
        self
    }

    /// Validate configuration, gather server facts and construct the compiler
    pub async fn build(self) -> Result<CompilationService, KeelError> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        let resolver = self
            .resolver
            .ok_or_else(|| KeelError::invalid("a node resolver is required"))?;
        let factory = self
            .compiler_factory
            .ok_or_else(|| KeelError::invalid("a compiler factory is required"))?;
        let provider = self
            .facts
            .unwrap_or_else(|| Arc::new(SystemFactHandler::new()));
        let clock = self
            .clock
            .unwrap_or_else(|| Arc::new(RealTimeHandler::new()));

        let provider = StaticFactHandler::new(config.facts.clone(), provider);
        let fact_cache = FactCache::gather(&provider, &config.server_version).await;

        let compiler = factory.create(CompilerOptions {
            code: config.code.clone(),
        })?;

        let version_oracle = VersionOracle::new(
            resolver.clone(),
            compiler.clone(),
            clock,
            config.local_version_margin_secs,
        )
        .with_checkins(self.checkins, config.store_configs);

        Ok(CompilationService {
            config,
            resolver,
            compiler,
            fact_cache,
            version_oracle,
            stats: CompileStats::new(),
        })
    }
}
