//! Configuration freshness tokens
//!
//! A client asks for a version before deciding whether to request a full
//! compile. Known clients get the compiler's notion of their configuration
//! version and have their checkin recorded; everyone else gets a token that is
//! always newer than anything cached, which forces a recompile.

use std::sync::Arc;

use keel_core::effects::{CheckinEffects, CompilerEffects, NodeSearchEffects, PhysicalTimeEffects};
use keel_core::{CallContext, Node, VersionToken};
use tracing::debug;

/// Computes version tokens for callers
#[derive(Clone)]
pub struct VersionOracle {
    resolver: Arc<dyn NodeSearchEffects>,
    compiler: Arc<dyn CompilerEffects>,
    clock: Arc<dyn PhysicalTimeEffects>,
    checkins: Option<Arc<dyn CheckinEffects>>,
    store_configs: bool,
    local_margin_secs: u64,
}

impl VersionOracle {
    /// Create an oracle that never records checkins
    pub fn new(
        resolver: Arc<dyn NodeSearchEffects>,
        compiler: Arc<dyn CompilerEffects>,
        clock: Arc<dyn PhysicalTimeEffects>,
        local_margin_secs: u64,
    ) -> Self {
        Self {
            resolver,
            compiler,
            clock,
            checkins: None,
            store_configs: false,
            local_margin_secs,
        }
    }

    /// Record checkins through `recorder` when `enabled`
    pub fn with_checkins(mut self, recorder: Option<Arc<dyn CheckinEffects>>, enabled: bool) -> Self {
        self.checkins = recorder;
        self.store_configs = enabled;
        self
    }

    /// Version token for the caller.
    ///
    /// With a resolvable client identity this records a checkin and returns
    /// exactly what the compiler reports for the node. Without one, the token
    /// is the current time plus the safety margin.
    pub async fn version(&self, ctx: &CallContext) -> keel_core::Result<VersionToken> {
        if let Some(client) = ctx.client() {
            if let Some(node) = self.resolver.search(client).await {
                self.record_checkin(&node).await;
                return Ok(self.compiler.configuration_version(&node).await?);
            }
            debug!(client, "Version requested by unknown client");
        }
        Ok(self.always_recompile().await)
    }

    /// A token strictly newer than the current time
    pub async fn always_recompile(&self) -> VersionToken {
        let now = self.clock.current_timestamp().await;
        VersionToken::from_secs(now.saturating_add(self.local_margin_secs.max(1)))
    }

    async fn record_checkin(&self, node: &Node) {
        if !self.store_configs {
            return;
        }
        let Some(recorder) = &self.checkins else {
            return;
        };
        let now = self.clock.current_timestamp().await;
        if let Err(err) = recorder.record_checkin(&node.name, now).await {
            debug!(node = %node.name, error = %err, "Checkin not recorded");
        }
    }
}

impl std::fmt::Debug for VersionOracle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VersionOracle")
            .field("store_configs", &self.store_configs)
            .field("records_checkins", &self.checkins.is_some())
            .field("local_margin_secs", &self.local_margin_secs)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keel_testkit::{MockCheckinRecorder, MockClock, MockCompiler, MockNodeResolver, FIXED_NOW_SECS};

    fn oracle(resolver: &MockNodeResolver, compiler: &MockCompiler, clock: &MockClock) -> VersionOracle {
        VersionOracle::new(
            Arc::new(resolver.clone()),
            Arc::new(compiler.clone()),
            Arc::new(clock.clone()),
            1000,
        )
    }

    #[tokio::test]
    async fn test_local_version_is_in_the_future() {
        let clock = MockClock::default();
        let oracle = oracle(&MockNodeResolver::new(), &MockCompiler::new(), &clock);

        let token = oracle.version(&CallContext::local()).await.unwrap();
        assert_eq!(token, VersionToken::from_secs(FIXED_NOW_SECS + 1000));
    }

    #[tokio::test]
    async fn test_local_version_tracks_the_clock() {
        let clock = MockClock::default();
        let oracle = oracle(&MockNodeResolver::new(), &MockCompiler::new(), &clock);

        for _ in 0..5 {
            let now = clock.now();
            let token = oracle.version(&CallContext::local()).await.unwrap();
            assert!(token.as_secs() > now);
            clock.advance(7);
        }
    }

    #[tokio::test]
    async fn test_known_client_gets_compiler_version() {
        let resolver = MockNodeResolver::new().with_node(Node::new("web01"));
        let compiler = MockCompiler::new().with_version("web01", VersionToken::from_secs(42));
        let oracle = oracle(&resolver, &compiler, &MockClock::default());

        let token = oracle
            .version(&CallContext::remote("web01", None))
            .await
            .unwrap();

        assert_eq!(token, VersionToken::from_secs(42));
        assert_eq!(compiler.version_requests(), vec!["web01".to_string()]);
    }

    #[tokio::test]
    async fn test_unknown_client_forces_recompile() {
        let compiler = MockCompiler::new();
        let oracle = oracle(&MockNodeResolver::new(), &compiler, &MockClock::default());

        let token = oracle
            .version(&CallContext::remote("ghost", None))
            .await
            .unwrap();

        assert_eq!(token, VersionToken::from_secs(FIXED_NOW_SECS + 1000));
        assert!(compiler.version_requests().is_empty());
    }

    #[tokio::test]
    async fn test_checkin_recorded_only_when_enabled() {
        let resolver = MockNodeResolver::new().with_node(Node::new("web01"));
        let compiler = MockCompiler::new();
        let clock = MockClock::default();
        let recorder = MockCheckinRecorder::new();
        let ctx = CallContext::remote("web01", None);

        let disabled = oracle(&resolver, &compiler, &clock)
            .with_checkins(Some(Arc::new(recorder.clone())), false);
        disabled.version(&ctx).await.unwrap();
        assert!(recorder.records().is_empty());

        let enabled = oracle(&resolver, &compiler, &clock)
            .with_checkins(Some(Arc::new(recorder.clone())), true);
        enabled.version(&ctx).await.unwrap();
        assert_eq!(recorder.records(), vec![("web01".to_string(), FIXED_NOW_SECS)]);
    }

    #[tokio::test]
    async fn test_checkin_failures_are_swallowed() {
        let resolver = MockNodeResolver::new().with_node(Node::new("web01"));
        let compiler = MockCompiler::new().with_version("web01", VersionToken::from_secs(9));
        let recorder = MockCheckinRecorder::failing();
        let oracle = oracle(&resolver, &compiler, &MockClock::default())
            .with_checkins(Some(Arc::new(recorder.clone())), true);

        let token = oracle
            .version(&CallContext::remote("web01", None))
            .await
            .unwrap();

        assert_eq!(token, VersionToken::from_secs(9));
        assert_eq!(recorder.records().len(), 1);
    }
}
