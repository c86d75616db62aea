//! `CompilationService` wired to the production handlers from `keel-effects`

use std::collections::BTreeMap;
use std::sync::Arc;

use keel_compile::CompilationService;
use keel_core::{CallContext, CompileServiceConfig, VersionToken};
use keel_effects::{MemoryCheckinHandler, PlainNodeResolver, RealTimeHandler, SystemFactHandler};
use keel_testkit::{MockCompiler, MockCompilerFactory};

/// Pin the address so tests never depend on host name resolution
fn pinned_ip_config() -> CompileServiceConfig {
    let mut facts = BTreeMap::new();
    facts.insert("ipaddress".to_string(), "10.0.0.1".to_string());
    CompileServiceConfig {
        facts,
        ..Default::default()
    }
}

#[tokio::test]
async fn test_plain_resolver_and_system_facts() {
    let _ = keel_effects::init_tracing("debug");

    let factory = MockCompilerFactory::new(MockCompiler::new());
    let service = CompilationService::builder()
        .with_config(pinned_ip_config())
        .with_resolver(PlainNodeResolver::new().with_environment("production"))
        .with_compiler_factory(factory.clone())
        .with_fact_provider(SystemFactHandler::with_host_name("h"))
        .build()
        .await
        .unwrap();

    let artifact = service
        .find("anything.example.com", &CallContext::anonymous_remote())
        .await
        .unwrap();

    assert_eq!(artifact.name, "anything.example.com");
    assert_eq!(artifact.environment.as_deref(), Some("production"));
    // No fqdn and no domain for a bare host name
    assert_eq!(service.fact_cache().facts().get_str("servername"), Some("h"));
    assert_eq!(service.fact_cache().facts().get_str("serverip"), Some("10.0.0.1"));
    assert_eq!(
        factory.compiler().compiled()[0].parameter_str("serverversion"),
        Some(service.config().server_version.as_str())
    );
}

#[tokio::test]
async fn test_checkins_recorded_in_memory_when_store_configs_enabled() {
    let checkins = Arc::new(MemoryCheckinHandler::new());
    let compiler = MockCompiler::new().with_version("web01", VersionToken::from_secs(5));
    let service = CompilationService::builder()
        .with_config(CompileServiceConfig {
            store_configs: true,
            ..pinned_ip_config()
        })
        .with_resolver(PlainNodeResolver::new())
        .with_compiler_factory(MockCompilerFactory::new(compiler))
        .with_fact_provider(SystemFactHandler::with_host_name("h.example.com"))
        .with_clock(RealTimeHandler::new())
        .with_checkin_recorder(checkins.clone())
        .build()
        .await
        .unwrap();

    let token = service
        .version(&CallContext::remote("web01", None))
        .await
        .unwrap();

    assert_eq!(token, VersionToken::from_secs(5));
    assert!(checkins.last_checkin("web01").is_some());
    assert_eq!(checkins.tracked_nodes(), 1);
}
