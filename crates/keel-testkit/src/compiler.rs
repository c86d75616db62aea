//! Mock compiler and compiler factory

use async_trait::async_trait;
use keel_core::effects::{CompilerEffects, CompilerFactory, CompilerOptions};
use keel_core::{
    CompileError, CompilerFailure, ConfigurationArtifact, KeelError, Node, VersionToken,
};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Clone)]
enum Failure {
    Domain(CompileError),
    Fatal(String),
}

#[derive(Debug, Default)]
struct CompilerState {
    compiled: Vec<Node>,
    failure: Option<Failure>,
    versions: HashMap<String, VersionToken>,
    version_requests: Vec<String>,
}

/// Compiler that echoes node parameters into the artifact document
///
/// Every compiled node is recorded exactly as received, so tests can inspect
/// the enrichment the service applied.
#[derive(Debug, Clone, Default)]
pub struct MockCompiler {
    state: Arc<Mutex<CompilerState>>,
}

impl MockCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every compile with a domain error
    pub fn failing_with(self, err: CompileError) -> Self {
        self.state.lock().failure = Some(Failure::Domain(err));
        self
    }

    /// Fail every compile outside the domain taxonomy
    pub fn failing_fatally(self, reason: &str) -> Self {
        self.state.lock().failure = Some(Failure::Fatal(reason.to_string()));
        self
    }

    /// Report `version` for `node_name`
    pub fn with_version(self, node_name: &str, version: VersionToken) -> Self {
        self.state
            .lock()
            .versions
            .insert(node_name.to_string(), version);
        self
    }

    /// Nodes passed to `compile`, in call order
    pub fn compiled(&self) -> Vec<Node> {
        self.state.lock().compiled.clone()
    }

    pub fn compile_count(&self) -> usize {
        self.state.lock().compiled.len()
    }

    /// Node names passed to `configuration_version`, in call order
    pub fn version_requests(&self) -> Vec<String> {
        self.state.lock().version_requests.clone()
    }
}

#[async_trait]
impl CompilerEffects for MockCompiler {
    async fn compile(&self, node: &Node) -> Result<ConfigurationArtifact, CompilerFailure> {
        let mut state = self.state.lock();
        state.compiled.push(node.clone());

        match &state.failure {
            Some(Failure::Domain(err)) => return Err(CompilerFailure::Domain(err.clone())),
            Some(Failure::Fatal(reason)) => {
                return Err(CompilerFailure::Fatal(anyhow::anyhow!(reason.clone())))
            }
            None => {}
        }

        let version = state
            .versions
            .get(&node.name)
            .copied()
            .unwrap_or(VersionToken::from_secs(1));
        let document = serde_json::json!({
            "classes": ["base"],
            "parameters": node.parameters,
        });
        let mut artifact = ConfigurationArtifact::new(node.name.clone(), version, document);
        artifact.environment = node.environment.clone();
        Ok(artifact)
    }

    async fn configuration_version(&self, node: &Node) -> Result<VersionToken, CompilerFailure> {
        let mut state = self.state.lock();
        state.version_requests.push(node.name.clone());
        Ok(state
            .versions
            .get(&node.name)
            .copied()
            .unwrap_or(VersionToken::from_secs(1)))
    }
}

#[derive(Debug, Default)]
struct FactoryState {
    options: Vec<CompilerOptions>,
    fail: bool,
}

/// Factory handing out one shared `MockCompiler` and recording its options
#[derive(Debug, Clone, Default)]
pub struct MockCompilerFactory {
    compiler: MockCompiler,
    state: Arc<Mutex<FactoryState>>,
}

impl MockCompilerFactory {
    pub fn new(compiler: MockCompiler) -> Self {
        Self {
            compiler,
            state: Arc::default(),
        }
    }

    /// Factory whose construction always fails
    pub fn failing() -> Self {
        let factory = Self::default();
        factory.state.lock().fail = true;
        factory
    }

    /// Options passed to each `create` call
    pub fn created_with(&self) -> Vec<CompilerOptions> {
        self.state.lock().options.clone()
    }

    pub fn compiler(&self) -> &MockCompiler {
        &self.compiler
    }
}

impl CompilerFactory for MockCompilerFactory {
    fn create(&self, options: CompilerOptions) -> Result<Arc<dyn CompilerEffects>, KeelError> {
        let mut state = self.state.lock();
        state.options.push(options);
        if state.fail {
            return Err(KeelError::invalid("compiler sources could not be loaded"));
        }
        Ok(Arc::new(self.compiler.clone()))
    }
}
