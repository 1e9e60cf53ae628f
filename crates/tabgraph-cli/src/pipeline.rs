//! Linear pipelines of graph modules.
//!
//! A pipeline file is JSON:
//!
//! ```json
//! {
//!   "resources": { "http://example.org/people.csv": "people.csv" },
//!   "modules": [
//!     { "type": "tabular", "config": { "source-locator": "http://example.org/people.csv",
//!                                      "data-prefix": "http://example.org/people/" } },
//!     { "type": "merge", "config": { "graphs": ["extra.ttl"] } }
//!   ]
//! }
//! ```
//!
//! Each module's `type` tag is resolved through a [`ModuleRegistry`] once, when
//! the pipeline is loaded. Relative paths are taken from the pipeline file's
//! directory.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use tabgraph_graph::{parse_graph_file, Graph};
use tabgraph_ingest_tabular::{ConversionReport, StreamResourceRegistry, TabularConfig, TabularModule};
use tracing::{debug, info};

/// Shared state of one pipeline run.
#[derive(Debug, Default)]
pub struct PipelineContext {
    pub resources: StreamResourceRegistry,
    /// Conversion reports, keyed by module position.
    pub reports: Vec<(usize, ConversionReport)>,
}

pub trait Module {
    /// Type tag the module was built from.
    fn type_tag(&self) -> &'static str;

    /// Consume the previous module's graph and produce the next one.
    fn execute(&self, input: Graph, position: usize, ctx: &mut PipelineContext) -> Result<Graph>;
}

// ============================================================================
// Built-in modules
// ============================================================================

pub struct TabularStep {
    module: TabularModule,
}

impl Module for TabularStep {
    fn type_tag(&self) -> &'static str {
        "tabular"
    }

    fn execute(&self, input: Graph, position: usize, ctx: &mut PipelineContext) -> Result<Graph> {
        let locator = self.module.config().source_locator.clone();
        let outcome = self
            .module
            .execute(&input, &ctx.resources)
            .with_context(|| format!("tabular conversion of {locator}"))?;
        ctx.reports.push((position, outcome.report));
        Ok(outcome.graph)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct MergeConfig {
    graphs: Vec<PathBuf>,
}

/// Passes its input through, merged with any extra graph files.
pub struct MergeStep {
    graphs: Vec<PathBuf>,
}

impl Module for MergeStep {
    fn type_tag(&self) -> &'static str {
        "merge"
    }

    fn execute(&self, mut input: Graph, _position: usize, _ctx: &mut PipelineContext) -> Result<Graph> {
        for path in &self.graphs {
            let extra = parse_graph_file(path)
                .with_context(|| format!("reading graph {}", path.display()))?;
            debug!(path = %path.display(), triples = extra.len(), "merging graph");
            input = input.merge(&extra);
        }
        Ok(input)
    }
}

// ============================================================================
// Registry
// ============================================================================

/// Builds a module from its JSON configuration and the pipeline directory.
pub type ModuleFactory = fn(&serde_json::Value, &Path) -> Result<Box<dyn Module>>;

fn tabular_factory(config: &serde_json::Value, _base: &Path) -> Result<Box<dyn Module>> {
    let config: TabularConfig =
        serde_json::from_value(config.clone()).context("invalid tabular module configuration")?;
    Ok(Box::new(TabularStep {
        module: TabularModule::new(config),
    }))
}

fn merge_factory(config: &serde_json::Value, base: &Path) -> Result<Box<dyn Module>> {
    let config: MergeConfig = if config.is_null() {
        MergeConfig::default()
    } else {
        serde_json::from_value(config.clone()).context("invalid merge module configuration")?
    };
    Ok(Box::new(MergeStep {
        graphs: config.graphs.iter().map(|p| base.join(p)).collect(),
    }))
}

#[derive(Clone)]
pub struct ModuleRegistry {
    factories: BTreeMap<String, ModuleFactory>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self {
            factories: BTreeMap::new(),
        }
    }

    /// Registry with the built-in `tabular` and `merge` modules.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("tabular", tabular_factory);
        registry.register("merge", merge_factory);
        registry
    }

    pub fn register(&mut self, type_tag: impl Into<String>, factory: ModuleFactory) {
        self.factories.insert(type_tag.into(), factory);
    }

    pub fn type_tags(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    pub fn build(
        &self,
        type_tag: &str,
        config: &serde_json::Value,
        base: &Path,
    ) -> Result<Box<dyn Module>> {
        let factory = self.factories.get(type_tag).ok_or_else(|| {
            anyhow!(
                "unknown module type `{type_tag}` (known: {})",
                self.type_tags().collect::<Vec<_>>().join(", ")
            )
        })?;
        factory(config, base)
    }
}

impl Default for ModuleRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

// ============================================================================
// Pipeline files
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct ModuleSpec {
    #[serde(rename = "type")]
    pub type_tag: String,
    #[serde(default)]
    pub config: serde_json::Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    /// Source locator -> file path.
    #[serde(default)]
    pub resources: BTreeMap<String, PathBuf>,
    pub modules: Vec<ModuleSpec>,
}

impl PipelineConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("invalid pipeline configuration")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading pipeline {}", path.display()))?;
        Self::from_json(&text)
    }
}

pub struct Pipeline {
    modules: Vec<Box<dyn Module>>,
    context: PipelineContext,
}

impl Pipeline {
    /// Resolve every module and load every resource, relative to `base`.
    pub fn build(config: &PipelineConfig, registry: &ModuleRegistry, base: &Path) -> Result<Self> {
        let mut context = PipelineContext::default();
        for (locator, path) in &config.resources {
            let path = base.join(path);
            context
                .resources
                .register_file(locator.clone(), &path)
                .with_context(|| format!("loading resource {locator} from {}", path.display()))?;
        }

        let modules = config
            .modules
            .iter()
            .enumerate()
            .map(|(idx, spec)| {
                registry
                    .build(&spec.type_tag, &spec.config, base)
                    .with_context(|| format!("module #{} ({})", idx + 1, spec.type_tag))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { modules, context })
    }

    pub fn load(path: &Path, registry: &ModuleRegistry) -> Result<Self> {
        let config = PipelineConfig::load(path)?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        Self::build(&config, registry, base)
    }

    pub fn resources_mut(&mut self) -> &mut StreamResourceRegistry {
        &mut self.context.resources
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Run every module in order, threading the graph through.
    pub fn run(mut self, input: Graph) -> Result<(Graph, Vec<(usize, ConversionReport)>)> {
        let mut graph = input;
        for (idx, module) in self.modules.iter().enumerate() {
            info!(module = idx + 1, kind = module.type_tag(), "running module");
            graph = module.execute(graph, idx, &mut self.context)?;
        }
        Ok((graph, self.context.reports))
    }
}
