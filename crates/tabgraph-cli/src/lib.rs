//! Tabgraph command-line support.
//!
//! The binary is a thin clap layer over these helpers, so conversions and
//! pipelines can be driven (and tested) without spawning a process.

pub mod pipeline;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use tabgraph_graph::{parse_graph_file, serialize, Graph, OutputFormat};
use tabgraph_ingest_tabular::{
    StreamResourceRegistry, TabularConfig, TabularModule, TabularOutcome,
};
use tracing::debug;

pub use pipeline::{Module, ModuleRegistry, Pipeline, PipelineConfig, PipelineContext};

/// `file://` URL for a local path, used as the default source locator.
pub fn file_locator(path: &Path) -> Result<String> {
    let absolute: PathBuf = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .context("resolving the current directory")?
            .join(path)
    };
    url::Url::from_file_path(&absolute)
        .map(|u| u.to_string())
        .map_err(|_| anyhow!("cannot turn {} into a file URL", absolute.display()))
}

/// Load an input graph, or start from an empty one.
pub fn read_input_graph(path: Option<&Path>) -> Result<Graph> {
    match path {
        Some(path) => {
            let graph = parse_graph_file(path)
                .with_context(|| format!("reading input graph {}", path.display()))?;
            debug!(path = %path.display(), triples = graph.len(), "loaded input graph");
            Ok(graph)
        }
        None => Ok(Graph::new()),
    }
}

/// Serialize `graph` to `out`, or to stdout when no path is given.
pub fn write_graph(graph: &Graph, format: OutputFormat, out: Option<&Path>) -> Result<()> {
    let text = serialize(graph, format);
    match out {
        Some(path) => {
            fs::write(path, text).with_context(|| format!("writing {}", path.display()))
        }
        None => {
            print!("{text}");
            Ok(())
        }
    }
}

/// Convert a local delimited-text file.
///
/// The file's bytes are registered under the configured source locator.
pub fn convert_file(file: &Path, config: TabularConfig, input: &Graph) -> Result<TabularOutcome> {
    let mut resources = StreamResourceRegistry::new();
    resources
        .register_file(config.source_locator.clone(), file)
        .with_context(|| format!("reading {}", file.display()))?;
    let locator = config.source_locator.clone();
    TabularModule::new(config)
        .execute(input, &resources)
        .with_context(|| format!("converting {locator}"))
}
