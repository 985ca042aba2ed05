//! Batch source reading exported binding graph snapshots

use std::path::Path;

use appgraph_core::Graph;
use tracing::debug;

use super::extractor;
use super::model::{BindingGraph, BindingGraphSnapshot};
use crate::error::SourceError;
use crate::source::{
    DiscoveryRule, GraphSource, GraphSourceInput, GraphSourceResult, describe_paths,
    discover_json_files, read_file,
};

pub const DISCOVERY: DiscoveryRule = DiscoveryRule {
    directory: "binding-graphs",
    file_prefix: "binding-graph-",
};

#[derive(Debug, Default)]
pub struct BindingGraphSource;

impl BindingGraphSource {
    pub fn new() -> Self {
        BindingGraphSource
    }

    /// Parse one snapshot. `Ok(None)` for module binding graphs, which are
    /// not extracted.
    pub fn extract_from_json(&self, json: &str) -> Result<Option<Graph>, SourceError> {
        let snapshot = BindingGraphSnapshot::from_json(json)?;
        if snapshot.is_module_binding_graph() {
            debug!(root = %snapshot.root.path, "skipping module binding graph");
            return Ok(None);
        }
        Ok(Some(extractor::extract(&snapshot)))
    }

    pub fn extract_from_file(&self, path: &Path) -> Result<Option<Graph>, SourceError> {
        let json = read_file(path)?;
        self.extract_from_json(&json).map_err(|e| e.at(path))
    }
}

impl GraphSource for BindingGraphSource {
    fn source_type(&self) -> &'static str {
        "binding-graph"
    }

    fn display_name(&self) -> &'static str {
        "Binding graph snapshot"
    }

    fn extract(&self, input: &GraphSourceInput) -> GraphSourceResult {
        let files = discover_json_files(&input.paths, DISCOVERY);
        if files.is_empty() {
            return GraphSourceResult::Error(format!(
                "No binding graph files found in: {}",
                describe_paths(&input.paths)
            ));
        }

        let outcomes = files.iter().filter_map(|file| {
            let parsed = read_file(file).and_then(|json| self.extract_from_json(&json));
            match parsed {
                Ok(graph) => graph.map(Ok),
                Err(e) => Some(Err(format!("Failed to parse {}: {}", file.display(), e))),
            }
        });
        GraphSourceResult::collect(outcomes, || {
            format!(
                "No component binding graphs found in: {}",
                describe_paths(&input.paths)
            )
        })
    }
}
