//! Batch source over Metro metadata files

use std::path::Path;

use appgraph_core::Graph;

use super::extractor;
use crate::error::SourceError;
use crate::source::{
    DiscoveryRule, GraphSource, GraphSourceInput, GraphSourceResult, describe_paths,
    discover_json_files, read_file,
};

pub const DISCOVERY: DiscoveryRule = DiscoveryRule {
    directory: "graph-metadata",
    file_prefix: "graph-",
};

#[derive(Debug, Default)]
pub struct MetroGraphSource;

impl MetroGraphSource {
    pub fn new() -> Self {
        MetroGraphSource
    }

    pub fn extract_from_file(&self, path: &Path) -> Result<Graph, SourceError> {
        let json = read_file(path)?;
        extractor::extract_from_json(&json).map_err(|e| e.at(path))
    }
}

impl GraphSource for MetroGraphSource {
    fn source_type(&self) -> &'static str {
        "metro"
    }

    fn display_name(&self) -> &'static str {
        "Metro DI"
    }

    fn extract(&self, input: &GraphSourceInput) -> GraphSourceResult {
        let files = discover_json_files(&input.paths, DISCOVERY);
        let no_input = || {
            format!(
                "No Metro graph metadata files found in: {}",
                describe_paths(&input.paths)
            )
        };
        if files.is_empty() {
            return GraphSourceResult::Error(no_input());
        }

        let outcomes = files.iter().map(|file| {
            read_file(file)
                .and_then(|json| extractor::extract_from_json(&json))
                .map_err(|e| format!("Failed to parse {}: {}", file.display(), e))
        });
        GraphSourceResult::collect(outcomes, no_input)
    }
}
