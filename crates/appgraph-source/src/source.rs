//! The extraction seam shared by every DI framework source

use std::fs;
use std::path::{Path, PathBuf};

use appgraph_core::Graph;
use ignore::WalkBuilder;
use tracing::{debug, warn};

use crate::error::SourceError;

/// Paths to search for metadata. Directories are walked recursively.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphSourceInput {
    pub paths: Vec<PathBuf>,
}

impl GraphSourceInput {
    pub fn new(paths: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        GraphSourceInput {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }
}

/// Outcome of a batch extraction.
#[derive(Debug, Clone, PartialEq)]
pub enum GraphSourceResult {
    Success(Vec<Graph>),
    /// Some items failed; `errors` has one message per failed item.
    Partial { graphs: Vec<Graph>, errors: Vec<String> },
    /// Nothing could be extracted.
    Error(String),
}

impl GraphSourceResult {
    /// Fold per-item outcomes. An empty batch is reported as `no_input`.
    pub fn collect(
        outcomes: impl IntoIterator<Item = Result<Graph, String>>,
        no_input: impl FnOnce() -> String,
    ) -> Self {
        let mut graphs = Vec::new();
        let mut errors = Vec::new();
        for outcome in outcomes {
            match outcome {
                Ok(graph) => graphs.push(graph),
                Err(message) => errors.push(message),
            }
        }

        match (graphs.is_empty(), errors.is_empty()) {
            (true, true) => GraphSourceResult::Error(no_input()),
            (true, false) => GraphSourceResult::Error(format!(
                "Failed to extract any graphs. Errors: {}",
                errors.join("; ")
            )),
            (false, false) => GraphSourceResult::Partial { graphs, errors },
            (false, true) => GraphSourceResult::Success(graphs),
        }
    }

    pub fn graphs(&self) -> &[Graph] {
        match self {
            GraphSourceResult::Success(graphs) => graphs,
            GraphSourceResult::Partial { graphs, .. } => graphs,
            GraphSourceResult::Error(_) => &[],
        }
    }

    pub fn errors(&self) -> Vec<&str> {
        match self {
            GraphSourceResult::Success(_) => Vec::new(),
            GraphSourceResult::Partial { errors, .. } => errors.iter().map(String::as_str).collect(),
            GraphSourceResult::Error(message) => vec![message.as_str()],
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, GraphSourceResult::Error(_))
    }
}

/// A DI framework whose metadata can be turned into graphs.
pub trait GraphSource {
    /// Short identifier used on the command line, e.g. `metro`.
    fn source_type(&self) -> &'static str;

    fn display_name(&self) -> &'static str;

    fn extract(&self, input: &GraphSourceInput) -> GraphSourceResult;
}

/// Which JSON files a source picks up while walking directories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscoveryRule {
    /// Every `.json` file directly inside a directory with this name.
    pub directory: &'static str,
    /// Any `.json` file whose name starts with this prefix.
    pub file_prefix: &'static str,
}

impl DiscoveryRule {
    fn matches(&self, path: &Path) -> bool {
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            return false;
        }
        let in_directory = path
            .parent()
            .and_then(Path::file_name)
            .is_some_and(|name| name == self.directory);
        let prefixed = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.starts_with(self.file_prefix));
        in_directory || prefixed
    }
}

/// Find metadata files under `paths`, sorted.
///
/// Explicit `.json` files are always taken; missing paths are skipped.
pub fn discover_json_files(paths: &[PathBuf], rule: DiscoveryRule) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            // Build outputs are usually git-ignored, so ignore files must not apply.
            let walker = WalkBuilder::new(path)
                .hidden(false)
                .ignore(false)
                .git_ignore(false)
                .git_global(false)
                .git_exclude(false)
                .build();
            files.extend(
                walker
                    .filter_map(|entry| entry.ok())
                    .filter(|entry| entry.file_type().is_some_and(|ft| ft.is_file()))
                    .map(|entry| entry.into_path())
                    .filter(|file| rule.matches(file)),
            );
        } else if path.is_file() {
            if path.extension().and_then(|e| e.to_str()) == Some("json") {
                files.push(path.clone());
            } else {
                debug!(path = %path.display(), "skipping non-JSON input");
            }
        } else {
            warn!(path = %path.display(), "input path does not exist");
        }
    }
    files.sort();
    files.dedup();
    files
}

pub(crate) fn read_file(path: &Path) -> Result<String, SourceError> {
    fs::read_to_string(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn describe_paths(paths: &[PathBuf]) -> String {
    let listed: Vec<String> = paths.iter().map(|p| p.display().to_string()).collect();
    format!("[{}]", listed.join(", "))
}
