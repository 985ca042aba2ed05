//! CLI command implementations

use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use appgraph_core::{Graph, GraphStats, simple_name};
use appgraph_gexf::{GexfWriter, GraphWriter};
use appgraph_source::{GraphSourceInput, GraphSourceResult, create_source};
use tempfile::NamedTempFile;

use crate::config::Config;

/// Flags of the `convert` subcommand; `None`/`false` defer to the config file.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    pub source: String,
    pub paths: Vec<PathBuf>,
    pub output: Option<PathBuf>,
    pub compact: bool,
    pub no_viz: bool,
}

/// Extract graphs and write one file per graph. Returns the written paths.
pub fn convert(config: &Config, options: ConvertOptions) -> anyhow::Result<Vec<PathBuf>> {
    if !config.enabled {
        tracing::info!("appgraph is disabled in the configuration, nothing to do");
        return Ok(Vec::new());
    }

    let mut output = config.output.clone();
    if let Some(path) = options.output {
        output.path = path;
    }
    if options.compact {
        output.pretty = false;
    }
    if options.no_viz {
        output.visualization = false;
    }
    let writer = output.writer();

    let graphs = extract(&options.source, &options.paths)?;

    std::fs::create_dir_all(&output.path)
        .with_context(|| format!("Failed to create {}", output.path.display()))?;

    let mut written: Vec<PathBuf> = Vec::with_capacity(graphs.len());
    for graph in &graphs {
        let mut path = output_file(&writer, &output.path, &simple_name(graph.name()));
        if written.contains(&path) {
            // Same simple name in another package: fall back to the full graph id.
            let fallback = output_file(&writer, &output.path, graph.id());
            tracing::warn!(
                "{} is already taken, writing {} to {}",
                path.display(),
                graph.name(),
                fallback.display()
            );
            path = fallback;
            if written.contains(&path) {
                tracing::warn!("Overwriting {}", path.display());
            }
        }
        write_graph(&writer, graph, &path)?;
        tracing::info!(
            "Wrote {} ({} nodes, {} edges) to {}",
            graph.name(),
            graph.node_count(),
            graph.edge_count(),
            path.display()
        );
        written.push(path);
    }
    Ok(written)
}

/// Print summary statistics and validation results for each graph.
pub fn stats(source: &str, paths: &[PathBuf]) -> anyhow::Result<()> {
    for graph in extract(source, paths)? {
        let stats = GraphStats::from_graph(&graph);
        println!("{}: {}", graph.name(), stats);
        for cycle in &stats.dependency_cycles {
            let ids: Vec<&str> = cycle.iter().map(|id| id.as_str()).collect();
            println!("  cycle: {}", ids.join(" -> "));
        }
        if let Err(e) = graph.validate() {
            println!("  invalid: {e}");
        }
    }
    Ok(())
}

fn extract(source_type: &str, paths: &[PathBuf]) -> anyhow::Result<Vec<Graph>> {
    let source = create_source(source_type).map_err(anyhow::Error::msg)?;
    tracing::info!("Extracting graphs with {}", source.display_name());

    match source.extract(&GraphSourceInput::new(paths.iter().cloned())) {
        GraphSourceResult::Success(graphs) => Ok(graphs),
        GraphSourceResult::Partial { graphs, errors } => {
            for error in &errors {
                tracing::warn!("{error}");
            }
            tracing::warn!(
                "Extracted {} graphs, {} inputs failed",
                graphs.len(),
                errors.len()
            );
            Ok(graphs)
        }
        GraphSourceResult::Error(message) => bail!(message),
    }
}

fn output_file(writer: &GexfWriter, dir: &Path, stem: &str) -> PathBuf {
    dir.join(format!("{}.{}", stem, writer.file_extension()))
}

/// Write `graph` to `path` through a temporary file in the same directory,
/// so a failed write never leaves a truncated file behind.
fn write_graph(writer: &GexfWriter, graph: &Graph, path: &Path) -> anyhow::Result<()> {
    let dir = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut temp = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create a temporary file in {}", dir.display()))?;
    {
        let mut out = BufWriter::new(temp.as_file_mut());
        writer
            .write(graph, &mut out)
            .with_context(|| format!("Failed to write {}", graph.name()))?;
        out.flush()?;
    }
    temp.persist(path)
        .with_context(|| format!("Failed to move output to {}", path.display()))?;
    Ok(())
}
