//! AppGraph CLI entry point

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "appgraph")]
#[command(about = "Export dependency injection graphs as GEXF", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file (defaults to ./appgraph.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract graphs and write them as GEXF files
    Convert {
        /// Metadata format: metro or binding-graph
        #[arg(short, long, default_value = "metro")]
        source: String,

        /// Metadata files or directories to search
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Output directory (overrides output.path)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write compact XML without indentation
        #[arg(long)]
        compact: bool,

        /// Leave out viz:color, viz:size and viz:shape
        #[arg(long)]
        no_viz: bool,
    },
    /// Print node, edge and cycle statistics per graph
    Stats {
        /// Metadata format: metro or binding-graph
        #[arg(short, long, default_value = "metro")]
        source: String,

        /// Metadata files or directories to search
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Show version
    Version,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(format!(
            "appgraph={log_level},appgraph_core={log_level},appgraph_source={log_level},appgraph_gexf={log_level}"
        )))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Convert {
            source,
            paths,
            output,
            compact,
            no_viz,
        } => {
            let cwd = std::env::current_dir()?;
            let config = config::load(cli.config.as_deref(), &cwd)?;
            let written = commands::convert(
                &config,
                commands::ConvertOptions {
                    source,
                    paths,
                    output,
                    compact,
                    no_viz,
                },
            )?;
            tracing::info!("Wrote {} graph files", written.len());
            Ok(())
        }
        Commands::Stats { source, paths } => commands::stats(&source, &paths),
        Commands::Version => {
            println!("appgraph v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
