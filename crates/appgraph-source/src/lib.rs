//! AppGraph Source — turns DI framework metadata into dependency graphs

pub mod binding_graph;
mod derive;
pub mod error;
pub mod metro;
pub mod source;


pub use binding_graph::BindingGraphSource;
pub use error::SourceError;
pub use metro::MetroGraphSource;
pub use source::{DiscoveryRule, GraphSource, GraphSourceInput, GraphSourceResult, discover_json_files};

/// Look up a source by its command-line name.
pub fn create_source(source_type: &str) -> Result<Box<dyn GraphSource>, String> {
    match source_type {
        "metro" => Ok(Box::new(MetroGraphSource::new())),
        "binding-graph" => Ok(Box::new(BindingGraphSource::new())),
        other => Err(format!("Unknown graph source: {other}")),
    }
}

/// Names accepted by [`create_source`].
pub const SOURCE_TYPES: &[&str] = &["metro", "binding-graph"];
