//! The serialization seam shared by every output format

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use appgraph_core::Graph;

use crate::error::WriteError;

pub trait GraphWriter {
    /// Human-readable format name, e.g. `GEXF`.
    fn format_name(&self) -> &'static str;

    /// Extension without the dot.
    fn file_extension(&self) -> &'static str;

    /// Serialize `graph` to `out`. Nothing is retried; the first sink error is returned.
    fn write(&self, graph: &Graph, out: &mut dyn Write) -> Result<(), WriteError>;

    /// Create (or truncate) `path` and write the graph to it.
    fn write_to_path(&self, graph: &Graph, path: &Path) -> Result<(), WriteError> {
        let mut out = BufWriter::new(File::create(path)?);
        self.write(graph, &mut out)?;
        out.flush()?;
        Ok(())
    }
}
