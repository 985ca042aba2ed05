//! AppGraph GEXF — serializes dependency graphs as GEXF 1.3 XML

pub mod error;
pub mod escape;
pub mod gexf;
pub mod schema;
pub mod viz;
pub mod writer;

#[cfg(test)]
mod tests;

pub use error::WriteError;
pub use escape::escape_xml;
pub use gexf::{GEXF_NAMESPACE, GEXF_VERSION, GexfWriter, VIZ_NAMESPACE};
pub use writer::GraphWriter;
