//! Errors raised while serializing a graph

#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML emitter error: {0}")]
    Xml(#[from] quick_xml::Error),
}
