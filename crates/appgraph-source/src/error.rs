//! Errors raised while reading a single metadata item

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("malformed JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid binding graph snapshot: {0}")]
    InvalidSnapshot(String),
}

impl SourceError {
    /// Attach the file a parse error came from.
    pub(crate) fn at(self, path: impl Into<PathBuf>) -> Self {
        match self {
            SourceError::Parse(source) => SourceError::Json {
                path: path.into(),
                source,
            },
            other => other,
        }
    }
}
