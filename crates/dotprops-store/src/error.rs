/// Errors from flat store, codec and property file operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backing file could not be read or written.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A key cannot be placed in a group (too few segments or forbidden characters).
    #[error("malformed key {key:?}: {reason}")]
    MalformedKey { key: String, reason: String },

    /// A value cannot be represented by the line grammar.
    #[error("invalid value for {key:?}: {reason}")]
    InvalidValue { key: String, reason: String },
}

impl StoreError {
    /// Wrap an I/O error together with the path it occurred on.
    pub fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
