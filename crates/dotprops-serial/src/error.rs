use dotprops_store::{ScalarKind, StoreError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SerialError {
    #[error(transparent)]
    Store(#[from] StoreError),

    /// No translator is registered and the type has no no-argument constructor.
    #[error("cannot construct {type_name}: no translator registered and no default instance")]
    Unconstructible { type_name: &'static str },

    /// Stored fallback text could not be turned back into a value.
    #[error("decode failure: {0}")]
    Decode(String),

    /// A stored member does not parse as its declared scalar type.
    #[error("cannot coerce {key} = {raw:?} to {expected}")]
    Coercion {
        key: String,
        raw: String,
        expected: ScalarKind,
    },

    /// A translator needed a sub-key that is absent or unparsable.
    #[error("missing or invalid field: {key}")]
    MissingField { key: String },

    #[error("serialization error: {0}")]
    Serialization(String),
}

pub type SerialResult<T> = Result<T, SerialError>;
