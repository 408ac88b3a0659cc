//! Flat dotted-key storage for dotprops property files.
//!
//! This crate holds everything that deals with strings only: the ordered
//! key/value store, the rules for dotted keys, scalar coercion, and the
//! grouped text format used on disk.
//!
//! # Components
//!
//! - [`FlatStore`] -- insertion-ordered `key -> value` map
//! - [`GroupedCodec`] -- converts a store to and from the grouped file format
//! - [`Scalar`] -- strict coercion between strings and primitive types
//! - [`Properties`] -- a store bound to one backing file
//!
//! # Design Rules
//!
//! 1. The flat store is the only source of truth; groups are derived on save.
//! 2. Keys need at least three dotted segments to be written to disk.
//! 3. Scalar getters never fail: missing and malformed both read as `None`.
//! 4. All I/O errors are propagated to the caller.

pub mod codec;
pub mod coerce;
pub mod config;
pub mod error;
pub mod flat;
pub mod key;
pub mod properties;

pub use codec::GroupedCodec;
pub use coerce::{Scalar, ScalarKind};
pub use config::PropertiesConfig;
pub use error::{StoreError, StoreResult};
pub use flat::FlatStore;
pub use key::{child_key, split_key, validate_key, MIN_KEY_SEGMENTS};
pub use properties::Properties;
