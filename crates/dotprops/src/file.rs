use std::path::Path;

use dotprops_serial::{ObjectSerializer, Storable, Translator, TranslatorRegistry};
use dotprops_store::{FlatStore, Properties, PropertiesConfig};
use tracing::debug;

use crate::error::PropsResult;

/// A property file with typed value storage.
///
/// Combines the flat key/value store of one backing file with an object
/// serializer. Scalar operations act on the store directly; [`append`] and
/// [`get`] go through registered translators or the value's storable members.
///
/// [`append`]: PropertyFile::append
/// [`get`]: PropertyFile::get
#[derive(Debug)]
pub struct PropertyFile {
    properties: Properties,
    serializer: ObjectSerializer,
}

impl PropertyFile {
    /// Open the file at `path`, loading it if it exists.
    pub fn open(path: impl AsRef<Path>) -> PropsResult<Self> {
        Self::open_with_config(path, PropertiesConfig::default())
    }

    pub fn open_with_config(path: impl AsRef<Path>, config: PropertiesConfig) -> PropsResult<Self> {
        Ok(Self {
            properties: Properties::open_with_config(path, config)?,
            serializer: ObjectSerializer::new(),
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        self.properties.path()
    }

    /// Whether the backing file is present.
    pub fn exists(&self) -> bool {
        self.properties.exists()
    }

    /// Reload all entries from disk, discarding in-memory state.
    pub fn load_properties(&mut self) -> PropsResult<()> {
        self.properties.load_properties()?;
        Ok(())
    }

    /// Write all entries to disk.
    pub fn save_properties(&self) -> PropsResult<()> {
        self.properties.save_properties()?;
        Ok(())
    }

    /// Register a translator for its value type. Last registration wins.
    pub fn register<R>(&mut self, translator: R) -> bool
    where
        R: Translator + 'static,
    {
        self.serializer.register(translator)
    }

    pub fn registry(&self) -> &TranslatorRegistry {
        self.serializer.registry()
    }

    /// The underlying store.
    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    pub fn entries(&self) -> &FlatStore {
        self.properties.entries()
    }

    // ---- Typed values ----

    /// Store a typed value under `key`.
    pub fn append<T: Storable>(&mut self, key: &str, value: &T) -> PropsResult<()> {
        self.serializer.serialize(&mut self.properties, key, value)?;
        Ok(())
    }

    /// Read a typed value from `key`.
    ///
    /// Every failure (no usable data, malformed members, no way to construct
    /// the type) reads as `None`. A member-mapped type with nothing stored
    /// reads as its fresh instance. Use [`try_get`](Self::try_get) to tell
    /// these cases apart.
    pub fn get<T: Storable>(&self, key: &str) -> Option<T> {
        match self.serializer.deserialize(&self.properties, key) {
            Ok(value) => Some(value),
            Err(e) => {
                debug!(key, error = %e, "typed read failed");
                None
            }
        }
    }

    /// Read a typed value from `key`, separating absence from failure.
    ///
    /// Returns `Ok(None)` if nothing is stored at or beneath `key`, and an
    /// error if stored data cannot be turned into a `T`.
    pub fn try_get<T: Storable>(&self, key: &str) -> PropsResult<Option<T>> {
        if !self.properties.has_prefix(key) {
            return Ok(None);
        }
        Ok(Some(self.serializer.deserialize(&self.properties, key)?))
    }

    // ---- Scalars ----

    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.properties.get_string(key)
    }

    pub fn get_int(&self, key: &str) -> Option<i32> {
        self.properties.get_int(key)
    }

    pub fn get_long(&self, key: &str) -> Option<i64> {
        self.properties.get_long(key)
    }

    pub fn get_double(&self, key: &str) -> Option<f64> {
        self.properties.get_double(key)
    }

    pub fn get_boolean(&self, key: &str) -> Option<bool> {
        self.properties.get_boolean(key)
    }

    pub fn get_char(&self, key: &str) -> Option<char> {
        self.properties.get_char(key)
    }

    /// Store `value` unless `key` is already present. Returns whether it wrote.
    pub fn append_string(&mut self, key: &str, value: impl Into<String>) -> PropsResult<bool> {
        Ok(self.properties.append_string(key, value)?)
    }

    pub fn append_int(&mut self, key: &str, value: i32) -> PropsResult<bool> {
        Ok(self.properties.append_int(key, value)?)
    }

    pub fn append_long(&mut self, key: &str, value: i64) -> PropsResult<bool> {
        Ok(self.properties.append_long(key, value)?)
    }

    pub fn append_double(&mut self, key: &str, value: f64) -> PropsResult<bool> {
        Ok(self.properties.append_double(key, value)?)
    }

    pub fn append_boolean(&mut self, key: &str, value: bool) -> PropsResult<bool> {
        Ok(self.properties.append_boolean(key, value)?)
    }

    pub fn append_char(&mut self, key: &str, value: char) -> PropsResult<bool> {
        Ok(self.properties.append_char(key, value)?)
    }

    /// Return the value under `key`, storing `default` first if it is absent.
    pub fn get_or_create(&mut self, key: &str, default: &str) -> PropsResult<String> {
        Ok(self.properties.get_or_create(key, default)?)
    }

    /// Store `value` under `key`, replacing any existing value.
    pub fn set_string(&mut self, key: &str, value: impl Into<String>) -> PropsResult<()> {
        Ok(self.properties.set_string(key, value)?)
    }

    /// Remove `key`, returning its value if it was present.
    pub fn remove(&mut self, key: &str) -> PropsResult<Option<String>> {
        Ok(self.properties.remove(key)?)
    }
}
