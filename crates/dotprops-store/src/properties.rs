//! File-backed property store.
//!
//! [`Properties`] owns the flat store for a single backing file. Every write
//! that adds a key rewrites the whole file (unless autosave is disabled), so
//! the file always mirrors the store after a successful call.
//!
//! There is no locking: one `Properties` value per file and process.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::codec::GroupedCodec;
use crate::coerce::Scalar;
use crate::config::PropertiesConfig;
use crate::error::{StoreError, StoreResult};
use crate::flat::FlatStore;
use crate::key::validate_key;

/// A flat store bound to a property file on disk.
#[derive(Debug)]
pub struct Properties {
    path: PathBuf,
    store: FlatStore,
    config: PropertiesConfig,
}

impl Properties {
    /// Open the property file at `path`, loading it if it exists.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Self::open_with_config(path, PropertiesConfig::default())
    }

    /// Open with an explicit configuration.
    pub fn open_with_config(path: impl AsRef<Path>, config: PropertiesConfig) -> StoreResult<Self> {
        let mut properties = Self {
            path: path.as_ref().to_path_buf(),
            store: FlatStore::new(),
            config,
        };
        if properties.exists() {
            properties.load_properties()?;
        }
        Ok(properties)
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the backing file is present.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Replace the in-memory entries with the contents of the backing file.
    pub fn load_properties(&mut self) -> StoreResult<()> {
        self.store = GroupedCodec::load(&self.path)?;
        Ok(())
    }

    /// Write all entries to the backing file.
    pub fn save_properties(&self) -> StoreResult<()> {
        if self.config.create_parent_dirs {
            if let Some(parent) = self.path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
                }
            }
        }
        GroupedCodec::save(&self.path, &self.store)
    }

    /// The in-memory entries.
    pub fn entries(&self) -> &FlatStore {
        &self.store
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.store.contains_key(key)
    }

    /// Whether anything is stored at `prefix` or beneath `prefix.`.
    pub fn has_prefix(&self, prefix: &str) -> bool {
        self.store.has_prefix(prefix)
    }

    // ---------------------------------------------------------------
    // Scalar getters
    // ---------------------------------------------------------------

    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.store.get(key)
    }

    /// Read and coerce a scalar. Missing and unparsable values both give `None`.
    pub fn get_scalar<S: Scalar>(&self, key: &str) -> Option<S> {
        self.get_string(key).and_then(S::from_property)
    }

    pub fn get_int(&self, key: &str) -> Option<i32> {
        self.get_scalar(key)
    }

    pub fn get_long(&self, key: &str) -> Option<i64> {
        self.get_scalar(key)
    }

    pub fn get_double(&self, key: &str) -> Option<f64> {
        self.get_scalar(key)
    }

    pub fn get_boolean(&self, key: &str) -> Option<bool> {
        self.get_scalar(key)
    }

    pub fn get_char(&self, key: &str) -> Option<char> {
        self.get_scalar(key)
    }

    // ---------------------------------------------------------------
    // Writes
    //
    // A failed save rolls the store back to its state before the write.
    // ---------------------------------------------------------------

    /// Store `value` under `key` unless the key is already present.
    ///
    /// The first write wins. Returns `true` if the value was written (and the
    /// file saved), `false` if an existing value was kept.
    pub fn append_string(&mut self, key: &str, value: impl Into<String>) -> StoreResult<bool> {
        if self.store.contains_key(key) {
            debug!(key, "key already present; keeping existing value");
            return Ok(false);
        }
        let value = value.into();
        check_entry(key, &value)?;
        self.store.insert(key, value);
        if let Err(e) = self.autosave() {
            self.store.remove(key);
            return Err(e);
        }
        Ok(true)
    }

    /// Append the canonical string form of a scalar.
    pub fn append_scalar<S: Scalar>(&mut self, key: &str, value: &S) -> StoreResult<bool> {
        self.append_string(key, value.to_property())
    }

    pub fn append_int(&mut self, key: &str, value: i32) -> StoreResult<bool> {
        self.append_scalar(key, &value)
    }

    pub fn append_long(&mut self, key: &str, value: i64) -> StoreResult<bool> {
        self.append_scalar(key, &value)
    }

    pub fn append_double(&mut self, key: &str, value: f64) -> StoreResult<bool> {
        self.append_scalar(key, &value)
    }

    pub fn append_boolean(&mut self, key: &str, value: bool) -> StoreResult<bool> {
        self.append_scalar(key, &value)
    }

    pub fn append_char(&mut self, key: &str, value: char) -> StoreResult<bool> {
        self.append_scalar(key, &value)
    }

    /// Return the value under `key`, storing `default` first if it is absent.
    pub fn get_or_create(&mut self, key: &str, default: &str) -> StoreResult<String> {
        if let Some(existing) = self.store.get(key) {
            return Ok(existing.to_string());
        }
        check_entry(key, default)?;
        self.store.insert(key, default);
        if let Err(e) = self.autosave() {
            self.store.remove(key);
            return Err(e);
        }
        Ok(default.to_string())
    }

    /// Store `value` under `key`, replacing any existing value.
    ///
    /// Saves only when the stored value actually changed.
    pub fn set_string(&mut self, key: &str, value: impl Into<String>) -> StoreResult<()> {
        let value = value.into();
        check_entry(key, &value)?;
        if self.store.get(key) == Some(value.as_str()) {
            return Ok(());
        }
        let previous = self.store.insert(key, value);
        if let Err(e) = self.autosave() {
            match previous {
                Some(previous) => self.store.insert(key, previous),
                None => self.store.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }

    /// Remove `key`. Returns the removed value, saving if something was removed.
    pub fn remove(&mut self, key: &str) -> StoreResult<Option<String>> {
        let Some((index, value)) = self.store.remove_full(key) else {
            return Ok(None);
        };
        if let Err(e) = self.autosave() {
            self.store.insert_at(index, key, value);
            return Err(e);
        }
        Ok(Some(value))
    }

    fn autosave(&self) -> StoreResult<()> {
        if self.config.autosave {
            self.save_properties()
        } else {
            Ok(())
        }
    }
}

fn check_entry(key: &str, value: &str) -> StoreResult<()> {
    validate_key(key)?;
    if value.contains(['\n', '\r']) {
        return Err(StoreError::InvalidValue {
            key: key.to_string(),
            reason: "value must not contain line breaks".into(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_properties(name: &str) -> (tempfile::TempDir, Properties) {
        let dir = tempfile::tempdir().unwrap();
        let props = Properties::open(dir.path().join(name)).unwrap();
        (dir, props)
    }

    #[test]
    fn open_missing_file_is_empty() {
        let (_dir, props) = temp_properties("missing.properties");
        assert!(!props.exists());
        assert!(props.is_empty());
    }

    #[test]
    fn open_existing_file_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.properties");
        fs::write(&path, "test.message\n    third = \"3\"\n").unwrap();

        let props = Properties::open(&path).unwrap();
        assert!(props.exists());
        assert_eq!(props.get_string("test.message.third"), Some("3"));
    }

    #[test]
    fn append_string_first_write_wins() {
        let (_dir, mut props) = temp_properties("fww.properties");
        assert!(props.append_string("a.b.c", "a").unwrap());
        assert!(!props.append_string("a.b.c", "b").unwrap());
        assert_eq!(props.get_string("a.b.c"), Some("a"));
    }

    #[test]
    fn append_saves_immediately() {
        let (_dir, mut props) = temp_properties("save.properties");
        props.append_string("test.message.third", "3").unwrap();
        assert!(props.exists());

        let text = fs::read_to_string(props.path()).unwrap();
        assert_eq!(text, "test.message\n    third = \"3\"\n\n");
    }

    #[test]
    fn append_rejects_malformed_key_without_storing() {
        let (_dir, mut props) = temp_properties("bad.properties");
        let err = props.append_string("test.message", "x").unwrap_err();
        assert!(matches!(err, StoreError::MalformedKey { .. }));
        assert!(props.is_empty());
        assert!(!props.exists());
    }

    #[test]
    fn append_rejects_multiline_value() {
        let (_dir, mut props) = temp_properties("ml.properties");
        let err = props.append_string("a.b.c", "x\ny").unwrap_err();
        assert!(matches!(err, StoreError::InvalidValue { .. }));
        assert!(props.is_empty());
    }

    #[test]
    fn scalar_appends_and_getters() {
        let (_dir, mut props) = temp_properties("scalars.properties");
        props.append_int("n.s.int", 7).unwrap();
        props.append_long("n.s.long", 3_000_000_000).unwrap();
        props.append_double("n.s.double", 12.12).unwrap();
        props.append_boolean("n.s.bool", true).unwrap();
        props.append_char("n.s.char", 'x').unwrap();

        assert_eq!(props.get_int("n.s.int"), Some(7));
        assert_eq!(props.get_long("n.s.long"), Some(3_000_000_000));
        assert_eq!(props.get_double("n.s.double"), Some(12.12));
        assert_eq!(props.get_boolean("n.s.bool"), Some(true));
        assert_eq!(props.get_char("n.s.char"), Some('x'));
        assert_eq!(props.get_string("n.s.int"), Some("7"));
    }

    #[test]
    fn malformed_scalars_degrade_to_none() {
        let (_dir, mut props) = temp_properties("degrade.properties");
        props.append_string("n.s.value", "not-a-number").unwrap();

        assert_eq!(props.get_int("n.s.value"), None);
        assert_eq!(props.get_long("n.s.value"), None);
        assert_eq!(props.get_double("n.s.value"), None);
        assert_eq!(props.get_boolean("n.s.value"), None);
        assert_eq!(props.get_char("n.s.value"), None);
        assert_eq!(props.get_int("n.s.missing"), None);
    }

    #[test]
    fn boolean_getter_case_insensitive() {
        let (_dir, mut props) = temp_properties("bool.properties");
        props.append_string("n.s.flag", "TRUE").unwrap();
        assert_eq!(props.get_boolean("n.s.flag"), Some(true));
    }

    #[test]
    fn get_or_create_writes_once() {
        let (_dir, mut props) = temp_properties("goc.properties");
        assert_eq!(props.get_or_create("test.message.third", "3").unwrap(), "3");
        assert!(props.exists());

        // A second call must not write: the removed file stays removed.
        fs::remove_file(props.path()).unwrap();
        assert_eq!(props.get_or_create("test.message.third", "3").unwrap(), "3");
        assert!(!props.exists());
    }

    #[test]
    fn get_or_create_returns_existing() {
        let (_dir, mut props) = temp_properties("existing.properties");
        props.append_string("a.b.c", "first").unwrap();
        assert_eq!(props.get_or_create("a.b.c", "other").unwrap(), "first");
    }

    #[test]
    fn set_string_overwrites() {
        let (_dir, mut props) = temp_properties("set.properties");
        props.append_string("a.b.c", "1").unwrap();
        props.set_string("a.b.c", "2").unwrap();
        assert_eq!(props.get_string("a.b.c"), Some("2"));

        let reloaded = Properties::open(props.path()).unwrap();
        assert_eq!(reloaded.get_string("a.b.c"), Some("2"));
    }

    #[test]
    fn remove_saves() {
        let (_dir, mut props) = temp_properties("remove.properties");
        props.append_string("a.b.c", "1").unwrap();
        props.append_string("a.b.d", "2").unwrap();
        assert_eq!(props.remove("a.b.c").unwrap().as_deref(), Some("1"));
        assert_eq!(props.remove("a.b.c").unwrap(), None);

        let reloaded = Properties::open(props.path()).unwrap();
        assert!(!reloaded.contains_key("a.b.c"));
        assert_eq!(reloaded.get_string("a.b.d"), Some("2"));
    }

    #[test]
    fn load_replaces_in_memory_entries() {
        let (_dir, mut props) = temp_properties("reload.properties");
        props.append_string("a.b.c", "1").unwrap();
        fs::write(props.path(), "x.y\n    z = \"9\"\n").unwrap();

        props.load_properties().unwrap();
        assert!(!props.contains_key("a.b.c"));
        assert_eq!(props.get_string("x.y.z"), Some("9"));
    }

    #[test]
    fn save_then_reload_roundtrips() {
        let (_dir, mut props) = temp_properties("rt.properties");
        props.append_string("test.message.third", "3").unwrap();
        props.append_string("test.object.name", "dGVzdA==").unwrap();
        props.append_int("test.object.age", 1).unwrap();
        props.save_properties().unwrap();

        let reloaded = Properties::open(props.path()).unwrap();
        assert_eq!(reloaded.entries(), props.entries());
    }

    #[test]
    fn manual_save_defers_writes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("manual.properties");
        let mut props = Properties::open_with_config(&path, PropertiesConfig::manual_save()).unwrap();

        props.append_string("a.b.c", "1").unwrap();
        assert!(!props.exists());

        props.save_properties().unwrap();
        assert!(props.exists());
    }

    #[test]
    fn creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("p.properties");
        let mut props = Properties::open(&path).unwrap();
        props.append_string("a.b.c", "1").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn loaded_two_segment_key_is_readable_but_not_savable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("short.properties");
        fs::write(&path, "top\n    level = \"1\"\n").unwrap();

        let props = Properties::open(&path).unwrap();
        assert_eq!(props.get_string("top.level"), Some("1"));
        let err = props.save_properties().unwrap_err();
        assert!(matches!(err, StoreError::MalformedKey { .. }));
    }

    /// A file whose loaded `top.level` entry makes every save fail.
    fn unsavable(dir: &tempfile::TempDir) -> (PathBuf, Properties) {
        let path = dir.path().join("unsavable.properties");
        fs::write(&path, "top\n    level = \"1\"\n\nx.y\n    a = \"1\"\n    b = \"2\"\n").unwrap();
        let props = Properties::open(&path).unwrap();
        (path, props)
    }

    #[test]
    fn failed_append_is_rolled_back() {
        let dir = tempfile::tempdir().unwrap();
        let (path, mut props) = unsavable(&dir);
        let on_disk = fs::read_to_string(&path).unwrap();

        assert!(props.append_string("a.b.c", "x").is_err());
        assert_eq!(props.get_string("a.b.c"), None);
        assert!(props.append_int("a.b.c", 1).is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), on_disk);
    }

    #[test]
    fn failed_get_or_create_is_rolled_back() {
        let dir = tempfile::tempdir().unwrap();
        let (_path, mut props) = unsavable(&dir);

        assert!(props.get_or_create("a.b.c", "x").is_err());
        assert!(!props.contains_key("a.b.c"));
    }

    #[test]
    fn failed_set_restores_previous_value() {
        let dir = tempfile::tempdir().unwrap();
        let (_path, mut props) = unsavable(&dir);

        assert!(props.set_string("x.y.a", "changed").is_err());
        assert_eq!(props.get_string("x.y.a"), Some("1"));

        assert!(props.set_string("x.y.new", "v").is_err());
        assert!(!props.contains_key("x.y.new"));
    }

    #[test]
    fn failed_remove_restores_entry_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let (_path, mut props) = unsavable(&dir);
        let before = props.entries().clone();

        assert!(props.remove("x.y.a").is_err());
        assert_eq!(props.entries(), &before);
    }
}
