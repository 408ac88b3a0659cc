//! Grouped text codec: converts a [`FlatStore`] to and from the line-oriented
//! property file format.
//!
//! On-disk format:
//! ```text
//! # comment
//! test.message
//!     third = "3"
//!
//! test.object
//!     name = "test"
//!     age = "1"
//!
//! ```
//!
//! Keys sharing their first two segments are written under one group header.
//! Groups appear in first-seen order; entries keep their store order.

use std::fmt::Write as _;
use std::fs;
use std::io::{self, Write as _};
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::error::{StoreError, StoreResult};
use crate::flat::FlatStore;
use crate::key::{child_key, split_key};

/// Indentation written before every entry line.
pub const INDENT: &str = "    ";

/// Codec for the grouped property file format.
pub struct GroupedCodec;

impl GroupedCodec {
    /// Parse file contents into a flat store.
    ///
    /// Parsing never fails: comment lines (starting with `#`), blank lines and
    /// key-value lines that appear before any group header are skipped.
    pub fn parse(text: &str) -> FlatStore {
        let mut store = FlatStore::new();
        let mut current_group: Option<&str> = None;

        for (lineno, raw) in text.lines().enumerate() {
            if raw.starts_with('#') {
                continue;
            }

            let line = raw.trim();
            if line.is_empty() {
                continue;
            }

            match line.split_once('=') {
                None => current_group = Some(line),
                Some((sub_key, value)) => {
                    let Some(group) = current_group else {
                        warn!(line = lineno + 1, "entry outside of any group; discarded");
                        continue;
                    };
                    let value = value.trim().replace('"', "");
                    store.insert(child_key(group, sub_key.trim()), value);
                }
            }
        }

        store
    }

    /// Render a flat store to file contents.
    ///
    /// Fails with [`StoreError::MalformedKey`] if any key cannot be grouped and
    /// with [`StoreError::InvalidValue`] if a value contains a line break.
    pub fn render(store: &FlatStore) -> StoreResult<String> {
        let mut groups: IndexMap<&str, Vec<(&str, &str)>> = IndexMap::new();

        for (key, value) in store.iter() {
            let (group, sub_key) = split_key(key)?;
            check_value(key, value)?;
            groups.entry(group).or_default().push((sub_key, value));
        }

        let mut out = String::new();
        for (group, entries) in &groups {
            out.push_str(group);
            out.push('\n');
            for (sub_key, value) in entries {
                // Writing to a String cannot fail.
                let _ = writeln!(out, "{INDENT}{sub_key} = \"{value}\"");
            }
            out.push('\n');
        }

        Ok(out)
    }

    /// Read and parse the file at `path`.
    pub fn load(path: &Path) -> StoreResult<FlatStore> {
        let text = fs::read_to_string(path).map_err(|e| StoreError::io(path, e))?;
        let store = Self::parse(&text);
        debug!(path = %path.display(), entries = store.len(), "loaded property file");
        Ok(store)
    }

    /// Render `store` and replace the file at `path` with the result.
    ///
    /// The contents are written to a temporary file in the same directory and
    /// renamed over the target, so readers see either the old or the new file.
    /// An existing file keeps its permissions, and a symlink keeps pointing at
    /// the file it named.
    pub fn save(path: &Path, store: &FlatStore) -> StoreResult<()> {
        let text = Self::render(store)?;
        let target = resolve_target(path)?;

        let permissions = match fs::metadata(&target) {
            Ok(meta) => Some(meta.permissions()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => return Err(StoreError::io(&target, e)),
        };

        let dir = match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut tmp =
            tempfile::NamedTempFile::new_in(dir).map_err(|e| StoreError::io(&target, e))?;
        tmp.write_all(text.as_bytes())
            .map_err(|e| StoreError::io(&target, e))?;
        if let Some(permissions) = permissions {
            tmp.as_file()
                .set_permissions(permissions)
                .map_err(|e| StoreError::io(&target, e))?;
        }
        tmp.as_file()
            .sync_all()
            .map_err(|e| StoreError::io(&target, e))?;
        tmp.persist(&target)
            .map_err(|e| StoreError::io(&target, e.error))?;

        debug!(path = %target.display(), entries = store.len(), "saved property file");
        Ok(())
    }
}

/// The file a save should replace: `path` itself, or what it links to.
fn resolve_target(path: &Path) -> StoreResult<PathBuf> {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.file_type().is_symlink() => {
            fs::canonicalize(path).map_err(|e| StoreError::io(path, e))
        }
        _ => Ok(path.to_path_buf()),
    }
}

fn check_value(key: &str, value: &str) -> StoreResult<()> {
    if value.contains(['\n', '\r']) {
        return Err(StoreError::InvalidValue {
            key: key.to_string(),
            reason: "value must not contain line breaks".into(),
        });
    }
    Ok(())
}
