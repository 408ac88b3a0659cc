use serde::{Deserialize, Serialize};

/// Behaviour switches for a [`Properties`](crate::Properties) file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropertiesConfig {
    /// Save the whole file after every write that changes the store.
    ///
    /// When `false`, only explicit `save_properties` calls touch the disk.
    pub autosave: bool,
    /// Create missing parent directories before saving.
    pub create_parent_dirs: bool,
}

impl Default for PropertiesConfig {
    fn default() -> Self {
        Self {
            autosave: true,
            create_parent_dirs: true,
        }
    }
}

impl PropertiesConfig {
    /// A configuration that never writes implicitly.
    pub fn manual_save() -> Self {
        Self {
            autosave: false,
            ..Default::default()
        }
    }
}
