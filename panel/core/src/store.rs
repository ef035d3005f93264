//! Preference Storage
//!
//! Small string-keyed preferences that outlive a panel: the sidebar collapse
//! flag and the cached user profile. Components receive a store explicitly
//! instead of reaching for process-wide state.
//!
//! # Files
//!
//! - `$XDG_DATA_HOME/chat-panel/preferences.json` (flat JSON object of strings)

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::messages::scalar_text;

/// Key of the persisted sidebar collapse flag (`"true"` / `"false"`)
pub const SIDEBAR_COLLAPSED_KEY: &str = "sidebar-collapsed";

/// Key of the cached user profile (JSON)
pub const USER_PROFILE_KEY: &str = "user";

/// Errors raised by persistent stores
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failed to read the preferences file
    #[error("Failed to read preferences at {path}: {source}")]
    Read {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: io::Error,
    },

    /// Failed to write the preferences file
    #[error("Failed to write preferences at {path}: {source}")]
    Write {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: io::Error,
    },

    /// The preferences file is not a JSON object of strings
    #[error("Failed to parse preferences: {0}")]
    Parse(#[from] serde_json::Error),
}

/// String key/value preference storage
pub trait PreferenceStore {
    /// Read a value
    fn get(&self, key: &str) -> Option<String>;

    /// Write a value
    ///
    /// # Errors
    ///
    /// Returns an error if a persistent store cannot save the change.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

impl<S: PreferenceStore + ?Sized> PreferenceStore for &mut S {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }
}

/// Volatile store, for tests and embedded surfaces
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    #[must_use]
    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.values.insert(key.to_string(), value.to_string());
        self
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// JSON-file backed store; every `set` rewrites the file
#[derive(Clone, Debug)]
pub struct FileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FileStore {
    /// Open the store at `path`; a missing file starts empty
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let values = if path.exists() {
            let raw = fs::read_to_string(&path).map_err(|source| StoreError::Read {
                path: path.clone(),
                source,
            })?;
            serde_json::from_str(&raw)?
        } else {
            tracing::debug!(path = %path.display(), "Preferences file not found, starting empty");
            BTreeMap::new()
        };

        Ok(Self { path, values })
    }

    /// Location of the backing file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<(), StoreError> {
        let write_err = |source| StoreError::Write {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }

        // Write-then-rename so readers never see a torn file
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_string_pretty(&self.values)?).map_err(write_err)?;
        fs::rename(&tmp, &self.path).map_err(write_err)
    }
}

impl PreferenceStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value.to_string());
        self.persist()
    }
}

/// Default preferences file path
///
/// Returns `$XDG_DATA_HOME/chat-panel/preferences.json`.
#[must_use]
pub fn default_store_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("chat-panel").join("preferences.json"))
}

/// The cached profile of the signed-in user
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    /// Whether the user administers the platform
    pub is_admin: bool,
    /// Tenant the user belongs to
    pub client_id: Option<String>,
}

impl UserProfile {
    /// Read the cached profile; absent or unparseable profiles yield `None`
    ///
    /// Fields are read loosely: `is_admin` is set by any truthy value and a
    /// numeric `client_id` is taken as its decimal text.
    pub fn load(store: &impl PreferenceStore) -> Option<Self> {
        let raw = store.get(USER_PROFILE_KEY)?;
        let fields = match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(fields)) => fields,
            Ok(_) => {
                tracing::debug!("Ignoring cached user profile that is not an object");
                return None;
            }
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring unparseable cached user profile");
                return None;
            }
        };

        Some(Self {
            is_admin: fields.get("is_admin").is_some_and(is_truthy),
            client_id: fields.get("client_id").and_then(scalar_text),
        })
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => false,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64() != Some(0.0),
        Value::Bool(true) | Value::Array(_) | Value::Object(_) => true,
    }
}
