//! Key-value persistence for the selected locale.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde_json::{Map, Value};
use tracing::warn;

use crate::error::{I18nError, Result};

/// Key under which the selected locale code is stored.
pub const LOCALE_PREFERENCE_KEY: &str = "user_lang";

/// String key-value store that survives process restarts.
///
/// An absent key is a normal condition. Implementations should prefer
/// returning `None` over failing on reads.
pub trait PreferenceStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

#[derive(Debug, Default)]
pub struct MemoryPreferences {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(key: impl Into<String>, value: impl Into<String>) -> Self {
        let prefs = Self::default();
        prefs.values.lock().insert(key.into(), value.into());
        prefs
    }
}

impl PreferenceStore for MemoryPreferences {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.values.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Preferences kept in a JSON object on disk.
///
/// Only string values are read back, but every other key is preserved on write.
#[derive(Debug)]
pub struct FilePreferences {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FilePreferences {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<Map<String, Value>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(err) => return Err(I18nError::io(&self.path, err)),
        };
        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(values)) => Ok(values),
            Ok(_) => {
                warn!(path = %self.path.display(), "preferences file is not a JSON object, ignoring it");
                Ok(Map::new())
            }
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "ignoring corrupt preferences file");
                Ok(Map::new())
            }
        }
    }

    fn write_all(&self, values: &Map<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|err| I18nError::io(parent, err))?;
        }
        let encoded = serde_json::to_vec_pretty(values)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, encoded).map_err(|err| I18nError::io(&tmp, err))?;
        fs::rename(&tmp, &self.path).map_err(|err| I18nError::io(&self.path, err))?;
        Ok(())
    }
}

impl PreferenceStore for FilePreferences {
    fn get(&self, key: &str) -> Option<String> {
        match self.read_all() {
            Ok(values) => values.get(key).and_then(Value::as_str).map(str::to_string),
            Err(err) => {
                warn!(error = %err, "failed to read preferences");
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.write_lock.lock();
        let mut values = self.read_all()?;
        values.insert(key.to_string(), Value::String(value.to_string()));
        self.write_all(&values)
    }
}
