use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::catalog::DEFAULT_LOCALE;
use crate::error::{I18nError, Result};

pub const ENV_DEFAULT_LOCALE: &str = "LINGO_DEFAULT_LOCALE";
pub const ENV_PREFS_PATH: &str = "LINGO_PREFS_PATH";
pub const ENV_CATALOG_DIR: &str = "LINGO_CATALOG_DIR";
/// Session-only locale override; never persisted.
pub const ENV_LOCALE: &str = "LINGO_LOCALE";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct I18nConfig {
    pub default_locale: String,
    pub preferences_path: PathBuf,
    /// Directory of `<code>.json` tables; the bundled tables are used when unset.
    pub catalog_dir: Option<PathBuf>,
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            default_locale: DEFAULT_LOCALE.to_string(),
            preferences_path: PathBuf::from(".lingo/preferences.json"),
            catalog_dir: None,
        }
    }
}

impl I18nConfig {
    /// Optional TOML file (defaults otherwise) overlaid with the process
    /// environment.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        Self::load_with(file, |key| std::env::var(key).ok())
    }

    pub fn load_with(
        file: Option<&Path>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let base = match file {
            Some(path) => Self::from_toml_file(path)?,
            None => Self::default(),
        };
        Ok(base.apply_env(lookup))
    }

    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|err| I18nError::io(path, err))?;
        toml::from_str(&raw).map_err(|source| I18nError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Overlay values from `lookup`; blank values are ignored.
    pub fn apply_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        if let Some(value) = read(ENV_DEFAULT_LOCALE) {
            self.default_locale = value;
        }
        if let Some(value) = read(ENV_PREFS_PATH) {
            self.preferences_path = PathBuf::from(value);
        }
        if let Some(value) = read(ENV_CATALOG_DIR) {
            self.catalog_dir = Some(PathBuf::from(value));
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_point_at_bundled_catalog() {
        let config = I18nConfig::default();
        assert_eq!(config.default_locale, "zh-CN");
        assert_eq!(config.preferences_path, PathBuf::from(".lingo/preferences.json"));
        assert!(config.catalog_dir.is_none());
    }

    #[test]
    fn env_overrides_replace_defaults() {
        let config = I18nConfig::default().apply_env(env(&[
            (ENV_DEFAULT_LOCALE, "en"),
            (ENV_PREFS_PATH, "/tmp/prefs.json"),
            (ENV_CATALOG_DIR, "locales"),
        ]));
        assert_eq!(config.default_locale, "en");
        assert_eq!(config.preferences_path, PathBuf::from("/tmp/prefs.json"));
        assert_eq!(config.catalog_dir, Some(PathBuf::from("locales")));
    }

    #[test]
    fn blank_env_values_are_ignored() {
        let config = I18nConfig::default().apply_env(env(&[(ENV_DEFAULT_LOCALE, "  ")]));
        assert_eq!(config.default_locale, "zh-CN");
    }

    #[test]
    fn toml_file_fills_missing_fields_with_defaults() {
        let temp = tempfile::tempdir().expect("temp dir");
        let path = temp.path().join("lingo.toml");
        fs::write(&path, "default_locale = \"ja\"\n").expect("write");
        let config = I18nConfig::from_toml_file(&path).expect("load");
        assert_eq!(config.default_locale, "ja");
        assert_eq!(config.preferences_path, PathBuf::from(".lingo/preferences.json"));
    }

    #[test]
    fn invalid_toml_is_reported() {
        let temp = tempfile::tempdir().expect("temp dir");
        let path = temp.path().join("lingo.toml");
        fs::write(&path, "not = valid = toml").expect("write");
        let err = I18nConfig::from_toml_file(&path).expect_err("invalid");
        assert!(matches!(err, I18nError::Config { .. }));
    }

    #[test]
    fn environment_overrides_file_values() {
        let temp = tempfile::tempdir().expect("temp dir");
        let path = temp.path().join("lingo.toml");
        fs::write(
            &path,
            "default_locale = \"ja\"\npreferences_path = \"from-file.json\"\n",
        )
        .expect("write");

        let config =
            I18nConfig::load_with(Some(path.as_path()), env(&[(ENV_DEFAULT_LOCALE, "ko")])).expect("load");
        assert_eq!(config.default_locale, "ko");
        assert_eq!(config.preferences_path, PathBuf::from("from-file.json"));

        let config = I18nConfig::load_with(None, env(&[])).expect("defaults");
        assert_eq!(config, I18nConfig::default());
    }

    #[test]
    fn missing_config_file_is_an_io_error() {
        let temp = tempfile::tempdir().expect("temp dir");
        let path = temp.path().join("absent.toml");
        let err = I18nConfig::load_with(Some(path.as_path()), env(&[])).expect_err("missing");
        assert!(matches!(err, I18nError::Io { .. }));
    }
}
