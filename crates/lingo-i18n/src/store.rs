use std::sync::Arc;

use arc_swap::ArcSwap;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::catalog::{Catalog, LocaleEntry};
use crate::error::{I18nError, Result};
use crate::locale::LocaleCode;
use crate::preferences::{LOCALE_PREFERENCE_KEY, PreferenceStore};

/// A selectable locale as shown in a language switcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocaleOption {
    pub code: LocaleCode,
    pub label: String,
}

/// Owns the active locale and the catalog it is chosen from.
///
/// The active entry is swapped atomically, so concurrent readers see either
/// the previous or the new locale in full.
pub struct LocaleStore {
    catalog: Arc<Catalog>,
    active: ArcSwap<LocaleEntry>,
    preferences: Arc<dyn PreferenceStore>,
}

impl std::fmt::Debug for LocaleStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocaleStore")
            .field("active", &self.active.load().code())
            .field("locales", &self.catalog.len())
            .finish()
    }
}

impl LocaleStore {
    /// Start on `persisted` when the catalog knows it, otherwise on
    /// `default`. Only an unknown `default` is an error.
    pub fn initialize(
        catalog: Arc<Catalog>,
        default: &str,
        persisted: Option<&str>,
        preferences: Arc<dyn PreferenceStore>,
    ) -> Result<Self> {
        let default_entry = catalog
            .entry(default)
            .cloned()
            .ok_or_else(|| I18nError::UnknownDefault(default.to_string()))?;
        let entry = match persisted.and_then(|code| catalog.entry(code)) {
            Some(entry) => Arc::clone(entry),
            None => {
                if let Some(code) = persisted {
                    debug!(persisted = code, default = default, "discarding unknown persisted locale");
                }
                default_entry
            }
        };
        Ok(Self {
            catalog,
            active: ArcSwap::new(entry),
            preferences,
        })
    }

    /// Read the persisted choice from `preferences` and initialize with it.
    pub fn from_preferences(
        catalog: Arc<Catalog>,
        default: &str,
        preferences: Arc<dyn PreferenceStore>,
    ) -> Result<Self> {
        let persisted = preferences.get(LOCALE_PREFERENCE_KEY);
        Self::initialize(catalog, default, persisted.as_deref(), preferences)
    }

    /// Switch to `code` and persist it. Unknown codes change nothing and
    /// return `false`.
    pub fn set_locale(&self, code: &str) -> bool {
        let Some(entry) = self.catalog.entry(code) else {
            debug!(locale = code, "ignoring unknown locale");
            return false;
        };
        let previous = self.active.swap(Arc::clone(entry));
        if previous.code() != entry.code() {
            info!(from = %previous.code(), to = %entry.code(), "active locale changed");
        }
        if let Err(err) = self.preferences.set(LOCALE_PREFERENCE_KEY, entry.code().as_str()) {
            warn!(locale = code, error = %err, "failed to persist locale preference");
        }
        true
    }

    pub fn list_locales(&self) -> Vec<LocaleOption> {
        self.catalog
            .entries()
            .iter()
            .map(|entry| LocaleOption {
                code: entry.code().clone(),
                label: entry.label().to_string(),
            })
            .collect()
    }

    pub fn active_locale(&self) -> LocaleCode {
        self.active.load().code().clone()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub(crate) fn active_entry(&self) -> Arc<LocaleEntry> {
        self.active.load_full()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preferences::MemoryPreferences;
    use crate::resolver::Resolver;

    fn catalog() -> Arc<Catalog> {
        Arc::new(
            Catalog::from_json_sources([
                ("en", r#"{"label": "English", "a": {"b": "Hello"}}"#),
                ("fr", r#"{"label": "Français", "a": {"b": "Bonjour"}}"#),
                ("de", r#"{"label": "Deutsch", "a": {"b": "Hallo"}}"#),
            ])
            .expect("catalog"),
        )
    }

    struct FailingPreferences;

    impl PreferenceStore for FailingPreferences {
        fn get(&self, _key: &str) -> Option<String> {
            None
        }

        fn set(&self, key: &str, _value: &str) -> Result<()> {
            Err(I18nError::io(
                key,
                std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
            ))
        }
    }

    #[test]
    fn initialize_prefers_known_persisted_code() {
        let prefs = Arc::new(MemoryPreferences::new());
        let store = LocaleStore::initialize(catalog(), "en", Some("de"), prefs).expect("store");
        assert_eq!(store.active_locale(), "de");
    }

    #[test]
    fn initialize_discards_unknown_persisted_code() {
        let prefs = Arc::new(MemoryPreferences::new());
        let store = LocaleStore::initialize(catalog(), "en", Some("xx"), prefs).expect("store");
        assert_eq!(store.active_locale(), "en");
    }

    #[test]
    fn initialize_without_persisted_code_uses_default() {
        let prefs = Arc::new(MemoryPreferences::new());
        let store = LocaleStore::initialize(catalog(), "fr", None, prefs).expect("store");
        assert_eq!(store.active_locale(), "fr");
    }

    #[test]
    fn initialize_rejects_unknown_default() {
        let prefs = Arc::new(MemoryPreferences::new());
        let err = LocaleStore::initialize(catalog(), "xx", Some("en"), prefs).expect_err("default");
        assert!(matches!(err, I18nError::UnknownDefault(code) if code == "xx"));
    }

    #[test]
    fn set_locale_persists_known_code() {
        let prefs = Arc::new(MemoryPreferences::new());
        let store =
            LocaleStore::initialize(catalog(), "en", None, prefs.clone()).expect("store");
        assert!(store.set_locale("fr"));
        assert_eq!(store.active_locale(), "fr");
        assert_eq!(prefs.get(LOCALE_PREFERENCE_KEY).as_deref(), Some("fr"));
    }

    #[test]
    fn set_locale_ignores_unknown_code() {
        let prefs = Arc::new(MemoryPreferences::with_value(LOCALE_PREFERENCE_KEY, "fr"));
        let store = LocaleStore::from_preferences(catalog(), "en", prefs.clone()).expect("store");
        assert!(!store.set_locale("xx"));
        assert_eq!(store.active_locale(), "fr");
        assert_eq!(prefs.get(LOCALE_PREFERENCE_KEY).as_deref(), Some("fr"));
    }

    #[test]
    fn set_locale_survives_persistence_failure() {
        let store = LocaleStore::initialize(catalog(), "en", None, Arc::new(FailingPreferences))
            .expect("store");
        assert!(store.set_locale("de"));
        assert_eq!(store.active_locale(), "de");
    }

    #[test]
    fn list_locales_is_ordered_and_stable() {
        let prefs = Arc::new(MemoryPreferences::new());
        let store = LocaleStore::initialize(catalog(), "en", None, prefs).expect("store");
        let first = store.list_locales();
        store.set_locale("de");
        let second = store.list_locales();
        assert_eq!(first, second);
        let labels: Vec<(&str, &str)> = first
            .iter()
            .map(|option| (option.code.as_str(), option.label.as_str()))
            .collect();
        assert_eq!(
            labels,
            vec![("en", "English"), ("fr", "Français"), ("de", "Deutsch")]
        );
    }

    #[test]
    fn store_and_resolver_are_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<LocaleStore>();
        assert_send_sync::<Resolver>();
    }

    #[test]
    fn readers_never_observe_a_partial_switch() {
        let prefs = Arc::new(MemoryPreferences::new());
        let store = Arc::new(LocaleStore::initialize(catalog(), "en", None, prefs).expect("store"));
        let resolver = Resolver::new(Arc::clone(&store));

        std::thread::scope(|scope| {
            scope.spawn(|| {
                for round in 0..5_000 {
                    store.set_locale(if round % 2 == 0 { "fr" } else { "en" });
                }
            });
            scope.spawn(|| {
                for _ in 0..5_000 {
                    let value = resolver.translate("a.b");
                    assert!(value == "Hello" || value == "Bonjour", "mixed value {value}");
                }
            });
        });

        let active = store.active_locale();
        assert!(active == "en" || active == "fr");
    }
}
