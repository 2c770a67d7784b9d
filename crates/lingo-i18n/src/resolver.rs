//! Dotted-key resolution against the active locale.
//!
//! # Fallback
//!
//! | Condition | `translate` returns |
//! |-----------|---------------------|
//! | Path resolves to a non-empty string | that string, placeholders intact |
//! | A segment is missing | the key, verbatim |
//! | Path ends on a group | the key, verbatim |
//! | Path ends on an empty string | the key, verbatim |
//!
//! Nothing is cached, so a locale switch is visible to the next call.

use std::sync::Arc;

use tracing::debug;

use crate::locale::LocaleCode;
use crate::store::LocaleStore;
use crate::table::LookupError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("no translation for `{key}` in `{locale}`: {reason}")]
pub struct MissingTranslation {
    pub locale: LocaleCode,
    pub key: String,
    pub reason: LookupError,
}

#[derive(Debug, Clone)]
pub struct Resolver {
    store: Arc<LocaleStore>,
}

impl Resolver {
    pub fn new(store: Arc<LocaleStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &LocaleStore {
        &self.store
    }

    /// Resolve `key`, or hand it back unchanged when it has no translation.
    pub fn translate(&self, key: &str) -> String {
        match self.lookup(key) {
            Ok(text) => text,
            Err(missing) => {
                debug!(
                    key,
                    locale = %missing.locale,
                    reason = %missing.reason,
                    "translation missing, returning key"
                );
                missing.key
            }
        }
    }

    /// Resolve `key` in the active locale, reporting why it failed.
    pub fn lookup(&self, key: &str) -> Result<String, MissingTranslation> {
        let entry = self.store.active_entry();
        entry
            .table()
            .lookup(key)
            .map(str::to_string)
            .map_err(|reason| MissingTranslation {
                locale: entry.code().clone(),
                key: key.to_string(),
                reason,
            })
    }

    pub fn contains(&self, key: &str) -> bool {
        self.store.active_entry().table().lookup(key).is_ok()
    }
}
