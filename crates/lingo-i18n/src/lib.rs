//! Locale selection and dotted-key translation lookup.
//!
//! A [`LocaleStore`] owns the known locales and the active one; a
//! [`Resolver`] turns keys such as `nav.dashboard` into strings for that
//! locale. Missing translations never fail: the key itself comes back, so a
//! gap shows up on screen instead of breaking the caller.
//!
//! ```
//! use std::sync::Arc;
//! use lingo_i18n::{Catalog, LocaleStore, MemoryPreferences, Resolver};
//!
//! let catalog = Catalog::from_json_sources([
//!     ("en", r#"{"a": {"b": "Hello"}}"#),
//!     ("fr", r#"{"a": {"b": "Bonjour"}}"#),
//! ])?;
//! let store = LocaleStore::initialize(
//!     Arc::new(catalog),
//!     "en",
//!     None,
//!     Arc::new(MemoryPreferences::new()),
//! )?;
//! let resolver = Resolver::new(Arc::new(store));
//!
//! assert_eq!(resolver.translate("a.b"), "Hello");
//! resolver.store().set_locale("fr");
//! assert_eq!(resolver.translate("a.b"), "Bonjour");
//! assert_eq!(resolver.translate("a.c"), "a.c");
//! # Ok::<(), lingo_i18n::I18nError>(())
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod locale;
pub mod preferences;
pub mod resolver;
pub mod store;
pub mod table;
pub mod template;

pub use catalog::{Catalog, CoverageReport, DEFAULT_LOCALE, LocaleCoverage, LocaleEntry};
pub use config::I18nConfig;
pub use error::{I18nError, Result};
pub use locale::LocaleCode;
pub use preferences::{
    FilePreferences, LOCALE_PREFERENCE_KEY, MemoryPreferences, PreferenceStore,
};
pub use resolver::{MissingTranslation, Resolver};
pub use store::{LocaleOption, LocaleStore};
pub use table::{LookupError, TranslationNode, TranslationTable};
pub use template::fill;
