//! The known locale set: codes, display labels and translation tables.
//!
//! Declaration order is significant. It is the order `LocaleStore` hands
//! out for language pickers, so it never changes once a catalog is built.

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::error::{I18nError, Result};
use crate::locale::LocaleCode;
use crate::table::TranslationTable;

/// Locale used when no usable preference exists.
pub const DEFAULT_LOCALE: &str = "zh-CN";

const BUILTIN_TABLES: &[(&str, &str)] = &[
    ("zh-CN", include_str!("../locales/zh-CN.json")),
    ("zh-TW", include_str!("../locales/zh-TW.json")),
    ("en", include_str!("../locales/en.json")),
    ("ja", include_str!("../locales/ja.json")),
    ("ko", include_str!("../locales/ko.json")),
    ("fr", include_str!("../locales/fr.json")),
    ("de", include_str!("../locales/de.json")),
];

#[derive(Debug)]
pub struct LocaleEntry {
    code: LocaleCode,
    label: String,
    table: TranslationTable,
}

impl LocaleEntry {
    pub fn new(code: LocaleCode, table: TranslationTable) -> Self {
        let label = table
            .label()
            .map(str::to_string)
            .unwrap_or_else(|| code.to_string());
        Self { code, label, table }
    }

    pub fn code(&self) -> &LocaleCode {
        &self.code
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn table(&self) -> &TranslationTable {
        &self.table
    }
}

#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Vec<Arc<LocaleEntry>>,
}

impl Catalog {
    pub fn new(tables: impl IntoIterator<Item = (LocaleCode, TranslationTable)>) -> Result<Self> {
        let mut seen = HashSet::new();
        let mut entries = Vec::new();
        for (code, table) in tables {
            if !seen.insert(code.clone()) {
                return Err(I18nError::DuplicateLocale(code.to_string()));
            }
            entries.push(Arc::new(LocaleEntry::new(code, table)));
        }
        if entries.is_empty() {
            return Err(I18nError::EmptyCatalog);
        }
        Ok(Self { entries })
    }

    /// Build from `(code, json)` pairs, keeping their order.
    pub fn from_json_sources<'a>(
        sources: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<Self> {
        let tables = sources
            .into_iter()
            .map(|(code, raw)| -> Result<(LocaleCode, TranslationTable)> {
                let code = LocaleCode::new(code)?;
                let table = TranslationTable::from_json_str(code.as_str(), raw)?;
                Ok((code, table))
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(tables)
    }

    /// The tables compiled into the crate.
    pub fn builtin() -> Result<Self> {
        Self::from_json_sources(BUILTIN_TABLES.iter().copied())
    }

    /// Load every `<code>.json` file in `dir`, ordered by file name.
    pub fn load_dir(dir: &Path) -> Result<Self> {
        let mut files = Vec::new();
        for entry in fs::read_dir(dir).map_err(|err| I18nError::io(dir, err))? {
            let path = entry.map_err(|err| I18nError::io(dir, err))?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            files.push((stem.to_string(), path.clone()));
        }
        files.sort_by(|a, b| a.0.cmp(&b.0));

        let mut tables = Vec::with_capacity(files.len());
        for (stem, path) in files {
            let code = LocaleCode::new(stem)?;
            let raw = fs::read_to_string(&path).map_err(|err| I18nError::io(&path, err))?;
            let table = TranslationTable::from_json_str(code.as_str(), &raw)?;
            debug!(locale = %code, path = %path.display(), "loaded translation table");
            tables.push((code, table));
        }
        Self::new(tables)
    }

    pub fn entries(&self) -> &[Arc<LocaleEntry>] {
        &self.entries
    }

    pub fn entry(&self, code: &str) -> Option<&Arc<LocaleEntry>> {
        self.entries.iter().find(|entry| entry.code == *code)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.entry(code).is_some()
    }

    pub fn codes(&self) -> impl Iterator<Item = &LocaleCode> {
        self.entries.iter().map(|entry| &entry.code)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First candidate that names a known locale. Blank and unknown
    /// candidates are skipped.
    pub fn select_known<'a>(
        &self,
        candidates: impl IntoIterator<Item = Option<&'a str>>,
    ) -> Option<&LocaleCode> {
        candidates
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .find_map(|value| self.entry(value).map(|entry| &entry.code))
    }

    /// Compare every locale's leaf paths with those of `reference`.
    ///
    /// Returns `None` when `reference` is not in the catalog.
    pub fn coverage(&self, reference: &str) -> Option<CoverageReport> {
        let reference_entry = self.entry(reference)?;
        let reference_paths = reference_entry.table.leaf_paths();
        let reference_set: HashSet<&str> = reference_paths.iter().map(String::as_str).collect();

        let locales = self
            .entries
            .iter()
            .map(|entry| {
                let paths = entry.table.leaf_paths();
                let own: HashSet<&str> = paths.iter().map(String::as_str).collect();
                let missing: Vec<String> = reference_paths
                    .iter()
                    .filter(|path| !own.contains(path.as_str()))
                    .cloned()
                    .collect();
                let extra: Vec<String> = paths
                    .iter()
                    .filter(|path| !reference_set.contains(path.as_str()))
                    .cloned()
                    .collect();
                LocaleCoverage {
                    locale: entry.code.clone(),
                    present: reference_paths.len().saturating_sub(missing.len()),
                    missing,
                    extra,
                }
            })
            .collect();

        Some(CoverageReport {
            reference: reference_entry.code.clone(),
            total_keys: reference_paths.len(),
            locales,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoverageReport {
    pub reference: LocaleCode,
    pub total_keys: usize,
    pub locales: Vec<LocaleCoverage>,
}

impl CoverageReport {
    pub fn is_complete(&self) -> bool {
        self.locales
            .iter()
            .all(|locale| locale.missing.is_empty() && locale.extra.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocaleCoverage {
    pub locale: LocaleCode,
    pub present: usize,
    /// Reference paths this locale lacks; lookups for them fall back to the key.
    pub missing: Vec<String>,
    /// Paths only this locale defines.
    pub extra: Vec<String>,
}
