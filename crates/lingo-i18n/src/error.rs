use std::path::PathBuf;

/// Errors raised while building catalogs, reading configuration or writing
/// preferences. Lookups and locale switches never produce one.
#[derive(Debug, thiserror::Error)]
pub enum I18nError {
    #[error("invalid locale code `{0}`")]
    InvalidLocale(String),

    #[error("failed to parse translation table for `{locale}`: {source}")]
    ParseTable {
        locale: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("locale `{0}` is declared more than once")]
    DuplicateLocale(String),

    #[error("catalog contains no locales")]
    EmptyCatalog,

    #[error("default locale `{0}` is not in the catalog")]
    UnknownDefault(String),

    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode preferences: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("invalid config file {}: {source}", .path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl I18nError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = I18nError> = std::result::Result<T, E>;
