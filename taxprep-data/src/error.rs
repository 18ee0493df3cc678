use std::path::PathBuf;

use taxprep_core::{ConfigurationError, ValidationError};
use thiserror::Error;

/// Errors that can occur while loading input files.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Bad CSV structure, a missing required column or a type mismatch.
    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A CSV row parsed but holds a value the engine rejects. `row` is
    /// 1-based, not counting the header.
    #[error("row {row}: {source}")]
    InvalidRow {
        row: usize,
        #[source]
        source: ValidationError,
    },

    #[error("invalid settings: {0}")]
    Settings(#[from] ValidationError),

    #[error("invalid tax-year table: {0}")]
    TaxYear(#[from] ConfigurationError),
}

impl LoadError {
    pub(crate) fn io(
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        LoadError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Reads `path` to a string, naming the path on failure.
pub(crate) fn read_file(path: &std::path::Path) -> Result<String, LoadError> {
    std::fs::read_to_string(path).map_err(|source| LoadError::io(path, source))
}

