//! TOML loader for additional or replacement tax-year tables.
//!
//! A file holds one or more `[[tax_year]]` tables with every
//! [`TaxYearConfig`] field. Loaded tables replace built-in tables for the
//! same year, so publishing a new year's figures needs no code change.
//!
//! ```toml
//! [[tax_year]]
//! tax_year = 2026
//! section_179_limit = "1300000"
//! # ...
//! macrs_5_year = ["20", "32", "19.2", "11.52", "11.52", "5.76"]
//!
//! [tax_year.additional_medicare_thresholds]
//! single = "200000"
//! # ...
//! ```

use std::path::Path;

use serde::Deserialize;
use taxprep_core::{TaxYearConfig, TaxYearRegistry};
use tracing::info;

use crate::error::{LoadError, read_file};

#[derive(Debug, Deserialize)]
struct TaxYearFile {
    #[serde(rename = "tax_year", default)]
    tax_years: Vec<TaxYearConfig>,
}

/// Parse every `[[tax_year]]` table in `input`.
pub fn load_from_str(input: &str) -> Result<Vec<TaxYearConfig>, LoadError> {
    let file: TaxYearFile = toml::from_str(input)?;
    Ok(file.tax_years)
}

/// Read a file from disk and delegate to [`load_from_str`].
pub fn load_from_file(path: &Path) -> Result<Vec<TaxYearConfig>, LoadError> {
    load_from_str(&read_file(path)?)
}

/// Validate `configs` and add them to `registry`, replacing existing years.
///
/// Returns the number of tables applied. Tables before the first invalid
/// one stay registered.
///
/// # Errors
///
/// [`LoadError::TaxYear`] for the first table that fails validation.
pub fn apply(
    registry: &mut TaxYearRegistry,
    configs: Vec<TaxYearConfig>,
) -> Result<usize, LoadError> {
    let mut applied = 0;
    for config in configs {
        let tax_year = config.tax_year;
        registry.upsert(config)?;
        info!(tax_year, "loaded tax-year table");
        applied += 1;
    }
    Ok(applied)
}
