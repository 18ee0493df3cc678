use std::collections::BTreeMap;

use tracing::debug;

use super::builtin::builtin_tax_years;
use crate::error::ConfigurationError;
use crate::models::TaxYearConfig;

/// Registry of [`TaxYearConfig`] tables, keyed by tax year.
///
/// Typical lifetime:
/// 1. Start from `TaxYearRegistry::builtin()` (or `new()` for an empty one).
/// 2. Call `register` / `upsert` for any tables loaded from data files.
/// 3. Hand `&TaxYearRegistry` to the calculators' `for_year` constructors.
///
/// Lookups never fall back to a neighbouring year.
#[derive(Debug, Clone, Default)]
pub struct TaxYearRegistry {
    years: BTreeMap<i32, TaxYearConfig>,
}

impl TaxYearRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every table shipped with the engine.
    pub fn builtin() -> Self {
        let years = builtin_tax_years()
            .into_iter()
            .map(|config| (config.tax_year, config))
            .collect();
        Self { years }
    }

    /// Add a table for a year that is not registered yet.
    ///
    /// # Errors
    /// * [`ConfigurationError::DuplicateTaxYear`] if the year is present.
    /// * Any error from [`TaxYearConfig::validate`].
    pub fn register(
        &mut self,
        config: TaxYearConfig,
    ) -> Result<(), ConfigurationError> {
        if self.years.contains_key(&config.tax_year) {
            return Err(ConfigurationError::DuplicateTaxYear(config.tax_year));
        }
        self.upsert(config)
    }

    /// Add a table, replacing any existing table for the same year.
    pub fn upsert(
        &mut self,
        config: TaxYearConfig,
    ) -> Result<(), ConfigurationError> {
        config.validate()?;
        debug!(tax_year = config.tax_year, "registered tax-year constants");
        self.years.insert(config.tax_year, config);
        Ok(())
    }

    /// The table for `tax_year`.
    ///
    /// # Errors
    /// [`ConfigurationError::UnknownTaxYear`] if no table is registered.
    pub fn get(
        &self,
        tax_year: i32,
    ) -> Result<&TaxYearConfig, ConfigurationError> {
        self.years
            .get(&tax_year)
            .ok_or(ConfigurationError::UnknownTaxYear(tax_year))
    }

    /// Registered years in ascending order.
    pub fn tax_years(&self) -> Vec<i32> {
        self.years.keys().copied().collect()
    }
}
