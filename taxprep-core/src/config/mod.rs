//! Versioned statutory constants.
//!
//! [`TaxYearRegistry`] maps a tax year to its [`TaxYearConfig`](crate::TaxYearConfig).
//! Calculators look their year up here and fail with
//! [`ConfigurationError::UnknownTaxYear`](crate::ConfigurationError::UnknownTaxYear)
//! rather than borrowing another year's rates.

mod builtin;
mod registry;

pub use builtin::{builtin_tax_years, macrs_5_year_table, macrs_7_year_table};
pub use registry::TaxYearRegistry;
