//! Error types shared by every calculator.
//!
//! Calculators reject bad input with a [`ValidationError`] before any figure
//! is computed, and reject tax years without a registered constants table
//! with a [`ConfigurationError`]. Nothing else is an error: empty transaction
//! sets, zero-value settings and fully depreciated assets all produce
//! well-formed, mostly-zero results.

use rust_decimal::Decimal;
use thiserror::Error;

/// Malformed or out-of-range calculator input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A home or office area was zero or negative.
    #[error("{field} must be positive, got {value}")]
    NonPositiveArea { field: &'static str, value: Decimal },

    /// The office must be a strict subset of the home.
    #[error("office area {office} must be smaller than total home area {home}")]
    OfficeNotSmallerThanHome { office: Decimal, home: Decimal },

    /// A home-office expense field was negative.
    #[error("home-office expense '{field}' must be non-negative, got {value}")]
    NegativeExpense { field: &'static str, value: Decimal },

    #[error("asset '{asset_id}' must have a non-empty description")]
    EmptyDescription { asset_id: String },

    #[error("asset '{asset_id}' cost must be positive, got {cost}")]
    NonPositiveCost { asset_id: String, cost: Decimal },

    #[error("asset '{asset_id}' business use must be between 0 and 100 percent, got {percent}")]
    BusinessUseOutOfRange { asset_id: String, percent: Decimal },

    #[error("asset '{asset_id}' placed in service {placed} after the end of tax year {tax_year}")]
    PlacedInServiceInFuture {
        asset_id: String,
        placed: chrono::NaiveDate,
        tax_year: i32,
    },

    #[error("asset '{asset_id}' prior special depreciation {value} must be between 0 and its business basis")]
    InvalidPriorDepreciation { asset_id: String, value: Decimal },

    #[error("schedule C net profit must be non-negative, got {0}")]
    NegativeNetProfit(Decimal),

    #[error("adjustments must be non-negative, got {0}")]
    NegativeAdjustments(Decimal),

    #[error("W-2 wages must be non-negative, got {0}")]
    NegativeWages(Decimal),

    #[error("unknown asset category '{0}'")]
    UnknownAssetCategory(String),

    #[error("unknown depreciation method '{0}'")]
    UnknownDepreciationMethod(String),

    #[error("unknown filing status '{0}'")]
    UnknownFilingStatus(String),
}

/// A statutory constants table is missing or malformed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    /// No constants table is registered for the requested tax year.
    #[error("no tax-year constants registered for {0}")]
    UnknownTaxYear(i32),

    #[error("tax year {0} is already registered")]
    DuplicateTaxYear(i32),

    /// A rate was outside [0, 1].
    #[error("tax year {tax_year}: {name} must be between 0 and 1, got {value}")]
    InvalidRate {
        tax_year: i32,
        name: &'static str,
        value: Decimal,
    },

    /// A cap, threshold or base that must be positive was not.
    #[error("tax year {tax_year}: {name} must be positive, got {value}")]
    InvalidAmount {
        tax_year: i32,
        name: &'static str,
        value: Decimal,
    },

    /// A MACRS percentage table did not sum to 100.
    #[error("tax year {tax_year}: {schedule} table sums to {total}, expected 100")]
    InvalidMacrsTable {
        tax_year: i32,
        schedule: &'static str,
        total: Decimal,
    },
}

/// Error returned by every public calculator.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CalculationError {
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),
}
