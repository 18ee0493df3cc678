//! Business use of home calculations (Form 8829).
//!
//! # Method
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Business-use percentage: office area / home area × 100 |
//! | 2    | Allocate each shared expense by the business-use percentage |
//! | 3    | Total allocated expenses |
//! | 4    | Add direct (office-only) expenses |
//! | 5    | Allowed deduction: smaller of step 4 or the annual cap |
//! | 6    | Carryover: step 4 less the annual cap, not below zero |
//!
//! The result also carries the simplified-method figure (a flat rate per
//! square foot up to a maximum area) so callers can compare the two.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use taxprep_core::calculations::forms::HomeOfficeWorksheet;
//! use taxprep_core::{HomeOfficeSettings, SharedHomeExpenses, TaxYearRegistry};
//!
//! let registry = TaxYearRegistry::builtin();
//! let worksheet = HomeOfficeWorksheet::for_year(&registry, 2024).unwrap();
//!
//! let settings = HomeOfficeSettings {
//!     total_home_area_sq_ft: dec!(2000),
//!     office_area_sq_ft: dec!(200),
//!     expenses: SharedHomeExpenses {
//!         rent_or_mortgage_interest: dec!(12000.00),
//!         ..Default::default()
//!     },
//! };
//!
//! let result = worksheet.calculate(&settings, None).unwrap();
//!
//! assert_eq!(result.business_use_percent, dec!(10.00));
//! assert_eq!(result.allocated.rent_or_mortgage_interest, dec!(1200.00));
//! assert_eq!(result.allowed_deduction, dec!(1200.00));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::calculations::common::{HUNDRED, allocate, non_negative, round_currency};
use crate::config::TaxYearRegistry;
use crate::error::{CalculationError, ConfigurationError, ValidationError};
use crate::models::{HomeOfficeSettings, SharedHomeExpenses, TaxYearConfig};

/// Statutory figures used by the home-office calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HomeOfficeConfig {
    /// Ceiling on the deduction allowed in one year.
    pub annual_cap: Decimal,

    /// Simplified method: dollars per square foot of office.
    pub simplified_rate: Decimal,

    /// Simplified method: largest office area that counts.
    pub simplified_max_sq_ft: Decimal,
}

impl HomeOfficeConfig {
    pub fn from_tax_year_config(config: &TaxYearConfig) -> Self {
        Self {
            annual_cap: config.home_office_annual_cap,
            simplified_rate: config.simplified_home_office_rate,
            simplified_max_sq_ft: config.simplified_home_office_max_sq_ft,
        }
    }
}

/// Form 8829 figures. Monetary fields are rounded to cents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Form8829Result {
    /// Office share of the home, rounded to two places for display. The
    /// allocations below use the unrounded percentage.
    pub business_use_percent: Decimal,

    /// Each shared expense scaled by the business-use percentage.
    pub allocated: SharedHomeExpenses,

    pub total_allocated: Decimal,
    pub direct_expenses: Decimal,

    /// Allocated plus direct expenses, before the annual cap.
    pub raw_deduction: Decimal,

    /// Deduction claimed this year.
    pub allowed_deduction: Decimal,

    /// Amount over the annual cap, deferred to a later year.
    pub carryover: Decimal,

    /// True when the annual cap reduced the deduction.
    pub cap_applied: bool,

    /// Simplified-method deduction for the same office, for comparison.
    pub simplified_method_deduction: Decimal,
}

/// Calculator for the home-office deduction.
#[derive(Debug, Clone)]
pub struct HomeOfficeWorksheet {
    config: HomeOfficeConfig,
}

impl HomeOfficeWorksheet {
    pub fn new(config: HomeOfficeConfig) -> Self {
        Self { config }
    }

    /// Worksheet using the constants registered for `tax_year`.
    pub fn for_year(
        registry: &TaxYearRegistry,
        tax_year: i32,
    ) -> Result<Self, ConfigurationError> {
        let config = registry.get(tax_year)?;
        Ok(Self::new(HomeOfficeConfig::from_tax_year_config(config)))
    }

    /// Computes the Form 8829 figures for `settings`.
    ///
    /// `direct_expenses` are costs attributable to the office alone (e.g.
    /// painting the office); they are added in full. `None` means zero.
    ///
    /// # Errors
    ///
    /// [`ValidationError`] if either area is not positive, the office is not
    /// strictly smaller than the home, or any expense is negative. No
    /// allocation is attempted for invalid input.
    pub fn calculate(
        &self,
        settings: &HomeOfficeSettings,
        direct_expenses: Option<Decimal>,
    ) -> Result<Form8829Result, CalculationError> {
        let direct_expenses = direct_expenses.unwrap_or(Decimal::ZERO);
        validate(settings, direct_expenses)?;

        // Step 1
        let business_use_percent = self.business_use_percent(settings);

        // Steps 2-3
        let allocated = allocate_expenses(&settings.expenses, business_use_percent);
        let total_allocated = allocated.total();

        // Step 4
        let raw_deduction = total_allocated + direct_expenses;

        // Steps 5-6
        let allowed_deduction = raw_deduction.min(self.config.annual_cap);
        let carryover = non_negative(raw_deduction - self.config.annual_cap);
        let cap_applied = carryover > Decimal::ZERO;
        if cap_applied {
            warn!(
                raw_deduction = %raw_deduction,
                annual_cap = %self.config.annual_cap,
                carryover = %carryover,
                "Home-office deduction exceeds annual cap; excess carried over"
            );
        }

        let simplified_method_deduction = self.simplified_method_deduction(settings);

        Ok(Form8829Result {
            business_use_percent: round_currency(business_use_percent),
            allocated: round_expenses(&allocated),
            total_allocated: round_currency(total_allocated),
            direct_expenses: round_currency(direct_expenses),
            raw_deduction: round_currency(raw_deduction),
            allowed_deduction: round_currency(allowed_deduction),
            carryover: round_currency(carryover),
            cap_applied,
            simplified_method_deduction: round_currency(simplified_method_deduction),
        })
    }

    fn business_use_percent(
        &self,
        settings: &HomeOfficeSettings,
    ) -> Decimal {
        let percent = settings.office_area_sq_ft / settings.total_home_area_sq_ft * HUNDRED;
        debug!(
            office_sq_ft = %settings.office_area_sq_ft,
            home_sq_ft = %settings.total_home_area_sq_ft,
            business_use_percent = %percent,
            "Computed home business-use percentage"
        );
        percent
    }

    fn simplified_method_deduction(
        &self,
        settings: &HomeOfficeSettings,
    ) -> Decimal {
        settings
            .office_area_sq_ft
            .min(self.config.simplified_max_sq_ft)
            * self.config.simplified_rate
    }
}

fn validate(
    settings: &HomeOfficeSettings,
    direct_expenses: Decimal,
) -> Result<(), ValidationError> {
    if settings.total_home_area_sq_ft <= Decimal::ZERO {
        return Err(ValidationError::NonPositiveArea {
            field: "total_home_area_sq_ft",
            value: settings.total_home_area_sq_ft,
        });
    }
    if settings.office_area_sq_ft <= Decimal::ZERO {
        return Err(ValidationError::NonPositiveArea {
            field: "office_area_sq_ft",
            value: settings.office_area_sq_ft,
        });
    }
    if settings.office_area_sq_ft >= settings.total_home_area_sq_ft {
        return Err(ValidationError::OfficeNotSmallerThanHome {
            office: settings.office_area_sq_ft,
            home: settings.total_home_area_sq_ft,
        });
    }
    for (field, value) in settings.expenses.fields() {
        if value < Decimal::ZERO {
            return Err(ValidationError::NegativeExpense { field, value });
        }
    }
    if direct_expenses < Decimal::ZERO {
        return Err(ValidationError::NegativeExpense {
            field: "direct_expenses",
            value: direct_expenses,
        });
    }
    Ok(())
}

fn allocate_expenses(
    expenses: &SharedHomeExpenses,
    percent: Decimal,
) -> SharedHomeExpenses {
    SharedHomeExpenses {
        rent_or_mortgage_interest: allocate(expenses.rent_or_mortgage_interest, percent),
        utilities: allocate(expenses.utilities, percent),
        insurance: allocate(expenses.insurance, percent),
        repairs_maintenance: allocate(expenses.repairs_maintenance, percent),
        property_tax: allocate(expenses.property_tax, percent),
        other: allocate(expenses.other, percent),
    }
}

fn round_expenses(expenses: &SharedHomeExpenses) -> SharedHomeExpenses {
    SharedHomeExpenses {
        rent_or_mortgage_interest: round_currency(expenses.rent_or_mortgage_interest),
        utilities: round_currency(expenses.utilities),
        insurance: round_currency(expenses.insurance),
        repairs_maintenance: round_currency(expenses.repairs_maintenance),
        property_tax: round_currency(expenses.property_tax),
        other: round_currency(expenses.other),
    }
}
