//! Self-employment tax calculations (Schedule SE).
//!
//! # Worksheet Structure
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Net earnings: Schedule C net profit + adjustments |
//! | 2    | SE base: step 1 × 92.35% (net earnings factor) |
//! | 3    | Social security tax: smaller of step 2 or the remaining wage base × 12.4% |
//! | 4    | Medicare tax: step 2 × 2.9% (no wage base limit) |
//! | 5    | Additional Medicare tax: step 2 above the filing-status threshold × 0.9% |
//! | 6    | Total SE tax: steps 3 + 4 + 5 |
//! | 7    | Deductible half: step 6 × 50% |
//!
//! W-2 wages already taxed for social security reduce the remaining wage base
//! in step 3 and the additional-Medicare threshold in step 5.
//!
//! # Minimum Threshold
//!
//! An SE base under $400 sets [`ScheduleSeResult::below_threshold`]. The flag
//! is informational; the tax figures are computed the same way regardless.
//! The threshold is configurable via [`SeWorksheetConfig::min_se_threshold`].
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use taxprep_core::calculations::forms::SeWorksheet;
//! use taxprep_core::{FilingStatusCode, TaxSummaryInput, TaxYearRegistry};
//!
//! let registry = TaxYearRegistry::builtin();
//! let worksheet = SeWorksheet::for_year(&registry, 2024).unwrap();
//!
//! let input = TaxSummaryInput {
//!     schedule_c_net_profit: dec!(80000.00),
//!     tax_year: 2024,
//!     adjustments: dec!(0),
//!     filing_status: FilingStatusCode::Single,
//!     w2_wages: dec!(0),
//! };
//!
//! let result = worksheet.calculate(&input).unwrap();
//!
//! assert_eq!(result.se_base, dec!(73880.00));
//! assert_eq!(result.total_se_tax, dec!(11303.64));
//! assert_eq!(result.half_deduction, dec!(5651.82));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::calculations::common::{non_negative, round_currency};
use crate::config::TaxYearRegistry;
use crate::error::{CalculationError, ConfigurationError, ValidationError};
use crate::models::{FilingStatusAmounts, FilingStatusCode, TaxSummaryInput, TaxYearConfig};

/// Configuration parameters for Schedule SE calculations.
///
/// These values are obtained from [`TaxYearConfig`] and represent
/// IRS-specified rates and limits that change from year to year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeWorksheetConfig {
    /// Maximum earnings subject to social security tax.
    ///
    /// For 2024, this is $168,600.
    pub ss_wage_base: Decimal,

    /// Combined employer and employee social security rate, 12.4%.
    pub ss_tax_rate: Decimal,

    /// Combined employer and employee Medicare rate, 2.9%.
    pub medicare_tax_rate: Decimal,

    /// Additional Medicare tax rate on earnings above the threshold, 0.9%.
    pub additional_medicare_rate: Decimal,

    /// Earnings above which additional Medicare tax applies, by filing
    /// status. Married filing jointly has the highest threshold.
    pub additional_medicare_thresholds: FilingStatusAmounts,

    /// Factor applied to net earnings to arrive at the SE base, 92.35%.
    ///
    /// This removes the "employer-equivalent" portion, so earnings are
    /// never taxed at their full face value.
    pub net_earnings_factor: Decimal,

    /// Deductible portion of SE tax, 50%.
    pub deduction_factor: Decimal,

    /// SE base below which `below_threshold` is reported, $400.
    pub min_se_threshold: Decimal,
}

impl SeWorksheetConfig {
    /// Creates a new configuration from a [`TaxYearConfig`].
    pub fn from_tax_year_config(config: &TaxYearConfig) -> Self {
        Self {
            ss_wage_base: config.ss_wage_base,
            ss_tax_rate: config.ss_tax_rate,
            medicare_tax_rate: config.medicare_tax_rate,
            additional_medicare_rate: config.additional_medicare_rate,
            additional_medicare_thresholds: config.additional_medicare_thresholds.clone(),
            net_earnings_factor: config.se_net_earnings_factor,
            deduction_factor: config.se_deduction_factor,
            min_se_threshold: config.min_se_threshold,
        }
    }
}

/// Result of Schedule SE calculations.
///
/// Every monetary field is rounded to cents. `total_se_tax` is the sum of the
/// three published tax components, and `half_deduction` is half of
/// `total_se_tax` rounded to cents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSeResult {
    /// Net profit plus adjustments (step 1).
    pub net_earnings: Decimal,

    /// Net earnings × net earnings factor (step 2).
    pub se_base: Decimal,

    /// Portion of the SE base subject to social security tax.
    pub ss_taxable_earnings: Decimal,

    /// Social security component (step 3).
    pub social_security_tax: Decimal,

    /// Medicare component (step 4).
    pub medicare_tax: Decimal,

    /// Threshold used for additional Medicare tax, after W-2 wages.
    pub additional_medicare_threshold: Decimal,

    /// Additional Medicare component (step 5).
    pub additional_medicare_tax: Decimal,

    /// Total self-employment tax (step 6).
    pub total_se_tax: Decimal,

    /// Deductible half of SE tax (step 7). This amount is an
    /// above-the-line deduction on Schedule 1.
    pub half_deduction: Decimal,

    /// `true` when the SE base is under the minimum threshold. Does not
    /// change any tax figure.
    pub below_threshold: bool,
}

/// Unrounded tax components.
struct SeComponents {
    ss_taxable_earnings: Decimal,
    social_security_tax: Decimal,
    medicare_tax: Decimal,
    additional_medicare_threshold: Decimal,
    additional_medicare_tax: Decimal,
}

/// Calculator for Schedule SE.
#[derive(Debug, Clone)]
pub struct SeWorksheet {
    config: SeWorksheetConfig,
}

impl SeWorksheet {
    /// Creates a new SE worksheet calculator with the given configuration.
    pub fn new(config: SeWorksheetConfig) -> Self {
        Self { config }
    }

    /// Worksheet using the constants registered for `tax_year`.
    pub fn for_year(
        registry: &TaxYearRegistry,
        tax_year: i32,
    ) -> Result<Self, ConfigurationError> {
        let config = registry.get(tax_year)?;
        Ok(Self::new(SeWorksheetConfig::from_tax_year_config(config)))
    }

    /// Calculates the complete worksheet for `input`.
    ///
    /// # Errors
    ///
    /// [`ValidationError`] if net profit, adjustments or W-2 wages are
    /// negative. SE tax does not apply to a loss; callers must not invoke
    /// this calculator when Schedule C nets to a loss.
    pub fn calculate(
        &self,
        input: &TaxSummaryInput,
    ) -> Result<ScheduleSeResult, CalculationError> {
        validate(input)?;

        // Step 1
        let net_earnings = input.schedule_c_net_profit + input.adjustments;

        // Step 2
        let se_base = net_earnings * self.config.net_earnings_factor;

        let below_threshold = se_base < self.config.min_se_threshold;
        if below_threshold {
            warn!(
                se_base = %se_base,
                threshold = %self.config.min_se_threshold,
                "SE base below minimum threshold"
            );
        }

        // Steps 3-5
        let components = self.components(se_base, input.w2_wages, input.filing_status);

        // Steps 6-7 work from the published (rounded) components so the
        // total is exactly their sum.
        let social_security_tax = round_currency(components.social_security_tax);
        let medicare_tax = round_currency(components.medicare_tax);
        let additional_medicare_tax = round_currency(components.additional_medicare_tax);
        let total_se_tax = social_security_tax + medicare_tax + additional_medicare_tax;
        let half_deduction = round_currency(total_se_tax * self.config.deduction_factor);

        debug!(
            se_base = %se_base,
            total_se_tax = %total_se_tax,
            half_deduction = %half_deduction,
            "Computed Schedule SE"
        );

        Ok(ScheduleSeResult {
            net_earnings: round_currency(net_earnings),
            se_base: round_currency(se_base),
            ss_taxable_earnings: round_currency(components.ss_taxable_earnings),
            social_security_tax,
            medicare_tax,
            additional_medicare_threshold: round_currency(components.additional_medicare_threshold),
            additional_medicare_tax,
            total_se_tax,
            half_deduction,
            below_threshold,
        })
    }

    fn components(
        &self,
        se_base: Decimal,
        w2_wages: Decimal,
        filing_status: FilingStatusCode,
    ) -> SeComponents {
        // Step 3: earnings above the wage base are exempt
        let remaining_wage_base = self.remaining_ss_wage_base(w2_wages);
        let ss_taxable_earnings = se_base.min(remaining_wage_base);
        let social_security_tax = ss_taxable_earnings * self.config.ss_tax_rate;

        // Step 4
        let medicare_tax = se_base * self.config.medicare_tax_rate;

        // Step 5
        let additional_medicare_threshold = non_negative(
            self.config.additional_medicare_thresholds.get(filing_status) - w2_wages,
        );
        let additional_medicare_tax = non_negative(se_base - additional_medicare_threshold)
            * self.config.additional_medicare_rate;

        SeComponents {
            ss_taxable_earnings,
            social_security_tax,
            medicare_tax,
            additional_medicare_threshold,
            additional_medicare_tax,
        }
    }

    /// Wage base left after W-2 wages already taxed for social security.
    fn remaining_ss_wage_base(
        &self,
        w2_wages: Decimal,
    ) -> Decimal {
        let remaining = self.config.ss_wage_base - w2_wages;

        if remaining <= Decimal::ZERO {
            warn!(
                ss_wage_base = %self.config.ss_wage_base,
                w2_wages = %w2_wages,
                "Wages meet or exceed SS wage base; no SS tax on SE earnings"
            );
            return Decimal::ZERO;
        }

        remaining
    }
}

fn validate(input: &TaxSummaryInput) -> Result<(), ValidationError> {
    if input.schedule_c_net_profit < Decimal::ZERO {
        return Err(ValidationError::NegativeNetProfit(input.schedule_c_net_profit));
    }
    if input.adjustments < Decimal::ZERO {
        return Err(ValidationError::NegativeAdjustments(input.adjustments));
    }
    if input.w2_wages < Decimal::ZERO {
        return Err(ValidationError::NegativeWages(input.w2_wages));
    }
    Ok(())
}
