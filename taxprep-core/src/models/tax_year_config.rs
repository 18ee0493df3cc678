use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::FilingStatusCode;
use crate::error::ConfigurationError;

/// An amount that varies by filing status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilingStatusAmounts {
    pub single: Decimal,
    pub married_filing_jointly: Decimal,
    pub married_filing_separately: Decimal,
    pub head_of_household: Decimal,
    pub qualifying_surviving_spouse: Decimal,
}

impl FilingStatusAmounts {
    pub fn get(
        &self,
        status: FilingStatusCode,
    ) -> Decimal {
        match status {
            FilingStatusCode::Single => self.single,
            FilingStatusCode::MarriedFilingJointly => self.married_filing_jointly,
            FilingStatusCode::MarriedFilingSeparately => self.married_filing_separately,
            FilingStatusCode::HeadOfHousehold => self.head_of_household,
            FilingStatusCode::QualifyingSurvivingSpouse => self.qualifying_surviving_spouse,
        }
    }
}

/// Statutory figures for one tax year.
///
/// Every calculator reads its caps, rates and tables from here, so adding a
/// tax year is a data change. Percent tables hold whole-number percentages
/// indexed by year in service (index 0 is year 1).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxYearConfig {
    pub tax_year: i32,

    // Form 4562
    pub section_179_limit: Decimal,
    pub section_179_phase_out_threshold: Decimal,
    pub bonus_depreciation_rate: Decimal,
    pub straight_line_useful_life_years: u32,
    pub macrs_5_year: Vec<Decimal>,
    pub macrs_7_year: Vec<Decimal>,

    // Form 8829
    pub home_office_annual_cap: Decimal,
    pub simplified_home_office_rate: Decimal,
    pub simplified_home_office_max_sq_ft: Decimal,

    // Schedule SE
    pub ss_wage_base: Decimal,
    pub ss_tax_rate: Decimal,
    pub medicare_tax_rate: Decimal,
    pub additional_medicare_rate: Decimal,
    pub additional_medicare_thresholds: FilingStatusAmounts,
    pub se_net_earnings_factor: Decimal,
    pub se_deduction_factor: Decimal,
    pub min_se_threshold: Decimal,

    // Schedule C
    pub meals_deductible_rate: Decimal,
}

impl TaxYearConfig {
    /// Checks that rates lie in [0, 1], caps are positive and the MACRS
    /// tables each sum to exactly 100.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let year = self.tax_year;

        for (name, value) in [
            ("bonus_depreciation_rate", self.bonus_depreciation_rate),
            ("ss_tax_rate", self.ss_tax_rate),
            ("medicare_tax_rate", self.medicare_tax_rate),
            ("additional_medicare_rate", self.additional_medicare_rate),
            ("se_net_earnings_factor", self.se_net_earnings_factor),
            ("se_deduction_factor", self.se_deduction_factor),
            ("meals_deductible_rate", self.meals_deductible_rate),
        ] {
            if value < Decimal::ZERO || value > Decimal::ONE {
                return Err(ConfigurationError::InvalidRate {
                    tax_year: year,
                    name,
                    value,
                });
            }
        }

        let thresholds = &self.additional_medicare_thresholds;
        for (name, value) in [
            ("section_179_limit", self.section_179_limit),
            ("section_179_phase_out_threshold", self.section_179_phase_out_threshold),
            ("home_office_annual_cap", self.home_office_annual_cap),
            ("simplified_home_office_rate", self.simplified_home_office_rate),
            ("simplified_home_office_max_sq_ft", self.simplified_home_office_max_sq_ft),
            ("ss_wage_base", self.ss_wage_base),
            ("straight_line_useful_life_years", Decimal::from(self.straight_line_useful_life_years)),
            ("additional_medicare_thresholds.single", thresholds.single),
            ("additional_medicare_thresholds.married_filing_jointly", thresholds.married_filing_jointly),
            ("additional_medicare_thresholds.married_filing_separately", thresholds.married_filing_separately),
            ("additional_medicare_thresholds.head_of_household", thresholds.head_of_household),
            ("additional_medicare_thresholds.qualifying_surviving_spouse", thresholds.qualifying_surviving_spouse),
        ] {
            if value <= Decimal::ZERO {
                return Err(ConfigurationError::InvalidAmount {
                    tax_year: year,
                    name,
                    value,
                });
            }
        }

        if self.min_se_threshold < Decimal::ZERO {
            return Err(ConfigurationError::InvalidAmount {
                tax_year: year,
                name: "min_se_threshold",
                value: self.min_se_threshold,
            });
        }

        for (schedule, table) in [
            ("macrs_5_year", &self.macrs_5_year),
            ("macrs_7_year", &self.macrs_7_year),
        ] {
            let total: Decimal = table.iter().sum();
            if total != Decimal::ONE_HUNDRED || table.iter().any(|p| *p < Decimal::ZERO) {
                return Err(ConfigurationError::InvalidMacrsTable {
                    tax_year: year,
                    schedule,
                    total,
                });
            }
        }

        Ok(())
    }
}
