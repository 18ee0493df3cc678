//! TOML loader for per-year filer settings.
//!
//! ```toml
//! tax_year = 2024
//! filing_status = "single"          # or S, MFJ, MFS, HOH, QSS
//! schedule_c_net_profit = "80000.00"
//! adjustments = "0"                 # optional, default 0
//! w2_wages = "0"                    # optional, default 0
//! business_income = "95000.00"      # optional, defaults to net profit
//! direct_expenses = "150.00"        # optional
//!
//! [home_office]                     # optional
//! total_home_area_sq_ft = "2000"
//! office_area_sq_ft = "200"
//!
//! [home_office.expenses]
//! rent_or_mortgage_interest = "12000.00"
//! utilities = "2400.00"
//! ```
//!
//! Amounts may be written as TOML strings or numbers; strings keep their
//! exact decimal value.

use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use taxprep_core::{FilingStatusCode, HomeOfficeSettings, TaxSummaryInput, ValidationError};

use crate::error::{LoadError, read_file};

/// Everything the report needs besides transactions and assets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub tax_year: i32,
    pub filing_status: String,
    pub schedule_c_net_profit: Decimal,
    #[serde(default)]
    pub adjustments: Decimal,
    #[serde(default)]
    pub w2_wages: Decimal,
    /// Income limit for Section 179. Defaults to net profit.
    #[serde(default)]
    pub business_income: Option<Decimal>,
    #[serde(default)]
    pub home_office: Option<HomeOfficeSettings>,
    #[serde(default)]
    pub direct_expenses: Option<Decimal>,
}

impl Settings {
    pub fn filing_status(&self) -> Result<FilingStatusCode, ValidationError> {
        FilingStatusCode::parse(&self.filing_status)
            .ok_or_else(|| ValidationError::UnknownFilingStatus(self.filing_status.clone()))
    }

    pub fn business_income(&self) -> Decimal {
        self.business_income.unwrap_or(self.schedule_c_net_profit)
    }

    /// Schedule SE input for these settings.
    pub fn tax_summary_input(&self) -> Result<TaxSummaryInput, ValidationError> {
        Ok(TaxSummaryInput {
            schedule_c_net_profit: self.schedule_c_net_profit,
            tax_year: self.tax_year,
            adjustments: self.adjustments,
            filing_status: self.filing_status()?,
            w2_wages: self.w2_wages,
        })
    }
}

/// Parse settings from TOML text.
///
/// # Errors
///
/// * [`LoadError::Toml`] for malformed TOML or a missing required key.
/// * [`LoadError::Settings`] for an unrecognised filing status.
pub fn load_from_str(input: &str) -> Result<Settings, LoadError> {
    let settings: Settings = toml::from_str(input)?;
    settings.filing_status()?;
    Ok(settings)
}

/// Read a file from disk and delegate to [`load_from_str`].
pub fn load_from_file(path: &Path) -> Result<Settings, LoadError> {
    load_from_str(&read_file(path)?)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    const MINIMAL: &str = r#"
tax_year = 2024
filing_status = "S"
schedule_c_net_profit = "80000.00"
"#;

    #[test]
    fn minimal_settings_use_defaults() {
        let settings = load_from_str(MINIMAL).unwrap();

        assert_eq!(settings.tax_year, 2024);
        assert_eq!(settings.filing_status().unwrap(), FilingStatusCode::Single);
        assert_eq!(settings.adjustments, dec!(0));
        assert_eq!(settings.w2_wages, dec!(0));
        assert_eq!(settings.business_income(), dec!(80000.00));
        assert!(settings.home_office.is_none());
        assert!(settings.direct_expenses.is_none());
    }

    #[test]
    fn full_settings_parse_home_office() {
        let toml = r#"
tax_year = 2024
filing_status = "married_jointly"
schedule_c_net_profit = "120000.00"
adjustments = "500.00"
w2_wages = "20000"
business_income = "130000"
direct_expenses = "150.00"

[home_office]
total_home_area_sq_ft = "2000"
office_area_sq_ft = "200"

[home_office.expenses]
rent_or_mortgage_interest = "12000.00"
utilities = "2400.00"
"#;

        let settings = load_from_str(toml).unwrap();
        let home_office = settings.home_office.as_ref().unwrap();

        assert_eq!(settings.business_income(), dec!(130000));
        assert_eq!(settings.direct_expenses, Some(dec!(150.00)));
        assert_eq!(home_office.office_area_sq_ft, dec!(200));
        assert_eq!(home_office.expenses.rent_or_mortgage_interest, dec!(12000.00));
        assert_eq!(home_office.expenses.insurance, dec!(0));

        let input = settings.tax_summary_input().unwrap();
        assert_eq!(input.filing_status, FilingStatusCode::MarriedFilingJointly);
        assert_eq!(input.adjustments, dec!(500.00));
        assert_eq!(input.w2_wages, dec!(20000));
    }

    #[test]
    fn unknown_filing_status_is_rejected() {
        let toml = MINIMAL.replace("\"S\"", "\"widowed\"");

        let result = load_from_str(&toml);

        assert!(matches!(
            result,
            Err(LoadError::Settings(ValidationError::UnknownFilingStatus(status))) if status == "widowed"
        ));
    }

    #[test]
    fn missing_net_profit_is_a_toml_error() {
        let result = load_from_str("tax_year = 2024\nfiling_status = \"S\"\n");

        assert!(matches!(result, Err(LoadError::Toml(_))));
    }
}
