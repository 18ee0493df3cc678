//! Runs every calculator for one tax year and collects the results.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use taxprep_core::calculations::forms::{
    DepreciationWorksheet, Form4562Result, Form8829Result, HomeOfficeWorksheet, ScheduleCResult,
    ScheduleCWorksheet, ScheduleSeResult, SeWorksheet,
};
use taxprep_core::{Asset, CalculationError, FilingStatusCode, TaxYearRegistry, Transaction};
use tracing::info;

use crate::settings::Settings;

/// Headline figures pulled from the individual forms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionSummary {
    /// Schedule C expense lines (grand total).
    pub schedule_c_expenses: Decimal,
    /// Form 8829 allowed deduction, zero without a home office.
    pub home_office_deduction: Decimal,
    /// Form 4562 total depreciation.
    pub depreciation: Decimal,
    /// Sum of the three figures above.
    pub total_business_deductions: Decimal,
    /// Deductible half of SE tax (Schedule 1).
    pub se_tax_deduction: Decimal,
}

/// Every form computed for one filer and tax year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxReport {
    pub tax_year: i32,
    pub filing_status: FilingStatusCode,
    pub schedule_c: ScheduleCResult,
    pub home_office: Option<Form8829Result>,
    pub depreciation: Form4562Result,
    /// `None` when Schedule C nets to a loss; SE tax does not apply.
    pub self_employment: Option<ScheduleSeResult>,
    pub summary: DeductionSummary,
}

/// Computes every form for `settings.tax_year`.
///
/// The calculators are independent; the first failure aborts the report.
/// Schedule SE is skipped for a Schedule C loss, which leaves the SE
/// deduction at zero.
///
/// # Errors
///
/// * [`CalculationError::Configuration`] if the tax year has no registered
///   constants.
/// * [`CalculationError::Validation`] for any invalid settings or asset.
pub fn prepare_report(
    registry: &TaxYearRegistry,
    settings: &Settings,
    transactions: &[Transaction],
    assets: &[Asset],
) -> Result<TaxReport, CalculationError> {
    let tax_year = settings.tax_year;
    let se_input = settings.tax_summary_input()?;

    let schedule_c = ScheduleCWorksheet::for_year(registry, tax_year)?.calculate(transactions)?;

    let home_office = match &settings.home_office {
        Some(home_office) => Some(
            HomeOfficeWorksheet::for_year(registry, tax_year)?
                .calculate(home_office, settings.direct_expenses)?,
        ),
        None => None,
    };

    let depreciation = DepreciationWorksheet::for_year(registry, tax_year)?
        .calculate(assets, settings.business_income())?;

    let se_worksheet = SeWorksheet::for_year(registry, tax_year)?;
    let self_employment = if se_input.schedule_c_net_profit < Decimal::ZERO {
        info!(
            net_profit = %se_input.schedule_c_net_profit,
            "Schedule C shows a loss; Schedule SE not required"
        );
        None
    } else {
        Some(se_worksheet.calculate(&se_input)?)
    };

    let home_office_deduction = home_office
        .as_ref()
        .map_or(Decimal::ZERO, |result| result.allowed_deduction);
    let summary = DeductionSummary {
        schedule_c_expenses: schedule_c.grand_total,
        home_office_deduction,
        depreciation: depreciation.total_depreciation,
        total_business_deductions: schedule_c.grand_total
            + home_office_deduction
            + depreciation.total_depreciation,
        se_tax_deduction: self_employment
            .as_ref()
            .map_or(Decimal::ZERO, |result| result.half_deduction),
    };

    info!(
        tax_year,
        transactions = transactions.len(),
        assets = assets.len(),
        total_business_deductions = %summary.total_business_deductions,
        "Prepared tax report"
    );

    Ok(TaxReport {
        tax_year,
        filing_status: se_input.filing_status,
        schedule_c,
        home_office,
        depreciation,
        self_employment,
        summary,
    })
}

impl fmt::Display for TaxReport {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        writeln!(
            f,
            "Tax year {} ({})",
            self.tax_year,
            self.filing_status.display_name()
        )?;

        writeln!(f)?;
        writeln!(f, "Schedule C expenses")?;
        for line in &self.schedule_c.lines {
            writeln!(
                f,
                "  {:<4} {:<32} {:>12} {:>12}  ({} confirmed, {} potential)",
                line.line_number,
                line.description,
                line.total,
                line.deductible_total,
                line.confirmed_count,
                line.potential_count
            )?;
        }
        writeln!(f, "  {:<37} {:>25}", "Total", self.schedule_c.grand_total)?;

        if let Some(home_office) = &self.home_office {
            writeln!(f)?;
            writeln!(f, "Form 8829 home office")?;
            writeln!(f, "  Business use          {:>12}%", home_office.business_use_percent)?;
            writeln!(f, "  Allocated expenses    {:>13}", home_office.total_allocated)?;
            writeln!(f, "  Direct expenses       {:>13}", home_office.direct_expenses)?;
            writeln!(f, "  Allowed deduction     {:>13}", home_office.allowed_deduction)?;
            if home_office.cap_applied {
                writeln!(f, "  Carryover             {:>13}", home_office.carryover)?;
            }
            writeln!(
                f,
                "  Simplified method     {:>13}",
                home_office.simplified_method_deduction
            )?;
        }

        writeln!(f)?;
        writeln!(f, "Form 4562 depreciation")?;
        for asset in &self.depreciation.assets {
            writeln!(
                f,
                "  {:<24} yr {} 179 {:>10} bonus {:>10} sched {:>10} carry {:>10}",
                asset.description,
                asset.years_in_service,
                asset.section_179,
                asset.bonus_depreciation,
                asset.scheduled_depreciation,
                asset.carryover_to_next_year
            )?;
        }
        writeln!(f, "  Total depreciation    {:>13}", self.depreciation.total_depreciation)?;
        if self.depreciation.section_179_carryover > Decimal::ZERO {
            writeln!(
                f,
                "  Section 179 carryover {:>13}",
                self.depreciation.section_179_carryover
            )?;
        }

        writeln!(f)?;
        writeln!(f, "Schedule SE")?;
        match &self.self_employment {
            Some(se) => {
                writeln!(f, "  SE base               {:>13}", se.se_base)?;
                if se.below_threshold {
                    writeln!(f, "  (SE base below the $400 filing minimum)")?;
                }
                writeln!(f, "  Social security       {:>13}", se.social_security_tax)?;
                writeln!(f, "  Medicare              {:>13}", se.medicare_tax)?;
                writeln!(f, "  Additional Medicare   {:>13}", se.additional_medicare_tax)?;
                writeln!(f, "  Total SE tax          {:>13}", se.total_se_tax)?;
                writeln!(f, "  Deductible half       {:>13}", se.half_deduction)?;
            }
            None => writeln!(f, "  Net loss; no SE tax")?,
        }

        writeln!(f)?;
        writeln!(
            f,
            "Total business deductions {:>11}",
            self.summary.total_business_deductions
        )
    }
}
