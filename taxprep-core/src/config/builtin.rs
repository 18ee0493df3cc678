use rust_decimal::Decimal;

use crate::models::{FilingStatusAmounts, TaxYearConfig};

/// `d(9235, 4)` is 0.9235.
fn d(
    mantissa: i64,
    scale: u32,
) -> Decimal {
    Decimal::new(mantissa, scale)
}

/// Half-year convention, 5-year property (IRS Pub. 946, Table A-1).
pub fn macrs_5_year_table() -> Vec<Decimal> {
    vec![d(2000, 2), d(3200, 2), d(1920, 2), d(1152, 2), d(1152, 2), d(576, 2)]
}

/// Half-year convention, 7-year property (IRS Pub. 946, Table A-1).
pub fn macrs_7_year_table() -> Vec<Decimal> {
    vec![
        d(1429, 2),
        d(2449, 2),
        d(1749, 2),
        d(1249, 2),
        d(893, 2),
        d(892, 2),
        d(893, 2),
        d(446, 2),
    ]
}

fn whole(amount: i64) -> Decimal {
    Decimal::from(amount)
}

fn additional_medicare_thresholds() -> FilingStatusAmounts {
    FilingStatusAmounts {
        single: whole(200_000),
        married_filing_jointly: whole(250_000),
        married_filing_separately: whole(125_000),
        head_of_household: whole(200_000),
        qualifying_surviving_spouse: whole(200_000),
    }
}

fn year(
    tax_year: i32,
    section_179_limit: i64,
    section_179_phase_out_threshold: i64,
    bonus_depreciation_rate: Decimal,
    ss_wage_base: i64,
) -> TaxYearConfig {
    TaxYearConfig {
        tax_year,
        section_179_limit: whole(section_179_limit),
        section_179_phase_out_threshold: whole(section_179_phase_out_threshold),
        bonus_depreciation_rate,
        straight_line_useful_life_years: 5,
        macrs_5_year: macrs_5_year_table(),
        macrs_7_year: macrs_7_year_table(),
        home_office_annual_cap: whole(1_500),
        simplified_home_office_rate: whole(5),
        simplified_home_office_max_sq_ft: whole(300),
        ss_wage_base: whole(ss_wage_base),
        ss_tax_rate: d(124, 3),
        medicare_tax_rate: d(29, 3),
        additional_medicare_rate: d(9, 3),
        additional_medicare_thresholds: additional_medicare_thresholds(),
        se_net_earnings_factor: d(9235, 4),
        se_deduction_factor: d(50, 2),
        min_se_threshold: whole(400),
        meals_deductible_rate: d(50, 2),
    }
}

/// Tables shipped with the engine.
///
/// The 2025 row uses the Section 179 and bonus figures in force at the start
/// of the year; property acquired after 2025-01-19 qualifies for more, which
/// a single per-year rate cannot express. Override it with a loaded table
/// where that matters.
pub fn builtin_tax_years() -> Vec<TaxYearConfig> {
    vec![
        year(2023, 1_160_000, 2_890_000, d(80, 2), 160_200),
        year(2024, 1_220_000, 3_050_000, d(60, 2), 168_600),
        year(2025, 1_250_000, 3_130_000, d(40, 2), 176_100),
    ]
}
