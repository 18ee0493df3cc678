//! End-to-end tests: fixture files on disk through to a finished report.

use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;
use taxprep_core::TaxYearRegistry;
use taxprep_core::calculations::classifier::ScheduleCLine;
use taxprep_data::{TaxReport, assets, prepare_report, settings, tax_years, transactions};

const TRANSACTIONS_CSV: &str = include_str!("../test-data/transactions_2024.csv");

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("test-data").join(name)
}

fn fixture_report() -> TaxReport {
    let registry = TaxYearRegistry::builtin();
    let settings = settings::load_from_file(&fixture("settings_2024.toml")).unwrap();
    let transactions = transactions::load_from_file(&fixture("transactions_2024.csv")).unwrap();
    let assets = assets::load_from_file(&fixture("assets_2024.csv")).unwrap();

    prepare_report(&registry, &settings, &transactions, &assets).unwrap()
}

// =============================================================================
// Loaders
// =============================================================================

#[test]
fn loads_every_fixture_row() {
    let transactions = transactions::load_from_str(TRANSACTIONS_CSV).unwrap();
    let assets = assets::load_from_file(&fixture("assets_2024.csv")).unwrap();

    assert_eq!(transactions.len(), 10);
    assert_eq!(assets.len(), 3);
}

// =============================================================================
// Schedule C
// =============================================================================

#[test]
fn schedule_c_lines_from_fixture() {
    let report = fixture_report();
    let line = |line| report.schedule_c.line(line).unwrap();

    let meals = line(ScheduleCLine::Meals);
    assert_eq!(meals.total, dec!(113.30));
    assert_eq!(meals.deductible_total, dec!(56.65));
    assert_eq!(meals.confirmed_count, 1);
    assert_eq!(meals.potential_count, 1);

    assert_eq!(line(ScheduleCLine::CarAndTruck).total, dec!(45.50));
    assert_eq!(line(ScheduleCLine::Travel).total, dec!(350.00));
    assert_eq!(line(ScheduleCLine::LegalAndProfessional).total, dec!(500.00));
    assert_eq!(line(ScheduleCLine::OfficeExpense).total, dec!(0));
    assert_eq!(line(ScheduleCLine::OtherExpenses).total, dec!(19.99));

    assert_eq!(report.schedule_c.grand_total, dec!(972.14));
}

#[test]
fn schedule_c_excludes_rejected_unmapped_refunds_and_other_years() {
    let report = fixture_report();

    let counted: Vec<&str> = report
        .schedule_c
        .lines
        .iter()
        .flat_map(|line| line.items.iter().map(|item| item.transaction_id.as_str()))
        .collect();

    assert_eq!(counted, vec!["t2", "t7", "t3", "t1", "t10", "t9"]);
}

// =============================================================================
// Form 8829
// =============================================================================

#[test]
fn home_office_hits_annual_cap() {
    let report = fixture_report();
    let home_office = report.home_office.unwrap();

    assert_eq!(home_office.business_use_percent, dec!(10.00));
    assert_eq!(home_office.allocated.rent_or_mortgage_interest, dec!(1200.00));
    assert_eq!(home_office.total_allocated, dec!(1440.00));
    assert_eq!(home_office.raw_deduction, dec!(1540.00));
    assert_eq!(home_office.allowed_deduction, dec!(1500.00));
    assert_eq!(home_office.carryover, dec!(40.00));
    assert!(home_office.cap_applied);
    assert_eq!(home_office.simplified_method_deduction, dec!(1000.00));
}

// =============================================================================
// Form 4562
// =============================================================================

#[test]
fn depreciation_from_fixture() {
    let report = fixture_report();
    let depreciation = &report.depreciation;

    let order: Vec<&str> = depreciation.assets.iter().map(|a| a.asset_id.as_str()).collect();
    assert_eq!(order, vec!["a1", "a3", "a2"]);

    let workstation = &depreciation.assets[0];
    assert_eq!(workstation.section_179, dec!(3500.00));
    assert_eq!(workstation.carryover_to_next_year, dec!(0));

    let camera = &depreciation.assets[1];
    assert_eq!(camera.years_in_service, 3);
    assert_eq!(camera.scheduled_depreciation, dec!(384.00));
    assert_eq!(camera.carryover_to_next_year, dec!(1616.00));

    let desk = &depreciation.assets[2];
    assert_eq!(desk.business_basis, dec!(600.00));
    assert_eq!(desk.bonus_depreciation, dec!(360.00));
    assert_eq!(desk.scheduled_depreciation, dec!(34.30));
    assert_eq!(desk.carryover_to_next_year, dec!(205.70));

    assert_eq!(depreciation.total_section_179, dec!(3500.00));
    assert_eq!(depreciation.total_bonus_depreciation, dec!(360.00));
    assert_eq!(depreciation.total_scheduled_depreciation, dec!(418.30));
    assert_eq!(depreciation.total_depreciation, dec!(4278.30));
}

// =============================================================================
// Schedule SE and summary
// =============================================================================

#[test]
fn self_employment_tax_and_summary() {
    let report = fixture_report();

    let se = report.self_employment.as_ref().unwrap();
    assert_eq!(se.se_base, dec!(73880.00));
    assert_eq!(se.total_se_tax, dec!(11303.64));
    assert_eq!(report.summary.se_tax_deduction, dec!(5651.82));
    assert_eq!(report.summary.total_business_deductions, dec!(6750.44));
}

#[test]
fn loss_from_fixture_skips_schedule_se() {
    let registry = TaxYearRegistry::builtin();
    let mut settings = settings::load_from_file(&fixture("settings_2024.toml")).unwrap();
    settings.schedule_c_net_profit = dec!(-5000.00);
    let transactions = transactions::load_from_file(&fixture("transactions_2024.csv")).unwrap();
    let assets = assets::load_from_file(&fixture("assets_2024.csv")).unwrap();

    let report = prepare_report(&registry, &settings, &transactions, &assets).unwrap();

    assert!(report.self_employment.is_none());
    assert_eq!(report.summary.se_tax_deduction, dec!(0));
    assert!(report.home_office.is_some());
    assert_eq!(report.schedule_c.lines.len(), 6);
    assert_eq!(report.depreciation.assets.len(), 3);
    assert_eq!(report.depreciation.total_section_179, dec!(0.00));
}

// =============================================================================
// Tax-year tables
// =============================================================================

#[test]
fn loaded_table_enables_new_year() {
    let mut registry = TaxYearRegistry::builtin();
    let configs = tax_years::load_from_file(&fixture("tax_year_2026.toml")).unwrap();
    tax_years::apply(&mut registry, configs).unwrap();

    let mut settings = settings::load_from_file(&fixture("settings_2024.toml")).unwrap();
    settings.tax_year = 2026;

    let report = prepare_report(&registry, &settings, &[], &[]).unwrap();

    assert_eq!(report.tax_year, 2026);
    assert_eq!(report.self_employment.unwrap().total_se_tax, dec!(11303.64));
}

#[test]
fn year_without_table_is_rejected() {
    let registry = TaxYearRegistry::builtin();
    let mut settings = settings::load_from_file(&fixture("settings_2024.toml")).unwrap();
    settings.tax_year = 2026;

    let result = prepare_report(&registry, &settings, &[], &[]);

    assert!(result.is_err());
}
