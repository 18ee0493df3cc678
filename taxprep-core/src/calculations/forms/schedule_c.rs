//! Schedule C expense aggregation.
//!
//! Groups a year's classified transactions onto Schedule C expense lines.
//!
//! A transaction is counted when it is either
//! - **confirmed**: the classification service marked it deductible, or
//! - **potential**: it has not been reviewed yet, is an expense
//!   (`amount > 0`) and its category is in the classifier table.
//!
//! Transactions confirmed as *not* deductible never count, even when their
//! category looks like a business expense.
//!
//! Each line sums `|amount|` into `total`. The Meals line is limited to the
//! configured deductible rate (50%); every other line deducts its full total.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::classifier::{ScheduleCLine, classify, is_potentially_business};
use crate::calculations::common::round_currency;
use crate::config::TaxYearRegistry;
use crate::error::{CalculationError, ConfigurationError};
use crate::models::{TaxYearConfig, Transaction};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleCConfig {
    /// Deductible share of business meals.
    pub meals_deductible_rate: Decimal,
}

impl ScheduleCConfig {
    pub fn from_tax_year_config(config: &TaxYearConfig) -> Self {
        Self {
            meals_deductible_rate: config.meals_deductible_rate,
        }
    }
}

/// Why a transaction was counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineItemStatus {
    Confirmed,
    Potential,
}

/// One transaction contributing to a Schedule C line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleCLineItem {
    pub transaction_id: String,
    pub date: NaiveDate,
    pub merchant_name: String,
    /// Absolute transaction amount.
    pub amount: Decimal,
    pub status: LineItemStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleCLineSummary {
    pub line: ScheduleCLine,
    pub line_number: String,
    pub description: String,
    pub total: Decimal,
    pub deductible_total: Decimal,
    pub transaction_count: usize,
    pub confirmed_count: usize,
    pub potential_count: usize,
    /// Contributing transactions, in input order.
    pub items: Vec<ScheduleCLineItem>,
}

/// Every Schedule C line in form order, plus the grand total.
///
/// `grand_total` is the sum of the lines' `deductible_total`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleCResult {
    pub tax_year: i32,
    pub lines: Vec<ScheduleCLineSummary>,
    pub grand_total: Decimal,
}

impl ScheduleCResult {
    pub fn line(
        &self,
        line: ScheduleCLine,
    ) -> Option<&ScheduleCLineSummary> {
        self.lines.iter().find(|summary| summary.line == line)
    }

    /// Number of transactions counted on any line.
    pub fn transaction_count(&self) -> usize {
        self.lines.iter().map(|line| line.transaction_count).sum()
    }
}

#[derive(Default)]
struct LineAccumulator {
    total: Decimal,
    confirmed_count: usize,
    potential_count: usize,
    items: Vec<ScheduleCLineItem>,
}

/// Builds the Schedule C expense summary for one tax year.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use rust_decimal_macros::dec;
/// use taxprep_core::calculations::classifier::ScheduleCLine;
/// use taxprep_core::calculations::forms::ScheduleCWorksheet;
/// use taxprep_core::{TaxYearRegistry, Transaction};
///
/// let registry = TaxYearRegistry::builtin();
/// let worksheet = ScheduleCWorksheet::for_year(&registry, 2024).unwrap();
///
/// let lunch = Transaction {
///     id: "t1".to_string(),
///     date: NaiveDate::from_ymd_opt(2024, 3, 14).unwrap(),
///     amount: dec!(80.00),
///     category_code: "FOOD_AND_DRINK_RESTAURANT".to_string(),
///     merchant_name: "Client lunch".to_string(),
///     is_deductible: Some(true),
///     deduction_confidence: None,
/// };
///
/// let result = worksheet.calculate(&[lunch]).unwrap();
/// let meals = result.line(ScheduleCLine::Meals).unwrap();
///
/// assert_eq!(meals.total, dec!(80.00));
/// assert_eq!(meals.deductible_total, dec!(40.00));
/// ```
#[derive(Debug, Clone)]
pub struct ScheduleCWorksheet {
    config: ScheduleCConfig,
    tax_year: i32,
}

impl ScheduleCWorksheet {
    pub fn new(
        config: ScheduleCConfig,
        tax_year: i32,
    ) -> Self {
        Self { config, tax_year }
    }

    pub fn for_year(
        registry: &TaxYearRegistry,
        tax_year: i32,
    ) -> Result<Self, ConfigurationError> {
        let config = registry.get(tax_year)?;
        Ok(Self::new(ScheduleCConfig::from_tax_year_config(config), tax_year))
    }

    /// Aggregates `transactions` onto Schedule C lines.
    ///
    /// Transactions dated outside the worksheet's tax year are ignored. An
    /// empty working set is a valid result with every line at zero.
    pub fn calculate(
        &self,
        transactions: &[Transaction],
    ) -> Result<ScheduleCResult, CalculationError> {
        let mut lines: BTreeMap<ScheduleCLine, LineAccumulator> = ScheduleCLine::ALL
            .iter()
            .map(|line| (*line, LineAccumulator::default()))
            .collect();

        let counted = transactions
            .iter()
            .filter(|transaction| transaction.tax_year() == self.tax_year)
            .filter_map(|transaction| status_of(transaction).map(|status| (transaction, status)));

        for (transaction, status) in counted {
            let line = classify(&transaction.category_code);
            let amount = transaction.amount.abs();
            let acc = lines.entry(line).or_default();

            acc.total += amount;
            match status {
                LineItemStatus::Confirmed => acc.confirmed_count += 1,
                LineItemStatus::Potential => acc.potential_count += 1,
            }
            acc.items.push(ScheduleCLineItem {
                transaction_id: transaction.id.clone(),
                date: transaction.date,
                merchant_name: transaction.merchant_name.clone(),
                amount,
                status,
            });
        }

        let lines: Vec<ScheduleCLineSummary> = lines
            .into_iter()
            .map(|(line, acc)| self.summarize(line, acc))
            .collect();
        let grand_total = lines.iter().map(|line| line.deductible_total).sum();

        debug!(
            tax_year = self.tax_year,
            grand_total = %grand_total,
            "Aggregated Schedule C expenses"
        );

        Ok(ScheduleCResult {
            tax_year: self.tax_year,
            lines,
            grand_total,
        })
    }

    fn summarize(
        &self,
        line: ScheduleCLine,
        acc: LineAccumulator,
    ) -> ScheduleCLineSummary {
        let deductible_total = match line {
            ScheduleCLine::Meals => acc.total * self.config.meals_deductible_rate,
            _ => acc.total,
        };

        ScheduleCLineSummary {
            line,
            line_number: line.line_number().to_string(),
            description: line.description().to_string(),
            total: round_currency(acc.total),
            deductible_total: round_currency(deductible_total),
            transaction_count: acc.items.len(),
            confirmed_count: acc.confirmed_count,
            potential_count: acc.potential_count,
            items: acc.items,
        }
    }
}

/// Unreviewed business expenses are potential; a `false` verdict is final.
fn status_of(transaction: &Transaction) -> Option<LineItemStatus> {
    if transaction.is_deductible == Some(true) {
        Some(LineItemStatus::Confirmed)
    } else if transaction.is_unreviewed()
        && transaction.is_expense()
        && is_potentially_business(&transaction.category_code)
    {
        Some(LineItemStatus::Potential)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn test_config() -> ScheduleCConfig {
        ScheduleCConfig {
            meals_deductible_rate: dec!(0.50),
        }
    }

    fn worksheet() -> ScheduleCWorksheet {
        ScheduleCWorksheet::new(test_config(), 2024)
    }

    fn transaction(
        id: &str,
        amount: Decimal,
        category_code: &str,
        is_deductible: Option<bool>,
    ) -> Transaction {
        Transaction {
            id: id.to_string(),
            date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            amount,
            category_code: category_code.to_string(),
            merchant_name: format!("Merchant {id}"),
            is_deductible,
            deduction_confidence: None,
        }
    }

    fn line(
        result: &ScheduleCResult,
        line: ScheduleCLine,
    ) -> &ScheduleCLineSummary {
        result.line(line).unwrap()
    }

    // =========================================================================
    // Meals rule
    // =========================================================================

    #[test]
    fn confirmed_restaurant_meal_is_half_deductible() {
        let transactions = [transaction("t1", dec!(80.00), "FOOD_AND_DRINK_RESTAURANT", Some(true))];

        let result = worksheet().calculate(&transactions).unwrap();
        let meals = line(&result, ScheduleCLine::Meals);

        assert_eq!(meals.total, dec!(80.00));
        assert_eq!(meals.deductible_total, dec!(40.00));
        assert_eq!(meals.confirmed_count, 1);
        assert_eq!(result.grand_total, dec!(40.00));
    }

    #[test]
    fn meals_deductible_is_half_of_total() {
        let transactions = [
            transaction("t1", dec!(12.34), "FOOD_AND_DRINK_COFFEE", Some(true)),
            transaction("t2", dec!(56.78), "FOOD_AND_DRINK_RESTAURANT", None),
            transaction("t3", dec!(9.90), "FOOD_AND_DRINK_FAST_FOOD", Some(true)),
        ];

        let result = worksheet().calculate(&transactions).unwrap();
        let meals = line(&result, ScheduleCLine::Meals);

        assert_eq!(meals.total, dec!(79.02));
        assert_eq!(meals.deductible_total, meals.total / dec!(2));
    }

    #[test]
    fn other_lines_deduct_full_total() {
        let transactions = [
            transaction("t1", dec!(45.00), "TRANSPORTATION_FUEL", Some(true)),
            transaction("t2", dec!(350.00), "TRAVEL_FLIGHTS", Some(true)),
        ];

        let result = worksheet().calculate(&transactions).unwrap();

        assert_eq!(line(&result, ScheduleCLine::CarAndTruck).deductible_total, dec!(45.00));
        assert_eq!(line(&result, ScheduleCLine::Travel).deductible_total, dec!(350.00));
        assert_eq!(result.grand_total, dec!(395.00));
    }

    // =========================================================================
    // Partitioning
    // =========================================================================

    #[test]
    fn unreviewed_business_expense_is_potential() {
        let transactions = [transaction("t1", dec!(120.00), "GENERAL_MERCHANDISE_OFFICE_SUPPLIES", None)];

        let result = worksheet().calculate(&transactions).unwrap();
        let office = line(&result, ScheduleCLine::OfficeExpense);

        assert_eq!(office.total, dec!(120.00));
        assert_eq!(office.potential_count, 1);
        assert_eq!(office.confirmed_count, 0);
        assert_eq!(office.items[0].status, LineItemStatus::Potential);
    }

    #[test]
    fn unreviewed_non_business_category_is_excluded() {
        let transactions = [
            transaction("t1", dec!(60.00), "ENTERTAINMENT_CASINOS", None),
            transaction("t2", dec!(25.00), "GENERAL_MERCHANDISE_CLOTHING", None),
        ];

        let result = worksheet().calculate(&transactions).unwrap();

        assert_eq!(result.transaction_count(), 0);
        assert_eq!(result.grand_total, dec!(0));
    }

    #[test]
    fn unreviewed_refund_is_excluded() {
        let transactions = [transaction("t1", dec!(-30.00), "TRAVEL_FLIGHTS", None)];

        let result = worksheet().calculate(&transactions).unwrap();

        assert_eq!(result.transaction_count(), 0);
    }

    #[test]
    fn confirmed_not_deductible_is_excluded() {
        let transactions = [transaction("t1", dec!(80.00), "FOOD_AND_DRINK_RESTAURANT", Some(false))];

        let result = worksheet().calculate(&transactions).unwrap();

        assert_eq!(line(&result, ScheduleCLine::Meals).total, dec!(0));
        assert_eq!(result.grand_total, dec!(0));
    }

    #[test]
    fn confirmed_negative_amount_counts_its_magnitude() {
        let transactions = [transaction("t1", dec!(-15.00), "BANK_FEES_OTHER_BANK_FEES", Some(true))];

        let result = worksheet().calculate(&transactions).unwrap();
        let other = line(&result, ScheduleCLine::OtherExpenses);

        assert_eq!(other.total, dec!(15.00));
        assert_eq!(other.items[0].amount, dec!(15.00));
    }

    #[test]
    fn confirmed_unmapped_category_lands_on_other_expenses() {
        let transactions = [transaction("t1", dec!(99.00), "ENTERTAINMENT_SPORTING_EVENTS", Some(true))];

        let result = worksheet().calculate(&transactions).unwrap();

        assert_eq!(line(&result, ScheduleCLine::OtherExpenses).total, dec!(99.00));
    }

    #[test]
    fn other_tax_years_are_ignored() {
        let mut last_year = transaction("t1", dec!(500.00), "TRAVEL_LODGING", Some(true));
        last_year.date = NaiveDate::from_ymd_opt(2023, 12, 31).unwrap();
        let mut next_year = transaction("t2", dec!(500.00), "TRAVEL_LODGING", Some(true));
        next_year.date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();

        let result = worksheet().calculate(&[last_year, next_year]).unwrap();

        assert_eq!(result.transaction_count(), 0);
    }

    // =========================================================================
    // Result shape
    // =========================================================================

    #[test]
    fn empty_input_yields_every_line_at_zero() {
        let result = worksheet().calculate(&[]).unwrap();

        assert_eq!(result.lines.len(), ScheduleCLine::ALL.len());
        for summary in &result.lines {
            assert_eq!(summary.total, dec!(0));
            assert_eq!(summary.deductible_total, dec!(0));
            assert_eq!(summary.transaction_count, 0);
            assert!(summary.items.is_empty());
        }
        assert_eq!(result.grand_total, dec!(0));
    }

    #[test]
    fn lines_are_in_form_order_not_amount_order() {
        let transactions = [
            transaction("t1", dec!(1000.00), "GENERAL_SERVICES_INSURANCE", Some(true)),
            transaction("t2", dec!(1.00), "TRANSPORTATION_PARKING", Some(true)),
        ];

        let result = worksheet().calculate(&transactions).unwrap();
        let order: Vec<_> = result.lines.iter().map(|summary| summary.line).collect();

        assert_eq!(order, ScheduleCLine::ALL.to_vec());
        assert_eq!(result.lines[0].line_number, "9");
    }

    #[test]
    fn grand_total_is_sum_of_line_deductibles() {
        let transactions = [
            transaction("t1", dec!(33.33), "FOOD_AND_DRINK_RESTAURANT", Some(true)),
            transaction("t2", dec!(210.00), "SERVICE_LEGAL", Some(true)),
            transaction("t3", dec!(64.10), "RENT_AND_UTILITIES_INTERNET_AND_CABLE", None),
            transaction("t4", dec!(18.00), "TRANSPORTATION_TOLLS", None),
        ];

        let result = worksheet().calculate(&transactions).unwrap();
        let sum: Decimal = result.lines.iter().map(|summary| summary.deductible_total).sum();

        assert_eq!(result.grand_total, sum);
        assert_eq!(line(&result, ScheduleCLine::Meals).deductible_total, dec!(16.67));
    }

    #[test]
    fn counts_split_confirmed_and_potential() {
        let transactions = [
            transaction("t1", dec!(20.00), "TRAVEL_LODGING", Some(true)),
            transaction("t2", dec!(30.00), "TRAVEL_RENTAL_CARS", None),
            transaction("t3", dec!(40.00), "TRAVEL_FLIGHTS", Some(true)),
        ];

        let result = worksheet().calculate(&transactions).unwrap();
        let travel = line(&result, ScheduleCLine::Travel);

        assert_eq!(travel.transaction_count, 3);
        assert_eq!(travel.confirmed_count, 2);
        assert_eq!(travel.potential_count, 1);
        let ids: Vec<_> = travel.items.iter().map(|item| item.transaction_id.as_str()).collect();
        assert_eq!(ids, vec!["t1", "t2", "t3"]);
    }

    #[test]
    fn for_year_reads_meals_rate() {
        let registry = TaxYearRegistry::builtin();

        let worksheet = ScheduleCWorksheet::for_year(&registry, 2023).unwrap();

        assert_eq!(worksheet.config.meals_deductible_rate, dec!(0.50));
        assert_eq!(
            ScheduleCWorksheet::for_year(&registry, 2030).unwrap_err(),
            ConfigurationError::UnknownTaxYear(2030)
        );
    }
}
