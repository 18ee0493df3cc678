use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A bank transaction as supplied by the transaction source.
///
/// `amount` is signed: positive is an expense, negative is income or a
/// refund. `is_deductible` is the classification service's verdict;
/// `None` means the transaction has not been reviewed yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub category_code: String,
    pub merchant_name: String,
    pub is_deductible: Option<bool>,
    pub deduction_confidence: Option<Decimal>,
}

impl Transaction {
    pub fn is_expense(&self) -> bool {
        self.amount > Decimal::ZERO
    }

    pub fn is_unreviewed(&self) -> bool {
        self.is_deductible.is_none()
    }

    pub fn tax_year(&self) -> i32 {
        self.date.year()
    }
}
