//! CSV loader for classified bank transactions.
//!
//! ## CSV Format
//!
//! Headers are matched by name, so column order does not matter.
//!
//! | Column                 | Required | Type    | Notes                                 |
//! |------------------------|----------|---------|---------------------------------------|
//! | `id`                   | yes      | string  |                                       |
//! | `date`                 | yes      | date    | `YYYY-MM-DD`                          |
//! | `amount`               | yes      | decimal | positive = expense, negative = income |
//! | `category_code`        | yes      | string  | provider category, e.g. `TRAVEL_FLIGHTS` |
//! | `merchant_name`        | yes      | string  | may be empty                          |
//! | `is_deductible`        | no       | bool    | `true` / `false`; empty = unreviewed  |
//! | `deduction_confidence` | no       | decimal | 0 through 1; empty for `None`         |
//!
//! ```csv
//! id,date,amount,category_code,merchant_name,is_deductible,deduction_confidence
//! t1,2024-03-14,80.00,FOOD_AND_DRINK_RESTAURANT,Bistro,true,0.95
//! t2,2024-03-15,42.10,TRANSPORTATION_FUEL,Shell,,
//! ```

use std::path::Path;

use taxprep_core::Transaction;

use crate::error::{LoadError, read_file};

/// Parse CSV text and return the transactions in file order.
///
/// # Errors
///
/// [`LoadError::Csv`] if the CSV is structurally invalid or a field cannot be
/// deserialised.
pub fn load_from_str(input: &str) -> Result<Vec<Transaction>, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(input.as_bytes());

    reader
        .deserialize::<Transaction>()
        .map(|result| result.map_err(LoadError::from))
        .collect()
}

/// Read a file from disk and delegate to [`load_from_str`].
pub fn load_from_file(path: &Path) -> Result<Vec<Transaction>, LoadError> {
    load_from_str(&read_file(path)?)
}
