//! CSV loader for business assets.
//!
//! ## CSV Format
//!
//! | Column                       | Required | Type    | Notes                                      |
//! |------------------------------|----------|---------|--------------------------------------------|
//! | `id`                         | yes      | string  |                                            |
//! | `description`                | yes      | string  |                                            |
//! | `date_placed_in_service`     | yes      | date    | `YYYY-MM-DD`                               |
//! | `cost`                       | yes      | decimal |                                            |
//! | `business_use_percent`       | yes      | decimal | whole-number percent, e.g. `80`            |
//! | `category`                   | yes      | string  | `computer`, `furniture`, `vehicle`, `equipment`, `other` |
//! | `depreciation_method`        | yes      | string  | `MACRS_5YR`, `MACRS_7YR`, `StraightLine`   |
//! | `section_179_requested`      | yes      | bool    |                                            |
//! | `bonus_eligible`             | yes      | bool    |                                            |
//! | `prior_special_depreciation` | no       | decimal | column may be omitted; empty = 0           |
//!
//! ```csv
//! id,description,date_placed_in_service,cost,business_use_percent,category,depreciation_method,section_179_requested,bonus_eligible
//! a1,Workstation,2024-02-01,3500.00,100,computer,MACRS_5YR,true,false
//! ```

use std::path::Path;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use taxprep_core::{Asset, AssetCategory, DepreciationMethod};

use crate::error::{LoadError, read_file};

#[derive(Debug, Deserialize)]
struct CsvRow {
    id: String,
    description: String,
    date_placed_in_service: NaiveDate,
    cost: Decimal,
    business_use_percent: Decimal,
    category: String,
    depreciation_method: String,
    section_179_requested: bool,
    bonus_eligible: bool,
    #[serde(default)]
    prior_special_depreciation: Option<Decimal>,
}

/// Convert a single CSV row into an [`Asset`].
///
/// `row_number` is 1-based (for error messages).
fn convert_row(
    row: CsvRow,
    row_number: usize,
) -> Result<Asset, LoadError> {
    let invalid = |source| LoadError::InvalidRow {
        row: row_number,
        source,
    };
    let category = AssetCategory::parse(&row.category).map_err(invalid)?;
    let depreciation_method = DepreciationMethod::parse(&row.depreciation_method).map_err(invalid)?;

    Ok(Asset {
        id: row.id,
        description: row.description,
        date_placed_in_service: row.date_placed_in_service,
        cost: row.cost,
        business_use_percent: row.business_use_percent,
        category,
        depreciation_method,
        section_179_requested: row.section_179_requested,
        bonus_eligible: row.bonus_eligible,
        prior_special_depreciation: row.prior_special_depreciation.unwrap_or_default(),
    })
}

/// Parse CSV text and return the assets in file order.
///
/// Range checks (positive cost, business use 0-100, ...) are left to the
/// depreciation calculator; this only rejects values that cannot be
/// represented.
///
/// # Errors
///
/// * [`LoadError::Csv`] if the CSV is structurally invalid.
/// * [`LoadError::InvalidRow`] for an unknown category or depreciation
///   method.
pub fn load_from_str(input: &str) -> Result<Vec<Asset>, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(input.as_bytes());

    reader
        .deserialize::<CsvRow>()
        .enumerate()
        .map(|(idx, result)| {
            let row = result?;
            convert_row(row, idx + 1)
        })
        .collect()
}

/// Read a file from disk and delegate to [`load_from_str`].
pub fn load_from_file(path: &Path) -> Result<Vec<Asset>, LoadError> {
    load_from_str(&read_file(path)?)
}
