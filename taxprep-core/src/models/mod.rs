mod asset;
mod filing_status;
mod home_office;
mod tax_summary;
mod tax_year_config;
mod transaction;

pub use asset::{Asset, AssetCategory, DepreciationMethod};
pub use filing_status::FilingStatusCode;
pub use home_office::{HomeOfficeSettings, SharedHomeExpenses};
pub use tax_summary::TaxSummaryInput;
pub use tax_year_config::{FilingStatusAmounts, TaxYearConfig};
pub use transaction::Transaction;
