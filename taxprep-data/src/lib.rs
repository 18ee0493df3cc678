//! File loaders, report assembly and logging for the `taxprep` CLI.

pub mod assets;
pub mod error;
pub mod logging;
pub mod report;
pub mod settings;
pub mod tax_years;
pub mod transactions;

pub use error::LoadError;
pub use report::{DeductionSummary, TaxReport, prepare_report};
pub use settings::Settings;
