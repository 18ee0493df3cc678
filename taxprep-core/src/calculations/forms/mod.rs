//! IRS form calculations.
//!
//! Each worksheet takes its statutory constants from a `*Config` struct,
//! built from a [`TaxYearConfig`](crate::TaxYearConfig) directly or through
//! the worksheet's `for_year` constructor.

pub mod depreciation;
pub mod home_office;
pub mod schedule_c;
pub mod self_emp;

pub use depreciation::{
    AssetDepreciationResult, DepreciationConfig, DepreciationWorksheet, Form4562Result,
};
pub use home_office::{Form8829Result, HomeOfficeConfig, HomeOfficeWorksheet};
pub use schedule_c::{
    LineItemStatus, ScheduleCConfig, ScheduleCLineItem, ScheduleCLineSummary, ScheduleCResult,
    ScheduleCWorksheet,
};
pub use self_emp::{ScheduleSeResult, SeWorksheet, SeWorksheetConfig};
