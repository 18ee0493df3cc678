//! Tax calculation modules for Schedule C filers.
//!
//! Every calculator is a pure function of its inputs and the constants
//! registered for the requested tax year.

pub mod classifier;
pub mod common;
pub mod forms;

pub use classifier::{ScheduleCLine, classify, is_potentially_business};
pub use forms::{
    DepreciationWorksheet, Form4562Result, Form8829Result, HomeOfficeWorksheet, ScheduleCResult,
    ScheduleCWorksheet, ScheduleSeResult, SeWorksheet,
};
