use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::FilingStatusCode;

/// Inputs to the Schedule SE calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxSummaryInput {
    pub schedule_c_net_profit: Decimal,
    pub tax_year: i32,
    #[serde(default)]
    pub adjustments: Decimal,
    pub filing_status: FilingStatusCode,
    /// Wages already subject to social security and Medicare withholding.
    #[serde(default)]
    pub w2_wages: Decimal,
}
