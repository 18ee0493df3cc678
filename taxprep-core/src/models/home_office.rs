use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Expenses shared between the home and the office, for the whole year.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedHomeExpenses {
    #[serde(default)]
    pub rent_or_mortgage_interest: Decimal,
    #[serde(default)]
    pub utilities: Decimal,
    #[serde(default)]
    pub insurance: Decimal,
    #[serde(default)]
    pub repairs_maintenance: Decimal,
    #[serde(default)]
    pub property_tax: Decimal,
    #[serde(default)]
    pub other: Decimal,
}

impl SharedHomeExpenses {
    /// Each field paired with its name, in Form 8829 order.
    pub fn fields(&self) -> [(&'static str, Decimal); 6] {
        [
            ("rent_or_mortgage_interest", self.rent_or_mortgage_interest),
            ("utilities", self.utilities),
            ("insurance", self.insurance),
            ("repairs_maintenance", self.repairs_maintenance),
            ("property_tax", self.property_tax),
            ("other", self.other),
        ]
    }

    pub fn total(&self) -> Decimal {
        self.fields().iter().map(|(_, amount)| *amount).sum()
    }
}

/// User-supplied home-office facts for one tax year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HomeOfficeSettings {
    pub total_home_area_sq_ft: Decimal,
    pub office_area_sq_ft: Decimal,
    #[serde(default)]
    pub expenses: SharedHomeExpenses,
}
