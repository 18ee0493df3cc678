use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::common::allocate;
use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetCategory {
    Computer,
    Furniture,
    Vehicle,
    Equipment,
    Other,
}

impl AssetCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Computer => "computer",
            Self::Furniture => "furniture",
            Self::Vehicle => "vehicle",
            Self::Equipment => "equipment",
            Self::Other => "other",
        }
    }

    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "computer" => Ok(Self::Computer),
            "furniture" => Ok(Self::Furniture),
            "vehicle" => Ok(Self::Vehicle),
            "equipment" => Ok(Self::Equipment),
            "other" => Ok(Self::Other),
            _ => Err(ValidationError::UnknownAssetCategory(s.to_string())),
        }
    }
}

/// Depreciation schedule applied to the basis left after Section 179 and
/// bonus depreciation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DepreciationMethod {
    #[serde(rename = "MACRS_5YR")]
    Macrs5Year,
    #[serde(rename = "MACRS_7YR")]
    Macrs7Year,
    StraightLine,
}

impl DepreciationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Macrs5Year => "MACRS_5YR",
            Self::Macrs7Year => "MACRS_7YR",
            Self::StraightLine => "StraightLine",
        }
    }

    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        match s.trim().to_ascii_uppercase().replace(['-', ' '], "_").as_str() {
            "MACRS_5YR" | "MACRS_5_YEAR" => Ok(Self::Macrs5Year),
            "MACRS_7YR" | "MACRS_7_YEAR" => Ok(Self::Macrs7Year),
            "STRAIGHTLINE" | "STRAIGHT_LINE" => Ok(Self::StraightLine),
            _ => Err(ValidationError::UnknownDepreciationMethod(s.to_string())),
        }
    }
}

/// A business asset eligible for depreciation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub id: String,
    pub description: String,
    pub date_placed_in_service: NaiveDate,
    pub cost: Decimal,
    /// Whole-number percentage, 0 through 100.
    pub business_use_percent: Decimal,
    pub category: AssetCategory,
    pub depreciation_method: DepreciationMethod,
    pub section_179_requested: bool,
    pub bonus_eligible: bool,
    /// Section 179 plus bonus depreciation claimed in the year the asset was
    /// placed in service. Only consulted for later years.
    #[serde(default)]
    pub prior_special_depreciation: Decimal,
}

impl Asset {
    /// Cost scaled by business-use percentage. Unrounded.
    pub fn business_basis(&self) -> Decimal {
        allocate(self.cost, self.business_use_percent)
    }

    /// 1 in the year placed in service, 2 the following year, and so on.
    pub fn years_in_service(
        &self,
        tax_year: i32,
    ) -> i32 {
        tax_year - self.date_placed_in_service.year() + 1
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn laptop() -> Asset {
        Asset {
            id: "a1".to_string(),
            description: "Laptop".to_string(),
            date_placed_in_service: NaiveDate::from_ymd_opt(2023, 3, 14).unwrap(),
            cost: dec!(2400.00),
            business_use_percent: dec!(75),
            category: AssetCategory::Computer,
            depreciation_method: DepreciationMethod::Macrs5Year,
            section_179_requested: false,
            bonus_eligible: false,
            prior_special_depreciation: dec!(0),
        }
    }

    #[test]
    fn business_basis_scales_cost_by_business_use() {
        assert_eq!(laptop().business_basis(), dec!(1800.00));
    }

    #[test]
    fn years_in_service_counts_placed_year_as_one() {
        let asset = laptop();

        assert_eq!(asset.years_in_service(2023), 1);
        assert_eq!(asset.years_in_service(2025), 3);
    }

    #[test]
    fn category_parse_is_case_insensitive() {
        assert_eq!(AssetCategory::parse("Vehicle"), Ok(AssetCategory::Vehicle));
    }

    #[test]
    fn category_parse_rejects_unknown_value() {
        assert_eq!(
            AssetCategory::parse("boat"),
            Err(ValidationError::UnknownAssetCategory("boat".to_string()))
        );
    }

    #[test]
    fn method_parse_accepts_canonical_names() {
        assert_eq!(DepreciationMethod::parse("MACRS_5YR"), Ok(DepreciationMethod::Macrs5Year));
        assert_eq!(DepreciationMethod::parse("macrs-7yr"), Ok(DepreciationMethod::Macrs7Year));
        assert_eq!(
            DepreciationMethod::parse("StraightLine"),
            Ok(DepreciationMethod::StraightLine)
        );
    }

    #[test]
    fn method_parse_rejects_unknown_value() {
        assert_eq!(
            DepreciationMethod::parse("MACRS_39YR"),
            Err(ValidationError::UnknownDepreciationMethod("MACRS_39YR".to_string()))
        );
    }
}
