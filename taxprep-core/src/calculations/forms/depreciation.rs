//! Depreciation and amortization calculations (Form 4562).
//!
//! # Per-asset steps
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Business basis: cost × business-use percentage |
//! | 2    | Years in service: tax year − year placed in service + 1 |
//! | 3    | Section 179 (first year, opt-in): smaller of remaining pool, business income, basis |
//! | 4    | Bonus depreciation (first year, opt-in): basis left after step 3 × bonus rate |
//! | 5    | Scheduled depreciation on what is left: MACRS table or straight line |
//! | 6    | Total: steps 3 + 4 + 5; carryover: basis − total |
//!
//! # Section 179 pool
//!
//! The Section 179 dollar limit is shared by every asset in a batch. Assets
//! are processed highest cost first and the remaining pool is threaded from
//! one asset to the next, so a later asset only sees what earlier ones left.
//! The dollar limit is reduced dollar-for-dollar by the cost of electing
//! property above the phase-out threshold before the first asset is
//! processed.
//!
//! Business income caps each asset's deduction on its own and is never drawn
//! down. Elections it disallows are totalled in `section_179_carryover` for
//! information only.
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use rust_decimal_macros::dec;
//! use taxprep_core::calculations::forms::DepreciationWorksheet;
//! use taxprep_core::{Asset, AssetCategory, DepreciationMethod, TaxYearRegistry};
//!
//! let registry = TaxYearRegistry::builtin();
//! let worksheet = DepreciationWorksheet::for_year(&registry, 2023).unwrap();
//!
//! let press = Asset {
//!     id: "press".to_string(),
//!     description: "Printing press".to_string(),
//!     date_placed_in_service: NaiveDate::from_ymd_opt(2023, 6, 1).unwrap(),
//!     cost: dec!(50000.00),
//!     business_use_percent: dec!(100),
//!     category: AssetCategory::Equipment,
//!     depreciation_method: DepreciationMethod::Macrs7Year,
//!     section_179_requested: true,
//!     bonus_eligible: false,
//!     prior_special_depreciation: dec!(0),
//! };
//!
//! let result = worksheet.calculate(&[press], dec!(100000.00)).unwrap();
//!
//! assert_eq!(result.total_section_179, dec!(50000.00));
//! assert_eq!(result.total_scheduled_depreciation, dec!(0.00));
//! ```

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::calculations::common::{HUNDRED, allocate, non_negative, round_currency};
use crate::config::TaxYearRegistry;
use crate::error::{CalculationError, ConfigurationError, ValidationError};
use crate::models::{Asset, DepreciationMethod, TaxYearConfig};

/// Statutory figures used by the depreciation calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepreciationConfig {
    /// Section 179 dollar limit, also the per-asset cost ceiling.
    pub section_179_limit: Decimal,

    /// Cost of electing property above which the limit phases out.
    pub section_179_phase_out_threshold: Decimal,

    /// Fraction of remaining basis taken as bonus depreciation.
    pub bonus_depreciation_rate: Decimal,

    pub straight_line_useful_life_years: u32,

    /// Whole-number percentages, index 0 is the first year in service.
    pub macrs_5_year: Vec<Decimal>,
    pub macrs_7_year: Vec<Decimal>,
}

impl DepreciationConfig {
    pub fn from_tax_year_config(config: &TaxYearConfig) -> Self {
        Self {
            section_179_limit: config.section_179_limit,
            section_179_phase_out_threshold: config.section_179_phase_out_threshold,
            bonus_depreciation_rate: config.bonus_depreciation_rate,
            straight_line_useful_life_years: config.straight_line_useful_life_years,
            macrs_5_year: config.macrs_5_year.clone(),
            macrs_7_year: config.macrs_7_year.clone(),
        }
    }
}

/// Depreciation figures for one asset. Monetary fields are rounded to cents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetDepreciationResult {
    pub asset_id: String,
    pub description: String,
    pub method: DepreciationMethod,
    pub years_in_service: i32,
    pub business_basis: Decimal,
    pub section_179: Decimal,
    pub bonus_depreciation: Decimal,
    pub scheduled_depreciation: Decimal,
    pub total_depreciation: Decimal,
    /// `business_basis - total_depreciation`.
    pub carryover_to_next_year: Decimal,
    /// The asset is past the end of its schedule.
    pub fully_depreciated: bool,
}

/// Form 4562 figures for a batch of assets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Form4562Result {
    pub tax_year: i32,

    /// Section 179 limit after the phase-out reduction.
    pub section_179_limit: Decimal,

    /// Per-asset results in processing order (highest cost first).
    pub assets: Vec<AssetDepreciationResult>,

    pub total_section_179: Decimal,
    pub total_bonus_depreciation: Decimal,
    pub total_scheduled_depreciation: Decimal,
    pub total_depreciation: Decimal,
    pub total_carryover: Decimal,

    /// Elected Section 179 disallowed by the per-asset business-income cap.
    /// Informational; it does not change any other figure.
    pub section_179_carryover: Decimal,
}

/// Remaining Section 179 capacity, threaded through the asset fold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Section179Pool {
    cap_remaining: Decimal,
    /// Fixed for the whole batch.
    business_income: Decimal,
    disallowed: Decimal,
}

/// Unrounded per-asset figures.
struct AssetFigures {
    basis: Decimal,
    section_179: Decimal,
    bonus: Decimal,
    scheduled: Decimal,
    fully_depreciated: bool,
}

/// Calculator for Form 4562 depreciation.
#[derive(Debug, Clone)]
pub struct DepreciationWorksheet {
    config: DepreciationConfig,
    tax_year: i32,
}

impl DepreciationWorksheet {
    pub fn new(
        config: DepreciationConfig,
        tax_year: i32,
    ) -> Self {
        Self { config, tax_year }
    }

    /// Worksheet using the constants registered for `tax_year`.
    pub fn for_year(
        registry: &TaxYearRegistry,
        tax_year: i32,
    ) -> Result<Self, ConfigurationError> {
        let config = registry.get(tax_year)?;
        Ok(Self::new(DepreciationConfig::from_tax_year_config(config), tax_year))
    }

    /// Computes depreciation for every asset in `assets`.
    ///
    /// `business_income` caps each asset's Section 179 deduction. A negative
    /// figure is treated as zero.
    ///
    /// # Errors
    ///
    /// [`ValidationError`] if any asset has an empty description, a
    /// non-positive cost, a business-use percentage outside 0-100, a
    /// placed-in-service date after the end of the tax year, or prior special
    /// depreciation outside 0 through its business basis. One bad asset
    /// rejects the whole batch.
    pub fn calculate(
        &self,
        assets: &[Asset],
        business_income: Decimal,
    ) -> Result<Form4562Result, CalculationError> {
        for asset in assets {
            self.validate(asset)?;
        }

        if business_income < Decimal::ZERO {
            warn!(
                business_income = %business_income,
                "Business income is negative; no Section 179 deduction is allowed"
            );
        }

        let mut ordered: Vec<&Asset> = assets.iter().collect();
        // Stable: equal costs keep input order.
        ordered.sort_by(|a, b| b.cost.cmp(&a.cost));

        let section_179_limit = self.phased_out_limit(&ordered);
        let pool = Section179Pool {
            cap_remaining: section_179_limit,
            business_income: non_negative(business_income),
            disallowed: Decimal::ZERO,
        };

        let (results, pool) = self.depreciate_in_order(&ordered, pool);

        Ok(self.summarize(results, section_179_limit, pool))
    }

    /// Folds over `ordered`, handing the remaining pool from each asset to
    /// the next.
    fn depreciate_in_order(
        &self,
        ordered: &[&Asset],
        pool: Section179Pool,
    ) -> (Vec<AssetDepreciationResult>, Section179Pool) {
        ordered.iter().fold(
            (Vec::with_capacity(ordered.len()), pool),
            |(mut results, pool), asset| {
                let (figures, pool) = self.depreciate(asset, pool);
                results.push(self.finalize(asset, figures));
                (results, pool)
            },
        )
    }

    fn depreciate(
        &self,
        asset: &Asset,
        pool: Section179Pool,
    ) -> (AssetFigures, Section179Pool) {
        // Steps 1-2
        let basis = asset.business_basis();
        let years_in_service = asset.years_in_service(self.tax_year);
        let first_year = years_in_service == 1;

        // Step 3
        let (section_179, pool) = if first_year {
            self.section_179(asset, basis, pool)
        } else {
            (Decimal::ZERO, pool)
        };

        // Step 4
        let bonus = if first_year && asset.bonus_eligible {
            (basis - section_179) * self.config.bonus_depreciation_rate
        } else {
            Decimal::ZERO
        };

        // Later years depreciate whatever the first-year elections left.
        let remaining_basis = if first_year {
            basis - section_179 - bonus
        } else {
            basis - asset.prior_special_depreciation
        };

        // Step 5
        let (scheduled, fully_depreciated) =
            self.scheduled_depreciation(asset.depreciation_method, remaining_basis, years_in_service);
        if fully_depreciated {
            warn!(
                asset_id = %asset.id,
                years_in_service,
                "Asset is past the end of its depreciation schedule"
            );
        }

        debug!(
            asset_id = %asset.id,
            basis = %basis,
            section_179 = %section_179,
            bonus = %bonus,
            scheduled = %scheduled,
            cap_remaining = %pool.cap_remaining,
            "Depreciated asset"
        );

        let figures = AssetFigures {
            basis,
            section_179,
            bonus,
            scheduled,
            fully_depreciated,
        };
        (figures, pool)
    }

    /// Takes this asset's Section 179 deduction out of `pool`.
    fn section_179(
        &self,
        asset: &Asset,
        basis: Decimal,
        pool: Section179Pool,
    ) -> (Decimal, Section179Pool) {
        if !asset.section_179_requested {
            return (Decimal::ZERO, pool);
        }
        if asset.cost > self.config.section_179_limit {
            debug!(
                asset_id = %asset.id,
                cost = %asset.cost,
                limit = %self.config.section_179_limit,
                "Asset cost exceeds the Section 179 ceiling; not eligible"
            );
            return (Decimal::ZERO, pool);
        }

        let elected = non_negative(pool.cap_remaining.min(basis));
        let allowed = non_negative(elected.min(pool.business_income));
        if allowed < elected {
            warn!(
                asset_id = %asset.id,
                elected = %elected,
                allowed = %allowed,
                "Business income limits the Section 179 deduction"
            );
        }

        let pool = Section179Pool {
            cap_remaining: pool.cap_remaining - allowed,
            disallowed: pool.disallowed + (elected - allowed),
            ..pool
        };
        (allowed, pool)
    }

    /// Returns the scheduled depreciation for the year and whether the asset
    /// is past the end of its schedule.
    fn scheduled_depreciation(
        &self,
        method: DepreciationMethod,
        remaining_basis: Decimal,
        years_in_service: i32,
    ) -> (Decimal, bool) {
        let index = match usize::try_from(years_in_service - 1) {
            Ok(index) => index,
            Err(_) => return (Decimal::ZERO, false),
        };

        match method {
            DepreciationMethod::Macrs5Year | DepreciationMethod::Macrs7Year => {
                let table = if method == DepreciationMethod::Macrs5Year {
                    &self.config.macrs_5_year
                } else {
                    &self.config.macrs_7_year
                };
                match table.get(index) {
                    Some(percent) => (allocate(remaining_basis, *percent), false),
                    None => (Decimal::ZERO, true),
                }
            }
            DepreciationMethod::StraightLine => {
                let life = self.config.straight_line_useful_life_years;
                if life == 0 || index >= life as usize {
                    (Decimal::ZERO, true)
                } else {
                    (remaining_basis / Decimal::from(life), false)
                }
            }
        }
    }

    /// Rounds one asset's figures and derives its total and carryover from
    /// the rounded values, so the published figures add up exactly.
    fn finalize(
        &self,
        asset: &Asset,
        figures: AssetFigures,
    ) -> AssetDepreciationResult {
        let business_basis = round_currency(figures.basis);
        let section_179 = round_currency(figures.section_179);
        let bonus_depreciation = round_currency(figures.bonus);
        let scheduled_depreciation = round_currency(figures.scheduled)
            .min(non_negative(business_basis - section_179 - bonus_depreciation));
        let total_depreciation = section_179 + bonus_depreciation + scheduled_depreciation;

        AssetDepreciationResult {
            asset_id: asset.id.clone(),
            description: asset.description.clone(),
            method: asset.depreciation_method,
            years_in_service: asset.years_in_service(self.tax_year),
            business_basis,
            section_179,
            bonus_depreciation,
            scheduled_depreciation,
            total_depreciation,
            carryover_to_next_year: non_negative(business_basis - total_depreciation),
            fully_depreciated: figures.fully_depreciated,
        }
    }

    fn summarize(
        &self,
        assets: Vec<AssetDepreciationResult>,
        section_179_limit: Decimal,
        pool: Section179Pool,
    ) -> Form4562Result {
        let sum = |f: fn(&AssetDepreciationResult) -> Decimal| -> Decimal {
            assets.iter().map(f).sum()
        };

        Form4562Result {
            tax_year: self.tax_year,
            section_179_limit: round_currency(section_179_limit),
            total_section_179: sum(|a| a.section_179),
            total_bonus_depreciation: sum(|a| a.bonus_depreciation),
            total_scheduled_depreciation: sum(|a| a.scheduled_depreciation),
            total_depreciation: sum(|a| a.total_depreciation),
            total_carryover: sum(|a| a.carryover_to_next_year),
            section_179_carryover: round_currency(pool.disallowed),
            assets,
        }
    }

    /// Dollar limit after the phase-out for electing property placed in
    /// service this year.
    fn phased_out_limit(
        &self,
        assets: &[&Asset],
    ) -> Decimal {
        let electing_cost: Decimal = assets
            .iter()
            .filter(|a| a.section_179_requested && a.years_in_service(self.tax_year) == 1)
            .map(|a| a.cost)
            .sum();
        let reduction = non_negative(electing_cost - self.config.section_179_phase_out_threshold);
        let limit = non_negative(self.config.section_179_limit - reduction);
        if reduction > Decimal::ZERO {
            warn!(
                electing_cost = %electing_cost,
                reduction = %reduction,
                limit = %limit,
                "Section 179 limit reduced by phase-out"
            );
        }
        limit
    }

    fn validate(
        &self,
        asset: &Asset,
    ) -> Result<(), ValidationError> {
        if asset.description.trim().is_empty() {
            return Err(ValidationError::EmptyDescription {
                asset_id: asset.id.clone(),
            });
        }
        if asset.cost <= Decimal::ZERO {
            return Err(ValidationError::NonPositiveCost {
                asset_id: asset.id.clone(),
                cost: asset.cost,
            });
        }
        if asset.business_use_percent < Decimal::ZERO || asset.business_use_percent > HUNDRED {
            return Err(ValidationError::BusinessUseOutOfRange {
                asset_id: asset.id.clone(),
                percent: asset.business_use_percent,
            });
        }
        let year_end = NaiveDate::from_ymd_opt(self.tax_year, 12, 31);
        if year_end.is_some_and(|end| asset.date_placed_in_service > end) {
            return Err(ValidationError::PlacedInServiceInFuture {
                asset_id: asset.id.clone(),
                placed: asset.date_placed_in_service,
                tax_year: self.tax_year,
            });
        }
        if asset.prior_special_depreciation < Decimal::ZERO
            || asset.prior_special_depreciation > asset.business_basis()
        {
            return Err(ValidationError::InvalidPriorDepreciation {
                asset_id: asset.id.clone(),
                value: asset.prior_special_depreciation,
            });
        }
        Ok(())
    }
}
