//! Maps bank-provider category codes to Schedule C expense lines.
//!
//! The table below is the single source of truth for two questions: which
//! line a transaction lands on, and whether an unreviewed transaction may be
//! projected as a potential business deduction. A code is "potentially
//! business" exactly when it appears in the table; everything else lands on
//! [`ScheduleCLine::OtherExpenses`] if it is counted at all.
//!
//! Codes are compared after normalisation: upper-cased, with `/`, `-`, `.`
//! and spaces read as `_`. `food-and-drink/restaurant` therefore matches
//! `FOOD_AND_DRINK_RESTAURANT`.

use serde::{Deserialize, Serialize};

/// Schedule C expense lines produced by the engine.
///
/// Declaration order is form order; `Ord` sorts lines the way they print.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleCLine {
    CarAndTruck,
    LegalAndProfessional,
    OfficeExpense,
    Travel,
    Meals,
    OtherExpenses,
}

impl ScheduleCLine {
    /// Every line, in form order.
    pub const ALL: [ScheduleCLine; 6] = [
        Self::CarAndTruck,
        Self::LegalAndProfessional,
        Self::OfficeExpense,
        Self::Travel,
        Self::Meals,
        Self::OtherExpenses,
    ];

    /// Line number on Schedule C (Form 1040).
    pub fn line_number(&self) -> &'static str {
        match self {
            Self::CarAndTruck => "9",
            Self::LegalAndProfessional => "17",
            Self::OfficeExpense => "18",
            Self::Travel => "24a",
            Self::Meals => "24b",
            Self::OtherExpenses => "27a",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::CarAndTruck => "Car and truck expenses",
            Self::LegalAndProfessional => "Legal and professional services",
            Self::OfficeExpense => "Office expense",
            Self::Travel => "Travel",
            Self::Meals => "Deductible meals",
            Self::OtherExpenses => "Other expenses",
        }
    }
}

impl std::fmt::Display for ScheduleCLine {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(f, "Line {} {}", self.line_number(), self.description())
    }
}

use ScheduleCLine::*;

static CATEGORY_LINES: &[(&str, ScheduleCLine)] = &[
    // Vehicle
    ("TRANSPORTATION_GAS", CarAndTruck),
    ("TRANSPORTATION_FUEL", CarAndTruck),
    ("TRANSPORTATION_PARKING", CarAndTruck),
    ("TRANSPORTATION_TOLLS", CarAndTruck),
    ("TRANSPORTATION_OTHER_TRANSPORTATION", CarAndTruck),
    ("GENERAL_SERVICES_AUTOMOTIVE", CarAndTruck),
    ("TRAVEL_GAS_STATIONS", CarAndTruck),
    // Travel
    ("TRAVEL_FLIGHTS", Travel),
    ("TRAVEL_AIRLINES_AND_AVIATION_SERVICES", Travel),
    ("TRAVEL_LODGING", Travel),
    ("TRAVEL_RENTAL_CARS", Travel),
    ("TRAVEL_OTHER_TRAVEL", Travel),
    ("TRANSPORTATION_TAXIS_AND_RIDE_SHARES", Travel),
    ("TRANSPORTATION_PUBLIC_TRANSIT", Travel),
    // Meals
    ("FOOD_AND_DRINK_RESTAURANT", Meals),
    ("FOOD_AND_DRINK_RESTAURANTS", Meals),
    ("FOOD_AND_DRINK_COFFEE", Meals),
    ("FOOD_AND_DRINK_COFFEE_SHOP", Meals),
    ("FOOD_AND_DRINK_FAST_FOOD", Meals),
    ("FOOD_AND_DRINK_VENDING_MACHINES", Meals),
    ("FOOD_AND_DRINK_OTHER_FOOD_AND_DRINK", Meals),
    // Office
    ("GENERAL_MERCHANDISE_OFFICE_SUPPLIES", OfficeExpense),
    ("GENERAL_MERCHANDISE_ELECTRONICS", OfficeExpense),
    ("GENERAL_MERCHANDISE_COMPUTERS_AND_ELECTRONICS", OfficeExpense),
    ("GENERAL_MERCHANDISE_ONLINE_MARKETPLACES", OfficeExpense),
    ("GENERAL_SERVICES_POSTAGE_AND_SHIPPING", OfficeExpense),
    ("GENERAL_SERVICES_STORAGE", OfficeExpense),
    ("RENT_AND_UTILITIES_TELEPHONE", OfficeExpense),
    ("RENT_AND_UTILITIES_INTERNET_AND_CABLE", OfficeExpense),
    ("SHOPS_COMPUTERS_AND_ELECTRONICS", OfficeExpense),
    // Professional services
    ("GENERAL_SERVICES_ACCOUNTING_AND_FINANCIAL_PLANNING", LegalAndProfessional),
    ("GENERAL_SERVICES_CONSULTING_AND_LEGAL", LegalAndProfessional),
    ("SERVICE_LEGAL", LegalAndProfessional),
    ("SERVICE_ACCOUNTING", LegalAndProfessional),
    // Other business expenses
    ("GENERAL_SERVICES_ADVERTISING_AND_MARKETING", OtherExpenses),
    ("GENERAL_SERVICES_EDUCATION", OtherExpenses),
    ("GENERAL_SERVICES_INSURANCE", OtherExpenses),
    ("GENERAL_SERVICES_OTHER_GENERAL_SERVICES", OtherExpenses),
    ("GENERAL_MERCHANDISE_BOOKSTORES_AND_NEWSSTANDS", OtherExpenses),
    ("BANK_FEES_OTHER_BANK_FEES", OtherExpenses),
    ("BANK_FEES_FOREIGN_TRANSACTION_FEES", OtherExpenses),
    ("GOVERNMENT_AND_NON_PROFIT_GOVERNMENT_DEPARTMENTS_AND_AGENCIES", OtherExpenses),
];

fn normalize(category_code: &str) -> String {
    category_code
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '-' | '.' | ' ' => '_',
            other => other.to_ascii_uppercase(),
        })
        .collect()
}

fn lookup(category_code: &str) -> Option<ScheduleCLine> {
    let code = normalize(category_code);
    CATEGORY_LINES
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, line)| *line)
}

/// The Schedule C line for a provider category code.
///
/// Unmapped codes land on [`ScheduleCLine::OtherExpenses`].
///
/// # Examples
///
/// ```
/// use taxprep_core::calculations::classifier::{classify, ScheduleCLine};
///
/// assert_eq!(classify("FOOD_AND_DRINK_RESTAURANT"), ScheduleCLine::Meals);
/// assert_eq!(classify("transportation/fuel"), ScheduleCLine::CarAndTruck);
/// assert_eq!(classify("ENTERTAINMENT_CASINOS"), ScheduleCLine::OtherExpenses);
/// ```
pub fn classify(category_code: &str) -> ScheduleCLine {
    lookup(category_code).unwrap_or(ScheduleCLine::OtherExpenses)
}

/// True exactly for the codes present in the mapping table.
pub fn is_potentially_business(category_code: &str) -> bool {
    lookup(category_code).is_some()
}

/// Every mapped category code with its line, in table order.
pub fn category_table() -> &'static [(&'static str, ScheduleCLine)] {
    CATEGORY_LINES
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use pretty_assertions::assert_eq;

    use super::ScheduleCLine::*;
    use super::*;

    #[test]
    fn classify_maps_restaurant_to_meals() {
        assert_eq!(classify("FOOD_AND_DRINK_RESTAURANT"), Meals);
    }

    #[test]
    fn classify_normalises_separators_and_case() {
        assert_eq!(classify("food-and-drink/restaurant"), Meals);
        assert_eq!(classify(" travel.flights "), Travel);
    }

    #[test]
    fn classify_defaults_unmapped_codes_to_other_expenses() {
        assert_eq!(classify("ENTERTAINMENT_SPORTING_EVENTS"), OtherExpenses);
        assert_eq!(classify(""), OtherExpenses);
    }

    #[test]
    fn classify_covers_every_line() {
        let lines: HashSet<_> = category_table().iter().map(|(_, line)| *line).collect();

        assert_eq!(lines.len(), ScheduleCLine::ALL.len());
    }

    #[test]
    fn potentially_business_matches_table_membership() {
        for (code, _) in category_table() {
            assert!(is_potentially_business(code), "{code}");
        }
        assert!(!is_potentially_business("ENTERTAINMENT_CASINOS"));
        assert!(!is_potentially_business("INCOME_WAGES"));
    }

    #[test]
    fn table_has_no_duplicate_codes() {
        let codes: HashSet<_> = category_table().iter().map(|(code, _)| *code).collect();

        assert_eq!(codes.len(), category_table().len());
    }

    #[test]
    fn table_codes_are_already_normalised() {
        for (code, _) in category_table() {
            assert_eq!(normalize(code), *code);
        }
    }

    #[test]
    fn lines_sort_in_form_order() {
        let mut lines = vec![OtherExpenses, Meals, CarAndTruck, Travel];
        lines.sort();

        assert_eq!(lines, vec![CarAndTruck, Travel, Meals, OtherExpenses]);
    }

    #[test]
    fn display_includes_line_number() {
        assert_eq!(Meals.to_string(), "Line 24b Deductible meals");
    }
}
