use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilingStatusCode {
    Single,
    #[serde(alias = "married_jointly")]
    MarriedFilingJointly,
    #[serde(alias = "married_separately")]
    MarriedFilingSeparately,
    HeadOfHousehold,
    #[serde(alias = "qualifying_widow")]
    QualifyingSurvivingSpouse,
}

impl FilingStatusCode {
    pub const ALL: [FilingStatusCode; 5] = [
        Self::Single,
        Self::MarriedFilingJointly,
        Self::MarriedFilingSeparately,
        Self::HeadOfHousehold,
        Self::QualifyingSurvivingSpouse,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "S",
            Self::MarriedFilingJointly => "MFJ",
            Self::MarriedFilingSeparately => "MFS",
            Self::HeadOfHousehold => "HOH",
            Self::QualifyingSurvivingSpouse => "QSS",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Single => "Single",
            Self::MarriedFilingJointly => "Married Filing Jointly",
            Self::MarriedFilingSeparately => "Married Filing Separately",
            Self::HeadOfHousehold => "Head of Household",
            Self::QualifyingSurvivingSpouse => "Qualifying Surviving Spouse",
        }
    }

    /// Parses a short code (`S`, `MFJ`, ...) or a snake_case name
    /// (`single`, `married_jointly`, `qualifying_widow`, ...).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "s" | "single" => Some(Self::Single),
            "mfj" | "married_filing_jointly" | "married_jointly" => Some(Self::MarriedFilingJointly),
            "mfs" | "married_filing_separately" | "married_separately" => {
                Some(Self::MarriedFilingSeparately)
            }
            "hoh" | "head_of_household" => Some(Self::HeadOfHousehold),
            "qss" | "qualifying_surviving_spouse" | "qualifying_widow" => {
                Some(Self::QualifyingSurvivingSpouse)
            }
            _ => None,
        }
    }
}

impl std::fmt::Display for FilingStatusCode {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parse_accepts_short_codes() {
        for code in FilingStatusCode::ALL {
            assert_eq!(FilingStatusCode::parse(code.as_str()), Some(code));
        }
    }

    #[test]
    fn parse_accepts_legacy_names() {
        assert_eq!(
            FilingStatusCode::parse("married_jointly"),
            Some(FilingStatusCode::MarriedFilingJointly)
        );
        assert_eq!(
            FilingStatusCode::parse("Qualifying_Widow"),
            Some(FilingStatusCode::QualifyingSurvivingSpouse)
        );
    }

    #[test]
    fn parse_rejects_unknown_status() {
        assert_eq!(FilingStatusCode::parse("divorced"), None);
    }
}
