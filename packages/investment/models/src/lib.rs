#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Investment record types and the creative-economy taxonomy.
//!
//! This crate defines the canonical shape of a filed investment entry and
//! the two closed classifications every record carries: the creative-economy
//! [`Subsector`] and the capital-origin [`CapitalStatus`]. Records are owned
//! by the record store; everything downstream only reads them.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Creative-economy subsectors an investment can be classified under.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Subsector {
    /// Application and game developers
    AppGameDeveloper,
    /// Architecture
    Architecture,
    /// Interior design
    InteriorDesign,
    /// Visual communication design
    VisualCommunicationDesign,
    /// Product design
    ProductDesign,
    /// Fashion
    Fashion,
    /// Film, animation, and video
    FilmAnimationVideo,
    /// Photography
    Photography,
    /// Crafts
    Crafts,
    /// Culinary
    Culinary,
    /// Music
    Music,
    /// Publishing
    Publishing,
    /// Advertising
    Advertising,
    /// Performing arts
    PerformingArts,
    /// Fine arts
    FineArts,
    /// Television and radio
    TelevisionRadio,
}

impl Subsector {
    /// Human-readable label used in filter dropdowns and popups.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::AppGameDeveloper => "Application & Game Developer",
            Self::Architecture => "Architecture",
            Self::InteriorDesign => "Interior Design",
            Self::VisualCommunicationDesign => "Visual Communication Design",
            Self::ProductDesign => "Product Design",
            Self::Fashion => "Fashion",
            Self::FilmAnimationVideo => "Film, Animation & Video",
            Self::Photography => "Photography",
            Self::Crafts => "Crafts",
            Self::Culinary => "Culinary",
            Self::Music => "Music",
            Self::Publishing => "Publishing",
            Self::Advertising => "Advertising",
            Self::PerformingArts => "Performing Arts",
            Self::FineArts => "Fine Arts",
            Self::TelevisionRadio => "Television & Radio",
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::AppGameDeveloper,
            Self::Architecture,
            Self::InteriorDesign,
            Self::VisualCommunicationDesign,
            Self::ProductDesign,
            Self::Fashion,
            Self::FilmAnimationVideo,
            Self::Photography,
            Self::Crafts,
            Self::Culinary,
            Self::Music,
            Self::Publishing,
            Self::Advertising,
            Self::PerformingArts,
            Self::FineArts,
            Self::TelevisionRadio,
        ]
    }
}

/// Origin of the invested capital.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum CapitalStatus {
    /// Domestic investment (Penanaman Modal Dalam Negeri)
    Pmdn,
    /// Foreign investment (Penanaman Modal Asing)
    Pma,
}

impl CapitalStatus {
    /// Human-readable label used in filter dropdowns and popups.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pmdn => "Domestic (PMDN)",
            Self::Pma => "Foreign (PMA)",
        }
    }

    /// Returns `true` for foreign-origin capital.
    #[must_use]
    pub const fn is_foreign(self) -> bool {
        matches!(self, Self::Pma)
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Pmdn, Self::Pma]
    }
}

/// One filed investment entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentRecord {
    /// Registered company name.
    pub company_name: String,
    /// Business registration identifier (NIB).
    pub registration_id: String,
    /// Industry classification code (KBLI).
    pub classification_code: String,
    /// Industry classification title.
    pub classification_title: String,
    /// Creative-economy subsector.
    pub subsector: Subsector,
    /// City or regency the investment was filed in.
    pub region: String,
    /// Investment amount in rupiah.
    pub amount: Decimal,
    /// Number of workers absorbed by the investment.
    pub workers: u32,
    /// Domestic or foreign capital.
    pub capital_status: CapitalStatus,
    /// Fiscal year.
    pub year: i32,
    /// Fiscal quarter (1-4).
    pub quarter: u8,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use std::str::FromStr;

    #[test]
    fn sixteen_subsectors() {
        assert_eq!(Subsector::all().len(), 16);
        let unique: BTreeSet<_> = Subsector::all().iter().collect();
        assert_eq!(unique.len(), 16, "Subsector::all() contains duplicates");
    }

    #[test]
    fn subsector_labels_non_empty() {
        for sub in Subsector::all() {
            assert!(!sub.label().is_empty(), "{sub:?} has an empty label");
        }
    }

    #[test]
    fn subsector_strum_roundtrip() {
        for sub in Subsector::all() {
            let parsed = Subsector::from_str(sub.as_ref()).unwrap();
            assert_eq!(parsed, *sub);
        }
        assert_eq!(Subsector::Culinary.to_string(), "CULINARY");
    }

    #[test]
    fn capital_status_parses_case_insensitively() {
        assert_eq!(CapitalStatus::from_str("pma").unwrap(), CapitalStatus::Pma);
        assert_eq!(CapitalStatus::from_str("PMDN").unwrap(), CapitalStatus::Pmdn);
        assert!(CapitalStatus::from_str("joint").is_err());
        assert!(CapitalStatus::Pma.is_foreign());
        assert!(!CapitalStatus::Pmdn.is_foreign());
    }

    #[test]
    fn record_deserializes_exact_amounts() {
        let json = r#"{
            "companyName": "PT Kreasi Nusantara",
            "registrationId": "9120001234567",
            "classificationCode": "62019",
            "classificationTitle": "Aktivitas Pemrograman Komputer Lainnya",
            "subsector": "APP_GAME_DEVELOPER",
            "region": "Kota Bandung",
            "amount": "12345678901234567.89",
            "workers": 42,
            "capitalStatus": "PMA",
            "year": 2023,
            "quarter": 2
        }"#;
        let record: InvestmentRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.subsector, Subsector::AppGameDeveloper);
        assert_eq!(record.capital_status, CapitalStatus::Pma);
        assert_eq!(
            record.amount,
            Decimal::from_str("12345678901234567.89").unwrap()
        );
    }
}
