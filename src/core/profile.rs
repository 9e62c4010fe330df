use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::InvoiceError;

/// ZUGFeRD 1.0 conformance profile tier.
///
/// Tiers are ordered: every field mandatory for `Basic` is also mandatory
/// for `Comfort`, and every field mandatory for `Comfort` is mandatory for
/// `Extended`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileLevel {
    /// Line items with the minimum trading-party data.
    Basic,
    /// Full postal addresses and consistent line arithmetic.
    Comfort,
    /// Party identifiers and contact persons on top of Comfort.
    Extended,
}

impl ProfileLevel {
    /// All tiers, lowest first.
    pub const ALL: [ProfileLevel; 3] = [Self::Basic, Self::Comfort, Self::Extended];

    /// The URN written to `GuidelineSpecifiedDocumentContextParameter/ID`.
    pub fn urn(&self) -> &'static str {
        match self {
            Self::Basic => "urn:ferd:CrossIndustryDocument:invoice:1p0:basic",
            Self::Comfort => "urn:ferd:CrossIndustryDocument:invoice:1p0:comfort",
            Self::Extended => "urn:ferd:CrossIndustryDocument:invoice:1p0:extended",
        }
    }

    /// The XMP `zf:ConformanceLevel` value.
    pub fn conformance_level(&self) -> &'static str {
        match self {
            Self::Basic => "BASIC",
            Self::Comfort => "COMFORT",
            Self::Extended => "EXTENDED",
        }
    }

    /// Resolve a profile from its context-parameter URN.
    pub fn from_urn(urn: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.urn() == urn.trim())
    }
}

impl FromStr for ProfileLevel {
    type Err = InvoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "basic" => Ok(Self::Basic),
            "comfort" => Ok(Self::Comfort),
            "extended" => Ok(Self::Extended),
            other => Err(InvoiceError::Config(format!(
                "unknown profile level '{other}' (expected basic, comfort or extended)"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers_are_ordered() {
        assert!(ProfileLevel::Basic < ProfileLevel::Comfort);
        assert!(ProfileLevel::Comfort < ProfileLevel::Extended);
    }

    #[test]
    fn urn_lookup_inverts_urn() {
        for p in ProfileLevel::ALL {
            assert_eq!(ProfileLevel::from_urn(p.urn()), Some(p));
        }
        assert_eq!(ProfileLevel::from_urn("urn:cen.eu:en16931:2017"), None);
    }

    #[test]
    fn parse_names() {
        assert_eq!("Basic".parse::<ProfileLevel>().unwrap(), ProfileLevel::Basic);
        assert_eq!(" EXTENDED ".parse::<ProfileLevel>().unwrap(), ProfileLevel::Extended);
        assert!(matches!(
            "minimum".parse::<ProfileLevel>(),
            Err(InvoiceError::Config(_))
        ));
    }
}
