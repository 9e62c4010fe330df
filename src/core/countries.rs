//! ISO 3166-1 alpha-2 country codes for party addresses.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::InvoiceError;

/// A validated ISO 3166-1 alpha-2 country code (e.g. "US", "DE").
///
/// Written verbatim to `ram:CountryID` in the structured export.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CountryCode(String);

impl CountryCode {
    /// United States.
    pub fn us() -> Self {
        Self("US".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for CountryCode {
    type Err = InvoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_uppercase();
        if COUNTRY_CODES.binary_search(&code.as_str()).is_ok() {
            Ok(Self(code))
        } else {
            Err(InvoiceError::Config(format!(
                "'{s}' is not an ISO 3166-1 alpha-2 country code"
            )))
        }
    }
}

impl TryFrom<String> for CountryCode {
    type Error = InvoiceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CountryCode> for String {
    fn from(code: CountryCode) -> Self {
        code.0
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Sorted for binary search.
static COUNTRY_CODES: &[&str] = &[
    "AD", "AE", "AF", "AG", "AI", "AL", "AM", "AO", "AQ", "AR", "AS", "AT", "AU", "AW", "AX", "AZ",
    "BA", "BB", "BD", "BE", "BF", "BG", "BH", "BI", "BJ", "BL", "BM", "BN", "BO", "BQ", "BR", "BS",
    "BT", "BV", "BW", "BY", "BZ", "CA", "CC", "CD", "CF", "CG", "CH", "CI", "CK", "CL", "CM", "CN",
    "CO", "CR", "CU", "CV", "CW", "CX", "CY", "CZ", "DE", "DJ", "DK", "DM", "DO", "DZ", "EC", "EE",
    "EG", "EH", "ER", "ES", "ET", "FI", "FJ", "FK", "FM", "FO", "FR", "GA", "GB", "GD", "GE", "GF",
    "GG", "GH", "GI", "GL", "GM", "GN", "GP", "GQ", "GR", "GS", "GT", "GU", "GW", "GY", "HK", "HM",
    "HN", "HR", "HT", "HU", "ID", "IE", "IL", "IM", "IN", "IO", "IQ", "IR", "IS", "IT", "JE", "JM",
    "JO", "JP", "KE", "KG", "KH", "KI", "KM", "KN", "KP", "KR", "KW", "KY", "KZ", "LA", "LB", "LC",
    "LI", "LK", "LR", "LS", "LT", "LU", "LV", "LY", "MA", "MC", "MD", "ME", "MF", "MG", "MH", "MK",
    "ML", "MM", "MN", "MO", "MP", "MQ", "MR", "MS", "MT", "MU", "MV", "MW", "MX", "MY", "MZ", "NA",
    "NC", "NE", "NF", "NG", "NI", "NL", "NO", "NP", "NR", "NU", "NZ", "OM", "PA", "PE", "PF", "PG",
    "PH", "PK", "PL", "PM", "PN", "PR", "PS", "PT", "PW", "PY", "QA", "RE", "RO", "RS", "RU", "RW",
    "SA", "SB", "SC", "SD", "SE", "SG", "SH", "SI", "SJ", "SK", "SL", "SM", "SN", "SO", "SR", "SS",
    "ST", "SV", "SX", "SY", "SZ", "TC", "TD", "TF", "TG", "TH", "TJ", "TK", "TL", "TM", "TN", "TO",
    "TR", "TT", "TV", "TW", "TZ", "UA", "UG", "UM", "US", "UY", "UZ", "VA", "VC", "VE", "VG", "VI",
    "VN", "VU", "WF", "WS", "YE", "YT", "ZA", "ZM", "ZW",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn us_is_listed() {
        assert!(COUNTRY_CODES.binary_search(&CountryCode::us().as_str()).is_ok());
    }

    #[test]
    fn known_countries_parse() {
        for code in ["US", "DE", "AT", "FR", "GB", "JP"] {
            assert_eq!(code.parse::<CountryCode>().unwrap().as_str(), code);
        }
    }

    #[test]
    fn lowercase_is_normalized() {
        assert_eq!("us".parse::<CountryCode>().unwrap().as_str(), "US");
    }

    #[test]
    fn unknown_countries_rejected() {
        for code in ["XX", "", "USA", "U"] {
            assert!(code.parse::<CountryCode>().is_err(), "{code} accepted");
        }
    }

    #[test]
    fn list_is_sorted() {
        for window in COUNTRY_CODES.windows(2) {
            assert!(window[0] < window[1], "{} >= {}", window[0], window[1]);
        }
    }

    #[test]
    fn serde_uses_plain_string() {
        let code: CountryCode = serde_json::from_str("\"us\"").unwrap();
        assert_eq!(serde_json::to_string(&code).unwrap(), "\"US\"");
        assert!(serde_json::from_str::<CountryCode>("\"ZZ\"").is_err());
    }
}
