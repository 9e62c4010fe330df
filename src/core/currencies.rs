//! ISO 4217 currency codes for the invoice currency.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::InvoiceError;

/// A validated ISO 4217 currency code (e.g. "USD", "EUR").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// US dollar.
    pub fn usd() -> Self {
        Self("USD".to_string())
    }

    /// Euro.
    pub fn eur() -> Self {
        Self("EUR".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Symbol used in front of amounts on the rendered page, if the
    /// currency has one that the standard PDF fonts can show.
    pub fn symbol(&self) -> Option<&'static str> {
        match self.0.as_str() {
            "USD" | "AUD" | "CAD" | "NZD" | "SGD" | "HKD" => Some("$"),
            "GBP" => Some("\u{a3}"),
            "JPY" | "CNY" => Some("\u{a5}"),
            _ => None,
        }
    }
}

impl FromStr for CurrencyCode {
    type Err = InvoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_uppercase();
        if CURRENCY_CODES.binary_search(&code.as_str()).is_ok() {
            Ok(Self(code))
        } else {
            Err(InvoiceError::Config(format!("'{s}' is not a known ISO 4217 currency code")))
        }
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = InvoiceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.0
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Sorted list of common ISO 4217 currency codes.
/// Sorted for binary search.
static CURRENCY_CODES: &[&str] = &[
    "AED", // UAE Dirham
    "AMD", // Armenian Dram
    "AUD", // Australian Dollar
    "BGN", // Bulgarian Lev
    "BRL", // Brazilian Real
    "CAD", // Canadian Dollar
    "CHF", // Swiss Franc
    "CNY", // Chinese Yuan
    "CZK", // Czech Koruna
    "DKK", // Danish Krone
    "EGP", // Egyptian Pound
    "EUR", // Euro
    "GBP", // Pound Sterling
    "GEL", // Georgian Lari
    "HKD", // Hong Kong Dollar
    "HRK", // Croatian Kuna
    "HUF", // Hungarian Forint
    "IDR", // Indonesian Rupiah
    "ILS", // Israeli Shekel
    "INR", // Indian Rupee
    "ISK", // Icelandic Krona
    "JPY", // Japanese Yen
    "KES", // Kenyan Shilling
    "KRW", // South Korean Won
    "KZT", // Kazakhstani Tenge
    "MXN", // Mexican Peso
    "MYR", // Malaysian Ringgit
    "NGN", // Nigerian Naira
    "NOK", // Norwegian Krone
    "NZD", // New Zealand Dollar
    "PHP", // Philippine Peso
    "PLN", // Polish Zloty
    "RON", // Romanian Leu
    "RUB", // Russian Ruble
    "SAR", // Saudi Riyal
    "SEK", // Swedish Krona
    "SGD", // Singapore Dollar
    "THB", // Thai Baht
    "TRY", // Turkish Lira
    "TWD", // New Taiwan Dollar
    "UAH", // Ukrainian Hryvnia
    "USD", // US Dollar
    "VND", // Vietnamese Dong
    "ZAR", // South African Rand
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_currencies() {
        for code in ["USD", "EUR", "GBP", "CHF", "JPY"] {
            assert_eq!(code.parse::<CurrencyCode>().unwrap().as_str(), code);
        }
        assert_eq!("usd".parse::<CurrencyCode>().unwrap().as_str(), "USD");
    }

    #[test]
    fn unknown_currencies() {
        for code in ["XYZ", "", "EURO"] {
            assert!(code.parse::<CurrencyCode>().is_err(), "{code} accepted");
        }
    }

    #[test]
    fn symbols() {
        assert_eq!("USD".parse::<CurrencyCode>().unwrap().symbol(), Some("$"));
        assert_eq!("EUR".parse::<CurrencyCode>().unwrap().symbol(), None);
    }

    #[test]
    fn named_constructors_are_listed() {
        for code in [CurrencyCode::usd(), CurrencyCode::eur()] {
            assert!(CURRENCY_CODES.binary_search(&code.as_str()).is_ok());
        }
    }

    #[test]
    fn list_is_sorted() {
        for window in CURRENCY_CODES.windows(2) {
            assert!(window[0] < window[1], "{} >= {}", window[0], window[1]);
        }
    }
}
