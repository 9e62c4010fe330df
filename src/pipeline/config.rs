use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::*;
use crate::render::PageStyle;
use crate::zugferd::ZUGFERD_FILENAME;

/// Everything one generation run needs.
///
/// Missing keys in a JSON config file fall back to [`Default`], which is the
/// AdventureWorks sample invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Product list to read line items from.
    pub items_path: PathBuf,
    /// Destination PDF. Replaced atomically.
    pub output_path: PathBuf,
    pub invoice_number: String,
    /// Issue date; today when unset.
    pub issue_date: Option<NaiveDate>,
    pub currency: CurrencyCode,
    pub profile: ProfileLevel,
    pub total_policy: TotalPolicy,
    pub buyer: Party,
    pub seller: Party,
    pub attachment: AttachmentConfig,
    /// Printed under the seller address in the page footer.
    pub footer_note: Option<String>,
}

/// Naming of the embedded structured invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttachmentConfig {
    pub filename: String,
    pub description: String,
    pub mime_type: String,
}

impl Default for AttachmentConfig {
    fn default() -> Self {
        Self {
            filename: ZUGFERD_FILENAME.to_string(),
            description: "ZUGFeRD-invoice".to_string(),
            mime_type: "application/xml".to_string(),
        }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            items_path: PathBuf::from("data/InvoiceProductList.xml"),
            output_path: PathBuf::from("ZUGFeRDInvoice.pdf"),
            invoice_number: "2058557939".to_string(),
            issue_date: None,
            currency: CurrencyCode::usd(),
            profile: ProfileLevel::Basic,
            total_policy: TotalPolicy::Tolerant,
            buyer: PartyBuilder::new(
                "Abraham Swearegin",
                AddressBuilder::new("United States, California", "9920", CountryCode::us())
                    .street("9920 BridgePointe Parkway")
                    .build(),
            )
            .id("Abraham_12")
            .contact_name("Swearegin")
            .build(),
            seller: PartyBuilder::new(
                "AdventureWorks",
                AddressBuilder::new("Austin,TX", "78721", CountryCode::us())
                    .street("800 Interchange Blvd")
                    .build(),
            )
            .id("Adventure_123")
            .contact_name("Adventure support")
            .build(),
            attachment: AttachmentConfig::default(),
            footer_note: Some("Any Questions? support@adventure-works.com".to_string()),
        }
    }
}

impl GeneratorConfig {
    /// Read a JSON config file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, InvoiceError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| InvoiceError::Config(format!("cannot read {}: {e}", path.display())))?;
        Self::from_json(&raw)
            .map_err(|e| InvoiceError::Config(format!("{}: {e}", path.display())))
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// The configured date, or today's local date.
    pub fn resolved_issue_date(&self) -> NaiveDate {
        self.issue_date
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }

    /// Page style carrying this config's footer note.
    pub fn page_style(&self) -> PageStyle {
        PageStyle {
            footer_note: self.footer_note.clone(),
            ..PageStyle::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_the_sample_invoice() {
        let config = GeneratorConfig::default();
        assert_eq!(config.invoice_number, "2058557939");
        assert_eq!(config.currency.as_str(), "USD");
        assert_eq!(config.profile, ProfileLevel::Basic);
        assert_eq!(config.seller.legal_name, "AdventureWorks");
        assert_eq!(config.buyer.id.as_deref(), Some("Abraham_12"));
        assert_eq!(config.attachment.filename, "ZUGFeRD-invoice.xml");
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = GeneratorConfig::from_json(
            r#"{ "invoice_number": "INV-7", "profile": "comfort", "total_policy": "strict",
                 "issue_date": "2024-03-05" }"#,
        )
        .unwrap();
        assert_eq!(config.invoice_number, "INV-7");
        assert_eq!(config.profile, ProfileLevel::Comfort);
        assert_eq!(config.total_policy, TotalPolicy::Strict);
        assert_eq!(config.resolved_issue_date(), NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
        assert_eq!(config.seller.legal_name, "AdventureWorks");
    }

    #[test]
    fn unknown_currency_is_rejected() {
        assert!(GeneratorConfig::from_json(r#"{ "currency": "XXX1" }"#).is_err());
    }

    #[test]
    fn unreadable_file_is_a_config_error() {
        assert!(matches!(
            GeneratorConfig::from_json_file("/nonexistent/config.json"),
            Err(InvoiceError::Config(_))
        ));
    }
}
