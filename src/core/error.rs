use std::path::PathBuf;

use thiserror::Error;

use super::profile::ProfileLevel;

/// Errors that abort an invoice-generation run.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum InvoiceError {
    /// The line-item resource does not exist.
    #[error("resource not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The line-item resource exists but could not be read.
    #[error("read error: {0}")]
    Read(String),

    /// A line-item record is malformed (missing field, non-numeric value, bad XML).
    #[error("parse error: {0}")]
    Parse(String),

    /// The invoice lacks a field its profile tier requires.
    #[error("schema mapping failed: {0}")]
    SchemaMapping(String),

    /// The output file could not be created or replaced.
    #[error("write error: {0}")]
    Write(String),

    /// XML generation or parsing error in the structured export.
    #[error("XML error: {0}")]
    Xml(String),

    /// PDF composition, embedding or extraction error.
    #[error("PDF error: {0}")]
    Pdf(String),

    /// Invalid configuration value (unknown code, bad profile name, unreadable config).
    #[error("configuration error: {0}")]
    Config(String),
}

/// A single export violation with field path and message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dot-separated path to the offending field (e.g. "buyer.address.street").
    pub field: String,
    /// Human-readable error description.
    pub message: String,
    /// Lowest profile tier that requires the field, if tier-specific.
    pub profile: Option<ProfileLevel>,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(profile) = &self.profile {
            write!(f, "[{}] {}: {}", profile.conformance_level(), self.field, self.message)
        } else {
            write!(f, "{}: {}", self.field, self.message)
        }
    }
}

impl ValidationError {
    /// Create a violation that applies to every profile tier.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            profile: None,
        }
    }

    /// Create a violation introduced by a specific profile tier.
    pub fn for_profile(
        field: impl Into<String>,
        message: impl Into<String>,
        profile: ProfileLevel,
    ) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            profile: Some(profile),
        }
    }
}

impl InvoiceError {
    /// Collapse a list of violations into one `SchemaMapping` error.
    pub fn schema_mapping(errors: &[ValidationError]) -> Self {
        let msg = errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        Self::SchemaMapping(msg)
    }
}
