use rust_decimal::Decimal;

use super::error::ValidationError;
use super::profile::ProfileLevel;
use super::totals;
use super::types::*;

/// Check an invoice against the mandatory field set of its profile tier.
/// Returns all violations found (not just the first).
pub fn validate_for_export(invoice: &Invoice) -> Vec<ValidationError> {
    validate_for_profile(invoice, invoice.profile)
}

/// Check an invoice against the mandatory field set of `profile`,
/// regardless of the tier the invoice declares.
pub fn validate_for_profile(invoice: &Invoice, profile: ProfileLevel) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if invoice.number.trim().is_empty() {
        errors.push(ValidationError::new("number", "invoice number must not be empty"));
    }

    match &invoice.seller {
        Some(party) => validate_party(party, "seller", profile, &mut errors),
        None => errors.push(ValidationError::new("seller", "seller is required")),
    }
    match &invoice.buyer {
        Some(party) => validate_party(party, "buyer", profile, &mut errors),
        None => errors.push(ValidationError::new("buyer", "buyer is required")),
    }

    if invoice.lines.is_empty() {
        errors.push(ValidationError::new("lines", "at least one line item is required"));
    }
    for (i, line) in invoice.lines.iter().enumerate() {
        let prefix = format!("lines[{i}]");
        if line.id.trim().is_empty() {
            errors.push(ValidationError::new(
                format!("{prefix}.id"),
                "line identifier must not be empty",
            ));
        }
        if line.name.trim().is_empty() {
            errors.push(ValidationError::new(
                format!("{prefix}.name"),
                "product name must not be empty",
            ));
        }
    }

    if profile >= ProfileLevel::Comfort {
        for (i, line) in totals::line_total_mismatches(&invoice.lines) {
            errors.push(ValidationError::for_profile(
                format!("lines[{i}].line_total"),
                format!(
                    "line total {} does not equal unit price x quantity ({})",
                    line.line_total,
                    line.expected_total()
                ),
                ProfileLevel::Comfort,
            ));
        }
    }

    if invoice.total_amount() < Decimal::ZERO {
        errors.push(ValidationError::new(
            "total_amount",
            "invoice total must not be negative",
        ));
    }

    errors
}

fn validate_party(
    party: &Party,
    prefix: &str,
    profile: ProfileLevel,
    errors: &mut Vec<ValidationError>,
) {
    if party.legal_name.trim().is_empty() {
        errors.push(ValidationError::new(
            format!("{prefix}.legal_name"),
            "name must not be empty",
        ));
    }

    if profile >= ProfileLevel::Comfort {
        if is_blank(party.address.street.as_deref()) {
            errors.push(ValidationError::for_profile(
                format!("{prefix}.address.street"),
                "street is required",
                ProfileLevel::Comfort,
            ));
        }
        if party.address.city.trim().is_empty() {
            errors.push(ValidationError::for_profile(
                format!("{prefix}.address.city"),
                "city is required",
                ProfileLevel::Comfort,
            ));
        }
        if party.address.postal_code.trim().is_empty() {
            errors.push(ValidationError::for_profile(
                format!("{prefix}.address.postal_code"),
                "postal code is required",
                ProfileLevel::Comfort,
            ));
        }
    }

    if profile >= ProfileLevel::Extended {
        if is_blank(party.id.as_deref()) {
            errors.push(ValidationError::for_profile(
                format!("{prefix}.id"),
                "party identifier is required",
                ProfileLevel::Extended,
            ));
        }
        if is_blank(party.contact_name.as_deref()) {
            errors.push(ValidationError::for_profile(
                format!("{prefix}.contact_name"),
                "contact person is required",
                ProfileLevel::Extended,
            ));
        }
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}
