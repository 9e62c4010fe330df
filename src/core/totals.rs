//! Grand-total derivation and the total-field parse policy.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::InvoiceError;
use super::types::LineItem;

/// How a line-total field that is not a number is treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TotalPolicy {
    /// The line contributes zero and a warning is logged.
    #[default]
    Tolerant,
    /// The whole load fails with a parse error.
    Strict,
}

/// Sum of every line total. Exact decimal arithmetic, so the result does
/// not depend on the order of `items`.
pub fn compute_total(items: &[LineItem]) -> Decimal {
    items.iter().map(|item| item.line_total).sum()
}

/// Parse one line-total field under `policy`.
pub fn parse_line_total(raw: &str, policy: TotalPolicy) -> Result<Decimal, InvoiceError> {
    match Decimal::from_str(raw.trim()) {
        Ok(value) => Ok(value),
        Err(e) => match policy {
            TotalPolicy::Tolerant => {
                tracing::warn!(value = raw, "line total is not numeric, counting it as zero");
                Ok(Decimal::ZERO)
            }
            TotalPolicy::Strict => Err(InvoiceError::Parse(format!(
                "line total '{raw}' is not numeric: {e}"
            ))),
        },
    }
}

/// Lines whose authored total differs from `unit_price * quantity`.
pub fn line_total_mismatches(items: &[LineItem]) -> Vec<(usize, &LineItem)> {
    items
        .iter()
        .enumerate()
        .filter(|(_, item)| item.line_total.round_dp(2) != item.expected_total())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn item(id: &str, price: Decimal, qty: Decimal, total: Decimal) -> LineItem {
        LineItem {
            id: id.into(),
            name: format!("Product {id}"),
            unit_price: price,
            quantity: qty,
            line_total: total,
        }
    }

    #[test]
    fn two_line_scenario_sums_to_25() {
        let items = vec![
            item("P1", dec!(10.00), dec!(2), dec!(20.00)),
            item("P2", dec!(5.00), dec!(1), dec!(5.00)),
        ];
        assert_eq!(compute_total(&items), dec!(25.00));
    }

    #[test]
    fn empty_sums_to_zero() {
        assert_eq!(compute_total(&[]), Decimal::ZERO);
    }

    #[test]
    fn tolerant_policy_maps_garbage_to_zero() {
        assert_eq!(parse_line_total("n/a", TotalPolicy::Tolerant).unwrap(), Decimal::ZERO);
        assert_eq!(parse_line_total(" 12.50 ", TotalPolicy::Tolerant).unwrap(), dec!(12.50));
    }

    #[test]
    fn strict_policy_rejects_garbage() {
        let err = parse_line_total("twelve", TotalPolicy::Strict).unwrap_err();
        assert!(matches!(err, InvoiceError::Parse(_)));
    }

    #[test]
    fn mismatches_are_reported_by_index() {
        let items = vec![
            item("P1", dec!(10.00), dec!(2), dec!(20.00)),
            item("P2", dec!(5.00), dec!(3), dec!(5.00)),
            item("P3", dec!(0.333), dec!(3), dec!(1.00)),
        ];
        let bad = line_total_mismatches(&items);
        assert_eq!(bad.len(), 1);
        assert_eq!(bad[0].0, 1);
    }
}
