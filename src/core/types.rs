use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::countries::CountryCode;
use super::currencies::CurrencyCode;
use super::profile::ProfileLevel;
use super::totals;

/// One invoice: header, trading parties and line items.
///
/// The grand total is derived from the line items on demand and is never
/// stored, so it cannot drift from `lines`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    /// Invoice number.
    pub number: String,
    /// Issue date.
    pub issue_date: NaiveDate,
    /// Invoice currency.
    pub currency: CurrencyCode,
    /// Profile tier the structured export must satisfy.
    pub profile: ProfileLevel,
    /// Buyer (bill-to) party.
    pub buyer: Option<Party>,
    /// Seller party.
    pub seller: Option<Party>,
    /// Purchased items in display order.
    pub lines: Vec<LineItem>,
}

impl Invoice {
    /// Start an invoice with no parties, no lines and the Basic profile.
    pub fn new(number: impl Into<String>, issue_date: NaiveDate, currency: CurrencyCode) -> Self {
        Self {
            number: number.into(),
            issue_date,
            currency,
            profile: ProfileLevel::Basic,
            buyer: None,
            seller: None,
            lines: Vec::new(),
        }
    }

    pub fn add_line_item(&mut self, item: LineItem) {
        self.lines.push(item);
    }

    pub fn set_buyer(&mut self, party: Party) {
        self.buyer = Some(party);
    }

    pub fn set_seller(&mut self, party: Party) {
        self.seller = Some(party);
    }

    pub fn set_profile_level(&mut self, level: ProfileLevel) {
        self.profile = level;
    }

    /// Sum of all line totals.
    pub fn total_amount(&self) -> Decimal {
        totals::compute_total(&self.lines)
    }

    /// Buyer, seller, at least one line and a non-negative total are present.
    ///
    /// This is the tier-independent precondition; profile-specific fields
    /// are checked by [`validate_for_export`](super::validate_for_export).
    pub fn is_exportable(&self) -> bool {
        self.buyer.is_some()
            && self.seller.is_some()
            && !self.lines.is_empty()
            && self.total_amount() >= Decimal::ZERO
    }
}

/// Buyer or seller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Party {
    /// Party identifier (customer/supplier number).
    pub id: Option<String>,
    /// Registered name.
    pub legal_name: String,
    /// Contact person.
    pub contact_name: Option<String>,
    /// Postal address.
    pub address: Address,
}

/// Postal address of a party.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Street and house number.
    pub street: Option<String>,
    pub city: String,
    pub postal_code: String,
    pub country: CountryCode,
}

/// One purchased product or service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Product identifier.
    pub id: String,
    /// Product name.
    pub name: String,
    /// Net price per unit.
    pub unit_price: Decimal,
    /// Billed quantity.
    pub quantity: Decimal,
    /// Line total as authored in the source data.
    pub line_total: Decimal,
}

impl LineItem {
    /// Build a line whose total is `unit_price * quantity`.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        unit_price: Decimal,
        quantity: Decimal,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            unit_price,
            quantity,
            line_total: unit_price * quantity,
        }
    }

    /// `unit_price * quantity` rounded to two fraction digits.
    pub fn expected_total(&self) -> Decimal {
        (self.unit_price * self.quantity).round_dp(2)
    }
}
