//! Invoice model, total calculation and export validation.
//!
//! Monetary values are [`rust_decimal::Decimal`]; the grand total is always
//! derived from the line items.

mod builder;
mod countries;
mod currencies;
mod error;
mod profile;
pub mod totals;
mod types;
mod validation;

pub use builder::*;
pub use countries::CountryCode;
pub use currencies::CurrencyCode;
pub use error::*;
pub use profile::ProfileLevel;
pub use totals::{TotalPolicy, compute_total};
pub use types::*;
pub use validation::*;
