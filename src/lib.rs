//! # zugferd-invoice
//!
//! Hybrid ZUGFeRD 1.0 invoices: a human-readable PDF page with the
//! machine-readable `CrossIndustryDocument` XML embedded as a PDF/A-3
//! associated file.
//!
//! All monetary values use [`rust_decimal::Decimal`], never floating point.
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::NaiveDate;
//! use zugferd_invoice::core::*;
//! use rust_decimal_macros::dec;
//!
//! let address = || AddressBuilder::new("Austin,TX", "78721", CountryCode::us()).build();
//! let mut invoice = Invoice::new(
//!     "2058557939",
//!     NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
//!     CurrencyCode::usd(),
//! );
//! invoice.set_seller(PartyBuilder::new("AdventureWorks", address()).build());
//! invoice.set_buyer(PartyBuilder::new("Abraham Swearegin", address()).build());
//! invoice.add_line_item(LineItem::new("P1", "Mountain Bike", dec!(10.00), dec!(2)));
//! invoice.add_line_item(LineItem::new("P2", "Helmet", dec!(5.00), dec!(1)));
//!
//! assert!(validate_for_export(&invoice).is_empty());
//! assert_eq!(invoice.total_amount(), dec!(25.00));
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` | Invoice model, totals, profile validation |
//! | `source` | Line-item loading from the product-list XML |
//! | `zugferd` | ZUGFeRD XML export and parsing |
//! | `pdf` | Page rendering, PDF/A-3 attachment embed/extract |
//! | `pipeline` | Config-driven end-to-end generation with atomic output |
//! | `cli` | The `zugferd-invoice` binary |
//! | `all` (default) | Everything |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "source")]
pub mod source;

#[cfg(feature = "zugferd")]
pub mod zugferd;

#[cfg(feature = "pdf")]
pub mod render;

#[cfg(feature = "pipeline")]
pub mod pipeline;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;
