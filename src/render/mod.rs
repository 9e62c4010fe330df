//! Human-readable invoice page.
//!
//! [`compose_invoice`] lays the page out against the [`Canvas`] trait;
//! [`LopdfCanvas`] turns the drawing calls into a single-page PDF using
//! the standard Helvetica faces.

mod canvas;
mod compose;
pub mod layout;
mod metrics;

pub use canvas::{Canvas, Font, LopdfCanvas};
pub use compose::{PageLayout, PageStyle, compose_invoice, format_money, render_pdf};
pub use layout::{Point, Rect, Rgb};
