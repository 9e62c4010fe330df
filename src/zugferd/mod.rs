//! ZUGFeRD 1.0 structured invoice: XML export, parsing and PDF/A-3 embedding.
//!
//! The XML is a `rsm:CrossIndustryDocument` for one of the three
//! ZUGFeRD 1.0 profile tiers. With the `pdf` feature the serialized bytes
//! can be attached to a PDF as `ZUGFeRD-invoice.xml` with relationship
//! `/Alternative`, and read back again.
//!
//! # Profiles
//!
//! | Profile | Mandatory on top of the previous tier |
//! |---------|---------------------------------------|
//! | Basic | number, parties with names, line items |
//! | Comfort | full postal addresses, consistent line totals |
//! | Extended | party identifiers and contact persons |

mod export;
mod parse;
pub(crate) mod xml_utils;

#[cfg(feature = "pdf")]
mod embed;
#[cfg(feature = "pdf")]
mod extract;
#[cfg(feature = "pdf")]
mod xmp;

#[cfg(feature = "pdf")]
pub use embed::{Attachment, AttachmentRelationship, embed_attachment, embed_in_pdf};
pub use export::{DOCUMENT_NAME, INVOICE_TYPE_CODE, UNIT_CODE_PIECE, serialize, to_xml};
#[cfg(feature = "pdf")]
pub use extract::{extract_attachment, extract_zugferd_xml};
pub use parse::from_xml;
#[cfg(feature = "pdf")]
pub use xmp::build_xmp;

/// Name of the embedded XML attachment mandated by ZUGFeRD 1.0.
pub const ZUGFERD_FILENAME: &str = "ZUGFeRD-invoice.xml";

/// XML namespaces of the ZUGFeRD 1.0 `CrossIndustryDocument`.
pub mod ns {
    pub const RSM: &str = "urn:ferd:CrossIndustryDocument:invoice:1p0";
    pub const RAM: &str =
        "urn:un:unece:uncefact:data:standard:ReusableAggregateBusinessInformationEntity:12";
    pub const UDT: &str = "urn:un:unece:uncefact:data:standard:UnqualifiedDataType:15";
    /// XMP extension schema namespace for the PDF/A identification block.
    pub const XMP_ZF: &str = "urn:ferd:pdfa:CrossIndustryDocument:invoice:1p0#";
}
