use chrono::{DateTime, Utc};
use lopdf::{Dictionary, Document, Object, Stream, dictionary};

use super::{ZUGFERD_FILENAME, xmp};
use crate::core::{InvoiceError, ProfileLevel};

/// PDF/A-3 `/AFRelationship` of an associated file to the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AttachmentRelationship {
    Source,
    Data,
    /// Alternative representation of the page content (ZUGFeRD invoice XML).
    #[default]
    Alternative,
    Supplement,
    Unspecified,
}

impl AttachmentRelationship {
    /// PDF name value, without the leading slash.
    pub fn as_pdf_name(&self) -> &'static str {
        match self {
            Self::Source => "Source",
            Self::Data => "Data",
            Self::Alternative => "Alternative",
            Self::Supplement => "Supplement",
            Self::Unspecified => "Unspecified",
        }
    }
}

/// A file to associate with a PDF document.
#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    pub filename: String,
    pub mime_type: String,
    pub relationship: AttachmentRelationship,
    pub description: String,
    pub modification_date: DateTime<Utc>,
    pub data: Vec<u8>,
}

impl Attachment {
    /// The ZUGFeRD invoice attachment: `ZUGFeRD-invoice.xml`,
    /// `application/xml`, relationship Alternative, stamped now.
    pub fn zugferd(xml: Vec<u8>) -> Self {
        Self {
            filename: ZUGFERD_FILENAME.to_string(),
            mime_type: "application/xml".to_string(),
            relationship: AttachmentRelationship::Alternative,
            description: "ZUGFeRD-invoice".to_string(),
            modification_date: Utc::now(),
            data: xml,
        }
    }

    pub fn with_modification_date(mut self, date: DateTime<Utc>) -> Self {
        self.modification_date = date;
        self
    }
}

/// Embed `attachment` into serialized PDF bytes and return the new bytes.
pub fn embed_in_pdf(
    pdf_bytes: &[u8],
    attachment: &Attachment,
    profile: ProfileLevel,
) -> Result<Vec<u8>, InvoiceError> {
    let mut doc = Document::load_mem(pdf_bytes)
        .map_err(|e| InvoiceError::Pdf(format!("failed to load PDF: {e}")))?;

    embed_attachment(&mut doc, attachment, profile)?;

    let mut output = Vec::new();
    doc.save_to(&mut output)
        .map_err(|e| InvoiceError::Pdf(format!("failed to save PDF: {e}")))?;
    Ok(output)
}

/// Attach `attachment` to `doc` as a PDF/A-3 associated file and mark the
/// document with the XMP identification for `profile`.
///
/// Existing catalog entries `/AF`, `/Names`, `/Metadata` are replaced.
pub fn embed_attachment(
    doc: &mut Document,
    attachment: &Attachment,
    profile: ProfileLevel,
) -> Result<(), InvoiceError> {
    if attachment.filename.is_empty() {
        return Err(InvoiceError::Pdf("attachment filename must not be empty".into()));
    }
    let mod_date = pdf_date(&attachment.modification_date);

    // 1. EmbeddedFile stream
    let ef_stream = Stream::new(
        dictionary! {
            "Type" => "EmbeddedFile",
            // Written as `/application#2Fxml`; lopdf escapes the slash.
            "Subtype" => Object::Name(attachment.mime_type.as_bytes().to_vec()),
            "Params" => dictionary! {
                "Size" => Object::Integer(attachment.data.len() as i64),
                "ModDate" => Object::string_literal(mod_date),
            },
        },
        attachment.data.clone(),
    );
    let ef_stream_id = doc.add_object(ef_stream);

    // 2. FileSpec
    let filespec = dictionary! {
        "Type" => "Filespec",
        "F" => Object::string_literal(attachment.filename.as_str()),
        "UF" => Object::string_literal(attachment.filename.as_str()),
        "Desc" => Object::string_literal(attachment.description.as_str()),
        "AFRelationship" => Object::Name(attachment.relationship.as_pdf_name().as_bytes().to_vec()),
        "EF" => dictionary! {
            "F" => Object::Reference(ef_stream_id),
            "UF" => Object::Reference(ef_stream_id),
        },
    };
    let filespec_id = doc.add_object(filespec);

    // 3. EmbeddedFiles name tree under /Names
    let ef_name_tree_id = doc.add_object(dictionary! {
        "Names" => Object::Array(vec![
            Object::string_literal(attachment.filename.as_str()),
            Object::Reference(filespec_id),
        ]),
    });
    let names_id = doc.add_object(dictionary! {
        "EmbeddedFiles" => Object::Reference(ef_name_tree_id),
    });

    // 4. XMP metadata, uncompressed for PDF/A
    let title = document_title(doc).unwrap_or_else(|| attachment.description.clone());
    let metadata_stream = Stream::new(
        dictionary! {
            "Type" => "Metadata",
            "Subtype" => "XML",
        },
        xmp::build_xmp(profile, &title, &attachment.filename).into_bytes(),
    )
    .with_compression(false);
    let metadata_id = doc.add_object(metadata_stream);

    // 5. Catalog
    let catalog = doc
        .catalog_mut()
        .map_err(|e| InvoiceError::Pdf(format!("failed to get catalog: {e}")))?;
    catalog.set("AF", Object::Array(vec![Object::Reference(filespec_id)]));
    catalog.set("Names", Object::Reference(names_id));
    catalog.set("Metadata", Object::Reference(metadata_id));
    catalog.set("MarkInfo", dictionary! { "Marked" => Object::Boolean(true) });

    tracing::debug!(
        filename = %attachment.filename,
        size = attachment.data.len(),
        relationship = attachment.relationship.as_pdf_name(),
        profile = profile.conformance_level(),
        "embedded attachment"
    );
    Ok(())
}

/// PDF date string `D:YYYYMMDDHHmmSS+00'00'`.
fn pdf_date(date: &DateTime<Utc>) -> String {
    date.format("D:%Y%m%d%H%M%S+00'00'").to_string()
}

fn document_title(doc: &Document) -> Option<String> {
    let info_ref = doc.trailer.get(b"Info").ok()?.as_reference().ok()?;
    let info: &Dictionary = doc.get_dictionary(info_ref).ok()?;
    match info.get(b"Title").ok()? {
        Object::String(bytes, _) => String::from_utf8(bytes.clone()).ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn zugferd_defaults() {
        let a = Attachment::zugferd(b"<x/>".to_vec());
        assert_eq!(a.filename, "ZUGFeRD-invoice.xml");
        assert_eq!(a.description, "ZUGFeRD-invoice");
        assert_eq!(a.mime_type, "application/xml");
        assert_eq!(a.relationship, AttachmentRelationship::Alternative);
    }

    #[test]
    fn pdf_date_format() {
        let d = Utc.with_ymd_and_hms(2024, 3, 5, 14, 7, 9).unwrap();
        assert_eq!(pdf_date(&d), "D:20240305140709+00'00'");
    }
}
