use lopdf::{Dictionary, Document, Object};
use quick_xml::Reader;
use quick_xml::events::Event;

use super::ZUGFERD_FILENAME;
use crate::core::InvoiceError;

/// Return the ZUGFeRD invoice XML embedded in a PDF.
///
/// The attachment is the one named by `zf:DocumentFileName` in the XMP
/// metadata, or `ZUGFeRD-invoice.xml` when the metadata names none.
pub fn extract_zugferd_xml(pdf_bytes: &[u8]) -> Result<String, InvoiceError> {
    let doc = load(pdf_bytes)?;
    let filename = declared_filename(&doc).unwrap_or_else(|| ZUGFERD_FILENAME.to_string());
    let bytes = find_attachment(&doc, &filename)?;
    String::from_utf8(bytes)
        .map_err(|e| InvoiceError::Pdf(format!("embedded invoice is not UTF-8: {e}")))
}

/// Return the bytes of the embedded file named `filename`.
///
/// The `/Names /EmbeddedFiles` tree is searched first, then the catalog
/// `/AF` array. Names compare case-insensitively.
pub fn extract_attachment(pdf_bytes: &[u8], filename: &str) -> Result<Vec<u8>, InvoiceError> {
    find_attachment(&load(pdf_bytes)?, filename)
}

fn load(pdf_bytes: &[u8]) -> Result<Document, InvoiceError> {
    Document::load_mem(pdf_bytes).map_err(|e| InvoiceError::Pdf(format!("failed to load PDF: {e}")))
}

fn find_attachment(doc: &Document, filename: &str) -> Result<Vec<u8>, InvoiceError> {
    via_names(doc, filename)
        .or_else(|_| via_af(doc, filename))
        .map_err(|e| InvoiceError::Pdf(format!("attachment '{filename}' not found: {e}")))
}

/// `zf:DocumentFileName` from the catalog's XMP metadata stream.
fn declared_filename(doc: &Document) -> Option<String> {
    let catalog = doc.catalog().ok()?;
    let stream = resolve_obj(doc, catalog.get(b"Metadata").ok()?)
        .ok()?
        .as_stream()
        .ok()?;
    let content = stream
        .decompressed_content()
        .unwrap_or_else(|_| stream.content.clone());
    let xmp = String::from_utf8(content).ok()?;

    let mut reader = Reader::from_str(&xmp);
    let mut inside = false;
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => inside = e.local_name().as_ref() == b"DocumentFileName",
            Ok(Event::Text(t)) if inside => {
                let name = t.unescape().ok()?.trim().to_string();
                return (!name.is_empty()).then_some(name);
            }
            Ok(Event::End(_)) => inside = false,
            Ok(Event::Eof) | Err(_) => return None,
            _ => {}
        }
    }
}

fn via_names(doc: &Document, filename: &str) -> Result<Vec<u8>, String> {
    let catalog = doc.catalog().map_err(|e| e.to_string())?;
    let names_dict = resolve_dict(doc, catalog.get(b"Names").map_err(|e| e.to_string())?)?;
    let ef_dict = resolve_dict(doc, names_dict.get(b"EmbeddedFiles").map_err(|e| e.to_string())?)?;

    let names_array = ef_dict
        .get(b"Names")
        .map_err(|e| e.to_string())?
        .as_array()
        .map_err(|e| e.to_string())?;

    // [name1, filespec1, name2, filespec2, ...]
    for pair in names_array.chunks_exact(2) {
        let name = obj_to_string(&pair[0]).unwrap_or_default();
        if name.eq_ignore_ascii_case(filename) {
            let fs_dict = resolve_dict(doc, &pair[1])?;
            return stream_from_filespec(doc, fs_dict);
        }
    }

    Err("no match in EmbeddedFiles name tree".to_string())
}

fn via_af(doc: &Document, filename: &str) -> Result<Vec<u8>, String> {
    let catalog = doc.catalog().map_err(|e| e.to_string())?;
    let af_array = catalog
        .get(b"AF")
        .map_err(|e| e.to_string())?
        .as_array()
        .map_err(|e| e.to_string())?;

    for obj in af_array {
        let fs_dict = resolve_dict(doc, obj)?;
        let name = fs_dict
            .get(b"UF")
            .or_else(|_| fs_dict.get(b"F"))
            .ok()
            .and_then(obj_to_string)
            .unwrap_or_default();
        if name.eq_ignore_ascii_case(filename) {
            return stream_from_filespec(doc, fs_dict);
        }
    }

    Err("no match in AF array".to_string())
}

fn stream_from_filespec(doc: &Document, fs_dict: &Dictionary) -> Result<Vec<u8>, String> {
    let ef_dict = resolve_dict(doc, fs_dict.get(b"EF").map_err(|e| e.to_string())?)?;
    let f_obj = ef_dict
        .get(b"UF")
        .or_else(|_| ef_dict.get(b"F"))
        .map_err(|e| e.to_string())?;
    let stream = resolve_obj(doc, f_obj)?
        .as_stream()
        .map_err(|e| e.to_string())?;

    // decompressed_content() fails for streams without /Filter.
    Ok(stream
        .decompressed_content()
        .unwrap_or_else(|_| stream.content.clone()))
}

fn resolve_dict<'a>(doc: &'a Document, obj: &'a Object) -> Result<&'a Dictionary, String> {
    match obj {
        Object::Reference(id) => doc.get_dictionary(*id).map_err(|e| e.to_string()),
        Object::Dictionary(d) => Ok(d),
        _ => Err("expected dictionary or reference".to_string()),
    }
}

fn resolve_obj<'a>(doc: &'a Document, obj: &'a Object) -> Result<&'a Object, String> {
    match obj {
        Object::Reference(id) => doc.get_object(*id).map_err(|e| e.to_string()),
        other => Ok(other),
    }
}

fn obj_to_string(obj: &Object) -> Option<String> {
    match obj {
        Object::String(bytes, _) => String::from_utf8(bytes.clone()).ok(),
        _ => None,
    }
}
