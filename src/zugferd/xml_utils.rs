use std::io::Cursor;

use chrono::NaiveDate;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use rust_decimal::Decimal;

use crate::core::InvoiceError;

/// Indented element writer over an in-memory quick-xml [`Writer`].
///
/// Text and attribute values are escaped by quick-xml.
pub struct XmlWriter {
    writer: Writer<Cursor<Vec<u8>>>,
}

impl XmlWriter {
    /// Start a UTF-8 document with its XML declaration.
    pub fn new() -> Result<Self, InvoiceError> {
        let mut w = Self {
            writer: Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2),
        };
        w.event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        Ok(w)
    }

    pub fn into_string(self) -> Result<String, InvoiceError> {
        String::from_utf8(self.writer.into_inner().into_inner())
            .map_err(|e| InvoiceError::Xml(format!("output is not UTF-8: {e}")))
    }

    fn event(&mut self, event: Event<'_>) -> Result<&mut Self, InvoiceError> {
        self.writer
            .write_event(event)
            .map_err(|e| InvoiceError::Xml(format!("write error: {e}")))?;
        Ok(self)
    }

    pub fn start_element(&mut self, name: &str) -> Result<&mut Self, InvoiceError> {
        self.start_element_with_attrs(name, &[])
    }

    pub fn start_element_with_attrs(
        &mut self,
        name: &str,
        attrs: &[(&str, &str)],
    ) -> Result<&mut Self, InvoiceError> {
        let start = BytesStart::new(name).with_attributes(attrs.iter().copied());
        self.event(Event::Start(start))
    }

    pub fn end_element(&mut self, name: &str) -> Result<&mut Self, InvoiceError> {
        self.event(Event::End(BytesEnd::new(name)))
    }

    pub fn text_element(&mut self, name: &str, text: &str) -> Result<&mut Self, InvoiceError> {
        self.text_element_with_attrs(name, text, &[])
    }

    pub fn text_element_with_attrs(
        &mut self,
        name: &str,
        text: &str,
        attrs: &[(&str, &str)],
    ) -> Result<&mut Self, InvoiceError> {
        self.start_element_with_attrs(name, attrs)?;
        self.event(Event::Text(BytesText::new(text)))?;
        self.end_element(name)
    }

    /// Write a decimal amount carrying a `currencyID` attribute.
    pub fn amount_element(
        &mut self,
        name: &str,
        amount: Decimal,
        currency: &str,
    ) -> Result<&mut Self, InvoiceError> {
        self.text_element_with_attrs(name, &format_decimal(amount), &[("currencyID", currency)])
    }

    /// Write `name` only when `text` is present.
    pub fn optional_text_element(
        &mut self,
        name: &str,
        text: Option<&str>,
    ) -> Result<&mut Self, InvoiceError> {
        match text {
            Some(text) => self.text_element(name, text),
            None => Ok(self),
        }
    }

    /// Write a date wrapper holding `udt:DateTimeString` in format 102 (`YYYYMMDD`).
    pub fn date_element(&mut self, name: &str, date: &NaiveDate) -> Result<&mut Self, InvoiceError> {
        self.start_element(name)?;
        self.text_element_with_attrs(
            "udt:DateTimeString",
            &format_date_102(date),
            &[("format", DATE_FORMAT_102)],
        )?;
        self.end_element(name)
    }
}

/// UN/EDIFACT 2379 date format qualifier for `CCYYMMDD`.
pub const DATE_FORMAT_102: &str = "102";

pub fn format_date_102(date: &NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

pub fn parse_date_102(s: &str) -> Result<NaiveDate, InvoiceError> {
    NaiveDate::parse_from_str(s.trim(), "%Y%m%d")
        .map_err(|e| InvoiceError::Xml(format!("invalid format-102 date '{s}': {e}")))
}

/// Render a Decimal for the schema: at least two fraction digits, trailing
/// zeros beyond that stripped.
pub fn format_decimal(d: Decimal) -> String {
    let mut d = d.normalize();
    if d.scale() < 2 {
        d.rescale(2);
    }
    d.to_string()
}
