//! Line-item source: reads purchased items from an XML product list.
//!
//! The document root may carry any name. Each `ProductDetails` child is one
//! record with the leaf fields `Productid`, `Product`, `Price`, `Quantity`
//! and `Total`:
//!
//! ```xml
//! <ProductList>
//!   <ProductDetails>
//!     <Productid>P1</Productid>
//!     <Product>Mountain Bike</Product>
//!     <Price>10.00</Price>
//!     <Quantity>2</Quantity>
//!     <Total>20.00</Total>
//!   </ProductDetails>
//! </ProductList>
//! ```

use std::io::ErrorKind;
use std::path::Path;
use std::str::FromStr;

use quick_xml::Reader;
use quick_xml::events::Event;
use rust_decimal::Decimal;

use crate::core::totals::{TotalPolicy, parse_line_total};
use crate::core::{InvoiceError, LineItem};

/// Element name of one item record.
pub const RECORD_ELEMENT: &str = "ProductDetails";

/// Read and parse the product list at `path`.
///
/// The file is read completely and closed before parsing starts.
pub fn load_line_items(
    path: impl AsRef<Path>,
    policy: TotalPolicy,
) -> Result<Vec<LineItem>, InvoiceError> {
    let path = path.as_ref();
    let xml = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => InvoiceError::NotFound(path.to_path_buf()),
        _ => InvoiceError::Read(format!("{}: {e}", path.display())),
    })?;

    let items = parse_line_items(&xml, policy)?;
    tracing::debug!(path = %path.display(), count = items.len(), "loaded line items");
    Ok(items)
}

/// Parse a product list held in memory.
///
/// A field that occurs twice in one record keeps its first value. A document
/// that ends inside an open element is rejected.
pub fn parse_line_items(xml: &str, policy: TotalPolicy) -> Result<Vec<LineItem>, InvoiceError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut items = Vec::new();
    let mut current: Option<RawRecord> = None;
    let mut path: Vec<String> = Vec::new();
    let mut saw_root = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                let name = element_name(e.local_name().as_ref());
                saw_root = true;
                // Records are direct children of the root element.
                if path.len() == 1 && name == RECORD_ELEMENT {
                    current = Some(RawRecord::default());
                } else if path.len() == 2 {
                    if let Some(record) = current.as_mut() {
                        record.open(&name);
                    }
                }
                path.push(name);
            }
            Ok(Event::Empty(ref e)) => {
                let name = element_name(e.local_name().as_ref());
                saw_root = true;
                if path.len() == 1 && name == RECORD_ELEMENT {
                    items.push(finish_record(Some(RawRecord::default()), items.len(), policy)?);
                } else if path.len() == 2 {
                    // `<Total/>` is present but empty.
                    if let Some(record) = current.as_mut() {
                        record.open(&name);
                        record.close();
                    }
                }
            }
            Ok(Event::Text(ref e)) => {
                if path.len() == 3 {
                    if let Some(record) = current.as_mut() {
                        let text = e
                            .unescape()
                            .map_err(|e| InvoiceError::Parse(format!("bad text content: {e}")))?;
                        record.push_text(&text);
                    }
                }
            }
            Ok(Event::CData(ref e)) => {
                if path.len() == 3 {
                    if let Some(record) = current.as_mut() {
                        record.push_text(&String::from_utf8_lossy(e));
                    }
                }
            }
            Ok(Event::End(_)) => {
                let ended = path.pop().unwrap_or_default();
                match path.len() {
                    1 if ended == RECORD_ELEMENT => {
                        items.push(finish_record(current.take(), items.len(), policy)?);
                    }
                    2 => {
                        if let Some(record) = current.as_mut() {
                            record.close();
                        }
                    }
                    _ => {}
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(InvoiceError::Parse(format!(
                    "malformed product list at byte {}: {e}",
                    reader.buffer_position()
                )));
            }
            _ => {}
        }
    }

    if !saw_root {
        return Err(InvoiceError::Parse("product list is empty".into()));
    }
    if !path.is_empty() {
        return Err(InvoiceError::Parse(format!(
            "product list ends inside <{}> (record {})",
            path.join("/"),
            items.len()
        )));
    }

    Ok(items)
}

fn element_name(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

#[derive(Debug, Clone, Copy)]
enum Field {
    Id,
    Name,
    Price,
    Quantity,
    Total,
}

impl Field {
    fn from_element(name: &str) -> Option<Self> {
        match name {
            "Productid" => Some(Self::Id),
            "Product" => Some(Self::Name),
            "Price" => Some(Self::Price),
            "Quantity" => Some(Self::Quantity),
            "Total" => Some(Self::Total),
            _ => None,
        }
    }
}

#[derive(Default)]
struct RawRecord {
    id: Option<String>,
    name: Option<String>,
    price: Option<String>,
    quantity: Option<String>,
    total: Option<String>,
    /// Field whose element is open and still collecting text.
    active: Option<Field>,
}

impl RawRecord {
    fn slot(&mut self, field: Field) -> &mut Option<String> {
        match field {
            Field::Id => &mut self.id,
            Field::Name => &mut self.name,
            Field::Price => &mut self.price,
            Field::Quantity => &mut self.quantity,
            Field::Total => &mut self.total,
        }
    }

    /// Start collecting `element`; repeats of an already seen field are skipped.
    fn open(&mut self, element: &str) {
        self.active = None;
        let Some(field) = Field::from_element(element) else {
            return;
        };
        let slot = self.slot(field);
        if slot.is_none() {
            *slot = Some(String::new());
            self.active = Some(field);
        }
    }

    fn push_text(&mut self, text: &str) {
        if let Some(field) = self.active {
            if let Some(value) = self.slot(field) {
                value.push_str(text);
            }
        }
    }

    fn close(&mut self) {
        self.active = None;
    }
}

fn finish_record(
    record: Option<RawRecord>,
    index: usize,
    policy: TotalPolicy,
) -> Result<LineItem, InvoiceError> {
    let record = record.unwrap_or_default();
    let required = |value: Option<String>, field: &str| {
        value.ok_or_else(|| {
            InvoiceError::Parse(format!("record {index}: required field <{field}> is missing"))
        })
    };
    let numeric = |value: String, field: &str| {
        Decimal::from_str(value.trim()).map_err(|e| {
            InvoiceError::Parse(format!(
                "record {index}: <{field}> value '{value}' is not numeric: {e}"
            ))
        })
    };

    let id = required(record.id, "Productid")?;
    let name = required(record.name, "Product")?;
    let unit_price = numeric(required(record.price, "Price")?, "Price")?;
    let quantity = numeric(required(record.quantity, "Quantity")?, "Quantity")?;
    let raw_total = required(record.total, "Total")?;
    let line_total = parse_line_total(&raw_total, policy).map_err(|e| match e {
        InvoiceError::Parse(msg) => InvoiceError::Parse(format!("record {index}: {msg}")),
        other => other,
    })?;

    Ok(LineItem {
        id,
        name,
        unit_price,
        quantity,
        line_total,
    })
}
