use quick_xml::Reader;
use quick_xml::events::Event;
use rust_decimal::Decimal;
use std::str::FromStr;

use super::xml_utils::parse_date_102;
use crate::core::*;

/// Parse ZUGFeRD 1.0 `CrossIndustryDocument` XML back into an [`Invoice`].
///
/// Element prefixes are ignored; only local names and nesting matter.
/// The document's `GrandTotalAmount`, when present, must equal the sum of
/// the parsed line totals.
///
/// Text is kept verbatim, so values with edge whitespace survive a round
/// trip; whitespace between elements only reaches container ends, where it
/// is ignored.
pub fn from_xml(xml: &str) -> Result<Invoice, InvoiceError> {
    let mut reader = Reader::from_str(xml);

    let mut p = Parsed::default();
    let mut path: Vec<String> = Vec::new();
    let mut text = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                let name = local_name(e.local_name().as_ref());
                p.open(&name);
                path.push(name);
                text.clear();
            }
            Ok(Event::Empty(ref e)) => {
                let name = local_name(e.local_name().as_ref());
                p.open(&name);
                path.push(name);
                p.handle_text(&path, "");
                text.clear();
                p.close(&mut path)?;
            }
            Ok(Event::Text(ref e)) => {
                let t = e
                    .unescape()
                    .map_err(|e| InvoiceError::Xml(format!("bad text content: {e}")))?;
                text.push_str(&t);
            }
            Ok(Event::CData(ref e)) => {
                text.push_str(&String::from_utf8_lossy(e));
            }
            Ok(Event::End(_)) => {
                p.handle_text(&path, &text);
                text.clear();
                p.close(&mut path)?;
            }
            Ok(Event::Eof) => {
                if let Some(open) = path.last() {
                    return Err(InvoiceError::Xml(format!("document ends inside <{open}>")));
                }
                break;
            }
            Err(e) => {
                return Err(InvoiceError::Xml(format!(
                    "malformed XML at byte {}: {e}",
                    reader.buffer_position()
                )));
            }
            _ => {}
        }
    }

    p.into_invoice()
}

fn local_name(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

#[derive(Default)]
struct Parsed {
    root_seen: bool,
    guideline: Option<String>,
    number: Option<String>,
    issue_date: Option<String>,
    currency: Option<String>,
    grand_total: Option<String>,
    seller: Option<Party>,
    buyer: Option<Party>,
    lines: Vec<LineItem>,
    current_party: Option<RawParty>,
    current_line: Option<RawLine>,
}

#[derive(Default)]
struct RawParty {
    id: Option<String>,
    name: Option<String>,
    contact: Option<String>,
    street: Option<String>,
    city: Option<String>,
    postal_code: Option<String>,
    country: Option<String>,
}

#[derive(Default)]
struct RawLine {
    id: Option<String>,
    name: Option<String>,
    price: Option<String>,
    quantity: Option<String>,
    total: Option<String>,
}

impl Parsed {
    fn open(&mut self, name: &str) {
        match name {
            "CrossIndustryDocument" => self.root_seen = true,
            "SellerTradeParty" | "BuyerTradeParty" => {
                self.current_party = Some(RawParty::default())
            }
            "IncludedSupplyChainTradeLineItem" => self.current_line = Some(RawLine::default()),
            _ => {}
        }
    }

    fn close(&mut self, path: &mut Vec<String>) -> Result<(), InvoiceError> {
        let ended = path.pop().unwrap_or_default();
        match ended.as_str() {
            "SellerTradeParty" => {
                if let Some(raw) = self.current_party.take() {
                    self.seller = Some(raw.finish("seller")?);
                }
            }
            "BuyerTradeParty" => {
                if let Some(raw) = self.current_party.take() {
                    self.buyer = Some(raw.finish("buyer")?);
                }
            }
            "IncludedSupplyChainTradeLineItem" => {
                if let Some(raw) = self.current_line.take() {
                    let line = raw.finish(self.lines.len())?;
                    self.lines.push(line);
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_text(&mut self, path: &[String], text: &str) {
        let leaf = path.last().map(|s| s.as_str()).unwrap_or("");
        let parent = if path.len() >= 2 {
            path[path.len() - 2].as_str()
        } else {
            ""
        };
        let value = Some(text.to_string());

        if let Some(line) = self.current_line.as_mut() {
            match (parent, leaf) {
                ("SpecifiedTradeProduct", "SellerAssignedID") => line.id = value,
                ("SpecifiedTradeProduct", "Name") => line.name = value,
                ("NetPriceProductTradePrice", "ChargeAmount") => line.price = value,
                ("SpecifiedSupplyChainTradeDelivery", "BilledQuantity") => line.quantity = value,
                ("SpecifiedTradeSettlementMonetarySummation", "LineTotalAmount") => {
                    line.total = value
                }
                _ => {}
            }
            return;
        }

        if let Some(party) = self.current_party.as_mut() {
            match (parent, leaf) {
                ("SellerTradeParty" | "BuyerTradeParty", "ID") => party.id = value,
                ("SellerTradeParty" | "BuyerTradeParty", "Name") => party.name = value,
                ("DefinedTradeContact", "PersonName") => party.contact = value,
                ("PostalTradeAddress", "PostcodeCode") => party.postal_code = value,
                ("PostalTradeAddress", "LineOne") => party.street = value,
                ("PostalTradeAddress", "CityName") => party.city = value,
                ("PostalTradeAddress", "CountryID") => party.country = value,
                _ => {}
            }
            return;
        }

        match (parent, leaf) {
            ("GuidelineSpecifiedDocumentContextParameter", "ID") => self.guideline = value,
            ("HeaderExchangedDocument", "ID") => self.number = value,
            ("IssueDateTime", "DateTimeString") => self.issue_date = value,
            ("ApplicableSupplyChainTradeSettlement", "InvoiceCurrencyCode") => {
                self.currency = value
            }
            ("SpecifiedTradeSettlementMonetarySummation", "GrandTotalAmount") => {
                self.grand_total = value
            }
            _ => {}
        }
    }

    fn into_invoice(self) -> Result<Invoice, InvoiceError> {
        if !self.root_seen {
            return Err(InvoiceError::Xml(
                "root element CrossIndustryDocument not found".into(),
            ));
        }

        let guideline = required(self.guideline, "GuidelineSpecifiedDocumentContextParameter/ID")?;
        let profile = ProfileLevel::from_urn(guideline.trim()).ok_or_else(|| {
            InvoiceError::Xml(format!("unsupported guideline parameter '{guideline}'"))
        })?;
        let number = required(self.number, "HeaderExchangedDocument/ID")?;
        let issue_date = parse_date_102(&required(self.issue_date, "IssueDateTime")?)?;
        let currency = CurrencyCode::from_str(&required(self.currency, "InvoiceCurrencyCode")?)
            .map_err(|e| InvoiceError::Xml(e.to_string()))?;

        let mut invoice = Invoice::new(number, issue_date, currency);
        invoice.set_profile_level(profile);
        if let Some(seller) = self.seller {
            invoice.set_seller(seller);
        }
        if let Some(buyer) = self.buyer {
            invoice.set_buyer(buyer);
        }
        for line in self.lines {
            invoice.add_line_item(line);
        }

        if let Some(raw) = self.grand_total {
            let declared = decimal(&raw, "GrandTotalAmount")?;
            let computed = invoice.total_amount();
            if declared != computed {
                return Err(InvoiceError::Xml(format!(
                    "GrandTotalAmount {declared} does not match sum of line totals {computed}"
                )));
            }
        }

        Ok(invoice)
    }
}

impl RawParty {
    fn finish(self, role: &str) -> Result<Party, InvoiceError> {
        let name = required(self.name, &format!("{role} Name"))?;
        let country = CountryCode::from_str(&required(self.country, &format!("{role} CountryID"))?)
            .map_err(|e| InvoiceError::Xml(format!("{role}: {e}")))?;

        let mut address = AddressBuilder::new(
            self.city.unwrap_or_default(),
            self.postal_code.unwrap_or_default(),
            country,
        );
        if let Some(street) = self.street {
            address = address.street(street);
        }

        let mut party = PartyBuilder::new(name, address.build());
        if let Some(id) = self.id {
            party = party.id(id);
        }
        if let Some(contact) = self.contact {
            party = party.contact_name(contact);
        }
        Ok(party.build())
    }
}

impl RawLine {
    fn finish(self, index: usize) -> Result<LineItem, InvoiceError> {
        let field = |name: &str| format!("line {} {name}", index + 1);
        Ok(LineItem {
            id: required(self.id, &field("SellerAssignedID"))?,
            name: required(self.name, &field("Name"))?,
            unit_price: decimal(&required(self.price, &field("ChargeAmount"))?, "ChargeAmount")?,
            quantity: decimal(
                &required(self.quantity, &field("BilledQuantity"))?,
                "BilledQuantity",
            )?,
            line_total: decimal(
                &required(self.total, &field("LineTotalAmount"))?,
                "LineTotalAmount",
            )?,
        })
    }
}

fn required(value: Option<String>, what: &str) -> Result<String, InvoiceError> {
    value.ok_or_else(|| InvoiceError::Xml(format!("missing {what}")))
}

fn decimal(raw: &str, what: &str) -> Result<Decimal, InvoiceError> {
    Decimal::from_str(raw.trim())
        .map_err(|e| InvoiceError::Xml(format!("{what} '{raw}' is not a decimal: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zugferd::to_xml;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn full_party(name: &str, id: &str) -> Party {
        PartyBuilder::new(
            name,
            AddressBuilder::new("Austin,TX", "78721", "US".parse().unwrap())
                .street("800 Interchange Blvd.")
                .build(),
        )
        .id(id)
        .contact_name("Adventure support")
        .build()
    }

    fn extended_invoice() -> Invoice {
        let mut inv = Invoice::new(
            "2058557939",
            NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            "USD".parse().unwrap(),
        );
        inv.set_profile_level(ProfileLevel::Extended);
        inv.set_seller(full_party("AdventureWorks", "Adventure_123"));
        inv.set_buyer(full_party("Abraham Swearegin", "Abraham_12"));
        inv.add_line_item(LineItem::new("P1", "Mountain Bike", dec!(10.00), dec!(2)));
        inv.add_line_item(LineItem::new("P2", "Helmet & Gloves", dec!(5.00), dec!(1)));
        inv
    }

    #[test]
    fn round_trip_preserves_everything() {
        let inv = extended_invoice();
        let parsed = from_xml(&to_xml(&inv).unwrap()).unwrap();
        assert_eq!(parsed, inv);
        assert_eq!(parsed.total_amount(), dec!(25.00));
    }

    #[test]
    fn edge_whitespace_in_values_survives() {
        let mut inv = extended_invoice();
        inv.lines[0].name = "Bike ".into();
        inv.lines[1].id = " P2".into();
        inv.seller.as_mut().unwrap().legal_name = "  AdventureWorks ".into();
        let parsed = from_xml(&to_xml(&inv).unwrap()).unwrap();
        assert_eq!(parsed.lines[0].name, "Bike ");
        assert_eq!(parsed, inv);
    }

    #[test]
    fn unclosed_document_is_rejected() {
        let xml = to_xml(&extended_invoice()).unwrap();
        let cut = &xml[..xml.rfind("</rsm:SpecifiedSupplyChainTradeTransaction>").unwrap()];
        assert!(matches!(from_xml(cut), Err(InvoiceError::Xml(_))));
    }

    #[test]
    fn grand_total_mismatch_is_rejected() {
        let xml = to_xml(&extended_invoice())
            .unwrap()
            .replace(">25.00</ram:GrandTotalAmount>", ">26.00</ram:GrandTotalAmount>");
        let err = from_xml(&xml).unwrap_err();
        assert!(err.to_string().contains("GrandTotalAmount"), "{err}");
    }

    #[test]
    fn unknown_guideline_is_rejected() {
        let xml = to_xml(&extended_invoice())
            .unwrap()
            .replace(ProfileLevel::Extended.urn(), "urn:cen.eu:en16931:2017");
        assert!(matches!(from_xml(&xml), Err(InvoiceError::Xml(_))));
    }

    #[test]
    fn wrong_root_is_rejected() {
        assert!(matches!(
            from_xml("<Invoice><ID>1</ID></Invoice>"),
            Err(InvoiceError::Xml(_))
        ));
    }
}
