use rust_decimal::Decimal;

use super::ns;
use super::xml_utils::{XmlWriter, format_decimal};
use crate::core::*;

/// Document name written to `HeaderExchangedDocument/Name`.
pub const DOCUMENT_NAME: &str = "RECHNUNG";
/// UNTDID 1001 code for a commercial invoice.
pub const INVOICE_TYPE_CODE: &str = "380";
/// UNECE Rec 20 unit code for "one" (piece).
pub const UNIT_CODE_PIECE: &str = "C62";

/// Serialize the invoice to ZUGFeRD XML bytes (UTF-8).
pub fn serialize(invoice: &Invoice) -> Result<Vec<u8>, InvoiceError> {
    to_xml(invoice).map(String::into_bytes)
}

/// Generate ZUGFeRD 1.0 `CrossIndustryDocument` XML for the invoice's profile.
///
/// Fails with [`InvoiceError::SchemaMapping`] when a field required by the
/// declared profile tier is unset; nothing is written in that case.
pub fn to_xml(invoice: &Invoice) -> Result<String, InvoiceError> {
    let errors = validate_for_export(invoice);
    if !errors.is_empty() {
        return Err(InvoiceError::schema_mapping(&errors));
    }
    // Both are guaranteed by validation.
    let (Some(seller), Some(buyer)) = (&invoice.seller, &invoice.buyer) else {
        return Err(InvoiceError::SchemaMapping("buyer and seller are required".into()));
    };

    let currency = invoice.currency.as_str();
    let total = invoice.total_amount();
    let mut w = XmlWriter::new()?;

    w.start_element_with_attrs(
        "rsm:CrossIndustryDocument",
        &[
            ("xmlns:rsm", ns::RSM),
            ("xmlns:ram", ns::RAM),
            ("xmlns:udt", ns::UDT),
        ],
    )?;

    // --- SpecifiedExchangedDocumentContext ---
    w.start_element("rsm:SpecifiedExchangedDocumentContext")?;
    w.start_element("ram:GuidelineSpecifiedDocumentContextParameter")?;
    w.text_element("ram:ID", invoice.profile.urn())?;
    w.end_element("ram:GuidelineSpecifiedDocumentContextParameter")?;
    w.end_element("rsm:SpecifiedExchangedDocumentContext")?;

    // --- HeaderExchangedDocument ---
    w.start_element("rsm:HeaderExchangedDocument")?;
    w.text_element("ram:ID", &invoice.number)?;
    w.text_element("ram:Name", DOCUMENT_NAME)?;
    w.text_element("ram:TypeCode", INVOICE_TYPE_CODE)?;
    w.date_element("ram:IssueDateTime", &invoice.issue_date)?;
    w.end_element("rsm:HeaderExchangedDocument")?;

    // --- SpecifiedSupplyChainTradeTransaction ---
    w.start_element("rsm:SpecifiedSupplyChainTradeTransaction")?;

    w.start_element("ram:ApplicableSupplyChainTradeAgreement")?;
    write_party(&mut w, seller, "ram:SellerTradeParty")?;
    write_party(&mut w, buyer, "ram:BuyerTradeParty")?;
    w.end_element("ram:ApplicableSupplyChainTradeAgreement")?;

    w.start_element("ram:ApplicableSupplyChainTradeDelivery")?;
    w.end_element("ram:ApplicableSupplyChainTradeDelivery")?;

    w.start_element("ram:ApplicableSupplyChainTradeSettlement")?;
    w.text_element("ram:InvoiceCurrencyCode", currency)?;
    w.start_element("ram:SpecifiedTradeSettlementMonetarySummation")?;
    w.amount_element("ram:LineTotalAmount", total, currency)?;
    w.amount_element("ram:ChargeTotalAmount", Decimal::ZERO, currency)?;
    w.amount_element("ram:AllowanceTotalAmount", Decimal::ZERO, currency)?;
    w.amount_element("ram:TaxBasisTotalAmount", total, currency)?;
    w.amount_element("ram:TaxTotalAmount", Decimal::ZERO, currency)?;
    w.amount_element("ram:GrandTotalAmount", total, currency)?;
    w.amount_element("ram:DuePayableAmount", total, currency)?;
    w.end_element("ram:SpecifiedTradeSettlementMonetarySummation")?;
    w.end_element("ram:ApplicableSupplyChainTradeSettlement")?;

    for (i, line) in invoice.lines.iter().enumerate() {
        write_line(&mut w, i + 1, line, currency)?;
    }

    w.end_element("rsm:SpecifiedSupplyChainTradeTransaction")?;
    w.end_element("rsm:CrossIndustryDocument")?;

    let xml = w.into_string()?;
    tracing::debug!(
        number = %invoice.number,
        profile = invoice.profile.conformance_level(),
        lines = invoice.lines.len(),
        bytes = xml.len(),
        "serialized structured invoice"
    );
    Ok(xml)
}

fn write_party(w: &mut XmlWriter, party: &Party, element: &str) -> Result<(), InvoiceError> {
    // Schema order: ID, Name, DefinedTradeContact, PostalTradeAddress.
    w.start_element(element)?;
    w.optional_text_element("ram:ID", party.id.as_deref())?;
    w.text_element("ram:Name", &party.legal_name)?;

    if let Some(contact) = &party.contact_name {
        w.start_element("ram:DefinedTradeContact")?;
        w.text_element("ram:PersonName", contact)?;
        w.end_element("ram:DefinedTradeContact")?;
    }

    w.start_element("ram:PostalTradeAddress")?;
    w.text_element("ram:PostcodeCode", &party.address.postal_code)?;
    w.optional_text_element("ram:LineOne", party.address.street.as_deref())?;
    w.text_element("ram:CityName", &party.address.city)?;
    w.text_element("ram:CountryID", party.address.country.as_str())?;
    w.end_element("ram:PostalTradeAddress")?;

    w.end_element(element)?;
    Ok(())
}

fn write_line(
    w: &mut XmlWriter,
    position: usize,
    line: &LineItem,
    currency: &str,
) -> Result<(), InvoiceError> {
    w.start_element("ram:IncludedSupplyChainTradeLineItem")?;

    w.start_element("ram:AssociatedDocumentLineDocument")?;
    w.text_element("ram:LineID", &position.to_string())?;
    w.end_element("ram:AssociatedDocumentLineDocument")?;

    w.start_element("ram:SpecifiedSupplyChainTradeAgreement")?;
    w.start_element("ram:NetPriceProductTradePrice")?;
    w.amount_element("ram:ChargeAmount", line.unit_price, currency)?;
    w.end_element("ram:NetPriceProductTradePrice")?;
    w.end_element("ram:SpecifiedSupplyChainTradeAgreement")?;

    w.start_element("ram:SpecifiedSupplyChainTradeDelivery")?;
    w.text_element_with_attrs(
        "ram:BilledQuantity",
        &format_decimal(line.quantity),
        &[("unitCode", UNIT_CODE_PIECE)],
    )?;
    w.end_element("ram:SpecifiedSupplyChainTradeDelivery")?;

    w.start_element("ram:SpecifiedSupplyChainTradeSettlement")?;
    w.start_element("ram:SpecifiedTradeSettlementMonetarySummation")?;
    w.amount_element("ram:LineTotalAmount", line.line_total, currency)?;
    w.end_element("ram:SpecifiedTradeSettlementMonetarySummation")?;
    w.end_element("ram:SpecifiedSupplyChainTradeSettlement")?;

    w.start_element("ram:SpecifiedTradeProduct")?;
    w.text_element("ram:SellerAssignedID", &line.id)?;
    w.text_element("ram:Name", &line.name)?;
    w.end_element("ram:SpecifiedTradeProduct")?;

    w.end_element("ram:IncludedSupplyChainTradeLineItem")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn party(name: &str) -> Party {
        PartyBuilder::new(name, AddressBuilder::new("Austin", "78721", "US".parse().unwrap()).build())
            .build()
    }

    fn invoice() -> Invoice {
        let mut inv = Invoice::new(
            "2058557939",
            NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            "USD".parse().unwrap(),
        );
        inv.set_seller(party("AdventureWorks"));
        inv.set_buyer(party("Abraham Swearegin"));
        inv.add_line_item(LineItem::new("P1", "Bike", dec!(10.00), dec!(2)));
        inv
    }

    #[test]
    fn header_fields_are_written() {
        let xml = to_xml(&invoice()).unwrap();
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains(ProfileLevel::Basic.urn()));
        assert!(xml.contains("<ram:ID>2058557939</ram:ID>"));
        assert!(xml.contains("<udt:DateTimeString format=\"102\">20240305</udt:DateTimeString>"));
        assert!(xml.contains("<ram:InvoiceCurrencyCode>USD</ram:InvoiceCurrencyCode>"));
        assert!(xml.contains("<ram:GrandTotalAmount currencyID=\"USD\">20.00</ram:GrandTotalAmount>"));
    }

    #[test]
    fn optional_party_fields_are_omitted_when_unset() {
        let xml = to_xml(&invoice()).unwrap();
        assert!(!xml.contains("ram:DefinedTradeContact"));
        assert!(!xml.contains("ram:LineOne"));
    }

    #[test]
    fn missing_seller_is_a_schema_mapping_error() {
        let mut inv = invoice();
        inv.seller = None;
        assert!(matches!(serialize(&inv), Err(InvoiceError::SchemaMapping(_))));
    }

    #[test]
    fn line_positions_are_sequential() {
        let mut inv = invoice();
        inv.add_line_item(LineItem::new("P2", "Helmet", dec!(5), dec!(1)));
        let xml = to_xml(&inv).unwrap();
        assert!(xml.contains("<ram:LineID>1</ram:LineID>"));
        assert!(xml.contains("<ram:LineID>2</ram:LineID>"));
        assert!(xml.contains("<ram:SellerAssignedID>P2</ram:SellerAssignedID>"));
    }
}
