#![cfg(feature = "zugferd")]

use chrono::NaiveDate;
use rust_decimal_macros::dec;
use zugferd_invoice::core::*;
use zugferd_invoice::zugferd;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn bare_party(name: &str) -> Party {
    PartyBuilder::new(
        name,
        AddressBuilder::new("Austin,TX", "78721", CountryCode::us()).build(),
    )
    .build()
}

fn full_party(name: &str, id: &str, contact: &str) -> Party {
    PartyBuilder::new(
        name,
        AddressBuilder::new("Austin,TX", "78721", CountryCode::us())
            .street("800 Interchange Blvd")
            .build(),
    )
    .id(id)
    .contact_name(contact)
    .build()
}

fn scenario(seller: Party, buyer: Party) -> Invoice {
    let mut inv = Invoice::new("2058557939", date(2024, 3, 5), CurrencyCode::usd());
    inv.set_seller(seller);
    inv.set_buyer(buyer);
    inv.add_line_item(LineItem::new("P1", "Mountain Bike", dec!(10.00), dec!(2)));
    inv.add_line_item(LineItem::new("P2", "Helmet", dec!(5.00), dec!(1)));
    inv
}

#[test]
fn scenario_grand_total_is_exported() {
    let inv = scenario(bare_party("AdventureWorks"), bare_party("Abraham Swearegin"));
    let xml = zugferd::to_xml(&inv).unwrap();

    assert!(xml.contains("<ram:GrandTotalAmount currencyID=\"USD\">25.00</ram:GrandTotalAmount>"));
    assert!(xml.contains("<ram:DuePayableAmount currencyID=\"USD\">25.00</ram:DuePayableAmount>"));
    assert!(xml.contains("<ram:LineTotalAmount currencyID=\"USD\">20.00</ram:LineTotalAmount>"));
    assert!(xml.contains("<ram:BilledQuantity unitCode=\"C62\">2.00</ram:BilledQuantity>"));
    assert!(xml.contains("<ram:TypeCode>380</ram:TypeCode>"));
    assert!(xml.contains("<ram:Name>RECHNUNG</ram:Name>"));
    assert!(xml.contains(zugferd::ns::RSM));
}

#[test]
fn serialize_returns_utf8_bytes_of_to_xml() {
    let inv = scenario(bare_party("AdventureWorks"), bare_party("Abraham Swearegin"));
    let bytes = zugferd::serialize(&inv).unwrap();
    assert_eq!(String::from_utf8(bytes).unwrap(), zugferd::to_xml(&inv).unwrap());
}

#[test]
fn missing_buyer_or_seller_fails_schema_mapping() {
    let mut no_buyer = scenario(bare_party("S"), bare_party("B"));
    no_buyer.buyer = None;
    let err = zugferd::serialize(&no_buyer).unwrap_err();
    assert!(matches!(err, InvoiceError::SchemaMapping(ref m) if m.contains("buyer")));

    let mut no_seller = scenario(bare_party("S"), bare_party("B"));
    no_seller.seller = None;
    assert!(matches!(
        zugferd::serialize(&no_seller),
        Err(InvoiceError::SchemaMapping(_))
    ));
}

#[test]
fn tier_requirements_are_enforced_on_export() {
    let mut inv = scenario(bare_party("AdventureWorks"), bare_party("Abraham Swearegin"));
    assert!(zugferd::serialize(&inv).is_ok());

    inv.set_profile_level(ProfileLevel::Comfort);
    let err = zugferd::serialize(&inv).unwrap_err().to_string();
    assert!(err.contains("[COMFORT] seller.address.street"), "{err}");

    inv.set_seller(full_party("AdventureWorks", "Adventure_123", "Adventure support"));
    inv.set_buyer(full_party("Abraham Swearegin", "Abraham_12", "Swearegin"));
    assert!(zugferd::serialize(&inv).is_ok());

    inv.set_profile_level(ProfileLevel::Extended);
    assert!(zugferd::serialize(&inv).is_ok());
    inv.buyer.as_mut().unwrap().contact_name = None;
    assert!(matches!(
        zugferd::serialize(&inv),
        Err(InvoiceError::SchemaMapping(_))
    ));
}

#[test]
fn comfort_rejects_inconsistent_line_totals() {
    let mut inv = scenario(
        full_party("AdventureWorks", "Adventure_123", "Adventure support"),
        full_party("Abraham Swearegin", "Abraham_12", "Swearegin"),
    );
    inv.lines[1].line_total = dec!(6.00);
    assert!(zugferd::serialize(&inv).is_ok());
    inv.set_profile_level(ProfileLevel::Comfort);
    let err = zugferd::serialize(&inv).unwrap_err().to_string();
    assert!(err.contains("lines[1].line_total"), "{err}");
}

#[test]
fn round_trip_preserves_parties_and_lines() {
    let mut inv = scenario(
        full_party("AdventureWorks", "Adventure_123", "Adventure support"),
        full_party("Abraham Swearegin", "Abraham_12", "Swearegin"),
    );
    inv.set_profile_level(ProfileLevel::Extended);

    let parsed = zugferd::from_xml(&zugferd::to_xml(&inv).unwrap()).unwrap();
    assert_eq!(parsed.seller, inv.seller);
    assert_eq!(parsed.buyer, inv.buyer);
    assert_eq!(parsed.lines, inv.lines);
    assert_eq!(parsed.profile, ProfileLevel::Extended);
    assert_eq!(parsed.issue_date, date(2024, 3, 5));
    assert_eq!(parsed.total_amount(), dec!(25.00));
}

#[test]
fn special_characters_survive_round_trip() {
    let mut inv = scenario(bare_party("Smith & Sons <Ltd>"), bare_party("Café \"Zürich\""));
    inv.lines[0].name = "Bike > Helmet & Co".into();
    let parsed = zugferd::from_xml(&zugferd::to_xml(&inv).unwrap()).unwrap();
    assert_eq!(parsed, inv);
}

#[test]
fn malformed_xml_is_an_xml_error() {
    assert!(matches!(
        zugferd::from_xml("<rsm:CrossIndustryDocument><unclosed>"),
        Err(InvoiceError::Xml(_))
    ));
    assert!(matches!(zugferd::from_xml(""), Err(InvoiceError::Xml(_))));
}
