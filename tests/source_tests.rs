#![cfg(feature = "source")]

use std::path::Path;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use zugferd_invoice::core::*;
use zugferd_invoice::source::{load_line_items, parse_line_items};

const SCENARIO: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<ProductList>
  <ProductDetails>
    <Productid>P1</Productid>
    <Product>Mountain Bike</Product>
    <Price>10.00</Price>
    <Quantity>2</Quantity>
    <Total>20.00</Total>
  </ProductDetails>
  <ProductDetails>
    <Productid>P2</Productid>
    <Product>Helmet</Product>
    <Price>5.00</Price>
    <Quantity>1</Quantity>
    <Total>5.00</Total>
  </ProductDetails>
</ProductList>"#;

#[test]
fn scenario_items_sum_to_25() {
    let items = parse_line_items(SCENARIO, TotalPolicy::Strict).unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(compute_total(&items), dec!(25.00));
    assert!(totals::line_total_mismatches(&items).is_empty());
}

#[test]
fn bundled_product_list_loads() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/InvoiceProductList.xml");
    let items = load_line_items(&path, TotalPolicy::Strict).unwrap();
    assert_eq!(items.len(), 6);
    assert_eq!(items[0].id, "CA-1098");
    assert_eq!(compute_total(&items), dec!(1474.84));
    assert!(totals::line_total_mismatches(&items).is_empty());
}

#[test]
fn missing_file_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.xml");
    match load_line_items(&path, TotalPolicy::Tolerant) {
        Err(InvoiceError::NotFound(p)) => assert_eq!(p, path),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[test]
fn directory_is_a_read_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        load_line_items(dir.path(), TotalPolicy::Tolerant),
        Err(InvoiceError::Read(_))
    ));
}

#[test]
fn file_on_disk_with_bad_total_follows_policy() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("items.xml");
    std::fs::write(
        &path,
        SCENARIO.replace("<Total>5.00</Total>", "<Total>five</Total>"),
    )
    .unwrap();

    let items = load_line_items(&path, TotalPolicy::Tolerant).unwrap();
    assert_eq!(items[1].line_total, Decimal::ZERO);
    assert_eq!(compute_total(&items), dec!(20.00));

    let err = load_line_items(&path, TotalPolicy::Strict).unwrap_err();
    assert!(err.to_string().contains("record 1"), "{err}");
}

#[test]
fn any_root_name_is_accepted() {
    let xml = SCENARIO.replace("ProductList", "NewDataSet");
    assert_eq!(parse_line_items(&xml, TotalPolicy::Strict).unwrap().len(), 2);
}
