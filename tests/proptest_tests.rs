//! Property-based tests for totals and the structured export.
//!
//! Run with: `cargo test --features all --test proptest_tests`

#![cfg(feature = "zugferd")]

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use zugferd_invoice::core::*;
use zugferd_invoice::zugferd;

fn arb_amount() -> impl Strategy<Value = Decimal> {
    // 0.00 ..= 99999.99
    (0i64..10_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

fn arb_quantity() -> impl Strategy<Value = Decimal> {
    (1i64..1000).prop_map(|q| Decimal::new(q, 0))
}

fn arb_line() -> impl Strategy<Value = LineItem> {
    ("[ ]?[A-Z]{1,3}-[0-9]{1,5}[ ]?", "[ ]{0,2}[A-Za-z][A-Za-z0-9 ]{0,30}[ ]{0,2}", arb_amount(), arb_quantity())
        .prop_map(|(id, name, price, qty)| LineItem::new(id, name, price, qty))
}

fn arb_lines() -> impl Strategy<Value = Vec<LineItem>> {
    prop::collection::vec(arb_line(), 1..15)
}

fn arb_party() -> impl Strategy<Value = Party> {
    (
        "[ ]{0,2}[A-Za-z][A-Za-z0-9 ]{0,20}[ ]{0,2}",
        "[ ]?[A-Za-z]{2,15}[ ]?",
        "[0-9]{4,5}",
        prop::option::of("[A-Za-z0-9]{1,12}"),
        prop::option::of("[A-Za-z]{1,12}[ ]?"),
        prop::option::of("[ ]?[0-9]{1,4} [A-Za-z]{3,12}[ ]?"),
    )
        .prop_map(|(name, city, postal, id, contact, street)| {
            let mut address = AddressBuilder::new(city, postal, CountryCode::us());
            if let Some(street) = street {
                address = address.street(street);
            }
            let mut party = PartyBuilder::new(name, address.build());
            if let Some(id) = id {
                party = party.id(id);
            }
            if let Some(contact) = contact {
                party = party.contact_name(contact);
            }
            party.build()
        })
}

fn arb_date() -> impl Strategy<Value = NaiveDate> {
    (2000i32..2100, 1u32..=12, 1u32..=28)
        .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

proptest! {
    /// The grand total does not depend on line order.
    #[test]
    fn total_is_order_independent(lines in arb_lines(), seed in any::<u64>()) {
        let forward = compute_total(&lines);

        let mut reversed = lines.clone();
        reversed.reverse();
        prop_assert_eq!(compute_total(&reversed), forward);

        let mut rotated = lines.clone();
        let shift = (seed as usize) % rotated.len();
        rotated.rotate_left(shift);
        prop_assert_eq!(compute_total(&rotated), forward);

        let summed: Decimal = lines.iter().map(|l| l.line_total).sum();
        prop_assert_eq!(forward, summed);
    }

    /// to_xml() → from_xml() yields an equal invoice for Basic exports.
    #[test]
    fn basic_round_trip_is_lossless(
        lines in arb_lines(),
        seller in arb_party(),
        buyer in arb_party(),
        issue_date in arb_date(),
        number in "[ ]?[A-Z0-9][A-Z0-9-]{0,15}[ ]?",
    ) {
        let mut inv = Invoice::new(number, issue_date, CurrencyCode::eur());
        inv.set_seller(seller);
        inv.set_buyer(buyer);
        for line in lines {
            inv.add_line_item(line);
        }

        let xml = zugferd::to_xml(&inv).unwrap();
        let parsed = zugferd::from_xml(&xml).unwrap();
        prop_assert_eq!(&parsed.seller, &inv.seller);
        prop_assert_eq!(&parsed.buyer, &inv.buyer);
        prop_assert_eq!(&parsed.lines, &inv.lines);
        prop_assert_eq!(parsed.total_amount(), inv.total_amount());
        prop_assert_eq!(parsed, inv);
    }

    /// A tier never accepts an invoice a lower tier rejects.
    #[test]
    fn tiers_are_monotonic(lines in arb_lines(), seller in arb_party(), buyer in arb_party()) {
        let mut inv = Invoice::new("1", NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), CurrencyCode::usd());
        inv.set_seller(seller);
        inv.set_buyer(buyer);
        for line in lines {
            inv.add_line_item(line);
        }

        let counts: Vec<usize> = ProfileLevel::ALL
            .iter()
            .map(|p| validate_for_profile(&inv, *p).len())
            .collect();
        prop_assert!(counts[0] <= counts[1] && counts[1] <= counts[2]);
    }
}
