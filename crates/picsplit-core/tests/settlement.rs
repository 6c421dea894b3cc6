use picsplit_core::{
    parse_share, settle, settle_with, Allocation, AllocationBook, Amount, Bill, LineItem,
    NegativeCostPolicy, NormalizeOptions, Participant, ParticipantId, SettleOptions,
    SettlementError, ShareParseError, ValidationError,
};

fn roster() -> Vec<Participant> {
    vec![Participant::new("A", "Alice"), Participant::new("B", "Bob")]
}

fn id(s: &str) -> ParticipantId {
    ParticipantId::from(s)
}

fn book_for(item: &str, quantity: u32, shares: &[(&str, &str)]) -> AllocationBook {
    let mut book = AllocationBook::new();
    book.insert(
        item,
        Allocation {
            total_quantity: quantity,
            shares: shares
                .iter()
                .map(|(p, token)| (id(p), token.to_string()))
                .collect(),
        },
    );
    book
}

fn assert_amount(actual: Amount, expected: f64) {
    assert!(
        actual.approx_eq(Amount::new(expected), 1e-9),
        "expected {expected}, got {}",
        actual.value()
    );
}

// -------------------------------------------------------------------------
// Worked examples
// -------------------------------------------------------------------------

#[test]
fn milk_split_in_two_units() {
    let items = vec![LineItem::new("Milk", Amount::new(100.0))];
    let book = book_for("Milk", 2, &[("A", "1"), ("B", "1")]);

    let settlement = settle(&items, &book, &roster()).unwrap();

    assert_amount(settlement.get(&id("A")).unwrap().total, 54.0);
    assert_amount(settlement.get(&id("B")).unwrap().total, 54.0);
    assert_amount(settlement.grand_total(), 108.0);
}

#[test]
fn fractional_shares_of_a_single_unit() {
    let items = vec![LineItem::new("Milk", Amount::new(100.0))];
    let book = book_for("Milk", 1, &[("A", "1/3"), ("B", "2/3")]);

    let settlement = settle(&items, &book, &roster()).unwrap();

    assert_amount(settlement.get(&id("A")).unwrap().total, 36.0);
    assert_amount(settlement.get(&id("B")).unwrap().total, 72.0);
    assert_amount(settlement.grand_total(), 108.0);
    assert_eq!(settlement.get(&id("A")).unwrap().items[0].share, "1/3");
}

#[test]
fn thirds_that_do_not_fill_three_units_are_rejected() {
    let items = vec![LineItem::new("Milk", Amount::new(100.0))];
    let book = book_for("Milk", 3, &[("A", "1/3"), ("B", "2/3")]);

    let err = settle(&items, &book, &roster()).unwrap_err();
    assert!(matches!(
        err,
        SettlementError::ValidationFailed(ref errors)
            if matches!(errors[..], [ValidationError::QuantityMismatch { total_quantity: 3, .. }])
    ));
}

#[test]
fn all_zero_participant_is_present_with_empty_breakdown() {
    let items = vec![
        LineItem::new("Milk", Amount::new(100.0)),
        LineItem::new("Bread", Amount::new(200.0)),
    ];
    let mut book = book_for("Milk", 1, &[("A", "1"), ("B", "0")]);
    book.insert(
        "Bread",
        Allocation {
            total_quantity: 1,
            shares: [(id("A"), "1".to_string()), (id("B"), "0".to_string())]
                .into_iter()
                .collect(),
        },
    );

    let settlement = settle(&items, &book, &roster()).unwrap();
    let bob = settlement.get(&id("B")).expect("Bob must be present");
    assert!(bob.total.is_zero());
    assert!(bob.items.is_empty());
    assert_eq!(settlement.len(), 2);
}

#[test]
fn whole_bill_gate_lists_only_failing_item() {
    let items = vec![
        LineItem::new("X", Amount::new(50.0)),
        LineItem::new("Y", Amount::new(80.0)),
    ];
    let mut book = book_for("X", 1, &[("A", "1/2"), ("B", "1/3")]);
    book.insert(
        "Y",
        Allocation {
            total_quantity: 1,
            shares: [(id("A"), "1".to_string())].into_iter().collect(),
        },
    );

    match settle(&items, &book, &roster()) {
        Err(SettlementError::ValidationFailed(errors)) => {
            assert_eq!(errors.len(), 1);
            assert_eq!(errors[0].item(), "X");
        }
        other => panic!("expected ValidationFailed, got {other:?}"),
    }
}

// -------------------------------------------------------------------------
// Share parsing
// -------------------------------------------------------------------------

#[test]
fn share_tokens() {
    assert_eq!(parse_share("").unwrap().value(), 0.0);
    assert_eq!(parse_share("   ").unwrap().value(), 0.0);
    assert!(matches!(
        parse_share("-1"),
        Err(ShareParseError::NegativeShare { .. })
    ));
    assert!(matches!(
        parse_share("-1/2"),
        Err(ShareParseError::NegativeShare { .. })
    ));
    assert!((parse_share("7/8").unwrap().value() - 0.875).abs() < 1e-9);
}

#[test]
fn tolerance_is_exclusive_at_one_thousandth() {
    let items = vec![LineItem::new("Tea", Amount::new(100.0))];

    let passing = book_for("Tea", 1, &[("A", "1.0009")]);
    assert!(settle(&items, &passing, &roster()).is_ok());

    let failing = book_for("Tea", 1, &[("A", "1.002")]);
    assert!(settle(&items, &failing, &roster()).is_err());
}

// -------------------------------------------------------------------------
// Full session
// -------------------------------------------------------------------------

#[test]
fn recognised_bill_to_settlement() {
    let mut bill = Bill::from_json(
        r#"{
            "items": [
                {"original_name": "牛乳", "normalized_name": "Milk", "price_before_tax": 100, "discount_amount": 0},
                {"original_name": "code128割引", "normalized_name": "Discount", "price_before_tax": 0, "discount_amount": 8},
                {"original_name": "レジ袋", "normalized_name": "Plastic Bag", "price_before_tax": 5, "discount_amount": 0},
                {"original_name": "牛乳", "normalized_name": "Milk", "price_before_tax": 100, "discount_amount": 0}
            ],
            "total_bill": 213.5
        }"#,
    )
    .unwrap();
    bill.normalize(&NormalizeOptions::default());
    assert_eq!(bill.items.len(), 3);

    let roster = roster();
    let mut book = AllocationBook::new();
    book.sync_items(&bill.items, &roster);
    book.share_equally("Milk 1", &roster).unwrap();
    book.set_share("Milk 2", &id("B"), "1").unwrap();
    book.set_share("Plastic Bag", &id("A"), "1").unwrap();

    let settlement = settle(&bill.items, &book, &roster).unwrap();

    // Milk 1: 108 - 8 = 100, halved; Milk 2: 108 to Bob; bag 5.5 to Alice
    assert_amount(settlement.get(&id("A")).unwrap().total, 55.5);
    assert_amount(settlement.get(&id("B")).unwrap().total, 158.0);
    assert_eq!(settlement.discrepancy(bill.total_bill).round_to_minor(), 0);

    let alice_items: Vec<_> = settlement
        .get(&id("A"))
        .unwrap()
        .items
        .iter()
        .map(|row| (row.name.as_str(), row.category.as_str()))
        .collect();
    assert_eq!(alice_items, vec![("Milk 1", "🥛"), ("Plastic Bag", "🛍️")]);
}

#[test]
fn roster_change_invalidates_until_revalidated() {
    let items = vec![LineItem::new("Milk", Amount::new(100.0))];
    let roster = roster();
    let mut book = AllocationBook::new();
    book.sync_items(&items, &roster);
    book.share_equally("Milk", &roster).unwrap();

    // Bob leaves: his half disappears and the sum no longer matches
    book.remove_participant(&id("B"));
    let remaining = vec![roster[0].clone()];
    assert!(settle(&items, &book, &remaining).is_err());

    book.set_share("Milk", &id("A"), "1").unwrap();
    let settlement = settle(&items, &book, &remaining).unwrap();
    assert_amount(settlement.get(&id("A")).unwrap().total, 108.0);
}

#[test]
fn oversized_discount_policy() {
    let items =
        vec![LineItem::new("Promo Snack", Amount::new(10.0)).with_discount(Amount::new(20.0))];
    let book = book_for("Promo Snack", 1, &[("A", "1")]);

    let propagated = settle(&items, &book, &roster()).unwrap();
    assert_amount(propagated.get(&id("A")).unwrap().total, -9.2);

    let clamped = settle_with(
        &items,
        &book,
        &roster(),
        &SettleOptions {
            negative_cost: NegativeCostPolicy::Clamp,
        },
    )
    .unwrap();
    assert!(clamped.get(&id("A")).unwrap().total.is_zero());
}
