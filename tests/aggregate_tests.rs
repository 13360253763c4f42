// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use budgetkit::aggregate::{
    compute_category_aggregate, grand_total, newest_first, transactions_for_category,
};
use budgetkit::models::{Category, NewCategory, NewTransaction, Transaction};
use budgetkit::store::{MemoryStore, Store};
use common::{category, day, txn};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::BTreeSet;

#[test]
fn empty_collection_spends_nothing() {
    let c = category(1, "Groceries", dec!(200));
    let agg = compute_category_aggregate(&c, &Vec::<Transaction>::new());
    assert_eq!(agg.spent_total, Decimal::ZERO);
    assert_eq!(agg.remaining, dec!(200));
    assert!(!agg.is_over_budget);
}

#[test]
fn spent_uses_line_totals() {
    let c = category(1, "Groceries", dec!(100));
    let all = vec![txn(10, "Milk", dec!(2.50), 4), txn(11, "Bread", dec!(3), 1)];
    let agg = compute_category_aggregate(&c, &all);
    assert_eq!(agg.spent_total, dec!(13.00));
    assert_eq!(agg.remaining, dec!(87.00));
    assert_eq!(agg.remaining, c.limit - agg.spent_total);
}

#[test]
fn exactly_on_budget_is_not_over() {
    let c = category(1, "Fuel", dec!(50));
    let all = vec![txn(10, "Tank", dec!(25), 2)];
    let agg = compute_category_aggregate(&c, &all);
    assert_eq!(agg.remaining, Decimal::ZERO);
    assert!(!agg.is_over_budget);
}

#[test]
fn one_cent_over_is_over_budget() {
    let c = category(1, "Fuel", dec!(50));
    let all = vec![txn(10, "Tank", dec!(50.01), 1)];
    let agg = compute_category_aggregate(&c, &all);
    assert_eq!(agg.remaining, dec!(-0.01));
    assert!(agg.is_over_budget);
}

#[test]
fn other_and_orphaned_categories_are_ignored() {
    let c = category(1, "Dining", dec!(80));
    let mut foreign = txn(20, "Cinema", dec!(15), 2);
    foreign.category_id = 2;
    let mut orphan = txn(21, "Lost", dec!(99), 1);
    orphan.category_id = 404;
    let all = vec![txn(10, "Lunch", dec!(12), 1), foreign, orphan];

    let agg = compute_category_aggregate(&c, &all);
    assert_eq!(agg.spent_total, dec!(12));

    let other = category(3, "Empty", dec!(10));
    assert_eq!(compute_category_aggregate(&other, &all).spent_total, Decimal::ZERO);
}

#[test]
fn grand_total_sums_limits_not_spending() {
    let cats = vec![
        category(1, "A", dec!(100)),
        category(2, "B", dec!(250.50)),
        category(3, "C", dec!(0)),
    ];
    assert_eq!(grand_total(&cats), dec!(350.50));
    assert_eq!(grand_total(&Vec::<Category>::new()), Decimal::ZERO);
}

#[test]
fn category_listing_is_newest_first() {
    let c = category(1, "Home", dec!(500));
    let mut a = txn(10, "Old", dec!(1), 1);
    a.created_at = day(2);
    let mut b = txn(11, "New", dec!(1), 1);
    b.created_at = day(9);
    let mut other = txn(12, "Elsewhere", dec!(1), 1);
    other.category_id = 7;
    let all = vec![a, b, other];
    let listed: Vec<&str> = transactions_for_category(&c, &all)
        .iter()
        .map(|t| t.title.as_str())
        .collect();
    assert_eq!(listed, vec!["New", "Old"]);
    assert_eq!(c.transactions(&all).count(), 2);
}

#[test]
fn aggregate_follows_store_edits() {
    let mut store = MemoryStore::new();
    let cat = store
        .create_category(NewCategory {
            title: "Coffee".into(),
            limit: dec!(20),
        })
        .unwrap();
    let t = store
        .create_transaction(NewTransaction {
            title: "Latte".into(),
            unit_price: dec!(4.50),
            quantity: 2,
            category_id: cat.id,
            tag_ids: BTreeSet::new(),
        })
        .unwrap();

    let before = compute_category_aggregate(&cat, &store.list_transactions().unwrap());
    assert_eq!(before.remaining, dec!(11.00));

    let mut edited = t.clone();
    edited.quantity = 5;
    store.update_transaction(&edited).unwrap();
    let after = compute_category_aggregate(&cat, &store.list_transactions().unwrap());
    assert_eq!(after.spent_total, dec!(22.50));
    assert!(after.is_over_budget);

    store.delete_transaction(t.id).unwrap();
    let cleared = compute_category_aggregate(&cat, &store.list_transactions().unwrap());
    assert_eq!(cleared.spent_total, Decimal::ZERO);
}

#[test]
fn huge_amounts_saturate_instead_of_panicking() {
    let c = category(1, "Yacht", dec!(100));
    // Rows like these can only come from outside the store; line totals clamp.
    let all = vec![
        txn(10, "Hull", Decimal::MAX, 1),
        txn(11, "Sails", Decimal::MAX, 3),
        txn(12, "Rope", dec!(5), 1),
    ];
    assert_eq!(all[1].line_total(), Decimal::MAX);

    let agg = compute_category_aggregate(&c, &all);
    assert_eq!(agg.spent_total, Decimal::MAX);
    assert_eq!(agg.remaining, dec!(100) - Decimal::MAX);
    assert!(agg.is_over_budget);

    let cats = vec![category(1, "A", Decimal::MAX), category(2, "B", Decimal::MAX)];
    assert_eq!(grand_total(&cats), Decimal::MAX);
}

#[test]
fn newest_first_keeps_ties_in_input_order() {
    let mut a = txn(10, "first", dec!(1), 1);
    a.created_at = day(4);
    let mut b = txn(11, "second", dec!(1), 1);
    b.created_at = day(4);
    let mut c = txn(12, "latest", dec!(1), 1);
    c.created_at = day(8);

    let mut owned = vec![a, b, c];
    newest_first(&mut owned);
    assert_eq!(common::titles(&owned), vec!["latest", "first", "second"]);

    let cat = category(1, "Any", dec!(10));
    let listed: Vec<&str> = transactions_for_category(&cat, &owned)
        .iter()
        .map(|t| t.title.as_str())
        .collect();
    assert_eq!(listed, vec!["latest", "first", "second"]);
}
