// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use budgetkit::db::SqliteStore;
use budgetkit::filter::{Bound, PriceBoundIssue, SkippedConstraint};
use budgetkit::store::{MemoryStore, Store};
use budgetkit::{cli, commands};
use rust_decimal_macros::dec;

fn run<S: Store>(store: &mut S, args: &[&str]) -> Result<()> {
    let mut argv = vec!["budgetkit"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    match matches.subcommand() {
        Some(("category", sub)) => commands::categories::handle(store, sub),
        Some(("tx", sub)) => commands::transactions::handle(store, sub),
        Some(("tag", sub)) => commands::tags::handle(store, sub),
        Some(("config", sub)) => commands::config::handle(store, sub),
        Some(("summary", sub)) => commands::summary::handle(store, sub),
        other => panic!("unexpected subcommand {:?}", other.map(|(n, _)| n)),
    }
}

fn seeded() -> MemoryStore {
    let mut store = MemoryStore::new();
    run(&mut store, &["category", "add", "--title", "Groceries", "--limit", "100"]).unwrap();
    run(&mut store, &["category", "add", "--title", "Fun", "--limit", "40"]).unwrap();
    run(&mut store, &["tag", "add", "--title", "weekly"]).unwrap();
    run(&mut store, &["tag", "add", "--title", "treat"]).unwrap();
    run(
        &mut store,
        &[
            "tx", "add", "--category", "Groceries", "--title", "Veg box", "--price", "12.50",
            "--quantity", "2", "--tag", "weekly",
        ],
    )
    .unwrap();
    run(
        &mut store,
        &[
            "tx", "add", "--category", "Fun", "--title", "Ice cream", "--price", "4", "--tag",
            "treat", "--tag", "weekly",
        ],
    )
    .unwrap();
    run(
        &mut store,
        &["tx", "add", "--category", "Fun", "--title", "Concert", "--price", "45"],
    )
    .unwrap();
    store
}

fn filter(store: &MemoryStore, args: &[&str]) -> budgetkit::filter::FilterOutcome {
    let mut argv = vec!["budgetkit", "filter"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    let Some(("filter", sub)) = matches.subcommand() else {
        panic!("no filter subcommand");
    };
    commands::filter::query(store, sub).unwrap()
}

fn titles(outcome: &budgetkit::filter::FilterOutcome) -> Vec<&str> {
    outcome.transactions.iter().map(|t| t.title.as_str()).collect()
}

#[test]
fn category_add_reports_form_messages() {
    let mut store = MemoryStore::new();
    let err = run(&mut store, &["category", "add", "--title", "Rent", "--limit", "abc"])
        .unwrap_err();
    assert!(err.to_string().contains("Limit must be a valid number greater than zero."));
    assert!(store.list_categories().unwrap().is_empty());
}

#[test]
fn tx_add_resolves_category_and_tags() {
    let store = seeded();
    let all = store.list_transactions().unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all[0].line_total(), dec!(25.00));
    assert_eq!(all[1].tag_titles(), vec!["weekly", "treat"]);
    assert_eq!(all[2].quantity, 1);
}

#[test]
fn tx_add_unknown_tag_fails() {
    let mut store = seeded();
    let err = run(
        &mut store,
        &["tx", "add", "--category", "Fun", "--title", "Bowling", "--price", "9", "--tag", "nope"],
    )
    .unwrap_err();
    assert!(err.to_string().contains("Tag 'nope' not found"));
}

#[test]
fn require_tags_setting_is_enforced() {
    let mut store = seeded();
    run(&mut store, &["config", "set", "--key", "require_tags", "--value", "yes"]).unwrap();
    assert_eq!(store.setting("require_tags").unwrap().as_deref(), Some("true"));
    let err = run(
        &mut store,
        &["tx", "add", "--category", "Fun", "--title", "Bowling", "--price", "9"],
    )
    .unwrap_err();
    assert!(err.to_string().contains("Select at least one tag."));
}

#[test]
fn config_rejects_bad_values() {
    let mut store = MemoryStore::new();
    assert!(run(&mut store, &["config", "set", "--key", "currency", "--value", "euro"]).is_err());
    assert!(run(&mut store, &["config", "set", "--key", "colour", "--value", "red"]).is_err());
    run(&mut store, &["config", "set", "--key", "currency", "--value", " eur "]).unwrap();
    assert_eq!(store.setting("currency").unwrap().as_deref(), Some("EUR"));
}

#[test]
fn category_rm_needs_cascade_when_in_use() {
    let mut store = seeded();
    let err = run(&mut store, &["category", "rm", "--title", "Fun"]).unwrap_err();
    assert!(err.to_string().contains("delete or reassign"));

    run(&mut store, &["category", "rm", "--title", "Fun", "--cascade"]).unwrap();
    assert!(store.category_by_title("Fun").unwrap().is_none());
    let left = store.list_transactions().unwrap();
    assert_eq!(left.len(), 1);
    assert_eq!(left[0].title, "Veg box");
}

#[test]
fn category_edit_changes_title_and_limit() {
    let mut store = seeded();
    run(
        &mut store,
        &["category", "edit", "--title", "Fun", "--new-title", "Leisure", "--limit", "60"],
    )
    .unwrap();
    let c = store.category_by_title("Leisure").unwrap().unwrap();
    assert_eq!(c.limit, dec!(60));
}

#[test]
fn tx_edit_moves_and_retags() {
    let mut store = seeded();
    let id = store.list_transactions().unwrap()[2].id.to_string();
    run(
        &mut store,
        &["tx", "edit", "--id", &format!(" {} ", id), "--category", "Groceries", "--tag", "treat"],
    )
    .unwrap();
    let t = store.transaction(id.parse().unwrap()).unwrap();
    let groceries = store.category_by_title("Groceries").unwrap().unwrap();
    assert_eq!(t.category_id, groceries.id);
    assert_eq!(t.tag_titles(), vec!["treat"]);

    run(&mut store, &["tx", "edit", "--id", &id, "--clear-tags"]).unwrap();
    assert!(store.transaction(id.parse().unwrap()).unwrap().tags.is_empty());
}

#[test]
fn filter_flags_build_the_query() {
    let store = seeded();
    assert_eq!(titles(&filter(&store, &[])), vec!["Veg box", "Ice cream", "Concert"]);
    assert_eq!(
        titles(&filter(&store, &["--tag", "weekly", "--sort", "title"])),
        vec!["Ice cream", "Veg box"]
    );
    assert_eq!(
        titles(&filter(&store, &["--min", "20", "--max", "30"])),
        vec!["Veg box"]
    );
    assert_eq!(
        titles(&filter(&store, &["--title", "CON", "--desc", "--sort", "date"])),
        vec!["Concert"]
    );
}

#[test]
fn filter_reports_skipped_price_range() {
    let store = seeded();
    let out = filter(&store, &["--min", "abc", "--max", "30", "--tag", "treat"]);
    assert_eq!(titles(&out), vec!["Ice cream"]);
    assert_eq!(
        out.skipped,
        vec![SkippedConstraint::PriceRange(PriceBoundIssue::Unparseable {
            bound: Bound::Min,
            text: "abc".into(),
        })]
    );
}

#[test]
fn filter_date_flags_cover_whole_days() {
    let store = seeded();
    let today = chrono::Utc::now().date_naive().to_string();
    assert_eq!(filter(&store, &["--from", &today, "--to", &today]).transactions.len(), 3);
    assert!(filter(&store, &["--to", "2000-01-01"]).transactions.is_empty());
}

#[test]
fn summary_totals_limits() {
    let store = seeded();
    let summary = commands::summary::build(&store).unwrap();
    assert_eq!(summary.grand_total, dec!(140));
    assert_eq!(summary.currency, "USD");
    let fun = summary.categories.iter().find(|c| c.title == "Fun").unwrap();
    assert_eq!(fun.spent, "49.00");
    assert_eq!(fun.remaining, "-9.00");
    assert!(fun.over_budget);
    let groceries = summary.categories.iter().find(|c| c.title == "Groceries").unwrap();
    assert!(!groceries.over_budget);
}

#[test]
fn doctor_flags_orphans_in_sqlite() {
    let mut store = SqliteStore::open_in_memory().unwrap();
    run(&mut store, &["category", "add", "--title", "Home", "--limit", "10"]).unwrap();
    assert!(commands::doctor::check(&store).unwrap().is_empty());

    store
        .connection()
        .execute_batch(
            "PRAGMA foreign_keys = OFF;
             INSERT INTO transactions(title, unit_price, quantity, created_at, category_id)
             VALUES ('Stray', '5', 1, '2025-01-01 00:00:00+00:00', 77);",
        )
        .unwrap();
    let issues = commands::doctor::check(&store).unwrap();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].0, "orphan_transaction");
    assert!(issues[0].1.contains("Stray"));
}

#[test]
fn category_edit_applies_the_entry_form_rules() {
    let mut store = seeded();
    let err = run(&mut store, &["category", "edit", "--title", "Fun", "--limit", "0"]).unwrap_err();
    assert!(err.to_string().contains("Limit must be a valid number greater than zero."));
    let err = run(&mut store, &["category", "edit", "--title", "Fun", "--new-title", " "])
        .unwrap_err();
    assert!(err.to_string().contains("Title is required."));

    let fun = store.category_by_title("Fun").unwrap().unwrap();
    assert_eq!(fun.limit, dec!(40));
}

#[test]
fn tx_edit_applies_the_entry_form_rules() {
    let mut store = seeded();
    let id = store.list_transactions().unwrap()[1].id.to_string();
    run(&mut store, &["config", "set", "--key", "require_tags", "--value", "true"]).unwrap();

    let err = run(&mut store, &["tx", "edit", "--id", &id, "--clear-tags"]).unwrap_err();
    assert!(err.to_string().contains("Select at least one tag."));
    let err = run(&mut store, &["tx", "edit", "--id", &id, "--price", "0"]).unwrap_err();
    assert!(err.to_string().contains("Price must be a valid number greater than zero."));
    let err = run(&mut store, &["tx", "edit", "--id", &id, "--quantity", "0"]).unwrap_err();
    assert!(err.to_string().contains("Quantity must be a whole number greater than zero."));

    let t = store.transaction(id.parse().unwrap()).unwrap();
    assert_eq!(t.tag_titles(), vec!["weekly", "treat"]);
    assert_eq!(t.line_total(), dec!(4));

    run(&mut store, &["tx", "edit", "--id", &id, "--title", " Sundae "]).unwrap();
    let t = store.transaction(id.parse().unwrap()).unwrap();
    assert_eq!(t.title, "Sundae");
    assert_eq!(t.quantity, 1);
}
