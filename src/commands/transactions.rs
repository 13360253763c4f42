// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate::newest_first;
use crate::models::{Tag, Transaction};
use crate::store::Store;
use crate::utils::{
    category_for_title, get_currency, maybe_print_json, pretty_table, require_tags, tag_for_title,
};
use crate::validate::TransactionForm;
use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

pub fn handle<S: Store>(store: &mut S, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(store, sub)?,
        Some(("edit", sub)) => edit(store, sub)?,
        Some(("rm", sub)) => remove(store, sub)?,
        Some(("list", sub)) => list(store, sub)?,
        _ => {}
    }
    Ok(())
}

fn tags_from_args<S: Store>(store: &S, sub: &clap::ArgMatches) -> Result<Option<Vec<Tag>>> {
    match sub.get_many::<String>("tag") {
        Some(titles) => titles
            .map(|t| tag_for_title(store, t))
            .collect::<Result<Vec<_>>>()
            .map(Some),
        None => Ok(None),
    }
}

fn parse_id(sub: &clap::ArgMatches) -> Result<i64> {
    let raw = sub.get_one::<String>("id").map(String::as_str).unwrap_or_default();
    raw.trim()
        .parse::<i64>()
        .with_context(|| format!("Invalid transaction id '{}'", raw))
}

fn add<S: Store>(store: &mut S, sub: &clap::ArgMatches) -> Result<()> {
    let cat_title = sub.get_one::<String>("category").map(String::as_str).unwrap_or_default();
    let category = category_for_title(store, cat_title)?;
    let tag_ids: BTreeSet<i64> = tags_from_args(store, sub)?
        .unwrap_or_default()
        .into_iter()
        .map(|t| t.id)
        .collect();
    let form = TransactionForm {
        title: sub.get_one::<String>("title").cloned().unwrap_or_default(),
        unit_price: sub.get_one::<String>("price").cloned().unwrap_or_default(),
        quantity: sub.get_one::<String>("quantity").cloned().unwrap_or_default(),
        category_id: category.id,
        tag_ids,
    };
    let new = form.validate(require_tags(store)?)?;
    let t = store.create_transaction(new)?;
    println!(
        "Recorded '{}' ({} x {} = {} {:.2}) in {}",
        t.title,
        t.quantity,
        t.unit_price,
        get_currency(store)?,
        t.line_total(),
        category.title
    );
    Ok(())
}

fn edit<S: Store>(store: &mut S, sub: &clap::ArgMatches) -> Result<()> {
    let id = parse_id(sub)?;
    let mut t = store.transaction(id)?;
    if let Some(c) = sub.get_one::<String>("category") {
        t.category_id = category_for_title(store, c)?.id;
    }
    if sub.get_flag("clear_tags") {
        t.tags.clear();
    } else if let Some(tags) = tags_from_args(store, sub)? {
        t.tags.clear();
        for tag in tags {
            t.add_tag(tag);
        }
    }
    let text = |name: &str, current: String| {
        sub.get_one::<String>(name).cloned().unwrap_or(current)
    };
    let form = TransactionForm {
        title: text("title", t.title.clone()),
        unit_price: text("price", t.unit_price.to_string()),
        quantity: text("quantity", t.quantity.to_string()),
        category_id: t.category_id,
        tag_ids: t.tags.iter().map(|tag| tag.id).collect(),
    };
    let checked = form.validate(require_tags(store)?)?;
    t.title = checked.title;
    t.unit_price = checked.unit_price;
    t.quantity = checked.quantity;
    store
        .update_transaction(&t)
        .with_context(|| format!("Update transaction {}", id))?;
    println!("Updated transaction {}", id);
    Ok(())
}

fn remove<S: Store>(store: &mut S, sub: &clap::ArgMatches) -> Result<()> {
    let id = parse_id(sub)?;
    store.delete_transaction(id)?;
    println!("Removed transaction {}", id);
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct TransactionRow {
    pub id: i64,
    pub created_at: String,
    pub category: String,
    pub title: String,
    pub quantity: u32,
    pub unit_price: String,
    pub line_total: String,
    pub tags: String,
}

/// Display rows for `transactions`, in the order given.
pub fn to_rows<S: Store>(store: &S, transactions: &[Transaction]) -> Result<Vec<TransactionRow>> {
    let names: HashMap<i64, String> = store
        .list_categories()?
        .into_iter()
        .map(|c| (c.id, c.title))
        .collect();
    Ok(transactions
        .iter()
        .map(|t| TransactionRow {
            id: t.id,
            created_at: t.created_at.format("%Y-%m-%d %H:%M").to_string(),
            category: names.get(&t.category_id).cloned().unwrap_or_default(),
            title: t.title.clone(),
            quantity: t.quantity,
            unit_price: format!("{:.2}", t.unit_price),
            line_total: format!("{:.2}", t.line_total()),
            tags: t.tag_titles().join(", "),
        })
        .collect())
}

pub fn print_rows(rows: Vec<TransactionRow>) {
    let rows: Vec<Vec<String>> = rows
        .into_iter()
        .map(|r| {
            vec![
                r.id.to_string(),
                r.created_at,
                r.category,
                r.title,
                r.quantity.to_string(),
                r.unit_price,
                r.line_total,
                r.tags,
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["ID", "Created", "Category", "Title", "Qty", "Price", "Total", "Tags"],
            rows,
        )
    );
}

/// Transactions optionally narrowed to one category, newest first.
pub fn query_rows<S: Store>(store: &S, sub: &clap::ArgMatches) -> Result<Vec<TransactionRow>> {
    let mut data = store.list_transactions()?;
    if let Some(cat) = sub.get_one::<String>("category") {
        let category = category_for_title(store, cat)?;
        data.retain(|t| t.category_id == category.id);
    }
    newest_first(&mut data);
    to_rows(store, &data)
}

fn list<S: Store>(store: &S, sub: &clap::ArgMatches) -> Result<()> {
    let data = query_rows(store, sub)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        print_rows(data);
    }
    Ok(())
}
