// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate::{compute_category_aggregate, transactions_for_category};
use crate::store::Store;
use crate::utils::{category_for_title, fmt_money, get_currency, maybe_print_json, pretty_table};
use crate::validate::CategoryForm;
use anyhow::{Context, Result};
use serde::Serialize;

pub fn handle<S: Store>(store: &mut S, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(store, sub)?,
        Some(("edit", sub)) => edit(store, sub)?,
        Some(("rm", sub)) => remove(store, sub)?,
        Some(("list", sub)) => list(store, sub)?,
        Some(("show", sub)) => show(store, sub)?,
        _ => {}
    }
    Ok(())
}

fn arg<'a>(sub: &'a clap::ArgMatches, name: &str) -> &'a str {
    sub.get_one::<String>(name).map(String::as_str).unwrap_or_default()
}

fn add<S: Store>(store: &mut S, sub: &clap::ArgMatches) -> Result<()> {
    let form = CategoryForm {
        title: arg(sub, "title").to_string(),
        limit: arg(sub, "limit").to_string(),
    };
    let new = form.validate()?;
    let category = store.create_category(new)?;
    println!(
        "Added category '{}' with limit {}",
        category.title,
        fmt_money(&category.limit, &get_currency(store)?)
    );
    Ok(())
}

fn edit<S: Store>(store: &mut S, sub: &clap::ArgMatches) -> Result<()> {
    let mut category = category_for_title(store, arg(sub, "title"))?;
    let form = CategoryForm {
        title: sub
            .get_one::<String>("new_title")
            .cloned()
            .unwrap_or_else(|| category.title.clone()),
        limit: sub
            .get_one::<String>("limit")
            .cloned()
            .unwrap_or_else(|| category.limit.to_string()),
    };
    let checked = form.validate()?;
    category.title = checked.title;
    category.limit = checked.limit;
    store
        .update_category(&category)
        .with_context(|| format!("Update category {}", category.id))?;
    println!("Updated category '{}'", category.title);
    Ok(())
}

fn remove<S: Store>(store: &mut S, sub: &clap::ArgMatches) -> Result<()> {
    let category = category_for_title(store, arg(sub, "title"))?;
    if sub.get_flag("cascade") {
        let removed = store.delete_category_cascade(category.id)?;
        if removed > 0 {
            println!("Removed {} transaction(s)", removed);
        }
    } else {
        store.delete_category(category.id)?;
    }
    println!("Removed category '{}'", category.title);
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct CategoryRow {
    pub id: i64,
    pub title: String,
    pub limit: String,
    pub spent: String,
    pub remaining: String,
    pub over_budget: bool,
}

/// One row per category, figures recomputed from the current snapshot.
pub fn category_rows<S: Store>(store: &S) -> Result<Vec<CategoryRow>> {
    let transactions = store.list_transactions()?;
    Ok(store
        .list_categories()?
        .into_iter()
        .map(|c| {
            let agg = compute_category_aggregate(&c, &transactions);
            CategoryRow {
                id: c.id,
                title: c.title,
                limit: format!("{:.2}", c.limit),
                spent: format!("{:.2}", agg.spent_total),
                remaining: format!("{:.2}", agg.remaining),
                over_budget: agg.is_over_budget,
            }
        })
        .collect())
}

fn list<S: Store>(store: &S, sub: &clap::ArgMatches) -> Result<()> {
    let data = category_rows(store)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .into_iter()
            .map(|r| {
                vec![
                    r.title,
                    r.limit,
                    r.spent,
                    r.remaining,
                    if r.over_budget { "Overspent" } else { "OK" }.to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Category", "Limit", "Spent", "Remaining", "Status"], rows)
        );
    }
    Ok(())
}

fn show<S: Store>(store: &S, sub: &clap::ArgMatches) -> Result<()> {
    let category = category_for_title(store, arg(sub, "title"))?;
    let all = store.list_transactions()?;
    let agg = compute_category_aggregate(&category, &all);
    let entries = transactions_for_category(&category, &all);

    if sub.get_flag("json") || sub.get_flag("jsonl") {
        let v = serde_json::json!({
            "category": category,
            "aggregate": agg,
            "transactions": entries,
        });
        maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &v)?;
        return Ok(());
    }

    let ccy = get_currency(store)?;
    println!("{}  (budget {})", category.title, fmt_money(&category.limit, &ccy));
    let rows: Vec<Vec<String>> = entries
        .iter()
        .map(|t| {
            vec![
                t.created_at.format("%Y-%m-%d %H:%M").to_string(),
                t.title.clone(),
                t.quantity.to_string(),
                format!("{:.2}", t.unit_price),
                format!("{:.2}", t.line_total()),
                t.tag_titles().join(", "),
            ]
        })
        .collect();
    if rows.is_empty() {
        println!("No transactions available.");
    } else {
        println!(
            "{}",
            pretty_table(&["Created", "Title", "Qty", "Price", "Total", "Tags"], rows)
        );
    }
    let label = if agg.is_over_budget { "Overspent" } else { "Remaining" };
    println!("{} {}", label, fmt_money(&agg.remaining, &ccy));
    Ok(())
}
