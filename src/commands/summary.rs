// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate::grand_total;
use crate::commands::categories::{CategoryRow, category_rows};
use crate::store::Store;
use crate::utils::{fmt_money, get_currency, maybe_print_json, pretty_table};
use anyhow::Result;
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Summary {
    pub currency: String,
    pub grand_total: Decimal,
    pub categories: Vec<CategoryRow>,
}

pub fn build<S: Store>(store: &S) -> Result<Summary> {
    let total = grand_total(&store.list_categories()?);
    Ok(Summary {
        currency: get_currency(store)?,
        grand_total: total,
        categories: category_rows(store)?,
    })
}

pub fn handle<S: Store>(store: &S, sub: &clap::ArgMatches) -> Result<()> {
    let summary = build(store)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &summary)? {
        return Ok(());
    }
    let ccy = summary.currency.clone();
    let total = fmt_money(&summary.grand_total, &ccy);
    let rows = summary
        .categories
        .into_iter()
        .map(|r| {
            let status = if r.over_budget { "Overspent" } else { "Remaining" };
            vec![r.title, r.limit, r.spent, format!("{} {}", status, r.remaining)]
        })
        .collect();
    println!("{}", pretty_table(&["Category", "Limit", "Spent", "Balance"], rows));
    println!("Total budgeted: {}", total);
    Ok(())
}
