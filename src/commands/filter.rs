// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::transactions::{print_rows, to_rows};
use crate::filter::{FilterOutcome, FilterSpec, SortDirection, SortKey, evaluate_filter};
use crate::store::Store;
use crate::utils::{maybe_print_json, parse_date_bound};
use anyhow::{Result, anyhow};

pub fn handle<S: Store>(store: &S, sub: &clap::ArgMatches) -> Result<()> {
    let outcome = query(store, sub)?;
    for notice in &outcome.skipped {
        eprintln!("note: {}", notice);
    }
    let rows = to_rows(store, &outcome.transactions)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &rows)? {
        print_rows(rows);
    }
    Ok(())
}

/// Build a query from command-line flags. Price text is passed through
/// untouched; the engine decides whether it is usable.
pub fn spec_from_args(sub: &clap::ArgMatches) -> Result<FilterSpec> {
    let mut spec = FilterSpec::new();
    if let Some(tags) = sub.get_many::<String>("tag") {
        spec = spec.with_tags(tags.map(|t| t.trim().to_string()));
    }
    spec.min_price = sub.get_one::<String>("min").cloned();
    spec.max_price = sub.get_one::<String>("max").cloned();
    spec.title_contains = sub.get_one::<String>("title").cloned();
    spec.date_from = sub
        .get_one::<String>("from")
        .map(|s| parse_date_bound(s, false))
        .transpose()?;
    spec.date_to = sub
        .get_one::<String>("to")
        .map(|s| parse_date_bound(s, true))
        .transpose()?;
    spec.sort_key = sub
        .get_one::<String>("sort")
        .map(|s| s.parse::<SortKey>())
        .transpose()
        .map_err(|e| anyhow!(e))?
        .unwrap_or_default();
    spec.sort_direction = if sub.get_flag("desc") {
        SortDirection::Descending
    } else {
        SortDirection::Ascending
    };
    Ok(spec)
}

pub fn query<S: Store>(store: &S, sub: &clap::ArgMatches) -> Result<FilterOutcome> {
    let spec = spec_from_args(sub)?;
    let all = store.list_transactions()?;
    Ok(evaluate_filter(&all, &spec))
}
