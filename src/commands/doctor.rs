// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::store::Store;
use crate::utils::pretty_table;
use anyhow::Result;
use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet};

/// Integrity problems as `(issue, detail)` pairs.
pub fn check<S: Store>(store: &S) -> Result<Vec<(String, String)>> {
    let categories = store.list_categories()?;
    let transactions = store.list_transactions()?;
    let mut issues = Vec::new();

    // 1) Transactions pointing at a category that no longer exists
    let known: HashSet<i64> = categories.iter().map(|c| c.id).collect();
    for t in transactions.iter().filter(|t| !known.contains(&t.category_id)) {
        issues.push((
            "orphan_transaction".to_string(),
            format!("#{} '{}' -> category {}", t.id, t.title, t.category_id),
        ));
    }

    // 2) Category titles that collide
    let mut seen: HashMap<&str, usize> = HashMap::new();
    for c in &categories {
        *seen.entry(c.title.as_str()).or_default() += 1;
    }
    let mut dupes: Vec<_> = seen.into_iter().filter(|(_, n)| *n > 1).collect();
    dupes.sort();
    for (title, n) in dupes {
        issues.push(("duplicate_category_title".to_string(), format!("'{}' x{}", title, n)));
    }

    // 3) Lines that could not have come through the entry form
    for t in &transactions {
        let out_of_range = t.unit_price.checked_mul(Decimal::from(t.quantity)).is_none();
        if t.unit_price <= Decimal::ZERO || t.quantity == 0 || out_of_range {
            issues.push((
                "invalid_line".to_string(),
                format!("#{} '{}' {} x {}", t.id, t.title, t.quantity, t.unit_price),
            ));
        }
    }
    Ok(issues)
}

pub fn handle<S: Store>(store: &S) -> Result<()> {
    let issues = check(store)?;
    if issues.is_empty() {
        println!("doctor: no issues found");
    } else {
        tracing::warn!(count = issues.len(), "integrity issues found");
        let rows = issues.into_iter().map(|(a, b)| vec![a, b]).collect();
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
