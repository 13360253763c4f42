// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Derived figures for budget categories.
//!
//! Nothing here is cached: every figure is recomputed from the transaction
//! snapshot handed in, so edits made through the store show up on the next read.

use crate::models::{Category, Transaction};
use rust_decimal::Decimal;
use serde::Serialize;
use std::borrow::Borrow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryAggregate {
    pub spent_total: Decimal,
    pub remaining: Decimal,
    pub is_over_budget: bool,
}

/// Sum of line totals for `category`, matched by `category_id`.
///
/// Sums saturate at the `Decimal` bounds instead of overflowing.
///
/// Callers may pass the whole collection; transactions pointing at any other
/// (or a missing) category are ignored.
pub fn compute_category_aggregate<'a, I>(category: &Category, transactions: I) -> CategoryAggregate
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let spent_total: Decimal = transactions
        .into_iter()
        .filter(|t| t.category_id == category.id)
        .map(Transaction::line_total)
        .fold(Decimal::ZERO, Decimal::saturating_add);
    let remaining = category.limit.saturating_sub(spent_total);
    CategoryAggregate {
        spent_total,
        remaining,
        is_over_budget: remaining < Decimal::ZERO,
    }
}

/// Sum of every category's limit (budgeted, not spent).
pub fn grand_total<'a, I>(categories: I) -> Decimal
where
    I: IntoIterator<Item = &'a Category>,
{
    categories
        .into_iter()
        .fold(Decimal::ZERO, |acc, c| acc.saturating_add(c.limit))
}

/// A category's transactions, newest first; equal timestamps keep input order.
pub fn transactions_for_category<'a>(
    category: &Category,
    all: &'a [Transaction],
) -> Vec<&'a Transaction> {
    let mut out: Vec<&Transaction> = all.iter().filter(|t| t.category_id == category.id).collect();
    newest_first(&mut out);
    out
}

/// Stable sort by `created_at`, newest first.
pub fn newest_first<T: Borrow<Transaction>>(items: &mut [T]) {
    items.sort_by(|a, b| b.borrow().created_at.cmp(&a.borrow().created_at));
}
