// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub title: String,
    pub limit: Decimal,
    pub created_at: DateTime<Utc>,
}

impl Category {
    /// Transactions in `all` that belong to this category.
    pub fn transactions<'a>(
        &'a self,
        all: &'a [Transaction],
    ) -> impl Iterator<Item = &'a Transaction> + 'a {
        all.iter().filter(move |t| t.category_id == self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub title: String,
    pub unit_price: Decimal,
    pub quantity: u32,
    pub created_at: DateTime<Utc>,
    pub category_id: i64,
    pub tags: BTreeSet<Tag>,
}

impl Transaction {
    /// `unit_price * quantity`, clamped to the `Decimal` range.
    pub fn line_total(&self) -> Decimal {
        self.unit_price.saturating_mul(Decimal::from(self.quantity))
    }

    /// True when any attached tag carries one of `titles`.
    pub fn has_any_tag(&self, titles: &BTreeSet<String>) -> bool {
        self.tags.iter().any(|t| titles.contains(&t.title))
    }

    /// Attach a tag, replacing any entry with the same id.
    pub fn add_tag(&mut self, tag: Tag) {
        self.tags.retain(|t| t.id != tag.id);
        self.tags.insert(tag);
    }

    pub fn tag_titles(&self) -> Vec<&str> {
        self.tags.iter().map(|t| t.title.as_str()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCategory {
    pub title: String,
    pub limit: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTransaction {
    pub title: String,
    pub unit_price: Decimal,
    pub quantity: u32,
    pub category_id: i64,
    pub tag_ids: BTreeSet<i64>,
}
