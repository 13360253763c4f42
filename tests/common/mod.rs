// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

#![allow(dead_code)]

use budgetkit::models::{Category, Tag, Transaction};
use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use std::collections::BTreeSet;

pub fn day(d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, d, 12, 0, 0).unwrap()
}

pub fn category(id: i64, title: &str, limit: Decimal) -> Category {
    Category {
        id,
        title: title.to_string(),
        limit,
        created_at: day(1),
    }
}

pub fn tag(id: i64, title: &str) -> Tag {
    Tag {
        id,
        title: title.to_string(),
    }
}

pub fn txn(id: i64, title: &str, unit_price: Decimal, quantity: u32) -> Transaction {
    Transaction {
        id,
        title: title.to_string(),
        unit_price,
        quantity,
        created_at: day(1),
        category_id: 1,
        tags: BTreeSet::new(),
    }
}

pub fn titles(ts: &[Transaction]) -> Vec<&str> {
    ts.iter().map(|t| t.title.as_str()).collect()
}
