// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Transaction filtering and sorting.
//!
//! A [`FilterSpec`] is evaluated as a conjunction of independent predicates
//! (tags, price range, title substring, date range). Within the tag predicate a
//! transaction matches if it carries *any* of the selected titles. Price bounds
//! apply to the line total (`unit_price * quantity`).

use crate::models::Transaction;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    None,
    Title,
    Date,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "none" => Ok(Self::None),
            "title" => Ok(Self::Title),
            "date" => Ok(Self::Date),
            other => Err(format!("unknown sort key '{}' (use none|title|date)", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
    pub tag_titles: BTreeSet<String>,
    /// Raw text as typed; parsed on evaluation.
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub title_contains: Option<String>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
    pub sort_key: SortKey,
    pub sort_direction: SortDirection,
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset every field to "no constraint".
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Select `title` if it is not selected yet, otherwise deselect it.
    pub fn toggle_tag(&mut self, title: &str) {
        if !self.tag_titles.remove(title) {
            self.tag_titles.insert(title.to_string());
        }
    }

    pub fn with_tags<I, S>(mut self, titles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tag_titles.extend(titles.into_iter().map(Into::into));
        self
    }

    pub fn with_price_range(mut self, min: impl Into<String>, max: impl Into<String>) -> Self {
        self.min_price = Some(min.into());
        self.max_price = Some(max.into());
        self
    }

    pub fn with_title(mut self, needle: impl Into<String>) -> Self {
        self.title_contains = Some(needle.into());
        self
    }

    pub fn with_dates(mut self, from: Option<DateTime<Utc>>, to: Option<DateTime<Utc>>) -> Self {
        self.date_from = from;
        self.date_to = to;
        self
    }

    pub fn sorted_by(mut self, key: SortKey, direction: SortDirection) -> Self {
        self.sort_key = key;
        self.sort_direction = direction;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Bound {
    Min,
    Max,
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bound::Min => write!(f, "minimum"),
            Bound::Max => write!(f, "maximum"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "issue", rename_all = "snake_case")]
pub enum PriceBoundIssue {
    /// Only one of the two bounds was given.
    Incomplete { missing: Bound },
    Unparseable { bound: Bound, text: String },
    Inverted { min: Decimal, max: Decimal },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "constraint", rename_all = "snake_case")]
pub enum SkippedConstraint {
    PriceRange(PriceBoundIssue),
}

impl fmt::Display for SkippedConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkippedConstraint::PriceRange(PriceBoundIssue::Incomplete { missing }) => {
                write!(f, "price range not applied: {} price is missing", missing)
            }
            SkippedConstraint::PriceRange(PriceBoundIssue::Unparseable { bound, text }) => {
                write!(f, "price range not applied: {} price '{}' is not a number", bound, text)
            }
            SkippedConstraint::PriceRange(PriceBoundIssue::Inverted { min, max }) => {
                write!(f, "price range not applied: minimum {} exceeds maximum {}", min, max)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterOutcome {
    pub transactions: Vec<Transaction>,
    pub skipped: Vec<SkippedConstraint>,
}

fn non_blank(s: &Option<String>) -> Option<&str> {
    s.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Resolve the price bounds into an inclusive range, `Ok(None)` when neither
/// bound was supplied.
fn price_range(spec: &FilterSpec) -> Result<Option<(Decimal, Decimal)>, PriceBoundIssue> {
    let (min_s, max_s) = match (non_blank(&spec.min_price), non_blank(&spec.max_price)) {
        (None, None) => return Ok(None),
        (Some(_), None) => return Err(PriceBoundIssue::Incomplete { missing: Bound::Max }),
        (None, Some(_)) => return Err(PriceBoundIssue::Incomplete { missing: Bound::Min }),
        (Some(a), Some(b)) => (a, b),
    };
    let min = min_s.parse::<Decimal>().map_err(|_| PriceBoundIssue::Unparseable {
        bound: Bound::Min,
        text: min_s.to_string(),
    })?;
    let max = max_s.parse::<Decimal>().map_err(|_| PriceBoundIssue::Unparseable {
        bound: Bound::Max,
        text: max_s.to_string(),
    })?;
    if min > max {
        return Err(PriceBoundIssue::Inverted { min, max });
    }
    Ok(Some((min, max)))
}

type Predicate<'s> = Box<dyn Fn(&Transaction) -> bool + 's>;

fn predicates<'s>(
    spec: &'s FilterSpec,
    skipped: &mut Vec<SkippedConstraint>,
) -> Vec<Predicate<'s>> {
    let mut preds: Vec<Predicate<'s>> = Vec::new();

    if !spec.tag_titles.is_empty() {
        preds.push(Box::new(move |t: &Transaction| t.has_any_tag(&spec.tag_titles)));
    }

    match price_range(spec) {
        Ok(Some((min, max))) => preds.push(Box::new(move |t: &Transaction| {
            let total = t.line_total();
            total >= min && total <= max
        })),
        Ok(None) => {}
        Err(issue) => {
            let notice = SkippedConstraint::PriceRange(issue);
            tracing::warn!(%notice, "skipping filter constraint");
            skipped.push(notice);
        }
    }

    if let Some(needle) = spec.title_contains.as_deref().filter(|s| !s.is_empty()) {
        let needle = needle.to_lowercase();
        preds.push(Box::new(move |t: &Transaction| t.title.to_lowercase().contains(&needle)));
    }

    if let Some(from) = spec.date_from {
        preds.push(Box::new(move |t: &Transaction| t.created_at >= from));
    }
    if let Some(to) = spec.date_to {
        preds.push(Box::new(move |t: &Transaction| t.created_at <= to));
    }

    preds
}

fn compare(key: SortKey, a: &Transaction, b: &Transaction) -> Ordering {
    match key {
        SortKey::None => Ordering::Equal,
        SortKey::Title => a.title.cmp(&b.title),
        SortKey::Date => a.created_at.cmp(&b.created_at),
    }
}

/// Apply `spec` to `all` and return the surviving transactions in order.
///
/// The default spec returns `all` unchanged. Sorting is stable in both
/// directions, so ties keep their input order.
pub fn evaluate_filter(all: &[Transaction], spec: &FilterSpec) -> FilterOutcome {
    let mut skipped = Vec::new();
    let preds = predicates(spec, &mut skipped);

    let mut transactions: Vec<Transaction> = all
        .iter()
        .filter(|&t| preds.iter().all(|p| p(t)))
        .cloned()
        .collect();

    if spec.sort_key != SortKey::None {
        let key = spec.sort_key;
        match spec.sort_direction {
            SortDirection::Ascending => transactions.sort_by(|a, b| compare(key, a, b)),
            SortDirection::Descending => transactions.sort_by(|a, b| compare(key, b, a)),
        }
    }

    tracing::debug!(
        input = all.len(),
        output = transactions.len(),
        skipped = skipped.len(),
        "evaluated transaction filter"
    );
    FilterOutcome {
        transactions,
        skipped,
    }
}
