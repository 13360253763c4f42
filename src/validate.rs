// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Entry-form checks run before anything reaches the store.
//!
//! Forms hold the raw text the user typed. Validation reports every problem
//! at once rather than stopping at the first.

use crate::error::FormError;
use crate::models::{NewCategory, NewTransaction};
use rust_decimal::Decimal;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default)]
pub struct CategoryForm {
    pub title: String,
    pub limit: String,
}

impl CategoryForm {
    pub fn validate(&self) -> Result<NewCategory, FormError> {
        let mut messages = Vec::new();
        let title = self.title.trim();
        if title.is_empty() {
            messages.push("Title is required.".to_string());
        }
        let limit = self.limit.trim();
        let parsed = if limit.is_empty() {
            messages.push("Limit is required.".to_string());
            None
        } else {
            match limit.parse::<Decimal>() {
                Ok(v) if v > Decimal::ZERO => Some(v),
                _ => {
                    messages.push("Limit must be a valid number greater than zero.".to_string());
                    None
                }
            }
        };
        match parsed {
            Some(limit) if messages.is_empty() => Ok(NewCategory {
                title: title.to_string(),
                limit,
            }),
            _ => Err(FormError(messages)),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TransactionForm {
    pub title: String,
    pub unit_price: String,
    /// Blank means one unit.
    pub quantity: String,
    pub category_id: i64,
    pub tag_ids: BTreeSet<i64>,
}

impl TransactionForm {
    pub fn validate(&self, require_tags: bool) -> Result<NewTransaction, FormError> {
        let mut messages = Vec::new();
        let title = self.title.trim();
        if title.is_empty() {
            messages.push("Title is required.".to_string());
        }

        let unit_price = match self.unit_price.trim().parse::<Decimal>() {
            Ok(v) if v > Decimal::ZERO => Some(v),
            _ => {
                messages.push("Price must be a valid number greater than zero.".to_string());
                None
            }
        };

        let qty = self.quantity.trim();
        let quantity = if qty.is_empty() {
            Some(1)
        } else {
            match qty.parse::<u32>() {
                Ok(q) if q > 0 => Some(q),
                _ => {
                    messages.push("Quantity must be a whole number greater than zero.".to_string());
                    None
                }
            }
        };

        if require_tags && self.tag_ids.is_empty() {
            messages.push("Select at least one tag.".to_string());
        }

        match (unit_price, quantity) {
            (Some(unit_price), Some(quantity)) if messages.is_empty() => Ok(NewTransaction {
                title: title.to_string(),
                unit_price,
                quantity,
                category_id: self.category_id,
                tag_ids: self.tag_ids.clone(),
            }),
            _ => Err(FormError(messages)),
        }
    }
}
