// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Persistence contract for categories, transactions, tags, and settings.
//!
//! The engines in [`crate::aggregate`] and [`crate::filter`] only ever see the
//! snapshots returned by `list_*`; command handlers take a `&mut impl Store`
//! so tests can swap in [`MemoryStore`].

use crate::error::StoreError;
use crate::models::{Category, NewCategory, NewTransaction, Tag, Transaction};
use chrono::Utc;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, BTreeSet};

pub trait Store {
    fn list_categories(&self) -> Result<Vec<Category>, StoreError>;
    fn list_transactions(&self) -> Result<Vec<Transaction>, StoreError>;
    fn list_tags(&self) -> Result<Vec<Tag>, StoreError>;

    fn create_category(&mut self, new: NewCategory) -> Result<Category, StoreError>;
    /// Persists `title` and `limit`; `created_at` is never rewritten.
    fn update_category(&mut self, category: &Category) -> Result<(), StoreError>;
    /// Fails with [`StoreError::CategoryInUse`] while transactions reference it.
    fn delete_category(&mut self, id: i64) -> Result<(), StoreError>;
    /// Deletes the category and every transaction filed under it, all or nothing.
    /// Returns how many transactions went with it.
    fn delete_category_cascade(&mut self, id: i64) -> Result<usize, StoreError>;

    fn create_transaction(&mut self, new: NewTransaction) -> Result<Transaction, StoreError>;
    /// Persists `title`, `unit_price`, `quantity`, `tags`, and `category_id`.
    fn update_transaction(&mut self, transaction: &Transaction) -> Result<(), StoreError>;
    fn delete_transaction(&mut self, id: i64) -> Result<(), StoreError>;

    fn create_tag(&mut self, title: &str) -> Result<Tag, StoreError>;

    fn setting(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set_setting(&mut self, key: &str, value: &str) -> Result<(), StoreError>;

    fn category(&self, id: i64) -> Result<Category, StoreError> {
        self.list_categories()?
            .into_iter()
            .find(|c| c.id == id)
            .ok_or(StoreError::NotFound { kind: "category", id })
    }

    fn category_by_title(&self, title: &str) -> Result<Option<Category>, StoreError> {
        let title = title.trim();
        Ok(self.list_categories()?.into_iter().find(|c| c.title == title))
    }

    fn transaction(&self, id: i64) -> Result<Transaction, StoreError> {
        self.list_transactions()?
            .into_iter()
            .find(|t| t.id == id)
            .ok_or(StoreError::NotFound { kind: "transaction", id })
    }

    fn tag_by_title(&self, title: &str) -> Result<Option<Tag>, StoreError> {
        let title = title.trim();
        Ok(self.list_tags()?.into_iter().find(|t| t.title == title))
    }
}

pub(crate) fn check_title(field: &'static str, title: &str) -> Result<String, StoreError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(StoreError::Invalid {
            field,
            reason: "must not be empty".into(),
        });
    }
    Ok(title.to_string())
}

pub(crate) fn check_limit(limit: Decimal) -> Result<(), StoreError> {
    if limit < Decimal::ZERO {
        return Err(StoreError::Invalid {
            field: "limit",
            reason: format!("{} is negative", limit),
        });
    }
    Ok(())
}

pub(crate) fn check_line(unit_price: Decimal, quantity: u32) -> Result<(), StoreError> {
    if unit_price <= Decimal::ZERO {
        return Err(StoreError::Invalid {
            field: "unit price",
            reason: format!("{} is not greater than zero", unit_price),
        });
    }
    if quantity == 0 {
        return Err(StoreError::Invalid {
            field: "quantity",
            reason: "must be at least 1".into(),
        });
    }
    if unit_price.checked_mul(Decimal::from(quantity)).is_none() {
        return Err(StoreError::Invalid {
            field: "line total",
            reason: format!("{} x {} is out of range", quantity, unit_price),
        });
    }
    Ok(())
}

/// In-memory store; every record draws its id from one shared counter.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    categories: Vec<Category>,
    transactions: Vec<Transaction>,
    tags: Vec<Tag>,
    settings: BTreeMap<String, String>,
    next_id: i64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn require_category(&self, id: i64) -> Result<(), StoreError> {
        if self.categories.iter().any(|c| c.id == id) {
            Ok(())
        } else {
            Err(StoreError::NotFound { kind: "category", id })
        }
    }

    fn resolve_tags(
        &self,
        ids: impl IntoIterator<Item = i64>,
    ) -> Result<BTreeSet<Tag>, StoreError> {
        ids.into_iter()
            .map(|id| {
                self.tags
                    .iter()
                    .find(|t| t.id == id)
                    .cloned()
                    .ok_or(StoreError::NotFound { kind: "tag", id })
            })
            .collect()
    }
}

impl Store for MemoryStore {
    fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        Ok(self.categories.clone())
    }

    fn list_transactions(&self) -> Result<Vec<Transaction>, StoreError> {
        Ok(self.transactions.clone())
    }

    fn list_tags(&self) -> Result<Vec<Tag>, StoreError> {
        Ok(self.tags.clone())
    }

    fn create_category(&mut self, new: NewCategory) -> Result<Category, StoreError> {
        let title = check_title("category title", &new.title)?;
        check_limit(new.limit)?;
        if self.categories.iter().any(|c| c.title == title) {
            return Err(StoreError::DuplicateTitle { kind: "category", title });
        }
        let category = Category {
            id: self.allocate_id(),
            title,
            limit: new.limit,
            created_at: Utc::now(),
        };
        tracing::debug!(id = category.id, title = %category.title, "created category");
        self.categories.push(category.clone());
        Ok(category)
    }

    fn update_category(&mut self, category: &Category) -> Result<(), StoreError> {
        let title = check_title("category title", &category.title)?;
        check_limit(category.limit)?;
        if self
            .categories
            .iter()
            .any(|c| c.id != category.id && c.title == title)
        {
            return Err(StoreError::DuplicateTitle { kind: "category", title });
        }
        let existing = self
            .categories
            .iter_mut()
            .find(|c| c.id == category.id)
            .ok_or(StoreError::NotFound { kind: "category", id: category.id })?;
        existing.title = title;
        existing.limit = category.limit;
        tracing::debug!(id = category.id, "updated category");
        Ok(())
    }

    fn delete_category(&mut self, id: i64) -> Result<(), StoreError> {
        self.require_category(id)?;
        let count = self.transactions.iter().filter(|t| t.category_id == id).count();
        if count > 0 {
            return Err(StoreError::CategoryInUse { id, count });
        }
        self.categories.retain(|c| c.id != id);
        tracing::debug!(id, "deleted category");
        Ok(())
    }

    fn delete_category_cascade(&mut self, id: i64) -> Result<usize, StoreError> {
        self.require_category(id)?;
        let before = self.transactions.len();
        self.transactions.retain(|t| t.category_id != id);
        let removed = before - self.transactions.len();
        self.categories.retain(|c| c.id != id);
        tracing::debug!(id, removed, "deleted category with its transactions");
        Ok(removed)
    }

    fn create_transaction(&mut self, new: NewTransaction) -> Result<Transaction, StoreError> {
        let title = check_title("transaction title", &new.title)?;
        check_line(new.unit_price, new.quantity)?;
        self.require_category(new.category_id)?;
        let tags = self.resolve_tags(new.tag_ids)?;
        let transaction = Transaction {
            id: self.allocate_id(),
            title,
            unit_price: new.unit_price,
            quantity: new.quantity,
            created_at: Utc::now(),
            category_id: new.category_id,
            tags,
        };
        tracing::debug!(
            id = transaction.id,
            category_id = transaction.category_id,
            "created transaction"
        );
        self.transactions.push(transaction.clone());
        Ok(transaction)
    }

    fn update_transaction(&mut self, transaction: &Transaction) -> Result<(), StoreError> {
        let title = check_title("transaction title", &transaction.title)?;
        check_line(transaction.unit_price, transaction.quantity)?;
        self.require_category(transaction.category_id)?;
        let tags = self.resolve_tags(transaction.tags.iter().map(|t| t.id))?;
        let existing = self
            .transactions
            .iter_mut()
            .find(|t| t.id == transaction.id)
            .ok_or(StoreError::NotFound { kind: "transaction", id: transaction.id })?;
        existing.title = title;
        existing.unit_price = transaction.unit_price;
        existing.quantity = transaction.quantity;
        existing.category_id = transaction.category_id;
        existing.tags = tags;
        tracing::debug!(id = transaction.id, "updated transaction");
        Ok(())
    }

    fn delete_transaction(&mut self, id: i64) -> Result<(), StoreError> {
        let before = self.transactions.len();
        self.transactions.retain(|t| t.id != id);
        if self.transactions.len() == before {
            return Err(StoreError::NotFound { kind: "transaction", id });
        }
        tracing::debug!(id, "deleted transaction");
        Ok(())
    }

    fn create_tag(&mut self, title: &str) -> Result<Tag, StoreError> {
        let title = check_title("tag title", title)?;
        if self.tags.iter().any(|t| t.title == title) {
            return Err(StoreError::DuplicateTitle { kind: "tag", title });
        }
        let tag = Tag {
            id: self.allocate_id(),
            title,
        };
        tracing::debug!(id = tag.id, title = %tag.title, "created tag");
        self.tags.push(tag.clone());
        Ok(tag)
    }

    fn setting(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.settings.get(key).cloned())
    }

    fn set_setting(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.settings.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
