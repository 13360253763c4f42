// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: i64 },
    #[error("{kind} titled '{title}' already exists")]
    DuplicateTitle { kind: &'static str, title: String },
    #[error("category {id} still has {count} transaction(s); delete or reassign them first")]
    CategoryInUse { id: i64, count: usize },
    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
    #[error("stored {field} '{value}' is not readable")]
    Corrupt { field: &'static str, value: String },
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
}

/// Every message produced by an entry form, in field order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", .0.join(" "))]
pub struct FormError(pub Vec<String>);

impl FormError {
    pub fn messages(&self) -> &[String] {
        &self.0
    }
}
