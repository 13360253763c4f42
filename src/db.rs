// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::StoreError;
use crate::models::{Category, NewCategory, NewTransaction, Tag, Transaction};
use crate::store::{Store, check_limit, check_line, check_title};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;
use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Budgetkit", "budgetkit"));

/// Where the database lives: `explicit` if given, otherwise the platform data dir.
pub fn db_path(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(p) = explicit {
        if let Some(parent) = p.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        return Ok(p.to_path_buf());
    }
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("budgetkit.sqlite"))
}

pub fn open_or_init(explicit: Option<&Path>) -> Result<SqliteStore> {
    let path = db_path(explicit)?;
    let conn =
        Connection::open(&path).with_context(|| format!("Open DB at {}", path.display()))?;
    let store = SqliteStore::from_connection(conn)
        .with_context(|| format!("Initialise schema in {}", path.display()))?;
    tracing::info!(path = %path.display(), "opened budget database");
    Ok(store)
}

fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS categories(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL UNIQUE,
        limit_amount TEXT NOT NULL,
        created_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS tags(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL UNIQUE
    );

    CREATE TABLE IF NOT EXISTS transactions(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        unit_price TEXT NOT NULL,
        quantity INTEGER NOT NULL DEFAULT 1 CHECK(quantity > 0),
        created_at TEXT NOT NULL,
        category_id INTEGER NOT NULL,
        FOREIGN KEY(category_id) REFERENCES categories(id) ON DELETE RESTRICT
    );
    CREATE INDEX IF NOT EXISTS idx_transactions_category ON transactions(category_id);

    CREATE TABLE IF NOT EXISTS transaction_tags(
        transaction_id INTEGER NOT NULL,
        tag_id INTEGER NOT NULL,
        PRIMARY KEY(transaction_id, tag_id),
        FOREIGN KEY(transaction_id) REFERENCES transactions(id) ON DELETE CASCADE,
        FOREIGN KEY(tag_id) REFERENCES tags(id) ON DELETE CASCADE
    );
    "#,
    )
}

fn stored_decimal(field: &'static str, s: &str) -> Result<Decimal, StoreError> {
    s.parse::<Decimal>().map_err(|_| StoreError::Corrupt {
        field,
        value: s.to_string(),
    })
}

fn exists(conn: &Connection, sql: &str, id: i64) -> Result<bool, StoreError> {
    Ok(conn
        .query_row(sql, params![id], |_| Ok(()))
        .optional()?
        .is_some())
}

fn require_category(conn: &Connection, id: i64) -> Result<(), StoreError> {
    if exists(conn, "SELECT 1 FROM categories WHERE id=?1", id)? {
        Ok(())
    } else {
        Err(StoreError::NotFound { kind: "category", id })
    }
}

fn link_tags(
    conn: &Connection,
    transaction_id: i64,
    tag_ids: &BTreeSet<i64>,
) -> Result<(), StoreError> {
    for &tag_id in tag_ids {
        if !exists(conn, "SELECT 1 FROM tags WHERE id=?1", tag_id)? {
            return Err(StoreError::NotFound { kind: "tag", id: tag_id });
        }
        conn.execute(
            "INSERT OR IGNORE INTO transaction_tags(transaction_id, tag_id) VALUES (?1, ?2)",
            params![transaction_id, tag_id],
        )?;
    }
    Ok(())
}

/// SQLite-backed [`Store`]. Amounts are kept as decimal text.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        init_schema(&conn)?;
        Ok(Self { conn })
    }

    pub fn open(path: &Path) -> Result<Self, StoreError> {
        Self::from_connection(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    fn title_taken(
        &self,
        table: &str,
        title: &str,
        except: Option<i64>,
    ) -> Result<bool, StoreError> {
        let sql = format!("SELECT id FROM {} WHERE title=?1", table);
        let found: Option<i64> = self
            .conn
            .query_row(&sql, params![title], |r| r.get(0))
            .optional()?;
        Ok(matches!(found, Some(id) if Some(id) != except))
    }

    fn tags_by_transaction(&self) -> Result<HashMap<i64, BTreeSet<Tag>>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT tt.transaction_id, g.id, g.title
             FROM transaction_tags tt JOIN tags g ON g.id = tt.tag_id",
        )?;
        let rows = stmt.query_map([], |r| {
            Ok((
                r.get::<_, i64>(0)?,
                Tag {
                    id: r.get(1)?,
                    title: r.get(2)?,
                },
            ))
        })?;
        let mut map: HashMap<i64, BTreeSet<Tag>> = HashMap::new();
        for row in rows {
            let (tx_id, tag) = row?;
            map.entry(tx_id).or_default().insert(tag);
        }
        Ok(map)
    }
}

impl Store for SqliteStore {
    fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, title, limit_amount, created_at FROM categories ORDER BY id")?;
        let rows = stmt.query_map([], |r| {
            Ok((
                r.get::<_, i64>(0)?,
                r.get::<_, String>(1)?,
                r.get::<_, String>(2)?,
                r.get::<_, DateTime<Utc>>(3)?,
            ))
        })?;
        let mut data = Vec::new();
        for row in rows {
            let (id, title, limit_s, created_at) = row?;
            data.push(Category {
                id,
                title,
                limit: stored_decimal("limit", &limit_s)?,
                created_at,
            });
        }
        Ok(data)
    }

    fn list_transactions(&self) -> Result<Vec<Transaction>, StoreError> {
        let mut tags = self.tags_by_transaction()?;
        let mut stmt = self.conn.prepare(
            "SELECT id, title, unit_price, quantity, created_at, category_id
             FROM transactions ORDER BY id",
        )?;
        let rows = stmt.query_map([], |r| {
            Ok((
                r.get::<_, i64>(0)?,
                r.get::<_, String>(1)?,
                r.get::<_, String>(2)?,
                r.get::<_, i64>(3)?,
                r.get::<_, DateTime<Utc>>(4)?,
                r.get::<_, i64>(5)?,
            ))
        })?;
        let mut data = Vec::new();
        for row in rows {
            let (id, title, price_s, qty, created_at, category_id) = row?;
            let quantity = u32::try_from(qty).map_err(|_| StoreError::Corrupt {
                field: "quantity",
                value: qty.to_string(),
            })?;
            data.push(Transaction {
                id,
                title,
                unit_price: stored_decimal("unit price", &price_s)?,
                quantity,
                created_at,
                category_id,
                tags: tags.remove(&id).unwrap_or_default(),
            });
        }
        Ok(data)
    }

    fn list_tags(&self) -> Result<Vec<Tag>, StoreError> {
        let mut stmt = self.conn.prepare("SELECT id, title FROM tags ORDER BY id")?;
        let rows = stmt.query_map([], |r| {
            Ok(Tag {
                id: r.get(0)?,
                title: r.get(1)?,
            })
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    fn create_category(&mut self, new: NewCategory) -> Result<Category, StoreError> {
        let title = check_title("category title", &new.title)?;
        check_limit(new.limit)?;
        if self.title_taken("categories", &title, None)? {
            return Err(StoreError::DuplicateTitle { kind: "category", title });
        }
        let created_at = Utc::now();
        self.conn.execute(
            "INSERT INTO categories(title, limit_amount, created_at) VALUES (?1, ?2, ?3)",
            params![title, new.limit.to_string(), created_at],
        )?;
        let id = self.conn.last_insert_rowid();
        tracing::debug!(id, title = %title, "created category");
        Ok(Category {
            id,
            title,
            limit: new.limit,
            created_at,
        })
    }

    fn update_category(&mut self, category: &Category) -> Result<(), StoreError> {
        let title = check_title("category title", &category.title)?;
        check_limit(category.limit)?;
        if self.title_taken("categories", &title, Some(category.id))? {
            return Err(StoreError::DuplicateTitle { kind: "category", title });
        }
        let changed = self.conn.execute(
            "UPDATE categories SET title=?1, limit_amount=?2 WHERE id=?3",
            params![title, category.limit.to_string(), category.id],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound { kind: "category", id: category.id });
        }
        tracing::debug!(id = category.id, "updated category");
        Ok(())
    }

    fn delete_category(&mut self, id: i64) -> Result<(), StoreError> {
        require_category(&self.conn, id)?;
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM transactions WHERE category_id=?1",
            params![id],
            |r| r.get(0),
        )?;
        if count > 0 {
            return Err(StoreError::CategoryInUse {
                id,
                count: count as usize,
            });
        }
        self.conn
            .execute("DELETE FROM categories WHERE id=?1", params![id])?;
        tracing::debug!(id, "deleted category");
        Ok(())
    }

    fn delete_category_cascade(&mut self, id: i64) -> Result<usize, StoreError> {
        let db_tx = self.conn.transaction()?;
        require_category(&db_tx, id)?;
        let removed = db_tx.execute("DELETE FROM transactions WHERE category_id=?1", params![id])?;
        db_tx.execute("DELETE FROM categories WHERE id=?1", params![id])?;
        db_tx.commit()?;
        tracing::debug!(id, removed, "deleted category with its transactions");
        Ok(removed)
    }

    fn create_transaction(&mut self, new: NewTransaction) -> Result<Transaction, StoreError> {
        let title = check_title("transaction title", &new.title)?;
        check_line(new.unit_price, new.quantity)?;
        let created_at = Utc::now();

        let db_tx = self.conn.transaction()?;
        require_category(&db_tx, new.category_id)?;
        db_tx.execute(
            "INSERT INTO transactions(title, unit_price, quantity, created_at, category_id)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                title,
                new.unit_price.to_string(),
                new.quantity,
                created_at,
                new.category_id
            ],
        )?;
        let id = db_tx.last_insert_rowid();
        link_tags(&db_tx, id, &new.tag_ids)?;
        db_tx.commit()?;

        tracing::debug!(id, category_id = new.category_id, "created transaction");
        self.transaction(id)
    }

    fn update_transaction(&mut self, transaction: &Transaction) -> Result<(), StoreError> {
        let title = check_title("transaction title", &transaction.title)?;
        check_line(transaction.unit_price, transaction.quantity)?;
        let tag_ids: BTreeSet<i64> = transaction.tags.iter().map(|t| t.id).collect();

        let db_tx = self.conn.transaction()?;
        require_category(&db_tx, transaction.category_id)?;
        let changed = db_tx.execute(
            "UPDATE transactions
             SET title=?1, unit_price=?2, quantity=?3, category_id=?4
             WHERE id=?5",
            params![
                title,
                transaction.unit_price.to_string(),
                transaction.quantity,
                transaction.category_id,
                transaction.id
            ],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound { kind: "transaction", id: transaction.id });
        }
        db_tx.execute(
            "DELETE FROM transaction_tags WHERE transaction_id=?1",
            params![transaction.id],
        )?;
        link_tags(&db_tx, transaction.id, &tag_ids)?;
        db_tx.commit()?;
        tracing::debug!(id = transaction.id, "updated transaction");
        Ok(())
    }

    fn delete_transaction(&mut self, id: i64) -> Result<(), StoreError> {
        let changed = self
            .conn
            .execute("DELETE FROM transactions WHERE id=?1", params![id])?;
        if changed == 0 {
            return Err(StoreError::NotFound { kind: "transaction", id });
        }
        tracing::debug!(id, "deleted transaction");
        Ok(())
    }

    fn create_tag(&mut self, title: &str) -> Result<Tag, StoreError> {
        let title = check_title("tag title", title)?;
        if self.title_taken("tags", &title, None)? {
            return Err(StoreError::DuplicateTitle { kind: "tag", title });
        }
        self.conn
            .execute("INSERT INTO tags(title) VALUES (?1)", params![title])?;
        let id = self.conn.last_insert_rowid();
        tracing::debug!(id, title = %title, "created tag");
        Ok(Tag { id, title })
    }

    fn setting(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self
            .conn
            .query_row(
                "SELECT value FROM settings WHERE key=?1",
                params![key],
                |r| r.get(0),
            )
            .optional()?)
    }

    fn set_setting(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO settings(key, value) VALUES(?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value=excluded.value",
            params![key, value],
        )?;
        Ok(())
    }
}
