// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Category, Tag};
use crate::store::Store;
use anyhow::{Context, Result, anyhow, bail};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use rust_decimal::Decimal;
use std::sync::Once;

pub const CURRENCY_KEY: &str = "currency";
pub const REQUIRE_TAGS_KEY: &str = "require_tags";
pub const SETTING_KEYS: &[&str] = &[CURRENCY_KEY, REQUIRE_TAGS_KEY];

static TRACING_INIT: Once = Once::new();

/// Installs the stderr subscriber once; `RUST_LOG` overrides the default level.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{EnvFilter, fmt};

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("budgetkit=warn"));
        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    });
}

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

/// A date-range bound: RFC 3339 timestamps are taken as-is, bare dates cover
/// the whole day (start of day for `from`, last instant for `to`).
pub fn parse_date_bound(s: &str, end_of_day: bool) -> Result<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Ok(ts.with_timezone(&Utc));
    }
    let day = parse_date(s)?;
    let time = if end_of_day {
        NaiveTime::from_hms_nano_opt(23, 59, 59, 999_999_999)
    } else {
        Some(NaiveTime::MIN)
    }
    .ok_or_else(|| anyhow!("Invalid time of day"))?;
    Ok(day.and_time(time).and_utc())
}

pub fn fmt_money(d: &Decimal, ccy: &str) -> String {
    format!("{} {:.2}", ccy, d.round_dp(2))
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // arrays print one element per line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}

pub fn category_for_title<S: Store>(store: &S, title: &str) -> Result<Category> {
    store
        .category_by_title(title)?
        .with_context(|| format!("Category '{}' not found", title.trim()))
}

pub fn tag_for_title<S: Store>(store: &S, title: &str) -> Result<Tag> {
    store
        .tag_by_title(title)?
        .with_context(|| format!("Tag '{}' not found", title.trim()))
}

// Settings

pub fn get_currency<S: Store>(store: &S) -> Result<String> {
    Ok(store
        .setting(CURRENCY_KEY)?
        .unwrap_or_else(|| "USD".to_string()))
}

pub fn require_tags<S: Store>(store: &S) -> Result<bool> {
    match store.setting(REQUIRE_TAGS_KEY)? {
        Some(v) => parse_bool(&v),
        None => Ok(false),
    }
}

fn parse_bool(s: &str) -> Result<bool> {
    match s.trim().to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        other => Err(anyhow!("Invalid boolean '{}'", other)),
    }
}

/// Validate and persist a setting, returning the normalised value.
pub fn set_setting<S: Store>(store: &mut S, key: &str, value: &str) -> Result<String> {
    let key = key.trim();
    let normalised = match key {
        CURRENCY_KEY => {
            let ccy = value.trim().to_uppercase();
            if ccy.len() != 3 || !ccy.chars().all(|c| c.is_ascii_alphabetic()) {
                bail!("Invalid currency code '{}', expected three letters", value.trim());
            }
            ccy
        }
        REQUIRE_TAGS_KEY => parse_bool(value)?.to_string(),
        other => bail!(
            "Unknown setting '{}' (known: {})",
            other,
            SETTING_KEYS.join(", ")
        ),
    };
    store.set_setting(key, &normalised)?;
    Ok(normalised)
}
