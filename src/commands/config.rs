// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::store::Store;
use crate::utils::{SETTING_KEYS, get_currency, pretty_table, require_tags, set_setting};
use anyhow::{Result, bail};

fn current<S: Store>(store: &S, key: &str) -> Result<String> {
    match key {
        "currency" => get_currency(store),
        "require_tags" => Ok(require_tags(store)?.to_string()),
        other => bail!("Unknown setting '{}' (known: {})", other, SETTING_KEYS.join(", ")),
    }
}

pub fn handle<S: Store>(store: &mut S, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("get", sub)) => {
            let key = sub.get_one::<String>("key").map(String::as_str).unwrap_or_default();
            println!("{}", current(store, key.trim())?);
        }
        Some(("set", sub)) => {
            let key = sub.get_one::<String>("key").map(String::as_str).unwrap_or_default();
            let value = sub.get_one::<String>("value").map(String::as_str).unwrap_or_default();
            let stored = set_setting(store, key, value)?;
            println!("{} = {}", key.trim(), stored);
        }
        Some(("list", _)) => {
            let mut rows = Vec::new();
            for key in SETTING_KEYS {
                rows.push(vec![key.to_string(), current(store, key)?]);
            }
            println!("{}", pretty_table(&["Setting", "Value"], rows));
        }
        _ => {}
    }
    Ok(())
}
