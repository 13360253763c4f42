// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::store::Store;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;

pub fn handle<S: Store>(store: &mut S, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let title = sub.get_one::<String>("title").map(String::as_str).unwrap_or_default();
            let tag = store.create_tag(title)?;
            println!("Added tag '{}'", tag.title);
        }
        Some(("list", sub)) => {
            let tags = store.list_tags()?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &tags)? {
                let data = tags
                    .into_iter()
                    .map(|t| vec![t.id.to_string(), t.title])
                    .collect();
                println!("{}", pretty_table(&["ID", "Tag"], data));
            }
        }
        _ => {}
    }
    Ok(())
}
