// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use std::path::PathBuf;

use budgetkit::{cli, commands, db, utils};

fn main() -> Result<()> {
    utils::init_tracing();
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let explicit = matches.get_one::<String>("db").map(PathBuf::from);
    let mut store = db::open_or_init(explicit.as_deref())?;

    match matches.subcommand() {
        Some(("init", _)) => {
            println!(
                "Database initialized at {}",
                db::db_path(explicit.as_deref())?.display()
            );
        }
        Some(("category", sub)) => commands::categories::handle(&mut store, sub)?,
        Some(("tx", sub)) => commands::transactions::handle(&mut store, sub)?,
        Some(("tag", sub)) => commands::tags::handle(&mut store, sub)?,
        Some(("filter", sub)) => commands::filter::handle(&store, sub)?,
        Some(("summary", sub)) => commands::summary::handle(&store, sub)?,
        Some(("config", sub)) => commands::config::handle(&mut store, sub)?,
        Some(("doctor", _)) => commands::doctor::handle(&store)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
