// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, command};

fn json_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON object per line"),
    )
}

fn tag_arg() -> Arg {
    Arg::new("tag")
        .long("tag")
        .action(ArgAction::Append)
        .help("Tag title (repeatable)")
}

pub fn build_cli() -> Command {
    command!()
        .name("budgetkit")
        .about("Category budgets, tagged expenses, and transaction filters")
        .arg(
            Arg::new("db")
                .long("db")
                .env("BUDGETKIT_DB")
                .global(true)
                .help("Path to the SQLite database (defaults to the platform data dir)"),
        )
        .subcommand(Command::new("init").about("Create the database if missing"))
        .subcommand(
            Command::new("category")
                .about("Budget categories")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("title").long("title").required(true))
                        .arg(Arg::new("limit").long("limit").required(true)),
                )
                .subcommand(
                    Command::new("edit")
                        .arg(Arg::new("title").long("title").required(true))
                        .arg(Arg::new("new_title").long("new-title"))
                        .arg(Arg::new("limit").long("limit")),
                )
                .subcommand(
                    Command::new("rm")
                        .arg(Arg::new("title").long("title").required(true))
                        .arg(
                            Arg::new("cascade")
                                .long("cascade")
                                .action(ArgAction::SetTrue)
                                .help("Also delete the category's transactions"),
                        ),
                )
                .subcommand(json_args(Command::new("list")))
                .subcommand(json_args(
                    Command::new("show").arg(Arg::new("title").long("title").required(true)),
                )),
        )
        .subcommand(
            Command::new("tx")
                .about("Transactions")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("category").long("category").required(true))
                        .arg(Arg::new("title").long("title").required(true))
                        .arg(Arg::new("price").long("price").required(true))
                        .arg(Arg::new("quantity").long("quantity"))
                        .arg(tag_arg()),
                )
                .subcommand(
                    Command::new("edit")
                        .arg(Arg::new("id").long("id").required(true))
                        .arg(Arg::new("title").long("title"))
                        .arg(Arg::new("price").long("price"))
                        .arg(Arg::new("quantity").long("quantity"))
                        .arg(Arg::new("category").long("category"))
                        .arg(tag_arg())
                        .arg(
                            Arg::new("clear_tags")
                                .long("clear-tags")
                                .action(ArgAction::SetTrue)
                                .conflicts_with("tag"),
                        ),
                )
                .subcommand(Command::new("rm").arg(Arg::new("id").long("id").required(true)))
                .subcommand(json_args(
                    Command::new("list").arg(Arg::new("category").long("category")),
                )),
        )
        .subcommand(
            Command::new("tag")
                .about("Tags")
                .subcommand(Command::new("add").arg(Arg::new("title").long("title").required(true)))
                .subcommand(json_args(Command::new("list"))),
        )
        .subcommand(json_args(
            Command::new("filter")
                .about("Filter and sort transactions")
                .arg(tag_arg())
                .arg(Arg::new("min").long("min").help("Minimum line total"))
                .arg(Arg::new("max").long("max").help("Maximum line total"))
                .arg(Arg::new("title").long("title").help("Title contains (case-insensitive)"))
                .arg(
                    Arg::new("from")
                        .long("from")
                        .help("Created on/after (YYYY-MM-DD or RFC 3339)"),
                )
                .arg(Arg::new("to").long("to").help("Created on/before (YYYY-MM-DD or RFC 3339)"))
                .arg(
                    Arg::new("sort")
                        .long("sort")
                        .default_value("none")
                        .help("none|title|date"),
                )
                .arg(
                    Arg::new("desc")
                        .long("desc")
                        .action(ArgAction::SetTrue)
                        .help("Sort descending"),
                ),
        ))
        .subcommand(json_args(
            Command::new("summary").about("Per-category spending and the grand total of limits"),
        ))
        .subcommand(
            Command::new("config")
                .about("Persistent settings")
                .subcommand(Command::new("get").arg(Arg::new("key").long("key").required(true)))
                .subcommand(
                    Command::new("set")
                        .arg(Arg::new("key").long("key").required(true))
                        .arg(Arg::new("value").long("value").required(true)),
                )
                .subcommand(Command::new("list")),
        )
        .subcommand(Command::new("doctor").about("Check stored data for integrity problems"))
}
