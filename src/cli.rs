// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .conflicts_with("jsonl")
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print as JSON lines"),
    )
}

fn as_of() -> Arg {
    Arg::new("as-of")
        .long("as-of")
        .value_name("YYYY-MM-DD")
        .help("Reference day (defaults to today)")
}

fn period_arg(default: &'static str) -> Arg {
    Arg::new("period")
        .long("period")
        .value_parser(["day", "week", "month", "year"])
        .default_value(default)
}

fn id_arg() -> Arg {
    Arg::new("id").long("id").required(true)
}

fn payment_arg() -> Arg {
    Arg::new("payment")
        .long("payment")
        .value_parser(["cash", "card", "upi", "bank_transfer", "other"])
}

pub fn build_cli() -> Command {
    Command::new("spendlens")
        .about("Personal spending analytics: budgets, alerts, insights and streaks")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Debug logging to stderr"),
        )
        .arg(
            Arg::new("db")
                .long("db")
                .global(true)
                .env(crate::db::DB_ENV)
                .value_name("PATH")
                .help("SQLite database file"),
        )
        .subcommand(Command::new("init").about("Create the database and seed defaults"))
        .subcommand(
            Command::new("expense")
                .about("Record and browse expenses")
                .subcommand_required(true)
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("category").long("category").required(true))
                        .arg(Arg::new("date").long("date").value_name("YYYY-MM-DD"))
                        .arg(Arg::new("note").long("note"))
                        .arg(payment_arg()),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .arg(Arg::new("from").long("from").value_name("YYYY-MM-DD"))
                        .arg(Arg::new("to").long("to").value_name("YYYY-MM-DD"))
                        .arg(Arg::new("category").long("category"))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(clap::value_parser!(usize)),
                        ),
                ))
                .subcommand(Command::new("rm").arg(id_arg())),
        )
        .subcommand(
            Command::new("income")
                .about("Record and browse income")
                .subcommand_required(true)
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("source").long("source").required(true))
                        .arg(Arg::new("date").long("date").value_name("YYYY-MM-DD"))
                        .arg(Arg::new("note").long("note")),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .arg(Arg::new("from").long("from").value_name("YYYY-MM-DD"))
                        .arg(Arg::new("to").long("to").value_name("YYYY-MM-DD")),
                ))
                .subcommand(Command::new("rm").arg(id_arg())),
        )
        .subcommand(
            Command::new("limit")
                .about("Per-category budget limits")
                .subcommand_required(true)
                .subcommand(
                    Command::new("set")
                        .arg(Arg::new("category").long("category").required(true))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(period_arg("month")),
                )
                .subcommand(json_flags(Command::new("list").arg(as_of())))
                .subcommand(Command::new("rm").arg(id_arg())),
        )
        .subcommand(
            Command::new("goal")
                .about("Savings goals")
                .subcommand_required(true)
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("target").long("target").required(true))
                        .arg(Arg::new("by").long("by").value_name("YYYY-MM-DD"))
                        .arg(as_of()),
                )
                .subcommand(json_flags(Command::new("list").arg(as_of())))
                .subcommand(
                    Command::new("contribute")
                        .arg(id_arg())
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(as_of()),
                ),
        )
        .subcommand(
            Command::new("recurring")
                .about("Recurring expense definitions")
                .subcommand_required(true)
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("title").long("title").required(true))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("category").long("category").required(true))
                        .arg(
                            Arg::new("frequency")
                                .long("frequency")
                                .value_parser(["daily", "weekly", "monthly", "yearly"])
                                .required(true),
                        )
                        .arg(Arg::new("start").long("start").value_name("YYYY-MM-DD"))
                        .arg(Arg::new("end").long("end").value_name("YYYY-MM-DD"))
                        .arg(Arg::new("note").long("note"))
                        .arg(payment_arg()),
                )
                .subcommand(json_flags(Command::new("list")))
                .subcommand(Command::new("pause").arg(id_arg()))
                .subcommand(Command::new("resume").arg(id_arg()))
                .subcommand(json_flags(
                    Command::new("run")
                        .about("Materialize every definition due on the reference day")
                        .arg(as_of()),
                )),
        )
        .subcommand(
            Command::new("report")
                .about("Summaries, charts and the calendar view")
                .subcommand_required(true)
                .subcommand(json_flags(
                    Command::new("summary").arg(period_arg("month")).arg(as_of()),
                ))
                .subcommand(json_flags(
                    Command::new("chart")
                        .arg(
                            Arg::new("bucket")
                                .long("bucket")
                                .value_parser(["day", "week", "month", "year"])
                                .default_value("day"),
                        )
                        .arg(Arg::new("from").long("from").value_name("YYYY-MM-DD").required(true))
                        .arg(Arg::new("to").long("to").value_name("YYYY-MM-DD").required(true)),
                ))
                .subcommand(json_flags(
                    Command::new("calendar")
                        .arg(Arg::new("month").long("month").value_name("YYYY-MM").required(true)),
                )),
        )
        .subcommand(
            Command::new("alerts")
                .about("Budget and overspending alerts")
                .subcommand_required(true)
                .subcommand(json_flags(Command::new("check").arg(as_of())))
                .subcommand(json_flags(
                    Command::new("list").arg(
                        Arg::new("unread")
                            .long("unread")
                            .action(ArgAction::SetTrue),
                    ),
                ))
                .subcommand(
                    Command::new("read")
                        .arg(Arg::new("id").long("id").conflicts_with("all"))
                        .arg(Arg::new("all").long("all").action(ArgAction::SetTrue)),
                ),
        )
        .subcommand(
            Command::new("insights")
                .about("Period-over-period spending insights")
                .subcommand_required(true)
                .subcommand(json_flags(
                    Command::new("generate").arg(period_arg("month")).arg(as_of()),
                ))
                .subcommand(json_flags(
                    Command::new("list").arg(
                        Arg::new("unread")
                            .long("unread")
                            .action(ArgAction::SetTrue),
                    ),
                )),
        )
        .subcommand(
            Command::new("streaks")
                .about("Tracking and no-spend streaks")
                .subcommand_required(true)
                .subcommand(json_flags(Command::new("show").arg(as_of()))),
        )
        .subcommand(
            Command::new("achievements")
                .about("Achievement progress")
                .subcommand_required(true)
                .subcommand(json_flags(Command::new("list")))
                .subcommand(json_flags(Command::new("check").arg(as_of()))),
        )
        .subcommand(
            Command::new("config")
                .about("Show or change settings")
                .subcommand_required(true)
                .subcommand(json_flags(Command::new("show")))
                .subcommand(
                    Command::new("set")
                        .arg(Arg::new("key").required(true))
                        .arg(Arg::new("value").required(true)),
                ),
        )
        .subcommand(Command::new("doctor").about("Check stored data for inconsistencies"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_tree_is_consistent() {
        build_cli().debug_assert();
    }

    #[test]
    fn db_flag_is_global() {
        let m = build_cli().get_matches_from(["spendlens", "doctor", "--db", "/tmp/x.sqlite"]);
        assert_eq!(m.get_one::<String>("db").map(String::as_str), Some("/tmp/x.sqlite"));
    }
}
