// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, arg, value_parser};

fn json_args(cmd: Command) -> Command {
    cmd.arg(arg!(--json "Print pretty JSON instead of a table"))
        .arg(arg!(--jsonl "Print one JSON document per line"))
}

fn period_args(cmd: Command) -> Command {
    cmd.arg(
        arg!(--period <PERIOD> "today | this-week | this-month | custom-month | always")
            .required(false),
    )
    .arg(arg!(--month <MONTH> "YYYY-MM, used with --period custom-month").required(false))
}

fn id_arg() -> Arg {
    arg!(--id <ID> "Row id").required(true)
}

// Negative values must reach amount validation instead of being read as flags.
fn amount_arg(help: &'static str) -> Arg {
    arg!(--amount <AMOUNT>)
        .help(help)
        .required(true)
        .allow_hyphen_values(true)
}

fn tx_cmd() -> Command {
    Command::new("tx")
        .about("Record and list transactions")
        .subcommand(
            Command::new("add")
                .about("Record a transaction")
                .arg(arg!(--date <DATE> "Payment date, YYYY-MM-DD").required(true))
                .arg(
                    Arg::new("type")
                        .long("type")
                        .value_name("TYPE")
                        .required(true)
                        .help("income | expense | transfer"),
                )
                .arg(amount_arg("Non-negative amount"))
                .arg(
                    arg!(--category <CATEGORY> "Category label; rules apply when omitted")
                        .required(false),
                )
                .arg(arg!(--description <TEXT>).required(false))
                .arg(
                    Arg::new("competence_date")
                        .long("competence-date")
                        .value_name("DATE")
                        .help("Accounting date when it differs from the payment date"),
                )
                .arg(arg!(--recurring "Mark as a recurring transaction"))
                .arg(
                    Arg::new("next_due")
                        .long("next-due")
                        .value_name("DATE")
                        .help("Next due date for a recurring transaction"),
                ),
        )
        .subcommand(json_args(period_args(
            Command::new("list")
                .about("List transactions")
                .arg(
                    Arg::new("type")
                        .long("type")
                        .value_name("TYPE")
                        .help("income | expense | transfer"),
                )
                .arg(arg!(--category <CATEGORY>).required(false))
                .arg(
                    arg!(--limit <N>)
                        .required(false)
                        .value_parser(value_parser!(usize)),
                ),
        )))
        .subcommand(Command::new("rm").about("Delete a transaction").arg(id_arg()))
        .subcommand(json_args(
            Command::new("upcoming")
                .about("Recurring transactions due soon")
                .arg(
                    arg!(--days <DAYS> "Look-ahead window in days")
                        .required(false)
                        .default_value("30")
                        .value_parser(value_parser!(u64)),
                ),
        ))
}

fn bill_cmd() -> Command {
    Command::new("bill")
        .about("Bills to pay")
        .subcommand(
            Command::new("add")
                .about("Add a bill, optionally split into monthly installments")
                .arg(arg!(--title <TITLE>).required(true))
                .arg(amount_arg("Total amount"))
                .arg(arg!(--due <DATE> "First due date, YYYY-MM-DD").required(true))
                .arg(arg!(--description <TEXT>).required(false))
                .arg(
                    arg!(--installments <N>)
                        .required(false)
                        .default_value("1")
                        .value_parser(value_parser!(u32)),
                ),
        )
        .subcommand(json_args(period_args(
            Command::new("list").about("List bills by due date").arg(
                arg!(--status <STATUS> "paid | unpaid | all")
                    .required(false)
                    .default_value("all"),
            ),
        )))
        .subcommand(
            Command::new("pay")
                .about("Mark a bill as paid")
                .arg(id_arg())
                .arg(arg!(--date <DATE> "Paid date, defaults to today").required(false)),
        )
        .subcommand(Command::new("rm").about("Delete a bill").arg(id_arg()))
        .subcommand(json_args(period_args(
            Command::new("metrics").about("Paid and unpaid totals"),
        )))
}

fn report_cmd() -> Command {
    let year_arg = || {
        arg!(--year <YEAR>)
            .required(true)
            .value_parser(value_parser!(i32))
    };
    Command::new("report")
        .about("Dashboards and closing reports")
        .subcommand(json_args(
            Command::new("monthly")
                .about("Twelve-month summary by category bucket")
                .arg(year_arg()),
        ))
        .subcommand(json_args(
            Command::new("mei")
                .about("MEI monthly closing")
                .arg(arg!(--month <MONTH> "YYYY-MM").required(true))
                .arg(
                    arg!(--tax <PERCENT> "Tax reserve percentage, overrides settings")
                        .required(false),
                )
                .arg(arg!(--competence "Group by competence date instead of payment date")),
        ))
        .subcommand(json_args(period_args(
            Command::new("weekly").about("Average spending per weekday"),
        )))
        .subcommand(json_args(
            Command::new("daily")
                .about("Daily income, expense and running balance")
                .arg(arg!(--month <MONTH> "YYYY-MM").required(true)),
        ))
        .subcommand(json_args(
            Command::new("annual")
                .about("Revenue against the MEI annual limit")
                .arg(year_arg()),
        ))
}

pub fn build_cli() -> Command {
    Command::new("caixa")
        .about("Personal and MEI finance tracking")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand(Command::new("init").about("Create the database"))
        .subcommand(tx_cmd())
        .subcommand(bill_cmd())
        .subcommand(
            Command::new("category")
                .about("Category buckets")
                .subcommand(Command::new("list").about("Known categories and their buckets"))
                .subcommand(
                    Command::new("classify")
                        .about("Show the bucket for a label")
                        .arg(arg!(--name <LABEL>).required(true)),
                ),
        )
        .subcommand(
            Command::new("rules")
                .about("Regex rules that fill in a category from the description")
                .subcommand(
                    Command::new("add")
                        .arg(arg!(--pattern <REGEX>).required(true))
                        .arg(arg!(--category <CATEGORY>).required(true)),
                )
                .subcommand(Command::new("list"))
                .subcommand(Command::new("rm").arg(id_arg())),
        )
        .subcommand(report_cmd())
        .subcommand(
            Command::new("import").about("Import data").subcommand(
                Command::new("transactions")
                    .about("CSV: date,type,amount,category,description,competence_date")
                    .arg(arg!(--path <PATH>).required(true)),
            ),
        )
        .subcommand(
            Command::new("export")
                .about("Export data")
                .subcommand(
                    Command::new("transactions")
                        .arg(arg!(--format <FORMAT> "csv | json").required(true))
                        .arg(arg!(--out <PATH>).required(true)),
                )
                .subcommand(
                    Command::new("mei")
                        .arg(arg!(--month <MONTH> "YYYY-MM").required(true))
                        .arg(arg!(--format <FORMAT> "csv | json").required(true))
                        .arg(arg!(--out <PATH>).required(true)),
                ),
        )
        .subcommand(
            Command::new("settings")
                .about("Tax percentage, annual limit and retry policy")
                .subcommand(json_args(Command::new("show")))
                .subcommand(
                    Command::new("set")
                        .arg(arg!(--key <KEY>).required(true))
                        .arg(
                            Arg::new("value")
                                .long("value")
                                .value_name("VALUE")
                                .required(true)
                                .allow_hyphen_values(true)
                                .action(ArgAction::Set),
                        ),
                ),
        )
        .subcommand(Command::new("doctor").about("Check stored data for problems"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_tree_is_consistent() {
        build_cli().debug_assert();
    }

    #[test]
    fn negative_amounts_parse_as_values() {
        let m = build_cli()
            .try_get_matches_from([
                "caixa", "bill", "add", "--title", "Luz", "--amount", "-10", "--due", "2024-01-10",
            ])
            .unwrap();
        let add = m.subcommand_matches("bill").unwrap().subcommand_matches("add").unwrap();
        assert_eq!(add.get_one::<String>("amount").unwrap(), "-10");
    }
}
