// Copyright (c) 2025 Soumyadip Sarkar.
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
            .help("Print pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON object per line"),
    )
}

fn today_arg() -> Arg {
    Arg::new("today")
        .long("today")
        .value_name("YYYY-MM-DD")
        .help("Evaluate date rules as of this day instead of the current date")
}

fn project_arg() -> Arg {
    Arg::new("project")
        .long("project")
        .short('p')
        .value_name("NUMBER")
        .required(true)
}

fn source_commands(name: &'static str, about: &'static str, arg: Arg) -> Command {
    Command::new(name)
        .about(about)
        .subcommand_required(true)
        .subcommand(Command::new("ledger").about("Project ledger rows").arg(arg.clone()))
        .subcommand(Command::new("personnel").about("Personnel distributions").arg(arg))
}

pub fn build_cli() -> Command {
    Command::new("walter")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Research-project budget, personnel and ledger reporting")
        .subcommand(Command::new("init").about("Create the local snapshot database"))
        .subcommand(source_commands(
            "import",
            "Load records from a CSV or JSON file",
            Arg::new("path").long("path").required(true),
        ))
        .subcommand(source_commands(
            "fetch",
            "Load records from the reporting API",
            Arg::new("url")
                .long("url")
                .help("Full endpoint URL; defaults to <api_base_url>/<kind>"),
        ))
        .subcommand(
            Command::new("project")
                .about("Project budget summaries")
                .subcommand_required(true)
                .subcommand(json_flags(
                    Command::new("list")
                        .about("One row per project, ordered by award end date")
                        .arg(Arg::new("filter").long("filter").short('f')),
                ))
                .subcommand(json_flags(
                    Command::new("show")
                        .about("Category breakdown of one project")
                        .arg(project_arg()),
                ))
                .subcommand(json_flags(
                    Command::new("summary").about("Totals across all projects"),
                )),
        )
        .subcommand(
            Command::new("personnel")
                .about("Personnel funding")
                .subcommand_required(true)
                .subcommand(json_flags(
                    Command::new("list")
                        .about("Annualized salary and fringe per employee")
                        .arg(Arg::new("project").long("project").short('p'))
                        .arg(
                            Arg::new("sort")
                                .long("sort")
                                .value_parser(["name", "salary", "projects"])
                                .default_value("name"),
                        )
                        .arg(Arg::new("desc").long("desc").action(ArgAction::SetTrue)),
                )),
        )
        .subcommand(
            Command::new("alerts")
                .about("Budget and deadline alerts")
                .subcommand_required(true)
                .subcommand(json_flags(
                    Command::new("project")
                        .about("Alerts for one project")
                        .arg(project_arg())
                        .arg(today_arg()),
                ))
                .subcommand(json_flags(
                    Command::new("pi")
                        .about("Most urgent alerts across supervised PIs")
                        .arg(
                            Arg::new("pi")
                                .long("pi")
                                .required(true)
                                .num_args(1..)
                                .action(ArgAction::Append),
                        )
                        .arg(today_arg()),
                )),
        )
        .subcommand(
            Command::new("export")
                .about("Write reports to a file")
                .subcommand_required(true)
                .subcommand(export_command("projects"))
                .subcommand(export_command("personnel"))
                .subcommand(export_command("alerts").arg(today_arg())),
        )
        .subcommand(
            Command::new("config")
                .about("Display settings")
                .subcommand_required(true)
                .subcommand(
                    Command::new("set")
                        .arg(Arg::new("key").required(true))
                        .arg(Arg::new("value").required(true)),
                )
                .subcommand(Command::new("get").arg(Arg::new("key").required(true)))
                .subcommand(Command::new("list")),
        )
}

fn export_command(name: &'static str) -> Command {
    Command::new(name)
        .arg(Arg::new("format").long("format").default_value("csv"))
        .arg(Arg::new("out").long("out").required(true))
        .arg(
            Arg::new("crlf")
                .long("crlf")
                .action(ArgAction::SetTrue)
                .help("CRLF line endings with a UTF-8 BOM"),
        )
        .arg(
            Arg::new("no-header")
                .long("no-header")
                .action(ArgAction::SetTrue),
        )
}
