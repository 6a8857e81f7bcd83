// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use walter::format::FormatterCache;
use walter::{cli, commands, db};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let mut conn = db::open_or_init()?;
    let mut formatters = FormatterCache::new();

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Database initialized at {}", db::db_path()?.display());
        }
        Some(("import", sub)) => commands::importer::handle(&mut conn, sub)?,
        Some(("fetch", sub)) => commands::fetch::handle(&mut conn, sub)?,
        Some(("project", sub)) => commands::projects::handle(&conn, sub, &mut formatters)?,
        Some(("personnel", sub)) => commands::personnel::handle(&conn, sub, &mut formatters)?,
        Some(("alerts", sub)) => commands::alerts::handle(&conn, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&conn, sub)?,
        Some(("config", sub)) => commands::config::handle(&conn, sub)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
