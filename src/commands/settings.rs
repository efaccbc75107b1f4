// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::AppConfig;
use crate::utils::{maybe_print_json, pretty_table, req_arg};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", sub)) => show(conn, sub)?,
        Some(("set", sub)) => set(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn show(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let cfg = AppConfig::load(conn)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &cfg)? {
        let rows = cfg
            .entries()
            .into_iter()
            .map(|(k, v)| vec![k.to_string(), v])
            .collect();
        println!("{}", pretty_table(&["Setting", "Value"], rows));
    }
    Ok(())
}

fn set(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let key = req_arg(sub, "key")?;
    let value = sub
        .get_one::<String>("value")
        .map(String::as_str)
        .unwrap_or_default();
    AppConfig::set(conn, &key, value)?;
    println!("{} updated", key);
    Ok(())
}
