//! zomboid-backup CLI entry-point
//!
//! The backup rules live in `libzomboid`; this file handles argument
//! parsing, logging and top-level error reporting.

#![deny(warnings)]

mod cli; // argument struct and the backup command

use libzomboid::logging;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use std::{env, io};
use tracing::debug;

use cli::Cli;

fn main() -> Result<()> {
    /* ── CLI parsing & logging ────────────────────────────────── */
    let args = Cli::parse();
    if args.verbose {
        env::set_var("RUST_LOG", "debug");
    }
    logging::init();

    /* ── shell-completion shortcut ────────────────────────────── */
    if let Some(shell) = args.completions {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "zomboid-backup", &mut io::stdout());
        return Ok(());
    }

    /* ── failures are reported, never propagated as a crash ───── */
    if let Err(e) = cli::backup::run(&args) {
        debug!(error = ?e, "command failed");
        println!("{e:#}");
    }
    Ok(())
}
