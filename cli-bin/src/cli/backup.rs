// src/cli/backup.rs
use crate::cli::Cli;
use anyhow::{Context, Result};
use clap::CommandFactory;
use libzomboid::{BackupManager, Config, Operation, Outcome, SaveLocator};
use std::env;

/// Resolve the save, run the single requested operation and report on stdout.
pub fn run(args: &Cli) -> Result<()> {
    let op = Operation::from_flags(args.selectors())?;
    if op == Operation::None {
        return print_usage();
    }

    let cfg = Config::load()?;
    let cwd = env::current_dir().context("getting current directory")?;
    let save =
        SaveLocator::new(&cfg).resolve(Some(args.mode.into()), args.name.as_deref(), &cwd)?;
    println!("{save}");

    let manager = BackupManager::for_save(save, &cfg);
    match manager.run(op)? {
        Outcome::Created(info) => println!("Created backup {} for {}", info.name, manager.save()),
        Outcome::Restored(info) => println!("Restored {} from {}", manager.save(), info.name),
        Outcome::Listed(listing) => print!("{listing}"),
        Outcome::Cleaned(result) => {
            if result.removed.is_empty() {
                println!("Nothing to clean, {} backup(s) kept", result.kept.len());
            }
            for info in &result.removed {
                println!("Removed {}", info.name);
            }
        }
        Outcome::Usage => print_usage()?,
    }
    Ok(())
}

fn print_usage() -> Result<()> {
    Cli::command().print_help()?;
    println!();
    Ok(())
}
