// src/cli/mod.rs
pub mod backup;

use clap::{ArgGroup, Parser, ValueEnum};
use clap_complete::Shell;
use libzomboid::{GameMode, Selectors};

/// Manage backups for Project Zomboid saves
#[derive(Parser, Debug)]
#[command(name = "zomboid-backup", version)]
#[command(group(ArgGroup::new("op").multiple(false)))]
pub struct Cli {
    /// Type of save game, used together with --name
    #[arg(short = 't', long = "type", value_enum, default_value_t = ModeArg::Sandbox)]
    pub mode: ModeArg,

    /// Name of save game, required unless run from within a save folder
    #[arg(short, long)]
    pub name: Option<String>,

    /// Save a backup, default name is the current date-time
    #[arg(short, long, group = "op", value_name = "NAME")]
    pub backup: Option<Option<String>>,

    /// Restore from a backup, default is the most recent
    #[arg(short, long, group = "op", value_name = "NAME")]
    pub restore: Option<Option<String>>,

    /// List up to N backups (default 5, 0 or less lists all)
    #[arg(short, long, group = "op", value_name = "N", allow_negative_numbers = true)]
    pub list: Option<Option<i64>>,

    /// Move the N oldest backups to the trash (default 1), always keeping one
    #[arg(short, long, group = "op", value_name = "N")]
    pub clean: Option<Option<usize>>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Print shell completions and exit
    #[arg(long, value_enum, value_name = "SHELL")]
    pub completions: Option<Shell>,
}

impl Cli {
    pub fn selectors(&self) -> Selectors {
        Selectors {
            backup: self.backup.clone(),
            restore: self.restore.clone(),
            list: self.list,
            clean: self.clean,
        }
    }
}

/// Short codes accepted by `--type`.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModeArg {
    /// Apocalypse
    #[value(name = "a")]
    Apocalypse,
    /// Survivor
    #[value(name = "s")]
    Survivor,
    /// Builder
    #[value(name = "b")]
    Builder,
    /// Sandbox
    #[value(name = "c")]
    Sandbox,
}

impl From<ModeArg> for GameMode {
    fn from(m: ModeArg) -> Self {
        match m {
            ModeArg::Apocalypse => GameMode::Apocalypse,
            ModeArg::Survivor => GameMode::Survivor,
            ModeArg::Builder => GameMode::Builder,
            ModeArg::Sandbox => GameMode::Sandbox,
        }
    }
}
