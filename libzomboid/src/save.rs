//! Save identity and the rules for locating one.

use anyhow::Result;
use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

use crate::config::{Config, SENTINEL_FILE};
use crate::error::Error;

/// Game modes, in the order the game lists them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GameMode {
    Apocalypse,
    Survivor,
    Builder,
    #[default]
    Sandbox,
}

impl GameMode {
    pub const ALL: [GameMode; 4] = [
        GameMode::Apocalypse,
        GameMode::Survivor,
        GameMode::Builder,
        GameMode::Sandbox,
    ];

    /// Full name, which is also the folder name on disk.
    pub fn as_str(self) -> &'static str {
        match self {
            GameMode::Apocalypse => "Apocalypse",
            GameMode::Survivor => "Survivor",
            GameMode::Builder => "Builder",
            GameMode::Sandbox => "Sandbox",
        }
    }

    /// One-letter code used on the command line.
    pub fn code(self) -> char {
        match self {
            GameMode::Apocalypse => 'a',
            GameMode::Survivor => 's',
            GameMode::Builder => 'b',
            GameMode::Sandbox => 'c',
        }
    }

    pub fn from_code(code: char) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.code() == code)
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameMode {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| Error::InvalidPath(format!("`{s}` is not a known game mode")))
    }
}

/// One save-game instance: a mode plus the save's folder name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Save {
    pub mode: GameMode,
    pub name: String,
}

impl Save {
    pub fn new(mode: GameMode, name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(anyhow::Error::new(Error::InvalidPath(
                "save name must not be empty".to_string(),
            )));
        }
        Ok(Self { mode, name })
    }

    /// `<root>/saves/<mode>/<name>`
    pub fn data_dir(&self, cfg: &Config) -> PathBuf {
        cfg.saves_root().join(self.mode.as_str()).join(&self.name)
    }

    /// `<root>/backups/<mode>/<name>`
    pub fn backups_dir(&self, cfg: &Config) -> PathBuf {
        cfg.backups_root().join(self.mode.as_str()).join(&self.name)
    }
}

impl fmt::Display for Save {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.mode, self.name)
    }
}

/// Works out which save the user means.
#[derive(Debug)]
pub struct SaveLocator<'a> {
    cfg: &'a Config,
}

impl<'a> SaveLocator<'a> {
    pub fn new(cfg: &'a Config) -> Self {
        Self { cfg }
    }

    /// An explicit non-empty `name` wins (mode defaults to the last game
    /// mode); otherwise the save is derived from `cwd`.
    pub fn resolve(&self, mode: Option<GameMode>, name: Option<&str>, cwd: &Path) -> Result<Save> {
        match name.filter(|n| !n.is_empty()) {
            Some(name) => {
                let mode = mode.unwrap_or_default();
                debug!(%mode, name, "save taken from explicit flags");
                Save::new(mode, name)
            }
            None => self.resolve_from_cwd(cwd),
        }
    }

    /// `cwd` must sit under the game root and contain the sentinel file; the
    /// parent folder names the mode and `cwd` itself names the save.
    pub fn resolve_from_cwd(&self, cwd: &Path) -> Result<Save> {
        // the root may be configured through a symlink while cwd is canonical
        let rel = cwd.strip_prefix(&self.cfg.game_root).ok().or_else(|| {
            let root = self.cfg.game_root.canonicalize().ok()?;
            cwd.strip_prefix(root).ok()
        });
        let Some(rel) = rel else {
            debug!(cwd = %cwd.display(), "outside the game root");
            return Err(self.invalid());
        };
        if !cwd.join(SENTINEL_FILE).is_file() {
            debug!(cwd = %cwd.display(), "no {SENTINEL_FILE} here");
            return Err(self.invalid());
        }

        let segments: Vec<&str> = rel
            .components()
            .filter_map(|c| match c {
                Component::Normal(s) => s.to_str(),
                _ => None,
            })
            .collect();
        let [.., mode, name] = segments.as_slice() else {
            return Err(self.invalid());
        };
        let mode = mode.parse::<GameMode>().map_err(|_| self.invalid())?;
        debug!(%mode, name, "save derived from working directory");
        Save::new(mode, *name)
    }

    fn invalid(&self) -> anyhow::Error {
        anyhow::Error::new(Error::InvalidPath(format!(
            "pass --type and --name, or run from within a save folder under {}",
            self.cfg.saves_root().display()
        )))
    }
}
