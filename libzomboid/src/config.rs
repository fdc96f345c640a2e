use anyhow::Result;
use directories::BaseDirs;
use std::path::{Path, PathBuf};

use crate::error::Error;

/// Live save data lives under `<root>/saves/<type>/<name>`.
pub const SAVES_DIR: &str = "saves";
/// Archives live under `<root>/backups/<type>/<name>`.
pub const BACKUPS_DIR: &str = "backups";
/// Written by the game into every save folder; marks a directory as a live save.
pub const SENTINEL_FILE: &str = "map_ver.bin";
pub const ARCHIVE_EXT: &str = "zip";
/// Default archive name, e.g. `2024-05-01-18-30`.
pub const BACKUP_FORMAT: &str = "%Y-%m-%d-%H-%M";

/// Name of the game's per-user data folder under `$HOME`.
const GAME_DIR_NAME: &str = "Zomboid";

/// Runtime configuration: where the game keeps its files, and where pruned
/// archives go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub game_root: PathBuf,
    /// `None` means the platform recycle bin.
    pub trash_dir: Option<PathBuf>,
}

impl Config {
    /// Resolve configuration from the environment.
    ///
    /// Priority for the game root:
    /// 1. `ZOMBOID_HOME` env-var (explicit override)
    /// 2. `~/Zomboid`
    ///
    /// `ZOMBOID_TRASH_DIR` redirects pruned archives into a plain folder.
    pub fn load() -> Result<Self> {
        let trash_dir = std::env::var_os("ZOMBOID_TRASH_DIR")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        if let Some(val) = std::env::var_os("ZOMBOID_HOME").filter(|v| !v.is_empty()) {
            return Ok(Self {
                game_root: PathBuf::from(val),
                trash_dir,
            });
        }

        let dirs = BaseDirs::new().ok_or_else(|| {
            anyhow::Error::new(Error::Config(
                "cannot locate a home directory; set ZOMBOID_HOME".to_string(),
            ))
        })?;
        Ok(Self {
            game_root: dirs.home_dir().join(GAME_DIR_NAME),
            trash_dir,
        })
    }

    /// Config rooted at an explicit directory – handy for tests or headless tools.
    pub fn at<P: AsRef<Path>>(root: P) -> Self {
        Self {
            game_root: root.as_ref().to_path_buf(),
            trash_dir: None,
        }
    }

    pub fn with_trash_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.trash_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    pub fn saves_root(&self) -> PathBuf {
        self.game_root.join(SAVES_DIR)
    }

    pub fn backups_root(&self) -> PathBuf {
        self.game_root.join(BACKUPS_DIR)
    }
}
