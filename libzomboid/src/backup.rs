// libzomboid/src/backup.rs

use anyhow::{Context, Result};
use chrono::{DateTime, Local, Utc};
use std::fmt;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info};

use crate::archive;
use crate::config::{Config, ARCHIVE_EXT, BACKUP_FORMAT};
use crate::error::Error;
use crate::save::Save;
use crate::trash::{self, Trash};

pub const DEFAULT_LIST_COUNT: i64 = 5;
pub const DEFAULT_CLEAN_COUNT: usize = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupInfo {
    /// File name without the `.zip` extension.
    pub name: String,
    pub path: PathBuf,
    /// Creation time, or modification time where the platform has none.
    pub created: DateTime<Utc>,
    pub size_bytes: u64,
}

#[derive(Debug)]
pub struct PruneResult {
    pub kept: Vec<BackupInfo>,
    pub removed: Vec<BackupInfo>,
}

/// Archive names in reverse lexical order, plus how many were left out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    pub names: Vec<String>,
    pub remaining: usize,
}

impl fmt::Display for Listing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for name in &self.names {
            writeln!(f, "{name}")?;
        }
        if self.remaining > 0 {
            writeln!(f, "... {} more", self.remaining)?;
        }
        Ok(())
    }
}

/// Raw operation selectors as they come off the command line. The outer
/// `Option` says whether the flag was given, the inner one carries its
/// optional value.
#[derive(Debug, Default, Clone)]
pub struct Selectors {
    pub backup: Option<Option<String>>,
    pub restore: Option<Option<String>>,
    pub list: Option<Option<i64>>,
    pub clean: Option<Option<usize>>,
}

/// The single action one invocation performs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Backup(Option<String>),
    Restore(Option<String>),
    /// `n <= 0` lists everything.
    List(i64),
    Clean(usize),
    None,
}

impl Operation {
    /// Collapse the selectors into one operation, filling in defaults.
    /// More than one selector is a dispatch error rather than a silent pick.
    pub fn from_flags(sel: Selectors) -> Result<Self> {
        let mut picked = Vec::new();
        if let Some(name) = sel.backup {
            picked.push(Operation::Backup(non_blank(name)));
        }
        if let Some(name) = sel.restore {
            picked.push(Operation::Restore(non_blank(name)));
        }
        if let Some(n) = sel.list {
            picked.push(Operation::List(n.unwrap_or(DEFAULT_LIST_COUNT)));
        }
        if let Some(n) = sel.clean {
            picked.push(Operation::Clean(n.unwrap_or(DEFAULT_CLEAN_COUNT)));
        }

        match picked.len() {
            0 => Ok(Operation::None),
            1 => Ok(picked.remove(0)),
            n => Err(anyhow::Error::new(Error::Dispatch(format!(
                "{n} operations requested; choose one of --backup, --restore, --list, --clean"
            )))),
        }
    }
}

fn non_blank(name: Option<String>) -> Option<String> {
    name.filter(|n| !n.trim().is_empty())
}

#[derive(Debug)]
pub enum Outcome {
    Created(BackupInfo),
    Restored(BackupInfo),
    Listed(Listing),
    Cleaned(PruneResult),
    /// Nothing was requested; the caller should show usage.
    Usage,
}

#[derive(Debug)]
pub struct BackupManager {
    save: Save,
    data_dir: PathBuf,
    backups_dir: PathBuf,
    trash: Box<dyn Trash>,
}

impl BackupManager {
    /// Does no I/O; the backups directory is created on the first backup.
    pub fn new(save: Save, cfg: &Config, trash: Box<dyn Trash>) -> Self {
        Self {
            data_dir: save.data_dir(cfg),
            backups_dir: save.backups_dir(cfg),
            save,
            trash,
        }
    }

    /// Manager using whichever trash the configuration selects.
    pub fn for_save(save: Save, cfg: &Config) -> Self {
        Self::new(save, cfg, trash::from_config(cfg))
    }

    pub fn save(&self) -> &Save {
        &self.save
    }

    pub fn backups_dir(&self) -> &Path {
        &self.backups_dir
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn run(&self, op: Operation) -> Result<Outcome> {
        debug!(?op, save = %self.save, "dispatching");
        match op {
            Operation::Backup(name) => self.create_backup(name.as_deref()).map(Outcome::Created),
            Operation::Restore(name) => self.restore_backup(name.as_deref()).map(Outcome::Restored),
            Operation::List(n) => self.list_backups(n).map(Outcome::Listed),
            Operation::Clean(n) => self.prune(n).map(Outcome::Cleaned),
            Operation::None => Ok(Outcome::Usage),
        }
    }

    /// Zip the whole save folder into `<backups>/<name>.zip`. Without a
    /// name the current local time is used. An existing archive with the
    /// same name is replaced.
    pub fn create_backup(&self, name: Option<&str>) -> Result<BackupInfo> {
        let name = match name.map(str::trim).filter(|n| !n.is_empty()) {
            Some(n) => n.to_string(),
            None => Local::now().format(BACKUP_FORMAT).to_string(),
        };
        let zip_path = self.archive_path(&name)?;

        fs::create_dir_all(&self.backups_dir).with_context(|| {
            format!(
                "Failed to create backup directory at {}",
                self.backups_dir.display()
            )
        })?;

        let files = archive::compress_dir(&self.data_dir, &zip_path).with_context(|| {
            format!("Failed to back up {} to {}", self.save, zip_path.display())
        })?;
        info!(archive = %zip_path.display(), files, "backup written");

        describe(&zip_path)
    }

    /// Unpack an archive over the save folder. Without a name the most
    /// recently created archive is used.
    pub fn restore_backup(&self, name: Option<&str>) -> Result<BackupInfo> {
        let chosen = match name.map(str::trim).filter(|n| !n.is_empty()) {
            Some(n) => {
                let path = self.archive_path(n)?;
                if !path.is_file() {
                    return Err(anyhow::Error::new(Error::ArchiveNotFound(format!(
                        "{n} (looked for {})",
                        path.display()
                    ))));
                }
                describe(&path)?
            }
            None => self
                .archives()?
                .into_iter()
                .max_by_key(|b| b.created)
                .ok_or_else(|| {
                    anyhow::Error::new(Error::NoBackupsAvailable(self.backups_dir.clone()))
                })?,
        };

        let files = archive::extract_into(&chosen.path, &self.data_dir).with_context(|| {
            format!("Failed to restore {} from {}", self.save, chosen.name)
        })?;
        info!(archive = %chosen.path.display(), files, "backup restored");
        Ok(chosen)
    }

    /// Names in reverse lexical order, at most `n` of them (`n <= 0` means all).
    pub fn list_backups(&self, n: i64) -> Result<Listing> {
        let mut names: Vec<String> = self.archives()?.into_iter().map(|b| b.name).collect();
        if names.is_empty() {
            return Err(anyhow::Error::new(Error::NoBackupsAvailable(
                self.backups_dir.clone(),
            )));
        }
        names.reverse();

        let total = names.len();
        if n > 0 {
            names.truncate(usize::try_from(n).unwrap_or(usize::MAX));
        }
        Ok(Listing {
            remaining: total - names.len(),
            names,
        })
    }

    /// Move the `count` oldest archives to the trash, always leaving at
    /// least one behind.
    pub fn prune(&self, count: usize) -> Result<PruneResult> {
        let mut all = self.archives()?;
        all.sort_by_key(|b| b.created);

        let count = count.min(all.len().saturating_sub(1));
        let kept = all.split_off(count);
        let removed = all;

        for backup_info in &removed {
            self.trash.discard(&backup_info.path).with_context(|| {
                format!("Failed to remove old backup {}", backup_info.name)
            })?;
            info!(archive = %backup_info.path.display(), "backup moved to trash");
        }
        Ok(PruneResult { kept, removed })
    }

    /// Every `*.zip` in the backups directory, sorted by name.
    pub fn archives(&self) -> Result<Vec<BackupInfo>> {
        let mut backup_infos = Vec::new();

        if !self.backups_dir.exists() {
            return Ok(backup_infos);
        }

        for entry_result in fs::read_dir(&self.backups_dir).with_context(|| {
            format!(
                "Failed to read backup directory: {}",
                self.backups_dir.display()
            )
        })? {
            let path = entry_result?.path();
            let is_zip = path.extension().map(|e| e == ARCHIVE_EXT).unwrap_or(false);
            if path.is_file() && is_zip {
                backup_infos.push(describe(&path)?);
            }
        }
        backup_infos.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(backup_infos)
    }

    /// `<backups>/<name>.zip`; `name` must be a bare file name.
    fn archive_path(&self, name: &str) -> Result<PathBuf> {
        let name = name
            .strip_suffix(&format!(".{ARCHIVE_EXT}"))
            .unwrap_or(name);
        let has_separator = name.contains(['/', '\\']);
        let mut parts = Path::new(name).components();
        match (parts.next(), parts.next()) {
            (Some(Component::Normal(_)), None) if !has_separator => {
                Ok(self.backups_dir.join(format!("{name}.{ARCHIVE_EXT}")))
            }
            _ => Err(anyhow::Error::new(Error::ArchiveNotFound(format!(
                "`{name}` is not a valid backup name"
            )))),
        }
    }
}

fn describe(path: &Path) -> Result<BackupInfo> {
    let metadata = fs::metadata(path)
        .with_context(|| format!("Failed to get metadata for {}", path.display()))?;
    let created = metadata.created().or_else(|_| metadata.modified())?;
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(BackupInfo {
        name,
        path: path.to_path_buf(),
        created: DateTime::from(created),
        size_bytes: metadata.len(),
    })
}
