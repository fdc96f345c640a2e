//! Where pruned archives go. Nothing is ever hard-deleted.

use anyhow::{Context, Result};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Moves a file somewhere it can be recovered from.
pub trait Trash: fmt::Debug {
    fn discard(&self, path: &Path) -> Result<()>;
}

/// The platform recycle bin (freedesktop trash, Windows Recycle Bin, macOS Trash).
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemTrash;

impl Trash for SystemTrash {
    fn discard(&self, path: &Path) -> Result<()> {
        ::trash::delete(path)
            .with_context(|| format!("Failed to move {} to the trash", path.display()))
    }
}

/// A plain folder acting as the trash; name clashes get a numeric suffix.
#[derive(Debug, Clone)]
pub struct FolderTrash {
    dir: PathBuf,
}

impl FolderTrash {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    fn free_slot(&self, path: &Path) -> PathBuf {
        let file_name = path.file_name().map(|n| n.to_string_lossy().into_owned());
        let file_name = file_name.unwrap_or_else(|| "unnamed".to_string());
        let mut target = self.dir.join(&file_name);
        let mut n = 1u32;
        while target.exists() {
            target = self.dir.join(format!("{file_name}.{n}"));
            n += 1;
        }
        target
    }
}

impl Trash for FolderTrash {
    fn discard(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create trash folder {}", self.dir.display()))?;
        let target = self.free_slot(path);
        if fs::rename(path, &target).is_err() {
            // different filesystem: copy, then drop the original
            fs::copy(path, &target).with_context(|| {
                format!("Failed to move {} to {}", path.display(), target.display())
            })?;
            fs::remove_file(path)
                .with_context(|| format!("Failed to remove {}", path.display()))?;
        }
        Ok(())
    }
}

/// Pick the trash implied by configuration.
pub fn from_config(cfg: &crate::config::Config) -> Box<dyn Trash> {
    match &cfg.trash_dir {
        Some(dir) => Box::new(FolderTrash::new(dir)),
        None => Box::new(SystemTrash),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn folder_trash_moves_and_dedupes() {
        let tmp = tempdir().unwrap();
        let bin = FolderTrash::new(tmp.path().join("bin"));

        for body in ["first", "second"] {
            let f = tmp.path().join("a.zip");
            fs::write(&f, body).unwrap();
            bin.discard(&f).unwrap();
            assert!(!f.exists());
        }

        let kept = tmp.path().join("bin");
        assert_eq!(fs::read_to_string(kept.join("a.zip")).unwrap(), "first");
        assert_eq!(fs::read_to_string(kept.join("a.zip.1")).unwrap(), "second");
    }

    #[test]
    fn from_config_picks_system_trash_by_default() {
        let cfg = crate::config::Config::at("/pz");
        assert_eq!(format!("{:?}", from_config(&cfg)), "SystemTrash");

        let cfg = cfg.with_trash_dir("/pz-bin");
        assert!(format!("{:?}", from_config(&cfg)).starts_with("FolderTrash"));
    }

    #[test]
    fn system_trash_missing_file_fails() {
        let tmp = tempdir().unwrap();
        let err = SystemTrash.discard(&tmp.path().join("ghost.zip")).unwrap_err();
        assert!(err.to_string().contains("Failed to move"));
    }

    #[test]
    fn folder_trash_missing_file_fails() {
        let tmp = tempdir().unwrap();
        let bin = FolderTrash::new(tmp.path().join("bin"));
        assert!(bin.discard(&tmp.path().join("ghost.zip")).is_err());
    }
}
