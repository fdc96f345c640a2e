use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use lazy_static::lazy_static;

use crate::config::{Config, SAVES_DIR, SENTINEL_FILE};
use crate::save::GameMode;

lazy_static! {
    /// Global mutex to serialize environment-variable modifications in tests.
    pub static ref ENV_MUTEX: Mutex<()> = Mutex::new(());
}

/// Lay out `<root>/saves/<mode>/<name>` with a sentinel and a couple of
/// nested files, returning the save folder.
pub fn fake_save(cfg: &Config, mode: GameMode, name: &str) -> PathBuf {
    let dir = cfg.game_root.join(SAVES_DIR).join(mode.as_str()).join(name);
    fs::create_dir_all(dir.join("map/chunks")).unwrap();
    fs::create_dir_all(dir.join("empty")).unwrap();
    fs::write(dir.join(SENTINEL_FILE), b"\x00\x00\x00\xc3").unwrap();
    fs::write(dir.join("players.db"), b"player rows").unwrap();
    fs::write(dir.join("map/chunks/map_0_0.bin"), vec![7u8; 4096]).unwrap();
    dir
}

/// Collect `relative path -> bytes` for every file under `root`.
pub fn snapshot(root: &Path) -> Vec<(PathBuf, Vec<u8>)> {
    let mut files: Vec<_> = walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            let rel = e.path().strip_prefix(root).unwrap().to_path_buf();
            (rel, fs::read(e.path()).unwrap())
        })
        .collect();
    files.sort();
    files
}
