//! tests/util.rs
//! Small helpers shared across integration tests.

#![allow(dead_code)]

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Absolute path to the freshly-built `zomboid-backup` binary.
pub fn bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_zomboid-backup"))
}

/// Game root inside the sandbox, canonicalised so it matches what the
/// binary sees as its working directory.
pub fn game_root(tmp: &TempDir) -> PathBuf {
    tmp.path().canonicalize().unwrap().join("Zomboid")
}

pub fn trash_dir(tmp: &TempDir) -> PathBuf {
    tmp.path().canonicalize().unwrap().join("trash")
}

/// Build a `Command` whose game root and trash both live in `tmp`.
///
/// The working directory defaults to the sandbox itself, which is never a
/// save folder.
pub fn zb(tmp: &TempDir) -> Command {
    let mut cmd = Command::new(bin());
    cmd.env("ZOMBOID_HOME", game_root(tmp))
        .env("ZOMBOID_TRASH_DIR", trash_dir(tmp))
        .env_remove("RUST_LOG")
        .current_dir(tmp.path());
    cmd
}

/// Create `<root>/saves/<mode>/<name>` with the sentinel and some data.
pub fn make_save(tmp: &TempDir, mode: &str, name: &str) -> PathBuf {
    let dir = game_root(tmp).join("saves").join(mode).join(name);
    fs::create_dir_all(dir.join("map")).unwrap();
    fs::write(dir.join("map_ver.bin"), b"\x00\x00\x00\xc3").unwrap();
    fs::write(dir.join("players.db"), "alive").unwrap();
    fs::write(dir.join("map/map_1_1.bin"), vec![3u8; 512]).unwrap();
    dir
}

pub fn backups_of(tmp: &TempDir, mode: &str, name: &str) -> PathBuf {
    game_root(tmp).join("backups").join(mode).join(name)
}

pub fn count_entries(dir: &Path) -> usize {
    fs::read_dir(dir).map(|d| d.count()).unwrap_or(0)
}
