//! Zip primitives: pack a directory tree, unpack over a directory.

use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::error::Error;

/// Compress everything under `src` into `dest`, replacing `dest` if present.
///
/// The archive is written to a `.part` sibling and renamed into place, so a
/// replaced archive gets a fresh creation time and a failed run leaves no
/// `dest` behind. Entry names are relative to `src` and `/`-separated; empty
/// directories are kept. Returns the number of files written.
pub fn compress_dir(src: &Path, dest: &Path) -> Result<usize> {
    if !src.is_dir() {
        return Err(anyhow::Error::new(Error::Archive(format!(
            "save folder does not exist: {}",
            src.display()
        ))));
    }

    let mut part = dest.as_os_str().to_owned();
    part.push(".part");
    let part = PathBuf::from(part);

    let written = write_zip(src, &part).and_then(|files| {
        fs::rename(&part, dest)
            .with_context(|| format!("Failed to move archive into {}", dest.display()))?;
        Ok(files)
    });
    if written.is_err() {
        let _ = fs::remove_file(&part);
    }
    written
}

fn write_zip(src: &Path, dest: &Path) -> Result<usize> {
    let out = File::create(dest)
        .with_context(|| format!("Failed to create archive {}", dest.display()))?;
    let mut zip = ZipWriter::new(BufWriter::new(out));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut files = 0usize;
    for entry in WalkDir::new(src).min_depth(1).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Failed to walk {}", src.display()))?;
        let rel = entry
            .path()
            .strip_prefix(src)
            .context("walked outside the save folder")?;
        let name = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        if entry.file_type().is_dir() {
            zip.add_directory(name, options).map_err(Error::from)?;
        } else if entry.file_type().is_file() {
            zip.start_file(name, options).map_err(Error::from)?;
            let mut input = BufReader::new(
                File::open(entry.path())
                    .with_context(|| format!("Failed to read {}", entry.path().display()))?,
            );
            io::copy(&mut input, &mut zip)?;
            files += 1;
        }
    }

    zip.finish()
        .map_err(Error::from)?
        .flush()
        .with_context(|| format!("Failed to flush archive {}", dest.display()))?;
    Ok(files)
}

/// Unpack `archive` into `dest`, creating directories as needed and
/// overwriting files that share a relative path. Returns the number of
/// files written.
pub fn extract_into(archive: &Path, dest: &Path) -> Result<usize> {
    let file = File::open(archive)
        .with_context(|| format!("Failed to open archive {}", archive.display()))?;
    let mut zip = ZipArchive::new(BufReader::new(file)).map_err(Error::from)?;

    fs::create_dir_all(dest)
        .with_context(|| format!("Failed to create {}", dest.display()))?;

    let mut files = 0usize;
    for i in 0..zip.len() {
        let mut entry = zip.by_index(i).map_err(Error::from)?;
        let rel = entry.enclosed_name().ok_or_else(|| {
            anyhow::Error::new(Error::Archive(format!(
                "entry `{}` escapes the target directory",
                entry.name()
            )))
        })?;
        let out_path = dest.join(rel);

        if entry.is_dir() {
            fs::create_dir_all(&out_path)?;
            continue;
        }
        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut out = File::create(&out_path)
            .with_context(|| format!("Failed to write {}", out_path.display()))?;
        io::copy(&mut entry, &mut out)?;
        files += 1;
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::snapshot;
    use tempfile::tempdir;

    #[test]
    fn compress_then_extract_reproduces_tree() {
        let tmp = tempdir().unwrap();
        let src = tmp.path().join("src");
        fs::create_dir_all(src.join("a/b")).unwrap();
        fs::create_dir_all(src.join("hollow")).unwrap();
        fs::write(src.join("top.txt"), "top").unwrap();
        fs::write(src.join("a/b/deep.bin"), [0u8, 1, 2, 255]).unwrap();

        let zip_path = tmp.path().join("out.zip");
        assert_eq!(compress_dir(&src, &zip_path).unwrap(), 2);

        let dest = tmp.path().join("dest");
        assert_eq!(extract_into(&zip_path, &dest).unwrap(), 2);
        assert_eq!(snapshot(&src), snapshot(&dest));
        assert!(dest.join("hollow").is_dir());
    }

    #[test]
    fn extract_overwrites_existing_files() {
        let tmp = tempdir().unwrap();
        let src = tmp.path().join("src");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("players.db"), "old").unwrap();
        let zip_path = tmp.path().join("snap.zip");
        compress_dir(&src, &zip_path).unwrap();

        fs::write(src.join("players.db"), "newer and longer").unwrap();
        fs::write(src.join("extra.txt"), "left alone").unwrap();
        extract_into(&zip_path, &src).unwrap();

        assert_eq!(fs::read_to_string(src.join("players.db")).unwrap(), "old");
        assert_eq!(fs::read_to_string(src.join("extra.txt")).unwrap(), "left alone");
    }

    #[test]
    fn compress_replaces_archive_without_leftovers() {
        let tmp = tempdir().unwrap();
        let src = tmp.path().join("src");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("players.db"), "v1").unwrap();
        let zip_path = tmp.path().join("snap.zip");
        compress_dir(&src, &zip_path).unwrap();

        fs::write(src.join("players.db"), "v2").unwrap();
        compress_dir(&src, &zip_path).unwrap();
        assert!(!tmp.path().join("snap.zip.part").exists());

        let dest = tmp.path().join("dest");
        extract_into(&zip_path, &dest).unwrap();
        assert_eq!(fs::read_to_string(dest.join("players.db")).unwrap(), "v2");
    }

    #[test]
    fn failed_compress_keeps_previous_archive() {
        let tmp = tempdir().unwrap();
        let src = tmp.path().join("src");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("players.db"), "v1").unwrap();
        let zip_path = tmp.path().join("snap.zip");
        compress_dir(&src, &zip_path).unwrap();

        // a directory squatting on the temp name makes the write fail
        fs::create_dir_all(tmp.path().join("snap.zip.part")).unwrap();
        assert!(compress_dir(&src, &zip_path).is_err());

        let dest = tmp.path().join("dest");
        extract_into(&zip_path, &dest).unwrap();
        assert_eq!(fs::read_to_string(dest.join("players.db")).unwrap(), "v1");
    }

    #[test]
    fn compress_missing_source_fails() {
        let tmp = tempdir().unwrap();
        let res = compress_dir(&tmp.path().join("nope"), &tmp.path().join("x.zip"));
        assert!(res.is_err());
        assert!(!tmp.path().join("x.zip").exists());
    }

    #[test]
    fn extract_garbage_fails() {
        let tmp = tempdir().unwrap();
        let bogus = tmp.path().join("bogus.zip");
        fs::write(&bogus, "definitely not a zip").unwrap();
        let err = extract_into(&bogus, &tmp.path().join("dest")).unwrap_err();
        assert!(matches!(crate::error::kind(&err), Some(Error::Archive(_))));
    }
}
