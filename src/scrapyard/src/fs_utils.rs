//! File system utilities for source-directory listings
//!
//! A directory that does not exist is an empty source. Any other listing
//! failure aborts the run.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// File names (not paths) directly inside `dir` whose extension matches,
/// sorted by name.
///
/// Extension should not include the dot (e.g., "json" not ".json").
pub fn list_files_with_extension(dir: &Path, extensions: &[&str]) -> Result<Vec<String>> {
    let mut names = list_file_names(dir)?;
    names.retain(|name| {
        Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| extensions.iter().any(|ext| e.eq_ignore_ascii_case(ext)))
            .unwrap_or(false)
    });
    Ok(names)
}

/// Every file name directly inside `dir`, sorted. Symlinks count as what
/// they point at; dangling ones are skipped.
pub fn list_file_names(dir: &Path) -> Result<Vec<String>> {
    if !exists(dir)? {
        return Ok(Vec::new());
    }

    let mut names = Vec::new();
    for entry in walkdir::WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| walk_error(dir, e))?;
        if entry.path().is_file() {
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
    }
    names.sort();
    Ok(names)
}

/// Immediate subdirectories of `dir`, sorted
pub fn list_subdirs(dir: &Path) -> Result<Vec<PathBuf>> {
    if !exists(dir)? {
        return Ok(Vec::new());
    }

    let mut dirs = Vec::new();
    for entry in walkdir::WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| walk_error(dir, e))?;
        if entry.path().is_dir() {
            dirs.push(entry.into_path());
        }
    }
    dirs.sort();
    Ok(dirs)
}

fn exists(dir: &Path) -> Result<bool> {
    match std::fs::metadata(dir) {
        Ok(meta) if meta.is_dir() => Ok(true),
        Ok(_) => Err(Error::io(
            dir,
            std::io::Error::new(ErrorKind::Other, "not a directory"),
        )),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(Error::io(dir, e)),
    }
}

fn walk_error(dir: &Path, err: walkdir::Error) -> Error {
    let path = err.path().map(Path::to_path_buf).unwrap_or_else(|| dir.to_path_buf());
    let io = err
        .into_io_error()
        .unwrap_or_else(|| std::io::Error::new(ErrorKind::Other, "filesystem loop"));
    Error::io(path, io)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_missing_dir_is_empty() {
        let temp_dir = tempfile::tempdir().unwrap();
        let missing = temp_dir.path().join("nope");
        assert!(list_file_names(&missing).unwrap().is_empty());
        assert!(list_subdirs(&missing).unwrap().is_empty());
    }

    #[test]
    fn test_file_is_not_a_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        let file = temp_dir.path().join("items");
        fs::write(&file, b"{}").unwrap();
        assert!(list_file_names(&file).is_err());
    }

    #[test]
    fn test_extension_filter_sorted() {
        let temp_dir = tempfile::tempdir().unwrap();
        let dir = temp_dir.path();
        fs::write(dir.join("b.json"), b"{}").unwrap();
        fs::write(dir.join("a.JSON"), b"{}").unwrap();
        fs::write(dir.join("notes.txt"), b"").unwrap();
        fs::create_dir(dir.join("nested.json")).unwrap();

        let names = list_files_with_extension(dir, &["json"]).unwrap();
        assert_eq!(names, vec!["a.JSON", "b.json"]);
    }

    #[test]
    fn test_list_subdirs() {
        let temp_dir = tempfile::tempdir().unwrap();
        let dir = temp_dir.path();
        fs::create_dir(dir.join("items")).unwrap();
        fs::create_dir(dir.join("icons")).unwrap();
        fs::write(dir.join("readme.md"), b"").unwrap();

        let subdirs = list_subdirs(dir).unwrap();
        assert_eq!(subdirs, vec![dir.join("icons"), dir.join("items")]);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_are_followed() {
        use std::os::unix::fs::symlink;

        let temp_dir = tempfile::tempdir().unwrap();
        let store = temp_dir.path().join("store");
        fs::create_dir_all(store.join("weapons")).unwrap();
        fs::write(store.join("battery.png"), b"png").unwrap();

        let dir = temp_dir.path().join("images");
        fs::create_dir(&dir).unwrap();
        symlink(store.join("battery.png"), dir.join("battery.png")).unwrap();
        symlink(store.join("weapons"), dir.join("weapons")).unwrap();
        symlink(store.join("gone.png"), dir.join("gone.png")).unwrap();

        assert_eq!(list_file_names(&dir).unwrap(), vec!["battery.png"]);
        assert_eq!(list_subdirs(&dir).unwrap(), vec![dir.join("weapons")]);
    }
}
