//! Small helpers for the single-file persisted blobs (grant bookmark,
//! session state, exported artwork).

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Replace `path` with `contents` in one step: write a sibling temp file,
/// then rename it over the target.
pub fn write_replace(path: &Path, contents: &[u8]) -> Result<()> {
    let persist_err = |source: io::Error| Error::Persist {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(persist_err)?;
    }

    let tmp = temp_sibling(path);
    fs::write(&tmp, contents).map_err(persist_err)?;
    fs::rename(&tmp, path).map_err(|source| {
        let _ = fs::remove_file(&tmp);
        persist_err(source)
    })
}

/// Read `path` as UTF-8, treating a missing file as `None`.
pub fn read_optional(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(s) => Ok(Some(s)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(Error::Persist {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn write_replace_overwrites_whole_file_and_leaves_no_temp() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("nested").join("blob.toml");

        write_replace(&target, b"a much longer first version").unwrap();
        write_replace(&target, b"short").unwrap();

        assert_eq!(fs::read_to_string(&target).unwrap(), "short");
        let names: Vec<_> = fs::read_dir(target.parent().unwrap())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names.len(), 1);
    }

    #[test]
    fn read_optional_maps_missing_file_to_none() {
        let dir = tempdir().unwrap();
        assert!(read_optional(&dir.path().join("absent")).unwrap().is_none());

        let present = dir.path().join("present");
        fs::write(&present, "x").unwrap();
        assert_eq!(read_optional(&present).unwrap().as_deref(), Some("x"));
    }
}
