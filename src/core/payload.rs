use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::core::error::SubmitError;

/// Files and directories copied into the working directory before submission.
///
/// Each distinct path is transferred once, however often it was listed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PayloadSet {
    paths: BTreeSet<PathBuf>,
}

impl PayloadSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<PathBuf>) -> bool {
        self.paths.insert(path.into())
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.paths.iter().map(PathBuf::as_path)
    }

    pub fn display_list(&self) -> String {
        self.iter()
            .map(|path| path.display().to_string())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn transfer(&self, workdir: &Path) -> Result<(), SubmitError> {
        for path in self.iter() {
            transfer_path(path, workdir)?;
        }
        Ok(())
    }
}

impl<P: Into<PathBuf>> Extend<P> for PayloadSet {
    fn extend<I: IntoIterator<Item = P>>(&mut self, iter: I) {
        for path in iter {
            self.insert(path);
        }
    }
}

impl<P: Into<PathBuf>> FromIterator<P> for PayloadSet {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        let mut set = PayloadSet::new();
        set.extend(iter);
        set
    }
}

/// Parse a comma separated payload list. Empty entries are dropped.
pub fn payload_from_string(payload: &str) -> Vec<PathBuf> {
    payload
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(PathBuf::from)
        .collect()
}

/// Read payload entries from a file, one per line. Entries that do not exist are skipped.
pub fn payload_from_file(payload_file: &Path) -> Result<Vec<PathBuf>, SubmitError> {
    let content = fs::read_to_string(payload_file).map_err(|source| SubmitError::Payload {
        path: payload_file.to_path_buf(),
        source,
    })?;

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|entry| {
            let exists = !entry.is_empty() && Path::new(entry).exists();
            if !exists && !entry.is_empty() {
                debug!("skipping missing payload entry {entry}");
            }
            exists
        })
        .map(PathBuf::from)
        .collect())
}

/// Copy one payload entry into `workdir`.
///
/// Directories are merged: their contents land directly in `workdir`, overwriting files
/// with the same relative path. Files are copied by name.
pub fn transfer_path(path: &Path, workdir: &Path) -> Result<(), SubmitError> {
    let to_error = |source| SubmitError::Payload {
        path: path.to_path_buf(),
        source,
    };

    if path.is_dir() {
        debug!(path = %path.display(), workdir = %workdir.display(), "merging payload directory");
        for entry in WalkDir::new(path).follow_links(true) {
            let entry = entry?;
            let relative = entry.path().strip_prefix(path).unwrap_or(entry.path());
            let target = workdir.join(relative);
            if entry.file_type().is_dir() {
                fs::create_dir_all(&target).map_err(to_error)?;
            } else {
                fs::copy(entry.path(), &target).map_err(to_error)?;
            }
        }
        Ok(())
    } else {
        let file_name = path.file_name().ok_or_else(|| {
            to_error(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "payload path has no file name",
            ))
        })?;
        debug!(path = %path.display(), workdir = %workdir.display(), "copying payload file");
        fs::create_dir_all(workdir).map_err(to_error)?;
        fs::copy(path, workdir.join(file_name)).map_err(to_error)?;
        Ok(())
    }
}
