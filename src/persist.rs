//! Writing capture payloads to disk.
//!
//! Files are staged in a temporary file inside the output directory and
//! renamed into place, so a crash never leaves a half-written capture under
//! its final name.

use crate::{Error, Result};
use log::{debug, info};
use sha2::{Digest, Sha256};
use std::fs;
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use tempfile::NamedTempFile;

/// A file written by [`OutputDir::save`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedFile {
    pub path: PathBuf,
    pub bytes_written: usize,
    /// Lower-case hex SHA-256 of the payload
    pub sha256: String,
}

/// Directory capture files are written into
#[derive(Debug, Clone)]
pub struct OutputDir {
    root: PathBuf,
}

impl OutputDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Where `filename` would be written
    pub fn resolve(&self, filename: &str) -> Result<PathBuf> {
        check_filename(filename)?;
        Ok(self.root.join(filename))
    }

    /// Write `data` to `<root>/<filename>`, creating the directory tree and
    /// replacing any existing file.
    pub fn save(&self, filename: &str, data: &[u8]) -> Result<SavedFile> {
        let target = self.resolve(filename)?;
        fs::create_dir_all(&self.root)?;

        let mut staged = NamedTempFile::new_in(&self.root)?;
        staged.write_all(data)?;
        staged.as_file().sync_all()?;
        debug!("Staged {} bytes at {}", data.len(), staged.path().display());

        staged.persist(&target).map_err(|e| Error::Io(e.error))?;

        let saved = SavedFile {
            path: target,
            bytes_written: data.len(),
            sha256: hex::encode(Sha256::digest(data)),
        };
        info!("Saved to: {}", saved.path.display());
        Ok(saved)
    }
}

fn check_filename(filename: &str) -> Result<()> {
    let mut components = Path::new(filename).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(Error::InvalidFilename(filename.to_string())),
    }
}
