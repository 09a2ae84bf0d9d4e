// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// File saving — where finished PDFs and enhanced images end up.

use std::path::{Path, PathBuf};

use pixelwerk_core::error::Result;
use tracing::info;

/// Delivers finished output bytes under a file name.
pub trait FileSaver {
    /// Store `bytes` as `filename` and return where they went.
    fn save(&self, bytes: &[u8], filename: &str) -> Result<PathBuf>;
}

/// Writes files into a directory, creating it on first use.
#[derive(Debug, Clone)]
pub struct DirectorySaver {
    dir: PathBuf,
}

impl DirectorySaver {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl FileSaver for DirectorySaver {
    fn save(&self, bytes: &[u8], filename: &str) -> Result<PathBuf> {
        // Only the final component is used; callers can't escape the directory.
        let name = Path::new(filename).file_name().ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("`{filename}` is not a file name"),
            )
        })?;
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(name);
        std::fs::write(&path, bytes)?;
        info!(path = %path.display(), bytes = bytes.len(), "File saved");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saves_into_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let saver = DirectorySaver::new(tmp.path().join("out"));
        let path = saver.save(b"data", "images.pdf").unwrap();
        assert_eq!(path, tmp.path().join("out").join("images.pdf"));
        assert_eq!(std::fs::read(&path).unwrap(), b"data");
    }

    #[test]
    fn strips_directory_components() {
        let tmp = tempfile::tempdir().unwrap();
        let saver = DirectorySaver::new(tmp.path());
        let path = saver.save(b"x", "../../escape.png").unwrap();
        assert_eq!(path, tmp.path().join("escape.png"));
    }

    #[test]
    fn rejects_empty_name() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(DirectorySaver::new(tmp.path()).save(b"x", "..").is_err());
    }
}
