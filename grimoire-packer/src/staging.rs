// SPDX-FileCopyrightText: 2026 Grimoire contributors
// SPDX-License-Identifier: MIT

//! Ephemeral working directories.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use log::warn;

use crate::error::{IoErrorContext, Result};

/// Whether `name` is one plain path component, safe to join below a directory.
pub fn is_plain_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// Remove `path` and everything below it; a missing path is not an error.
pub fn remove_dir_if_exists(path: &Path) -> Result<()> {
    match std::fs::remove_dir_all(path) {
        Err(e) if e.kind() != ErrorKind::NotFound => {
            Err(e).io_context(format!("Failed to remove {}", path.display()))
        }
        _ => Ok(()),
    }
}

/// A directory created fresh and removed again when dropped.
#[derive(Debug)]
pub struct ScopedDir {
    path: PathBuf,
}

impl ScopedDir {
    /// Create `path`, discarding whatever a previous run left there.
    pub fn create(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        remove_dir_if_exists(&path)?;
        std::fs::create_dir_all(&path)
            .io_context(format!("Failed to create {}", path.display()))?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ScopedDir {
    fn drop(&mut self) {
        if let Err(e) = remove_dir_if_exists(&self.path) {
            warn!("{e}");
        }
    }
}
