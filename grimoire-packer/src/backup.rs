// SPDX-FileCopyrightText: 2026 Grimoire contributors
// SPDX-License-Identifier: MIT

//! Backups of packed output taken before an export overwrites it.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use log::{debug, info};
use walkdir::WalkDir;

use crate::error::BackupError;

/// `packs-backup-<ISO timestamp>` with `:` and `.` replaced by `-`.
pub fn backup_dir_name(now: DateTime<Utc>) -> String {
    format!("packs-backup-{}", now.format("%Y-%m-%dT%H-%M-%S-%3fZ"))
}

/// Copy `src` to `dst`, following symbolic links so linked files and
/// directories land in the backup as regular copies.
fn copy_recursive(src: &Path, dst: &Path) -> io::Result<()> {
    for entry in WalkDir::new(src).follow_links(true) {
        let entry = entry?;
        let relative = entry.path().strip_prefix(src).map_err(io::Error::other)?;
        let target = if relative.as_os_str().is_empty() {
            dst.to_path_buf()
        } else {
            dst.join(relative)
        };
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

/// Copy every existing pack of `packs` into one fresh backup directory under `backup_root`.
///
/// Packs without prior output are skipped. Returns the backup directory.
pub fn backup_packs(
    packs_dir: &Path,
    backup_root: &Path,
    packs: &[String],
    now: DateTime<Utc>,
) -> Result<PathBuf, BackupError> {
    let backup_dir = backup_root.join(backup_dir_name(now));
    fs::create_dir_all(&backup_dir).map_err(|e| BackupError::CreateDir {
        path: backup_dir.clone(),
        source: e,
    })?;

    for pack in packs {
        let source = packs_dir.join(pack);
        if !source.exists() {
            debug!("No existing output for {pack}, nothing to back up");
            continue;
        }
        let dest = backup_dir.join(pack);
        copy_recursive(&source, &dest).map_err(|e| BackupError::Copy {
            pack: pack.clone(),
            path: dest.clone(),
            source: e,
        })?;
        info!("Backed up {pack}");
    }

    info!("Backups created in {}", backup_dir.display());
    Ok(backup_dir)
}
