//! Zip extraction.
//!
//! Entries are written below a destination directory in archive order,
//! mirroring their relative paths. Parent directories are created for every
//! file, because some producers list a directory after the files inside it.
//! On unix each file gets the exact permission bits stored in its entry.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{Result, ScaffoldError};

/// Counts of what an extraction wrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractionSummary {
    pub files: usize,
    pub directories: usize,
}

/// Root of a freshly extracted template tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedTree {
    root: PathBuf,
}

impl ExtractedTree {
    /// Locate the archive's top-level directory after extraction.
    pub fn locate(root: PathBuf) -> Result<Self> {
        if !root.is_dir() {
            return Err(ScaffoldError::ArchiveRootMissing { path: root });
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn into_root(self) -> PathBuf {
        self.root
    }
}

/// Extract every entry of `archive_path` below `dest_dir`.
///
/// Stops at the first failing entry; whatever was written before stays on disk.
pub fn extract(archive_path: &Path, dest_dir: &Path) -> Result<ExtractionSummary> {
    let file = File::open(archive_path).map_err(ScaffoldError::file_io("open", archive_path))?;
    let mut archive =
        zip::ZipArchive::new(file).map_err(|source| ScaffoldError::InvalidArchive {
            path: archive_path.to_path_buf(),
            source,
        })?;

    tracing::info!(
        "extracting {} entries into {}",
        archive.len(),
        dest_dir.display()
    );

    let mut summary = ExtractionSummary::default();
    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .map_err(|source| ScaffoldError::ArchiveEntry { index, source })?;

        let relative = entry
            .enclosed_name()
            .ok_or_else(|| ScaffoldError::UnsafeEntryPath {
                name: entry.name().to_string(),
            })?;
        let output_path = dest_dir.join(&relative);

        if entry.is_dir() {
            tracing::debug!("mkdir {}", output_path.display());
            fs::create_dir_all(&output_path)
                .map_err(ScaffoldError::file_io("create directory", &output_path))?;
            summary.directories += 1;
            continue;
        }

        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent).map_err(ScaffoldError::file_io("create directory", parent))?;
        }

        tracing::debug!("write {}", output_path.display());
        let mut outfile =
            File::create(&output_path).map_err(ScaffoldError::file_io("create", &output_path))?;
        io::copy(&mut entry, &mut outfile).map_err(ScaffoldError::file_io("write", &output_path))?;

        // Some producers store an all-zero mode; keep the default then.
        if let Some(mode) = entry.unix_mode().filter(|m| m & 0o777 != 0) {
            apply_mode(&output_path, mode)?;
        }
        summary.files += 1;
    }

    Ok(summary)
}

#[cfg(unix)]
fn apply_mode(path: &Path, mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(mode & 0o7777))
        .map_err(ScaffoldError::file_io("set permissions on", path))
}

#[cfg(not(unix))]
fn apply_mode(_path: &Path, _mode: u32) -> Result<()> {
    Ok(())
}
