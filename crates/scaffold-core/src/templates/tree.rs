//! In-place rendering of an extracted template tree.
//!
//! Every regular file below the root is read, rendered against the project
//! context and written back to the same path. Directories are descended into
//! but never rendered. Traversal is sorted by file name, so a failure always
//! leaves the same files rendered: those visited before the failing one.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use walkdir::WalkDir;

use crate::error::{Result, ScaffoldError};
use crate::project::ProjectConfig;
use crate::templates::renderer;

/// Files touched by [`render_tree`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderReport {
    /// Files rewritten with rendered content.
    pub rendered: Vec<PathBuf>,
    /// Files left untouched: symbolic links and files that are not UTF-8 text.
    pub skipped: Vec<PathBuf>,
}

/// Render every regular file below `root` in place.
///
/// The first failing file aborts the walk. Files rendered before it keep
/// their new content; files after it are not read.
pub fn render_tree(root: &Path, project: &ProjectConfig) -> Result<RenderReport> {
    let context = project.template_context();
    let mut report = RenderReport::default();

    tracing::info!("rendering templates under {}", root.display());

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        let path = entry.path();
        let file_type = entry.file_type();
        if file_type.is_symlink() {
            tracing::warn!("skipping symbolic link {}", path.display());
            report.skipped.push(path.to_path_buf());
            continue;
        }
        if !file_type.is_file() {
            continue;
        }

        if render_file(path, &context)? {
            report.rendered.push(path.to_path_buf());
        } else {
            report.skipped.push(path.to_path_buf());
        }
    }

    Ok(report)
}

/// Render one file in place. Returns `false` if it was skipped as non-text.
///
/// The file is rewritten through the existing inode, so its mode is unchanged.
fn render_file(path: &Path, context: &Value) -> Result<bool> {
    let bytes = fs::read(path).map_err(ScaffoldError::file_io("read", path))?;
    let source = match String::from_utf8(bytes) {
        Ok(source) => source,
        Err(_) => {
            tracing::warn!("skipping non-UTF-8 file {}", path.display());
            return Ok(false);
        }
    };

    let rendered = renderer::render(&path.display().to_string(), &source, context)?;
    fs::write(path, rendered).map_err(ScaffoldError::file_io("write", path))?;
    tracing::debug!("rendered {}", path.display());
    Ok(true)
}
