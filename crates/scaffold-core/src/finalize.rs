//! Moving the rendered tree to its final project directory.
//!
//! The directory name is the last `/`-separated segment of the module
//! identifier. A failed rename does not fail the run: everything before it
//! has already succeeded, so the rendered tree is left where it was and the
//! caller is told why.

use std::path::{Path, PathBuf};

use crate::extract::ExtractedTree;

/// What happened to the rendered tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinalizeOutcome {
    /// The tree now lives at this path.
    Renamed(PathBuf),
    /// The tree was left at `left_at`; renaming to `target` was not possible.
    Skipped {
        left_at: PathBuf,
        target: PathBuf,
        reason: String,
    },
}

impl FinalizeOutcome {
    /// Where the project ended up, renamed or not.
    pub fn project_dir(&self) -> &Path {
        match self {
            Self::Renamed(path) => path,
            Self::Skipped { left_at, .. } => left_at,
        }
    }
}

/// Last `/` segment of `module`; the whole string when it has no `/`.
pub fn project_dir_name(module: &str) -> &str {
    module.rsplit('/').next().unwrap_or(module)
}

/// Rename the tree root to `<output_dir>/<project_dir_name(module)>`.
pub fn finalize(tree: ExtractedTree, output_dir: &Path, module: &str) -> FinalizeOutcome {
    let name = project_dir_name(module);
    let source = tree.into_root();
    let target = output_dir.join(name);

    if name.is_empty() {
        tracing::warn!("module {module:?} has an empty last segment, not renaming");
        return FinalizeOutcome::Skipped {
            left_at: source,
            target,
            reason: "module ends with '/'".into(),
        };
    }

    match std::fs::rename(&source, &target) {
        Ok(()) => {
            tracing::info!("renamed {} to {}", source.display(), target.display());
            FinalizeOutcome::Renamed(target)
        }
        Err(e) => {
            tracing::warn!(
                "could not rename {} to {}: {e}",
                source.display(),
                target.display()
            );
            FinalizeOutcome::Skipped {
                left_at: source,
                target,
                reason: e.to_string(),
            }
        }
    }
}
