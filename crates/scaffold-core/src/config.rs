//! Pipeline configuration.
//!
//! The template location and the archive's top-level directory are plain
//! values handed to [`crate::pipeline::run`]. They can be loaded from a JSON
//! file; every field is optional and falls back to [`PipelineConfig::default`].
//!
//! ```json
//! {
//!   "template_url": "https://github.com/jacexh/golang-ddd-template/archive/master.zip",
//!   "archive_root": "golang-ddd-template-master",
//!   "output_dir": ".",
//!   "keep_archive": false,
//!   "timeout_secs": 60
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Result, ScaffoldError};

/// Template archive downloaded when nothing else is configured.
pub const DEFAULT_TEMPLATE_URL: &str =
    "https://github.com/jacexh/golang-ddd-template/archive/master.zip";

/// Top-level directory contained in [`DEFAULT_TEMPLATE_URL`].
pub const DEFAULT_ARCHIVE_ROOT: &str = "golang-ddd-template-master";

/// Default fetch timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Values the pipeline needs besides the project metadata.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// URL (or local path / `file://` URL) of the zip template.
    pub template_url: String,
    /// Name of the directory the archive unpacks to.
    pub archive_root: String,
    /// Directory the archive is extracted into and the project renamed within.
    pub output_dir: PathBuf,
    /// Keep the downloaded archive in the temp directory after extraction.
    pub keep_archive: bool,
    /// Timeout for the whole HTTP request, in seconds.
    pub timeout_secs: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            template_url: DEFAULT_TEMPLATE_URL.into(),
            archive_root: DEFAULT_ARCHIVE_ROOT.into(),
            output_dir: PathBuf::from("."),
            keep_archive: false,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl PipelineConfig {
    /// Load a config file. Missing fields take their default values.
    pub fn load(path: &Path) -> Result<Self> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ScaffoldError::ConfigNotFound {
                path: path.to_path_buf(),
                source: e,
            })?;
        serde_json::from_str(&contents).map_err(|e| ScaffoldError::ConfigParse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Where the archive's root directory lands after extraction.
    pub fn extracted_root(&self) -> PathBuf {
        self.output_dir.join(&self.archive_root)
    }
}
