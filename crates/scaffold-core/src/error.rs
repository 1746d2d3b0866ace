//! Unified error types for the scaffold pipeline.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Broad failure category of a [`ScaffoldError`].
///
/// The CLI reports the category alongside the message; it is not mapped to
/// distinct exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The template archive could not be downloaded.
    Network,
    /// A file or directory could not be created, read, written or renamed.
    Filesystem,
    /// Malformed zip archive, template syntax, or configuration content.
    Format,
    /// A required interactive field was empty.
    Input,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Network => "network",
            Self::Filesystem => "filesystem",
            Self::Format => "format",
            Self::Input => "input",
        };
        f.write_str(text)
    }
}

/// All errors that can occur while scaffolding a project.
#[derive(Error, Debug)]
pub enum ScaffoldError {
    // --- Input ---

    /// A required project field was empty after trimming.
    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },

    // --- Configuration ---

    /// The pipeline configuration file could not be read.
    #[error("config file not found at {path}")]
    ConfigNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The pipeline configuration file exists but contains invalid JSON.
    #[error("failed to parse config at {path}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    // --- Fetch ---

    /// The HTTP request failed or returned a non-success status.
    #[error("download failed for {url}: {reason}")]
    Http { url: String, reason: String },

    /// The response body could not be read to the end.
    #[error("download of {url} was interrupted")]
    Download {
        url: String,
        #[source]
        source: std::io::Error,
    },

    /// The temp file receiving the archive could not be created or written.
    #[error("failed to write archive to temp file")]
    TempFile {
        #[source]
        source: std::io::Error,
    },

    // --- Extract ---

    /// The file is not a readable zip archive.
    #[error("invalid zip archive at {path}")]
    InvalidArchive {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    /// An entry of an otherwise valid archive could not be opened.
    #[error("failed to open archive entry #{index}")]
    ArchiveEntry {
        index: usize,
        #[source]
        source: zip::result::ZipError,
    },

    /// An entry name is absolute or escapes the extraction directory.
    #[error("archive entry escapes the extraction directory: {name}")]
    UnsafeEntryPath { name: String },

    /// The archive did not contain the expected top-level directory.
    #[error("archive does not contain the expected root directory {path}")]
    ArchiveRootMissing { path: PathBuf },

    // --- Templates ---

    /// A file's content is not valid template syntax.
    #[error("invalid template syntax in {name}: {message}")]
    TemplateParse { name: String, message: String },

    /// Rendering failed, usually because of an unknown placeholder.
    #[error("template rendering failed for {name}: {message}")]
    TemplateRender { name: String, message: String },

    /// The directory walk over the extracted tree failed.
    #[error("failed to walk template tree")]
    Walk(#[from] walkdir::Error),

    // --- Filesystem ---

    /// A filesystem operation on a known path failed.
    #[error("failed to {op} {path}")]
    FileIo {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ScaffoldError {
    /// The failure category this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyField { .. } => ErrorKind::Input,
            Self::Http { .. } | Self::Download { .. } => ErrorKind::Network,
            Self::ConfigParse { .. }
            | Self::InvalidArchive { .. }
            | Self::UnsafeEntryPath { .. }
            | Self::ArchiveRootMissing { .. }
            | Self::TemplateParse { .. }
            | Self::TemplateRender { .. } => ErrorKind::Format,
            Self::ConfigNotFound { .. }
            | Self::TempFile { .. }
            | Self::ArchiveEntry { .. }
            | Self::Walk(_)
            | Self::FileIo { .. } => ErrorKind::Filesystem,
        }
    }

    pub(crate) fn file_io(op: &'static str, path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| Self::FileIo { op, path, source }
    }
}

/// Alias for `Result<T, ScaffoldError>`.
pub type Result<T> = std::result::Result<T, ScaffoldError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_categories() {
        let input = ScaffoldError::EmptyField { field: "module" };
        assert_eq!(input.kind(), ErrorKind::Input);

        let network = ScaffoldError::Http {
            url: "https://example.test/a.zip".into(),
            reason: "connection refused".into(),
        };
        assert_eq!(network.kind(), ErrorKind::Network);

        let format = ScaffoldError::TemplateParse {
            name: "README.md".into(),
            message: "unclosed expression".into(),
        };
        assert_eq!(format.kind(), ErrorKind::Format);

        let fs = ScaffoldError::file_io("read", "/nope")(std::io::Error::from(
            std::io::ErrorKind::NotFound,
        ));
        assert_eq!(fs.kind(), ErrorKind::Filesystem);
    }

    #[test]
    fn test_file_io_message_names_path() {
        let err = ScaffoldError::file_io("write", "out/main.go")(std::io::Error::from(
            std::io::ErrorKind::PermissionDenied,
        ));
        assert_eq!(err.to_string(), "failed to write out/main.go");
    }

    #[test]
    fn test_empty_field_message() {
        let err = ScaffoldError::EmptyField { field: "binary name" };
        assert_eq!(err.to_string(), "binary name must not be empty");
    }
}
