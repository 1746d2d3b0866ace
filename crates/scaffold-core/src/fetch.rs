//! Template archive retrieval.
//!
//! An [`ArchiveFetcher`] turns a URL into an [`ArchiveHandle`]: a temp file
//! named `<unix-seconds>-<random>.zip` that holds the exact bytes served.
//! The handle deletes its file when dropped unless [`ArchiveHandle::keep`]
//! is called.

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tempfile::TempPath;

use crate::error::{Result, ScaffoldError};

/// Something that can retrieve a template archive into a local temp file.
pub trait ArchiveFetcher {
    /// Download (or copy) `url` into a new temp file.
    fn fetch(&self, url: &str) -> Result<ArchiveHandle>;
}

/// A downloaded archive on local disk.
#[derive(Debug)]
pub struct ArchiveHandle {
    path: TempPath,
    size_bytes: u64,
}

impl ArchiveHandle {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of bytes written to the temp file.
    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    /// Disable clean-up and return the path of the archive.
    pub fn keep(self) -> Result<PathBuf> {
        self.path.keep().map_err(|e| ScaffoldError::TempFile { source: e.error })
    }
}

/// Where a template URL points to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchSource {
    /// `http://` or `https://` URL.
    Http(String),
    /// `file://` URL or a plain filesystem path.
    Local(PathBuf),
}

impl FetchSource {
    pub fn parse(url: &str) -> Self {
        if url.starts_with("http://") || url.starts_with("https://") {
            Self::Http(url.to_string())
        } else if let Some(path) = url.strip_prefix("file://") {
            Self::Local(PathBuf::from(path))
        } else {
            Self::Local(PathBuf::from(url))
        }
    }
}

/// Pick the fetcher matching the scheme of `url`.
pub fn fetcher_for(url: &str, timeout: Duration, temp_dir: &Path) -> Box<dyn ArchiveFetcher> {
    match FetchSource::parse(url) {
        FetchSource::Http(_) => Box::new(HttpFetcher::new(timeout, temp_dir)),
        FetchSource::Local(_) => Box::new(LocalFetcher::new(temp_dir)),
    }
}

/// Blocking HTTP(S) fetcher built on `ureq`.
pub struct HttpFetcher {
    agent: ureq::Agent,
    temp_dir: PathBuf,
}

impl HttpFetcher {
    pub fn new(timeout: Duration, temp_dir: &Path) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build();
        Self {
            agent: ureq::Agent::new_with_config(config),
            temp_dir: temp_dir.to_path_buf(),
        }
    }
}

impl ArchiveFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<ArchiveHandle> {
        tracing::info!("downloading template archive from {url}");
        let response = self
            .agent
            .get(url)
            .call()
            .map_err(|e| map_ureq_error(url, &e))?;

        persist_stream(
            &mut response.into_body().as_reader(),
            &self.temp_dir,
            |source| ScaffoldError::Download {
                url: url.to_string(),
                source,
            },
        )
    }
}

/// Copies an archive that is already on disk (`file://` URL or path).
pub struct LocalFetcher {
    temp_dir: PathBuf,
}

impl LocalFetcher {
    pub fn new(temp_dir: &Path) -> Self {
        Self {
            temp_dir: temp_dir.to_path_buf(),
        }
    }
}

impl ArchiveFetcher for LocalFetcher {
    fn fetch(&self, url: &str) -> Result<ArchiveHandle> {
        let source = match FetchSource::parse(url) {
            FetchSource::Local(path) => path,
            FetchSource::Http(_) => {
                return Err(ScaffoldError::Http {
                    url: url.to_string(),
                    reason: "not a local archive".into(),
                })
            }
        };
        tracing::info!("copying template archive from {}", source.display());

        let mut file = File::open(&source).map_err(ScaffoldError::file_io("open", &source))?;
        persist_stream(&mut file, &self.temp_dir, ScaffoldError::file_io("read", &source))
    }
}

/// Copy `reader` into a fresh `<unix-seconds>-<random>.zip` file in `temp_dir`.
///
/// Read failures are mapped with `on_read_error`; write failures are always
/// [`ScaffoldError::TempFile`].
pub fn persist_stream<R, F>(reader: &mut R, temp_dir: &Path, on_read_error: F) -> Result<ArchiveHandle>
where
    R: Read + ?Sized,
    F: FnOnce(io::Error) -> ScaffoldError,
{
    let prefix = format!("{}-", unix_timestamp());
    let mut file = tempfile::Builder::new()
        .prefix(&prefix)
        .suffix(".zip")
        .tempfile_in(temp_dir)
        .map_err(|source| ScaffoldError::TempFile { source })?;

    let mut tracked = ReadTracker {
        inner: reader,
        failed: None,
    };
    let size_bytes = io::copy(&mut tracked, &mut file).map_err(|source| match tracked.failed.take() {
        Some(read_error) => on_read_error(read_error),
        None => ScaffoldError::TempFile { source },
    })?;
    file.flush()
        .map_err(|source| ScaffoldError::TempFile { source })?;

    let path = file.into_temp_path();
    tracing::debug!("archive saved to {} ({size_bytes} bytes)", path.display());
    Ok(ArchiveHandle { path, size_bytes })
}

/// Keeps the first read error so `io::copy` failures can be told apart from
/// write failures.
struct ReadTracker<'a, R: ?Sized> {
    inner: &'a mut R,
    failed: Option<io::Error>,
}

impl<R: Read + ?Sized> Read for ReadTracker<'_, R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.inner.read(buf) {
            Err(e) if e.kind() != io::ErrorKind::Interrupted => {
                let kind = e.kind();
                self.failed = Some(e);
                Err(kind.into())
            }
            other => other,
        }
    }
}

fn unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

/// Map a ureq error to a [`ScaffoldError::Http`].
fn map_ureq_error(url: &str, err: &ureq::Error) -> ScaffoldError {
    let reason = match err {
        ureq::Error::StatusCode(code) => format!("server responded with HTTP {code}"),
        other => other.to_string(),
    };
    ScaffoldError::Http {
        url: url.to_owned(),
        reason,
    }
}
