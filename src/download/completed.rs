//! The result of one fetch task.
//!
//! # Examples
//!
//! ```rust,no_run
//! use futures::StreamExt;
//! use packfetch::session::DownloadSession;
//!
//! # async fn example(mut session: DownloadSession) -> Result<(), Box<dyn std::error::Error>> {
//! let mut results = session.start(4);
//! while let Some(completed) = results.next().await {
//!     if let Some(err) = completed.error() {
//!         eprintln!("{}: {}", completed.name(), err);
//!         continue;
//!     }
//!     if let Some(warning) = completed.warning() {
//!         eprintln!("{}: {}", completed.name(), warning);
//!     }
//!     let mut cached = completed.into_file().expect("successful downloads carry a file");
//!     // Copy `cached` to its destination...
//! #   let _ = &mut cached;
//! }
//! session.save_index().await?;
//! # Ok(())
//! # }
//! ```

use super::task::FetchTask;
use crate::cache::HashWarning;
use crate::error::Error;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::fs::File;

/// Outcome of a [`FetchTask`].
///
/// A successful download holds an open, read-only handle to the verified
/// cache file; ownership of the handle passes to whoever consumes it. A
/// failed download holds only the error.
#[derive(Debug)]
pub struct CompletedDownload {
    name: String,
    destination: PathBuf,
    file: Option<File>,
    cache_path: Option<PathBuf>,
    hashes: HashMap<String, String>,
    from_cache: bool,
    warning: Option<HashWarning>,
    error: Option<Error>,
}

impl CompletedDownload {
    /// Creates a successful result for `task`.
    pub(crate) fn new(
        task: &FetchTask,
        file: File,
        cache_path: PathBuf,
        hashes: HashMap<String, String>,
        from_cache: bool,
    ) -> Self {
        Self {
            name: task.name().to_string(),
            destination: task.destination().to_path_buf(),
            file: Some(file),
            cache_path: Some(cache_path),
            hashes,
            from_cache,
            warning: None,
            error: None,
        }
    }

    /// Creates a result carrying only `error`.
    pub(crate) fn failed(task: &FetchTask, error: Error) -> Self {
        Self {
            name: task.name().to_string(),
            destination: task.destination().to_path_buf(),
            file: None,
            cache_path: None,
            hashes: HashMap::new(),
            from_cache: false,
            warning: None,
            error: Some(error),
        }
    }

    /// Attach a non-fatal warning.
    pub(crate) fn with_warning(self, warning: Option<HashWarning>) -> Self {
        Self { warning, ..self }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Where the caller wants the file to end up.
    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// The open cache file, if the task succeeded and the handle was not taken yet.
    pub fn file(&self) -> Option<&File> {
        self.file.as_ref()
    }

    /// Takes ownership of the open cache file.
    pub fn take_file(&mut self) -> Option<File> {
        self.file.take()
    }

    pub fn into_file(self) -> Option<File> {
        self.file
    }

    /// Location of the content inside the cache.
    pub fn cache_path(&self) -> Option<&Path> {
        self.cache_path.as_deref()
    }

    /// Every known hash of the content, by algorithm.
    pub fn hashes(&self) -> &HashMap<String, String> {
        &self.hashes
    }

    pub fn hash(&self, algorithm: &str) -> Option<&str> {
        self.hashes.get(algorithm).map(String::as_str)
    }

    /// Whether the content was served from the cache without fetching.
    #[must_use]
    pub fn from_cache(&self) -> bool {
        self.from_cache
    }

    pub fn warning(&self) -> Option<&HashWarning> {
        self.warning.as_ref()
    }

    pub fn error(&self) -> Option<&Error> {
        self.error.as_ref()
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}
