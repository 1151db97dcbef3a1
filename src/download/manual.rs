//! Files the user has to download by hand.

use std::fmt;

/// A file a provider does not allow fetching programmatically.
///
/// The caller must place the file manually before running again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManualDownload {
    pub name: String,
    pub filename: String,
    /// Page where the file can be downloaded.
    pub url: String,
    /// Why it cannot be fetched automatically.
    pub reason: String,
}

impl fmt::Display for ManualDownload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) must be downloaded manually from {}: {}",
            self.name, self.filename, self.url, self.reason
        )
    }
}
