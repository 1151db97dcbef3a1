//! The per-mod input record and its download mode.

use crate::error::{Error, Result};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// How a mod's file is obtained.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DownloadMode {
    /// Fetch the URL recorded in the mod metadata.
    Url,
    /// Ask the named provider where the file lives.
    Metadata(String),
}

impl DownloadMode {
    const METADATA_PREFIX: &'static str = "metadata:";

    /// Parses a mode tag. An empty tag means [`DownloadMode::Url`].
    pub fn parse(name: &str, tag: &str) -> Result<Self> {
        match tag {
            "" | "url" => Ok(DownloadMode::Url),
            _ => match tag.strip_prefix(Self::METADATA_PREFIX) {
                Some(provider) if !provider.is_empty() => {
                    Ok(DownloadMode::Metadata(provider.to_string()))
                }
                _ => Err(Error::UnknownDownloadMode {
                    name: name.to_string(),
                    mode: tag.to_string(),
                }),
            },
        }
    }
}

impl fmt::Display for DownloadMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DownloadMode::Url => f.write_str("url"),
            DownloadMode::Metadata(provider) => write!(f, "{}{}", Self::METADATA_PREFIX, provider),
        }
    }
}

/// Download section of a mod's metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ModDownload {
    /// Download mode tag: `url`, `metadata:<provider>`, or empty.
    #[serde(default)]
    pub mode: String,
    /// Source URL for `url` mode.
    #[serde(default)]
    pub url: Option<String>,
    /// Algorithm of [`ModDownload::hash`].
    pub hash_format: String,
    /// Expected hash of the file.
    pub hash: String,
}

/// A mod file as described by the pack's metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModFile {
    /// Human-readable name.
    pub name: String,
    /// File name the mod is saved under.
    pub filename: String,
    /// Where the caller wants the file to end up.
    pub destination: PathBuf,
    pub download: ModDownload,
    /// Provider-specific data, opaque to packfetch and passed to resolvers as-is.
    #[serde(default)]
    pub provider_data: serde_json::Value,
}

impl ModFile {
    /// Creates a mod fetched directly from `url`.
    pub fn from_url(
        name: &str,
        destination: impl Into<PathBuf>,
        url: &str,
        hash_format: &str,
        hash: &str,
    ) -> Self {
        let destination = destination.into();
        let filename = destination
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_else(|| name.to_string());
        Self {
            name: name.to_string(),
            filename,
            destination,
            download: ModDownload {
                mode: "url".to_string(),
                url: Some(url.to_string()),
                hash_format: hash_format.to_string(),
                hash: hash.to_string(),
            },
            provider_data: serde_json::Value::Null,
        }
    }

    /// Creates a mod whose location is resolved by `provider`.
    pub fn from_provider(
        name: &str,
        destination: impl Into<PathBuf>,
        provider: &str,
        provider_data: serde_json::Value,
        hash_format: &str,
        hash: &str,
    ) -> Self {
        let mut file = Self::from_url(name, destination, "", hash_format, hash);
        file.download.mode = format!("{}{}", DownloadMode::METADATA_PREFIX, provider);
        file.download.url = None;
        file.provider_data = provider_data;
        file
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    pub fn download_mode(&self) -> Result<DownloadMode> {
        DownloadMode::parse(&self.name, &self.download.mode)
    }
}
