//! A unit of work for the download pipeline.

use crate::hash::normalize;

use reqwest::Url;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Where a task's bytes come from.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentRef {
    /// A URL taken straight from the mod metadata.
    Url(Url),
    /// A location a provider resolver produced from its opaque reference.
    Provider {
        provider: String,
        reference: serde_json::Value,
        url: Url,
    },
}

impl ContentRef {
    /// The URL to fetch.
    pub fn url(&self) -> &Url {
        match self {
            ContentRef::Url(url) => url,
            ContentRef::Provider { url, .. } => url,
        }
    }
}

/// A file to fetch, keyed in the cache by its declared hash.
#[derive(Debug, Clone)]
pub struct FetchTask {
    name: String,
    destination: PathBuf,
    content: ContentRef,
    hash_format: String,
    hash: String,
    extra_hashes: HashMap<String, String>,
}

impl FetchTask {
    /// Creates a task. `hash_format` and `hash` are the cache lookup key.
    pub fn new(
        name: &str,
        destination: impl Into<PathBuf>,
        content: ContentRef,
        hash_format: &str,
        hash: &str,
    ) -> Self {
        Self {
            name: name.to_string(),
            destination: destination.into(),
            content,
            hash_format: hash_format.to_ascii_lowercase(),
            hash: normalize(hash),
            extra_hashes: HashMap::new(),
        }
    }

    /// Adds hashes reported by a provider. The declared hash always wins over these.
    pub fn with_extra_hashes(mut self, hashes: &HashMap<String, String>) -> Self {
        for (algorithm, value) in hashes {
            let value = normalize(value);
            if !value.is_empty() {
                self.extra_hashes.insert(algorithm.to_ascii_lowercase(), value);
            }
        }
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    pub fn content(&self) -> &ContentRef {
        &self.content
    }

    pub fn url(&self) -> &Url {
        self.content.url()
    }

    /// Algorithm of the declared hash.
    pub fn hash_format(&self) -> &str {
        &self.hash_format
    }

    /// The declared hash, normalized to lowercase.
    pub fn hash(&self) -> &str {
        &self.hash
    }

    /// Every hash known before fetching: provider-reported plus declared.
    pub fn known_hashes(&self) -> HashMap<String, String> {
        let mut hashes = self.extra_hashes.clone();
        hashes.insert(self.hash_format.clone(), self.hash.clone());
        hashes
    }
}
