//! The cache index: which hash values identify which cached file.
//!
//! On disk the index keeps the historical parallel-array shape:
//!
//! ```json
//! { "Version": 1, "Hashes": { "sha256": ["ab..", "cd.."], "sha1": ["", "ef.."] } }
//! ```
//!
//! where position *i* of every list describes the same file and `""` marks
//! an algorithm not computed yet. In memory every position is a
//! [`CacheEntry`] record holding all of its known values, and a secondary
//! `(algorithm, value) -> position` map is kept up to date on every
//! mutation, so lookups never scan.

use super::layout::CacheLayout;
use crate::error::{Error, Result};
use crate::hash::{normalize, CANONICAL_ALGORITHM};

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

/// Highest index version this crate can read.
pub const INDEX_VERSION: u32 = 1;

#[derive(Debug, Default, Serialize, Deserialize)]
struct IndexFile {
    #[serde(rename = "Version")]
    version: u32,
    #[serde(rename = "Hashes", default)]
    hashes: BTreeMap<String, Vec<String>>,
}

/// Position of an entry in the index. Positions are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position(usize);

impl Position {
    pub fn get(&self) -> usize {
        self.0
    }
}

/// Every known hash value of one cached file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheEntry {
    hashes: BTreeMap<String, String>,
}

impl CacheEntry {
    pub fn get(&self, algorithm: &str) -> Option<&str> {
        self.hashes.get(algorithm).map(String::as_str)
    }

    /// The canonical digest, which names the file on disk.
    pub fn canonical(&self) -> Option<&str> {
        self.get(CANONICAL_ALGORITHM.name())
    }

    pub fn hashes(&self) -> &BTreeMap<String, String> {
        &self.hashes
    }
}

/// A stored value was found to disagree with a freshly computed one and was overwritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashWarning {
    pub algorithm: String,
    pub previous: String,
    pub current: String,
}

impl fmt::Display for HashWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "inconsistent {} hash in cache index: stored {} but computed {}; the stored value was overwritten",
            self.algorithm, self.previous, self.current
        )
    }
}

/// In-memory cache index.
#[derive(Debug, Clone)]
pub struct CacheIndex {
    version: u32,
    entries: Vec<CacheEntry>,
    lookup: HashMap<String, HashMap<String, Position>>,
}

impl Default for CacheIndex {
    fn default() -> Self {
        Self {
            version: INDEX_VERSION,
            entries: Vec::new(),
            lookup: HashMap::new(),
        }
    }
}

impl CacheIndex {
    /// Loads the index at `path`, or returns an empty index if the file does not exist.
    pub async fn load(path: &Path) -> Result<Self> {
        let bytes = match fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No cache index at {:?}, starting empty", path);
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };
        Self::from_json(&bytes)
    }

    /// Parses a serialized index.
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        let file: IndexFile = serde_json::from_slice(bytes)?;
        if file.version > INDEX_VERSION {
            return Err(Error::IncompatibleVersion {
                found: file.version,
                supported: INDEX_VERSION,
            });
        }

        let mut index = Self::default();
        let positions = file.hashes.values().map(Vec::len).max().unwrap_or(0);
        for i in 0..positions {
            let hashes: BTreeMap<String, String> = file
                .hashes
                .iter()
                .filter_map(|(algorithm, values)| {
                    let value = normalize(values.get(i)?);
                    (!value.is_empty()).then(|| (algorithm.to_ascii_lowercase(), value))
                })
                .collect();
            if !hashes.contains_key(CANONICAL_ALGORITHM.name()) {
                if !hashes.is_empty() {
                    warn!("Dropping cache index position {} without a {} hash", i, CANONICAL_ALGORITHM);
                }
                continue;
            }
            index.push(CacheEntry { hashes });
        }
        Ok(index)
    }

    /// Serializes the index into its parallel-array form.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        let algorithms: BTreeSet<&String> = self
            .entries
            .iter()
            .flat_map(|entry| entry.hashes.keys())
            .collect();
        let hashes = algorithms
            .into_iter()
            .map(|algorithm| {
                let values = self
                    .entries
                    .iter()
                    .map(|entry| entry.hashes.get(algorithm).cloned().unwrap_or_default())
                    .collect();
                (algorithm.clone(), values)
            })
            .collect();
        let file = IndexFile {
            version: self.version,
            hashes,
        };
        serde_json::to_vec(&file).map_err(serialize_error)
    }

    /// Writes the index to `path` atomically.
    ///
    /// The bytes go to a uniquely named file next to `path` which is then
    /// renamed over it, so a concurrent reader never sees a torn index.
    pub async fn save(&self, path: &Path) -> Result<()> {
        let bytes = self.to_json()?;
        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(dir).await?;
        let temp_path = tempfile::Builder::new()
            .prefix("index-")
            .suffix(".tmp")
            .tempfile_in(dir)?
            .into_temp_path();
        fs::write(&temp_path, &bytes).await?;
        temp_path.persist(path).map_err(std::io::Error::from)?;
        debug!("Saved cache index with {} entries to {:?}", self.entries.len(), path);
        Ok(())
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entry(&self, position: Position) -> Option<&CacheEntry> {
        self.entries.get(position.0)
    }

    /// Finds the entry holding `value` for `algorithm`. Hex case is ignored.
    pub fn lookup(&self, algorithm: &str, value: &str) -> Option<Position> {
        self.lookup
            .get(algorithm)?
            .get(&normalize(value))
            .copied()
    }

    /// Location of the file described by `position`.
    pub fn canonical_path(&self, layout: &CacheLayout, position: Position) -> Option<PathBuf> {
        self.entry(position)?
            .canonical()
            .map(|digest| layout.content_path(digest))
    }

    /// Records `hashes` for an existing position, or appends a new entry when `position` is `None`.
    ///
    /// Blank slots are filled. A slot holding a different value is
    /// overwritten; the first such overwrite is returned as a warning and all
    /// of them are logged. Appending requires a canonical value.
    pub fn upsert(
        &mut self,
        position: Option<Position>,
        hashes: &HashMap<String, String>,
    ) -> Result<(Position, Option<HashWarning>)> {
        let position = match position {
            Some(position) if position.0 < self.entries.len() => position,
            Some(position) => {
                return Err(Error::Internal(format!(
                    "cache index position {} out of range",
                    position.0
                )))
            }
            None => {
                if !hashes.contains_key(CANONICAL_ALGORITHM.name()) {
                    return Err(Error::Internal(format!(
                        "cannot add a cache entry without a {} hash",
                        CANONICAL_ALGORITHM
                    )));
                }
                self.push(CacheEntry::default())
            }
        };

        let mut warning = None;
        // Sorted so the reported warning does not depend on map iteration order.
        let mut updates: Vec<(&String, &String)> = hashes.iter().collect();
        updates.sort();
        for (algorithm, value) in updates {
            let value = normalize(value);
            if value.is_empty() {
                continue;
            }
            let previous = self.entries[position.0]
                .hashes
                .insert(algorithm.clone(), value.clone());
            match previous {
                Some(previous) if previous == value => continue,
                Some(previous) => {
                    warn!(
                        "Overwriting {} hash {} with {} for cache entry {}",
                        algorithm, previous, value, position.0
                    );
                    self.unregister(algorithm, &previous, position);
                    warning.get_or_insert(HashWarning {
                        algorithm: algorithm.clone(),
                        previous,
                        current: value.clone(),
                    });
                }
                None => {}
            }
            self.register(algorithm, value, position);
        }
        Ok((position, warning))
    }

    fn push(&mut self, entry: CacheEntry) -> Position {
        let position = Position(self.entries.len());
        for (algorithm, value) in &entry.hashes {
            self.register(algorithm, value.clone(), position);
        }
        self.entries.push(entry);
        position
    }

    fn register(&mut self, algorithm: &str, value: String, position: Position) {
        let previous = self
            .lookup
            .entry(algorithm.to_string())
            .or_default()
            .insert(value, position);
        if let Some(previous) = previous.filter(|p| *p != position) {
            debug!(
                "{} value moved from cache entry {} to {}",
                algorithm, previous.0, position.0
            );
        }
    }

    fn unregister(&mut self, algorithm: &str, value: &str, position: Position) {
        if let Some(values) = self.lookup.get_mut(algorithm) {
            if values.get(value) == Some(&position) {
                values.remove(value);
            }
        }
    }
}

fn serialize_error(e: serde_json::Error) -> Error {
    Error::Internal(format!("Failed to serialize cache index: {}", e))
}
