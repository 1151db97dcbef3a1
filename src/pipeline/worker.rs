//! Per-task processing shared by every worker.
//!
//! For one [`FetchTask`]:
//!
//! 1. Look the declared hash up under the read lock.
//! 2. On a hit, open the cached file after the lock is released, check it
//!    against its canonical digest while hashing whatever is still unknown,
//!    and record the result.
//! 3. On a miss (or a cached file that vanished) stream the fetch into a
//!    unique temp file, hashing in the same pass, and verify every
//!    computable known hash.
//! 4. Under the write lock, reuse the content if its canonical digest is
//!    already indexed, otherwise rename it into its shard; then upsert every
//!    known hash.
//!
//! The write lock never spans a network fetch.

use crate::cache::{CacheIndex, CacheLayout, HashWarning, Position};
use crate::download::{CompletedDownload, FetchTask};
use crate::error::{Error, Result};
use crate::hash::{HashAlgorithm, HashTee, CANONICAL_ALGORITHM};
use crate::http::Fetcher;
use crate::progress::ProgressDisplay;

use std::collections::{BTreeSet, HashMap};
use std::io::{ErrorKind, SeekFrom};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::fs::{self, File};
use tokio::io::{self, AsyncSeekExt};
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Everything a worker needs, shared by all workers of one run.
pub(crate) struct Pipeline {
    pub(crate) layout: CacheLayout,
    pub(crate) index: Arc<RwLock<CacheIndex>>,
    pub(crate) fetcher: Arc<dyn Fetcher>,
    /// Algorithms requested for every file.
    pub(crate) algorithms: Vec<HashAlgorithm>,
    pub(crate) progress: ProgressDisplay,
    pub(crate) cancel: CancellationToken,
}

impl Pipeline {
    /// Runs one task to completion. Never fails: errors end up in the result.
    pub(crate) async fn process(&self, task: &FetchTask) -> CompletedDownload {
        match self.try_process(task).await {
            Ok(completed) => completed,
            Err(e) => {
                warn!("Failed to obtain {}: {}", task.name(), e);
                CompletedDownload::failed(task, e)
            }
        }
    }

    async fn try_process(&self, task: &FetchTask) -> Result<CompletedDownload> {
        self.check_cancelled()?;

        let cached = {
            let index = self.index.read().await;
            index
                .lookup(task.hash_format(), task.hash())
                .and_then(|position| {
                    let path = index.canonical_path(&self.layout, position)?;
                    let canonical = index.entry(position)?.canonical()?.to_string();
                    Some((position, path, canonical))
                })
        };

        if let Some((position, path, canonical)) = cached {
            match File::open(&path).await {
                Ok(file) => {
                    debug!("Cache hit for {} at {:?}", task.name(), path);
                    return self
                        .complete_from_cache(task, position, path, canonical, file)
                        .await;
                }
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    warn!(
                        "Cache index lists {:?} for {} but the file is missing, downloading again",
                        path,
                        task.name()
                    );
                }
                Err(e) => return Err(e.into()),
            }
        }

        self.check_cancelled()?;
        self.download(task).await
    }

    /// Serves a task from an existing cache file.
    async fn complete_from_cache(
        &self,
        task: &FetchTask,
        position: Position,
        path: PathBuf,
        canonical: String,
        mut file: File,
    ) -> Result<CompletedDownload> {
        // The lookup value found this entry so it is not recomputed, unless
        // it is the canonical digest: the file is always checked against that.
        let mut lookup = HashMap::new();
        if task.hash_format() != CANONICAL_ALGORITHM.name() {
            lookup.insert(task.hash_format().to_string(), task.hash().to_string());
        }
        let tee = HashTee::new(&self.desired(None), &lookup);
        let computed = tee.tee_reader(&mut file, &mut io::sink()).await?;
        file.seek(SeekFrom::Start(0)).await?;

        let actual = computed
            .get(CANONICAL_ALGORITHM.name())
            .ok_or_else(|| Error::Internal(format!("{} was not computed", CANONICAL_ALGORITHM)))?;
        if *actual != canonical {
            return Err(Error::CorruptCacheEntry {
                path,
                expected: canonical,
                actual: actual.clone(),
            });
        }
        self.check_cancelled()?;

        let mut update = computed;
        update.extend(lookup);
        for (algorithm, value) in task.known_hashes() {
            if HashAlgorithm::from_name(&algorithm).is_none() {
                update.entry(algorithm).or_insert(value);
            }
        }

        let (hashes, warning) = self.record(Some(position), &update).await?;
        Ok(CompletedDownload::new(task, file, path, hashes, true).with_warning(warning))
    }

    /// Fetches a task's content into the cache.
    async fn download(&self, task: &FetchTask) -> Result<CompletedDownload> {
        let known = task.known_hashes();
        let response = self.fetcher.fetch(task.url()).await?;

        // Unique per download so concurrent workers never share a scratch file.
        let temp_path = tempfile::Builder::new()
            .prefix("download-")
            .tempfile_in(self.layout.temp_dir())?
            .into_temp_path();
        let mut out = File::create(&temp_path).await?;

        let pb = self.progress.child(task.name(), response.content_length);
        let tee = HashTee::new(&self.desired(Some(task)), &HashMap::new());
        let result = tee.tee_stream(response.body, &mut out, |n| pb.inc(n)).await;
        self.progress.finish_child(pb);
        drop(out);
        let computed = result?;

        for (algorithm, expected) in &known {
            if let Some(actual) = computed.get(algorithm) {
                if actual != expected {
                    return Err(Error::HashMismatch {
                        algorithm: algorithm.clone(),
                        expected: expected.clone(),
                        actual: actual.clone(),
                    });
                }
            }
        }
        let canonical = computed
            .get(CANONICAL_ALGORITHM.name())
            .cloned()
            .ok_or_else(|| Error::Internal(format!("{} was not computed", CANONICAL_ALGORITHM)))?;
        self.check_cancelled()?;

        let mut update = known;
        update.extend(computed);

        let path = self.layout.content_path(&canonical);
        let (hashes, warning) = {
            let mut index = self.index.write().await;
            let existing = index.lookup(CANONICAL_ALGORITHM.name(), &canonical);
            let on_disk = fs::try_exists(&path).await.unwrap_or(false);
            if existing.is_some() && on_disk {
                debug!("{} is already cached at {:?}", task.name(), path);
                temp_path.close()?;
            } else {
                if let Some(parent) = path.parent() {
                    fs::create_dir_all(parent).await?;
                }
                // Same filesystem as the scratch dir, so this is a rename.
                temp_path.persist(&path).map_err(io::Error::from)?;
                debug!("Cached {} at {:?}", task.name(), path);
            }
            let (position, warning) = index.upsert(existing, &update)?;
            (entry_hashes(&index, position), warning)
        };

        let file = File::open(&path).await?;
        Ok(CompletedDownload::new(task, file, path, hashes, false).with_warning(warning))
    }

    /// Upserts `update` under the write lock and returns the entry's full hash set.
    async fn record(
        &self,
        position: Option<Position>,
        update: &HashMap<String, String>,
    ) -> Result<(HashMap<String, String>, Option<HashWarning>)> {
        let mut index = self.index.write().await;
        let (position, warning) = index.upsert(position, update)?;
        Ok((entry_hashes(&index, position), warning))
    }

    /// Requested algorithms plus the canonical one, plus every computable algorithm `task` declares.
    fn desired(&self, task: Option<&FetchTask>) -> Vec<HashAlgorithm> {
        let mut desired: BTreeSet<HashAlgorithm> = self.algorithms.iter().copied().collect();
        desired.insert(CANONICAL_ALGORITHM);
        if let Some(task) = task {
            desired.extend(
                task.known_hashes()
                    .keys()
                    .filter_map(|algorithm| HashAlgorithm::from_name(algorithm)),
            );
        }
        desired.into_iter().collect()
    }

    fn check_cancelled(&self) -> Result<()> {
        if self.cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }
        Ok(())
    }
}

fn entry_hashes(index: &CacheIndex, position: Position) -> HashMap<String, String> {
    index
        .entry(position)
        .map(|entry| {
            entry
                .hashes()
                .iter()
                .map(|(algorithm, value)| (algorithm.clone(), value.clone()))
                .collect()
        })
        .unwrap_or_default()
}
