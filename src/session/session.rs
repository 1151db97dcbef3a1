//! The download session: resolution of a mod list into work, and the cache it owns.

use super::config::SessionConfig;
use crate::cache::{CacheIndex, CacheLayout};
use crate::download::{ContentRef, FetchTask, ManualDownload};
use crate::error::{Error, Result};
use crate::hash::HashAlgorithm;
use crate::http::{Fetcher, HttpFetcher};
use crate::pipeline::{self, CompletedStream, Pipeline};
use crate::progress::{ProgressDisplay, ProgressOptions};
use crate::provider::{DownloadMode, ModFile, Resolution, ResolverRegistry};

use reqwest::Url;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// A prepared set of downloads backed by one cache directory.
///
/// Build one with [`SessionBuilder`](super::SessionBuilder), inspect
/// [`manual_downloads`](Self::manual_downloads), drain the stream returned
/// by [`start`](Self::start), then call [`save_index`](Self::save_index).
pub struct DownloadSession {
    layout: CacheLayout,
    index: Arc<RwLock<CacheIndex>>,
    tasks: Vec<FetchTask>,
    manual_downloads: Vec<ManualDownload>,
    algorithms: Vec<HashAlgorithm>,
    fetcher: Arc<dyn Fetcher>,
    progress: ProgressOptions,
    cancel: CancellationToken,
}

impl fmt::Debug for DownloadSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DownloadSession")
            .field("cache_dir", &self.layout.root())
            .field("tasks", &self.tasks.len())
            .field("manual_downloads", &self.manual_downloads.len())
            .field("algorithms", &self.algorithms)
            .finish()
    }
}

impl DownloadSession {
    /// Prepares the cache and turns `mods` into fetch tasks and manual downloads.
    ///
    /// Nothing is downloaded yet. Any error here aborts the whole session.
    pub async fn new(config: SessionConfig, mods: &[ModFile]) -> Result<Self> {
        let algorithms = config
            .hash_algorithms
            .iter()
            .map(|name| name.parse::<HashAlgorithm>())
            .collect::<Result<Vec<_>>>()?;

        let layout = CacheLayout::new(config.cache_dir);
        layout.create().await?;
        let index = CacheIndex::load(&layout.index_path()).await?;
        debug!("Loaded cache index with {} entries from {:?}", index.len(), layout.index_path());

        let (mut tasks, batches) = partition(mods, &config.resolvers)?;
        let mut manual_downloads = Vec::new();
        for (provider, batch) in batches {
            resolve_batch(&config.resolvers, &provider, &batch, &mut tasks, &mut manual_downloads)
                .await?;
        }

        let fetcher: Arc<dyn Fetcher> = match config.fetcher {
            Some(fetcher) => fetcher,
            None => Arc::new(HttpFetcher::from_config(config.http)?),
        };

        info!(
            "Prepared {} downloads, {} manual",
            tasks.len(),
            manual_downloads.len()
        );
        Ok(Self {
            layout,
            index: Arc::new(RwLock::new(index)),
            tasks,
            manual_downloads,
            algorithms,
            fetcher,
            progress: config.progress,
            cancel: CancellationToken::new(),
        })
    }

    /// Files the user has to download by hand.
    pub fn manual_downloads(&self) -> &[ManualDownload] {
        &self.manual_downloads
    }

    /// Tasks not yet handed to the pipeline.
    pub fn tasks(&self) -> &[FetchTask] {
        &self.tasks
    }

    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    pub fn cache_dir(&self) -> &Path {
        self.layout.root()
    }

    pub fn index_path(&self) -> PathBuf {
        self.layout.index_path()
    }

    /// Token that stops the pipeline between steps when cancelled.
    ///
    /// Tasks that observe the cancellation still produce a result carrying
    /// [`Error::Cancelled`].
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Starts `worker_count` workers (at least one) over every pending task.
    ///
    /// The returned stream yields one [`CompletedDownload`](crate::download::CompletedDownload)
    /// per task and must be drained: workers wait on the stream's bounded
    /// buffer, so a stream that is kept alive but never polled stalls them.
    /// Dropping the stream stops the workers after their current task.
    ///
    /// Must be called from within a Tokio runtime. Tasks are handed over,
    /// so a second call yields an empty stream.
    pub fn start(&mut self, worker_count: usize) -> CompletedStream {
        let tasks = std::mem::take(&mut self.tasks);
        let pipeline = Pipeline {
            layout: self.layout.clone(),
            index: self.index.clone(),
            fetcher: self.fetcher.clone(),
            algorithms: self.algorithms.clone(),
            progress: ProgressDisplay::new(self.progress.clone(), tasks.len()),
            cancel: self.cancel.clone(),
        };
        pipeline::start(pipeline, tasks, worker_count)
    }

    /// Persists the cache index.
    ///
    /// Call after the result stream is drained so every new entry is
    /// captured. A failure here does not invalidate results already returned.
    pub async fn save_index(&self) -> Result<()> {
        let index = self.index.read().await;
        index.save(&self.layout.index_path()).await
    }

    /// A snapshot of the in-memory cache index.
    pub async fn index(&self) -> CacheIndex {
        self.index.read().await.clone()
    }
}

/// Splits `mods` into direct-URL tasks and per-provider batches.
fn partition(
    mods: &[ModFile],
    resolvers: &ResolverRegistry,
) -> Result<(Vec<FetchTask>, BTreeMap<String, Vec<ModFile>>)> {
    let mut tasks = Vec::new();
    let mut batches: BTreeMap<String, Vec<ModFile>> = BTreeMap::new();

    for file in mods {
        if file.download.hash.trim().is_empty() || file.download.hash_format.trim().is_empty() {
            return Err(Error::MissingHash(file.name.clone()));
        }
        match file.download_mode()? {
            DownloadMode::Url => {
                let url = file
                    .download
                    .url
                    .as_deref()
                    .filter(|url| !url.is_empty())
                    .ok_or_else(|| {
                        Error::InvalidUrl(format!("{} has no download URL", file.name))
                    })?;
                let url = Url::parse(url).map_err(|e| {
                    Error::InvalidUrl(format!("The url \"{}\" cannot be parsed: {}", url, e))
                })?;
                tasks.push(FetchTask::new(
                    &file.name,
                    file.destination(),
                    ContentRef::Url(url),
                    &file.download.hash_format,
                    &file.download.hash,
                ));
            }
            DownloadMode::Metadata(provider) => {
                if !resolvers.contains(&provider) {
                    return Err(Error::MissingResolver(provider));
                }
                batches.entry(provider).or_default().push(file.clone());
            }
        }
    }
    Ok((tasks, batches))
}

/// Runs one provider's resolver and merges its answers.
async fn resolve_batch(
    resolvers: &ResolverRegistry,
    provider: &str,
    batch: &[ModFile],
    tasks: &mut Vec<FetchTask>,
    manual_downloads: &mut Vec<ManualDownload>,
) -> Result<()> {
    let resolver = resolvers
        .get(provider)
        .ok_or_else(|| Error::MissingResolver(provider.to_string()))?;
    debug!("Resolving {} mods with provider {}", batch.len(), provider);

    let resolutions = resolver
        .resolve(batch)
        .await
        .map_err(|source| Error::Resolver {
            provider: provider.to_string(),
            source,
        })?;
    if resolutions.len() != batch.len() {
        return Err(Error::Resolver {
            provider: provider.to_string(),
            source: format!(
                "expected {} resolutions, got {}",
                batch.len(),
                resolutions.len()
            )
            .into(),
        });
    }

    for (file, resolution) in batch.iter().zip(resolutions) {
        match resolution {
            Resolution::Fetch(resolved) => {
                let content = ContentRef::Provider {
                    provider: provider.to_string(),
                    reference: file.provider_data.clone(),
                    url: resolved.url,
                };
                tasks.push(
                    FetchTask::new(
                        &file.name,
                        file.destination(),
                        content,
                        &file.download.hash_format,
                        &file.download.hash,
                    )
                    .with_extra_hashes(&resolved.hashes),
                );
            }
            Resolution::Manual { url, reason } => manual_downloads.push(ManualDownload {
                name: file.name.clone(),
                filename: file.filename.clone(),
                url,
                reason,
            }),
        }
    }
    Ok(())
}
