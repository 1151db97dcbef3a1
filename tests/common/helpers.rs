use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use packfetch::error::BoxError;
use packfetch::{
    CompletedDownload, Error, FetchResponse, Fetcher, ModFile, ProviderResolver, Resolution,
    ResolvedFile, Result, SessionBuilder,
};
use reqwest::Url;
use sha1::Sha1;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

// Common test constants
pub const TEST_HOST: &str = "https://files.example.com";
pub const HELLO_SHA1: &str = "aaf4c61ddcc5e8a2dabede0f3b482cd9aea9434d";
pub const HELLO_SHA256: &str = "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824";

/// Creates a temporary directory for testing purposes
pub fn create_temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temporary directory")
}

/// The cache root used by tests inside `dir`
pub fn cache_dir(dir: &Path) -> PathBuf {
    dir.join("cache")
}

/// Creates a test URL for `filename`
pub fn create_test_url(filename: &str) -> String {
    format!("{}/{}", TEST_HOST, filename)
}

/// Creates test file content of specified size
pub fn create_test_content(size: usize) -> Vec<u8> {
    (0..size).map(|i| (i % 251) as u8).collect()
}

pub fn sha1_hex(content: &[u8]) -> String {
    hex::encode(Sha1::digest(content))
}

pub fn sha256_hex(content: &[u8]) -> String {
    hex::encode(Sha256::digest(content))
}

/// Where the cache stores content with the given sha256
pub fn shard_path(cache: &Path, sha256: &str) -> PathBuf {
    cache.join(&sha256[..2]).join(&sha256[2..])
}

/// Number of entries left in the cache scratch directory
pub fn temp_entries(cache: &Path) -> usize {
    fs::read_dir(cache.join("temp"))
        .map(|entries| entries.count())
        .unwrap_or(0)
}

// === Mod Helpers ===

/// A direct-URL mod declaring its sha1
pub fn url_mod(name: &str, content: &[u8]) -> ModFile {
    ModFile::from_url(
        name,
        format!("mods/{}.jar", name),
        &create_test_url(&format!("{}.jar", name)),
        "sha1",
        &sha1_hex(content),
    )
}

/// A direct-URL mod declaring its sha256
pub fn url_mod_sha256(name: &str, content: &[u8]) -> ModFile {
    ModFile::from_url(
        name,
        format!("mods/{}.jar", name),
        &create_test_url(&format!("{}.jar", name)),
        "sha256",
        &sha256_hex(content),
    )
}

/// A mod resolved by `provider`, whose resolver data names the file to fetch
pub fn provider_mod(name: &str, provider: &str, content: &[u8]) -> ModFile {
    ModFile::from_provider(
        name,
        format!("mods/{}.jar", name),
        provider,
        serde_json::json!({ "file": format!("{}.jar", name) }),
        "sha1",
        &sha1_hex(content),
    )
}

// === Fetcher Helpers ===

/// In-memory [`Fetcher`] serving registered URLs and counting requests.
#[derive(Default)]
pub struct MockFetcher {
    files: Mutex<HashMap<String, Vec<u8>>>,
    calls: AtomicUsize,
    chunk_size: usize,
}

impl MockFetcher {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            chunk_size: 7,
            ..Self::default()
        })
    }

    /// Serves `content` at [`create_test_url`]`(filename)`.
    pub fn serve(&self, filename: &str, content: &[u8]) {
        self.files
            .lock()
            .unwrap()
            .insert(create_test_url(filename), content.to_vec());
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let content = self
            .files
            .lock()
            .unwrap()
            .get(url.as_str())
            .cloned()
            .ok_or_else(|| Error::HttpStatus {
                url: url.to_string(),
                status: 404,
            })?;

        let chunks: Vec<Result<Bytes>> = content
            .chunks(self.chunk_size.max(1))
            .map(|chunk| Ok(Bytes::copy_from_slice(chunk)))
            .collect();
        Ok(FetchResponse {
            content_length: Some(content.len() as u64),
            body: Box::pin(futures::stream::iter(chunks)),
        })
    }
}

// === Resolver Helpers ===

/// Resolves every mod to the test URL named by its `file` provider data.
///
/// Mods whose data carries `"manual"` are reported as manual downloads, and
/// `hashes` are attached to every resolved file.
#[derive(Default)]
pub struct StaticResolver {
    pub hashes: HashMap<String, String>,
    pub calls: AtomicUsize,
}

#[async_trait]
impl ProviderResolver for StaticResolver {
    async fn resolve(&self, mods: &[ModFile]) -> std::result::Result<Vec<Resolution>, BoxError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        mods.iter()
            .map(|m| -> std::result::Result<Resolution, BoxError> {
                if let Some(reason) = m.provider_data.get("manual").and_then(|r| r.as_str()) {
                    return Ok(Resolution::Manual {
                        url: format!("https://www.curseforge.com/minecraft/mc-mods/{}", m.name),
                        reason: reason.to_string(),
                    });
                }
                let file = m
                    .provider_data
                    .get("file")
                    .and_then(|f| f.as_str())
                    .ok_or("missing file reference")?;
                let mut resolved = ResolvedFile::new(Url::parse(&create_test_url(file))?);
                for (algorithm, value) in &self.hashes {
                    resolved = resolved.with_hash(algorithm, value);
                }
                Ok(Resolution::Fetch(resolved))
            })
            .collect()
    }
}

/// Fails every batch.
pub struct FailingResolver;

#[async_trait]
impl ProviderResolver for FailingResolver {
    async fn resolve(&self, _mods: &[ModFile]) -> std::result::Result<Vec<Resolution>, BoxError> {
        Err("provider API unavailable".into())
    }
}

/// Returns one resolution fewer than asked for.
pub struct ShortResolver;

#[async_trait]
impl ProviderResolver for ShortResolver {
    async fn resolve(&self, mods: &[ModFile]) -> std::result::Result<Vec<Resolution>, BoxError> {
        Ok(mods
            .iter()
            .skip(1)
            .map(|m| {
                Resolution::Fetch(ResolvedFile::new(
                    Url::parse(&create_test_url(&m.filename)).unwrap(),
                ))
            })
            .collect())
    }
}

// === Session Helpers ===

/// A builder using `fetcher` and a cache inside `dir`
pub fn create_test_session_builder(dir: &Path, fetcher: Arc<MockFetcher>) -> SessionBuilder {
    SessionBuilder::new()
        .cache_dir(cache_dir(dir))
        .fetcher(fetcher)
}

/// Runs a session over `mods` with `workers` workers, saves the index and
/// returns every result sorted by name.
pub async fn run_session(
    builder: SessionBuilder,
    mods: &[ModFile],
    workers: usize,
) -> Vec<CompletedDownload> {
    let mut session = builder.build(mods).await.expect("Failed to build session");
    let mut results: Vec<_> = session.start(workers).collect().await;
    session.save_index().await.expect("Failed to save index");
    results.sort_by(|a, b| a.name().cmp(b.name()));
    results
}

/// Reads the bytes a completed download points at
pub fn read_cached(done: &CompletedDownload) -> Vec<u8> {
    let path = done.cache_path().expect("Download has no cache path");
    fs::read(path).expect("Failed to read cached file")
}
