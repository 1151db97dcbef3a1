//! Tests for the cache index file format and its persistence.

use packfetch::cache::{CacheIndex, CacheLayout, INDEX_VERSION};

use std::collections::HashMap;
use std::fs;

mod common;
use common::helpers::*;

fn hashes(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(a, v)| (a.to_string(), v.to_string()))
        .collect()
}

#[tokio::test]
async fn test_save_and_load_preserve_lookups() {
    let temp_dir = create_temp_dir();
    let path = temp_dir.path().join("index.json");

    let mut index = CacheIndex::default();
    let (hello, _) = index
        .upsert(None, &hashes(&[("sha256", HELLO_SHA256), ("sha1", HELLO_SHA1)]))
        .unwrap();
    let other = sha256_hex(b"other");
    index
        .upsert(None, &hashes(&[("sha256", other.as_str()), ("md5", "abc")]))
        .unwrap();
    index.save(&path).await.unwrap();

    let loaded = CacheIndex::load(&path).await.unwrap();
    assert_eq!(loaded.version(), INDEX_VERSION);
    assert_eq!(loaded.len(), 2);
    let position = loaded.lookup("sha1", HELLO_SHA1).unwrap();
    assert_eq!(position, hello);
    assert_eq!(loaded.entry(position).unwrap().canonical(), Some(HELLO_SHA256));
    assert!(loaded.lookup("md5", "abc").is_some());
    assert!(loaded.lookup("sha1", "abc").is_none());
}

#[tokio::test]
async fn test_saved_file_uses_parallel_arrays() {
    let temp_dir = create_temp_dir();
    let path = temp_dir.path().join("index.json");

    let mut index = CacheIndex::default();
    index
        .upsert(None, &hashes(&[("sha256", HELLO_SHA256), ("sha1", HELLO_SHA1)]))
        .unwrap();
    index
        .upsert(None, &hashes(&[("sha256", sha256_hex(b"x").as_str())]))
        .unwrap();
    index.save(&path).await.unwrap();

    let json: serde_json::Value = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
    assert_eq!(json["Version"], 1);
    assert_eq!(json["Hashes"]["sha256"].as_array().unwrap().len(), 2);
    assert_eq!(json["Hashes"]["sha1"][0], HELLO_SHA1);
    assert_eq!(json["Hashes"]["sha1"][1], "");

    // No scratch files are left next to the index.
    let leftovers: Vec<_> = fs::read_dir(temp_dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name() != "index.json")
        .collect();
    assert!(leftovers.is_empty());
}

#[tokio::test]
async fn test_missing_index_loads_empty() {
    let temp_dir = create_temp_dir();
    let index = CacheIndex::load(&temp_dir.path().join("index.json"))
        .await
        .unwrap();
    assert!(index.is_empty());
}

#[test]
fn test_canonical_path_is_sharded() {
    let layout = CacheLayout::new("/var/cache/packfetch");
    let mut index = CacheIndex::default();
    let (position, _) = index
        .upsert(None, &hashes(&[("sha256", HELLO_SHA256)]))
        .unwrap();

    assert_eq!(
        index.canonical_path(&layout, position),
        Some(shard_path(layout.root(), HELLO_SHA256))
    );
}
