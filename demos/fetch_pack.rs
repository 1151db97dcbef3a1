//! Fetches every mod listed in a JSON file into the current directory.
//!
//! ```text
//! cargo run --example fetch_pack -- mods.json
//! RUST_LOG=packfetch=debug cargo run --example fetch_pack -- mods.json
//! ```
//!
//! The file holds an array of mod records:
//!
//! ```json
//! [{
//!   "name": "Sodium",
//!   "filename": "sodium.jar",
//!   "destination": "mods/sodium.jar",
//!   "download": {
//!     "mode": "url",
//!     "url": "https://cdn.modrinth.com/data/AANobbMI/versions/mc1.20.1-0.5.3/sodium.jar",
//!     "hash-format": "sha1",
//!     "hash": "0c4a05ebba0a38d3fc3e84e1b6bd2a1e6d82f0a6"
//!   }
//! }]
//! ```

use color_eyre::eyre::{eyre, Result};
use futures::StreamExt;
use packfetch::{ModFile, ProgressOptions, SessionBuilder};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let path = std::env::args()
        .nth(1)
        .ok_or_else(|| eyre!("usage: fetch_pack <mods.json>"))?;
    let mods: Vec<ModFile> = serde_json::from_slice(&tokio::fs::read(&path).await?)?;

    let mut session = SessionBuilder::new()
        .hash_algorithm("sha512")
        .progress(ProgressOptions::visible())
        .build(&mods)
        .await?;

    for manual in session.manual_downloads() {
        println!("{}", manual);
    }

    let mut results = session.start(8);
    let mut failed = 0;
    while let Some(mut done) = results.next().await {
        if let Some(e) = done.error() {
            eprintln!("{}: {}", done.name(), e);
            failed += 1;
            continue;
        }
        if let Some(warning) = done.warning() {
            eprintln!("{}: {}", done.name(), warning);
        }

        let destination = done.destination().to_path_buf();
        if let Some(parent) = destination.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        if let Some(mut cached) = done.take_file() {
            let mut out = tokio::fs::File::create(&destination).await?;
            tokio::io::copy(&mut cached, &mut out).await?;
        }
    }
    session.save_index().await?;

    println!(
        "\nDone: {} mods, {} failed, {} to download manually. Cache at {}",
        mods.len(),
        failed,
        session.manual_downloads().len(),
        session.cache_dir().display()
    );
    Ok(())
}
