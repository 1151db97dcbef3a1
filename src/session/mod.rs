//! Download sessions: construction, configuration, and the public surface.
//!
//! - `session` - [`DownloadSession`], which resolves mods into work and owns the cache
//! - `builder` - [`SessionBuilder`] for configuring a session
//! - `config` - [`SessionConfig`] and its defaults
//!
//! # Examples
//!
//! ```rust,no_run
//! use futures::StreamExt;
//! use packfetch::provider::ModFile;
//! use packfetch::session::SessionBuilder;
//!
//! # async fn example(mods: Vec<ModFile>) -> Result<(), packfetch::Error> {
//! let mut session = SessionBuilder::new().hash_algorithm("sha1").build(&mods).await?;
//! for manual in session.manual_downloads() {
//!     println!("{}", manual);
//! }
//!
//! let results: Vec<_> = session.start(8).collect().await;
//! session.save_index().await?;
//! println!("{} failed", results.iter().filter(|r| !r.is_success()).count());
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod config;
pub mod session;

pub use builder::SessionBuilder;
pub use config::{default_cache_dir, SessionConfig, CACHE_DIR_ENV};
pub use session::DownloadSession;
