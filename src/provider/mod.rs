//! Mod metadata input and the provider resolver contract.
//!
//! - [`metadata`] - [`ModFile`], the record describing one mod, and its [`DownloadMode`]
//! - [`resolver`] - [`ProviderResolver`] and the [`ResolverRegistry`] sessions consult
//!
//! # Examples
//!
//! ```rust
//! use async_trait::async_trait;
//! use packfetch::error::BoxError;
//! use packfetch::provider::{ModFile, ProviderResolver, Resolution, ResolvedFile, ResolverRegistry};
//! use reqwest::Url;
//! use std::sync::Arc;
//!
//! struct Mirror;
//!
//! #[async_trait]
//! impl ProviderResolver for Mirror {
//!     async fn resolve(&self, mods: &[ModFile]) -> Result<Vec<Resolution>, BoxError> {
//!         mods.iter()
//!             .map(|m| -> Result<Resolution, BoxError> {
//!                 let url = Url::parse(&format!("https://mirror.example.com/{}", m.filename))?;
//!                 Ok(Resolution::Fetch(ResolvedFile::new(url)))
//!             })
//!             .collect()
//!     }
//! }
//!
//! let mut registry = ResolverRegistry::new();
//! registry.register("mirror", Arc::new(Mirror));
//! ```

pub mod metadata;
pub mod resolver;

pub use metadata::{DownloadMode, ModDownload, ModFile};
pub use resolver::{ProviderResolver, Resolution, ResolvedFile, ResolverRegistry};
