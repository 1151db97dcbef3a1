//! The contract provider collaborators implement.
//!
//! Mods using `metadata:<provider>` are grouped per provider and handed to
//! that provider's [`ProviderResolver`] in a single call, which lets
//! providers that need bulk lookups (fingerprint matching, batched file
//! queries) keep round trips down.

use super::metadata::ModFile;
use crate::error::BoxError;

use async_trait::async_trait;
use reqwest::Url;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Where a resolved file can be fetched from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFile {
    pub url: Url,
    /// Hashes the provider reported for the file, by algorithm.
    pub hashes: HashMap<String, String>,
}

impl ResolvedFile {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            hashes: HashMap::new(),
        }
    }

    pub fn with_hash(mut self, algorithm: &str, value: &str) -> Self {
        self.hashes.insert(algorithm.to_string(), value.to_string());
        self
    }
}

/// The outcome of resolving one mod.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The file can be fetched automatically.
    Fetch(ResolvedFile),
    /// The provider does not allow automatic downloads of this file.
    Manual {
        /// Page where the user can download the file.
        url: String,
        /// Why the file cannot be fetched automatically.
        reason: String,
    },
}

/// Resolves a batch of mods sharing one provider.
///
/// Implementations must return exactly one [`Resolution`] per input mod, in
/// input order, and must not depend on packfetch's cache state.
#[async_trait]
pub trait ProviderResolver: Send + Sync {
    async fn resolve(&self, mods: &[ModFile]) -> Result<Vec<Resolution>, BoxError>;
}

/// Provider identifier to resolver mapping.
#[derive(Clone, Default)]
pub struct ResolverRegistry {
    resolvers: HashMap<String, Arc<dyn ProviderResolver>>,
}

impl fmt::Debug for ResolverRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut providers: Vec<_> = self.resolvers.keys().collect();
        providers.sort();
        f.debug_struct("ResolverRegistry")
            .field("providers", &providers)
            .finish()
    }
}

impl ResolverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `resolver` for `provider`, replacing any previous one.
    pub fn register(&mut self, provider: &str, resolver: Arc<dyn ProviderResolver>) {
        self.resolvers.insert(provider.to_string(), resolver);
    }

    pub fn get(&self, provider: &str) -> Option<Arc<dyn ProviderResolver>> {
        self.resolvers.get(provider).cloned()
    }

    pub fn contains(&self, provider: &str) -> bool {
        self.resolvers.contains_key(provider)
    }

    pub fn len(&self) -> usize {
        self.resolvers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolvers.is_empty()
    }
}
