//! The network seam of the download pipeline.
//!
//! Workers never talk to `reqwest` directly; they ask a [`Fetcher`] for a
//! byte stream. [`HttpFetcher`] is the production implementation. Timeouts,
//! retries and proxies belong to the client a fetcher wraps.

use super::client::{create_http_client, HttpClientConfig};
use crate::error::{Error, Result};

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{Stream, StreamExt};
use reqwest::Url;
use reqwest_middleware::ClientWithMiddleware;
use std::fmt;
use std::pin::Pin;
use tracing::debug;

/// A boxed stream of body chunks.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes>> + Send>>;

/// A response body ready to be streamed.
pub struct FetchResponse {
    /// Size announced by the source, if any.
    pub content_length: Option<u64>,
    pub body: ByteStream,
}

impl fmt::Debug for FetchResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchResponse")
            .field("content_length", &self.content_length)
            .finish_non_exhaustive()
    }
}

/// Opens a byte stream for a URL.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<FetchResponse>;
}

/// [`Fetcher`] backed by a `reqwest` client with middleware.
#[derive(Clone, Debug)]
pub struct HttpFetcher {
    client: ClientWithMiddleware,
}

impl HttpFetcher {
    pub fn new(client: ClientWithMiddleware) -> Self {
        Self { client }
    }

    /// Builds the client with [`create_http_client`].
    pub fn from_config(config: HttpClientConfig) -> Result<Self> {
        Ok(Self::new(create_http_client(config)?))
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchResponse> {
        debug!("Fetching {}", url);
        let res = self.client.get(url.clone()).send().await?;

        // Check the status for errors.
        let status = res.status();
        if !status.is_success() {
            return Err(Error::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let content_length = res.content_length();
        let body = res.bytes_stream().map(|chunk| chunk.map_err(Error::from));
        Ok(FetchResponse {
            content_length,
            body: Box::pin(body),
        })
    }
}
