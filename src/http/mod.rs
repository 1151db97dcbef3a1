//! HTTP client construction and the [`Fetcher`] abstraction.
//!
//! - [`client`] - `reqwest` client creation with retry and tracing middleware
//! - [`fetcher`] - the [`Fetcher`] trait workers use, and [`HttpFetcher`]

pub mod client;
pub mod fetcher;

pub use client::{
    create_http_client, HttpClientConfig, DEFAULT_CONNECT_TIMEOUT, DEFAULT_USER_AGENT,
};
pub use fetcher::{ByteStream, FetchResponse, Fetcher, HttpFetcher};
