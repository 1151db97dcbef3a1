//! Single-pass multi-hash computation.
//!
//! A [`HashTee`] feeds every chunk of a source into one accumulator per
//! algorithm that is still unknown, while optionally copying the chunk to a
//! sink. Mod archives can be large, so the source is read exactly once with
//! a fixed-size buffer.
//!
//! ```rust
//! use packfetch::hash::{HashAlgorithm, HashTee};
//! use std::collections::HashMap;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let tee = HashTee::new(&[HashAlgorithm::Sha1, HashAlgorithm::LengthBytes], &HashMap::new());
//! let mut source: &[u8] = b"hello";
//! let hashes = tee.tee_reader(&mut source, &mut tokio::io::sink()).await?;
//! assert_eq!(hashes["length-bytes"], "5");
//! # Ok(())
//! # }
//! ```

use super::algorithm::{HashAlgorithm, Hasher};
use crate::error::Result;

use bytes::Bytes;
use futures::stream::{Stream, StreamExt};
use std::collections::HashMap;
use tokio::io::{self, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

const BUFFER_SIZE: usize = 64 * 1024;

/// Computes several digests from one read of a source.
pub struct HashTee {
    hashers: Vec<(HashAlgorithm, Hasher)>,
}

impl HashTee {
    /// Creates a tee for every algorithm in `desired` that has no value in `known`.
    pub fn new(desired: &[HashAlgorithm], known: &HashMap<String, String>) -> Self {
        let mut hashers: Vec<(HashAlgorithm, Hasher)> = Vec::with_capacity(desired.len());
        for algorithm in desired {
            if known.contains_key(algorithm.name())
                || hashers.iter().any(|(existing, _)| existing == algorithm)
            {
                continue;
            }
            hashers.push((*algorithm, algorithm.hasher()));
        }
        Self { hashers }
    }

    /// Returns `true` when there is nothing left to compute.
    pub fn is_empty(&self) -> bool {
        self.hashers.is_empty()
    }

    /// The algorithms this tee computes.
    pub fn algorithms(&self) -> impl Iterator<Item = HashAlgorithm> + '_ {
        self.hashers.iter().map(|(algorithm, _)| *algorithm)
    }

    /// Feeds a chunk to every accumulator.
    pub fn update(&mut self, data: &[u8]) {
        for (_, hasher) in self.hashers.iter_mut() {
            hasher.update(data);
        }
    }

    /// Finalizes every accumulator into `algorithm name -> value`.
    pub fn finish(self) -> HashMap<String, String> {
        self.hashers
            .into_iter()
            .map(|(algorithm, hasher)| (algorithm.name().to_string(), hasher.finalize()))
            .collect()
    }

    /// Reads `reader` to the end, hashing every byte and copying it to `sink`.
    ///
    /// Use [`tokio::io::sink`] to re-verify a file without copying it.
    pub async fn tee_reader<R, W>(
        mut self,
        reader: &mut R,
        sink: &mut W,
    ) -> io::Result<HashMap<String, String>>
    where
        R: AsyncRead + Unpin + ?Sized,
        W: AsyncWrite + Unpin + ?Sized,
    {
        let mut buf = vec![0u8; BUFFER_SIZE];
        loop {
            let n = reader.read(&mut buf).await?;
            if n == 0 {
                break;
            }
            self.update(&buf[..n]);
            sink.write_all(&buf[..n]).await?;
        }
        sink.flush().await?;
        Ok(self.finish())
    }

    /// Drains a byte stream, hashing every chunk and copying it to `sink`.
    ///
    /// `on_chunk` is called with the size of each chunk once it is written.
    pub async fn tee_stream<S, W, F>(
        mut self,
        mut stream: S,
        sink: &mut W,
        mut on_chunk: F,
    ) -> Result<HashMap<String, String>>
    where
        S: Stream<Item = Result<Bytes>> + Unpin,
        W: AsyncWrite + Unpin + ?Sized,
        F: FnMut(u64),
    {
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            self.update(&chunk);
            sink.write_all(&chunk).await?;
            on_chunk(chunk.len() as u64);
        }
        sink.flush().await?;
        Ok(self.finish())
    }
}
