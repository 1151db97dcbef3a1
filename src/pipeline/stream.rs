//! The stream of completed downloads handed back to the caller.

use crate::download::CompletedDownload;

use futures::stream::Stream;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc;

/// Results of a running session, in completion order.
///
/// Ends once every worker has exited. Yields exactly one item per task that
/// was handed to the pipeline.
#[derive(Debug)]
pub struct CompletedStream {
    rx: mpsc::Receiver<CompletedDownload>,
}

impl CompletedStream {
    pub(crate) fn new(rx: mpsc::Receiver<CompletedDownload>) -> Self {
        Self { rx }
    }

    /// Waits for the next result; `None` once the pipeline has shut down.
    pub async fn recv(&mut self) -> Option<CompletedDownload> {
        self.rx.recv().await
    }
}

impl Stream for CompletedStream {
    type Item = CompletedDownload;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}
