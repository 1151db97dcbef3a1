//! The bounded worker pool turning fetch tasks into completed downloads.
//!
//! All tasks are queued up front and the queue is closed; `worker_count`
//! Tokio tasks pull from it until it is empty and push their results into a
//! bounded channel of the same capacity. When the last worker exits the
//! result channel closes, which ends the [`CompletedStream`].

mod stream;
mod worker;

pub use stream::CompletedStream;
pub(crate) use worker::Pipeline;

use crate::download::{CompletedDownload, FetchTask};

use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;
use tracing::{debug, error};

/// Spawns the workers and returns the stream of their results.
pub(crate) fn start(pipeline: Pipeline, tasks: Vec<FetchTask>, worker_count: usize) -> CompletedStream {
    let worker_count = worker_count.max(1);
    debug!("Starting {} workers for {} tasks", worker_count, tasks.len());

    let (task_tx, task_rx) = mpsc::unbounded_channel();
    for task in tasks {
        // The receiver is alive until the workers below drop it.
        if task_tx.send(task).is_err() {
            break;
        }
    }
    drop(task_tx);

    let queue = Arc::new(Mutex::new(task_rx));
    let (result_tx, result_rx) = mpsc::channel(worker_count);
    let pipeline = Arc::new(pipeline);

    let mut workers = JoinSet::new();
    for id in 0..worker_count {
        workers.spawn(run_worker(
            id,
            pipeline.clone(),
            queue.clone(),
            result_tx.clone(),
        ));
    }
    drop(result_tx);

    tokio::spawn(async move {
        while let Some(joined) = workers.join_next().await {
            if let Err(e) = joined {
                error!("Download worker stopped abnormally: {}", e);
            }
        }
        pipeline.progress.finish();
    });

    CompletedStream::new(result_rx)
}

async fn run_worker(
    id: usize,
    pipeline: Arc<Pipeline>,
    queue: Arc<Mutex<mpsc::UnboundedReceiver<FetchTask>>>,
    results: mpsc::Sender<CompletedDownload>,
) {
    loop {
        let Some(task) = queue.lock().await.recv().await else {
            break;
        };
        let completed = pipeline.process(&task).await;
        pipeline.progress.task_done();
        if results.send(completed).await.is_err() {
            debug!("Result stream dropped, worker {} stopping", id);
            break;
        }
    }
    debug!("Worker {} finished", id);
}
