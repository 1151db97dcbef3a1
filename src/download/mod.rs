//! Records flowing through a download session.
//!
//! - [`task`] - [`FetchTask`], one file to obtain, keyed by its declared hash
//! - [`manual`] - [`ManualDownload`], a file the user must supply
//! - [`completed`] - [`CompletedDownload`], the outcome of a task

pub mod completed;
pub mod manual;
pub mod task;

pub use completed::CompletedDownload;
pub use manual::ManualDownload;
pub use task::{ContentRef, FetchTask};
