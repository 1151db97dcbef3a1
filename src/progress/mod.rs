//! Optional `indicatif` progress reporting.
//!
//! ```rust
//! use packfetch::progress::ProgressOptions;
//! use packfetch::session::SessionBuilder;
//!
//! let builder = SessionBuilder::new().progress(ProgressOptions::visible());
//! ```

pub(crate) mod display;
pub(crate) mod style;

pub use display::ProgressDisplay;
pub use style::ProgressOptions;
