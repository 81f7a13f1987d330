#![forbid(unsafe_code)]
//! Async ingestion of 3-coordinate point streams from a worker process.
//!
//! Spawns a fixed worker command, drains its stdout on a background task,
//! incrementally decodes the plain-text stream into [`Point`] records, and
//! hands the caller consistent snapshots via [`TaskSession::suspend`]. A
//! caller-supplied notifier fires at most once, only when the worker exits
//! with status zero.
//!
//! The worker's output is expected to be whitespace/newline-delimited
//! numeric triples; records may arrive split across arbitrary chunk
//! boundaries and are reassembled without loss or duplication. Two decoding
//! strategies are available through [`DecodeMode`].
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use pointflow::{NullSink, TaskConfig, TaskSession};
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = TaskConfig::new("/opt/solver/bin/trajectory", vec![1.0, 0.5]);
//! let mut session = TaskSession::start(config, Arc::new(NullSink), || {
//!     println!("worker finished cleanly");
//! })?;
//! let batch = session.suspend();
//! println!("{} points so far", batch.len());
//! session.shutdown().await?;
//! # Ok(()) }
//! ```

mod buffer;
mod decode;
mod error;
mod point;
mod process;
mod read_loop;
mod session;
mod sink;

pub use buffer::SharedIngestBuffer;
pub use decode::DecodeMode;
pub use error::TaskError;
pub use point::{Point, PointBatch};
pub use process::ExitOutcome;
pub use session::{TaskConfig, TaskSession};
pub use sink::{NullSink, OutputSink};

#[cfg(test)]
mod tests;
