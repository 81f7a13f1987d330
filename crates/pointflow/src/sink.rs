use crate::point::PointBatch;

/// Receiver of the worker's output, in addition to what
/// [`TaskSession::suspend`](crate::TaskSession::suspend) returns.
///
/// Both hooks are called synchronously: `mirror_bytes` from the read loop
/// as chunks arrive, `publish_batch` from whichever thread drains the
/// session. Implementations are best-effort collaborators and must not
/// block or fail the task.
pub trait OutputSink: Send + Sync {
    /// Raw bytes exactly as they arrived from the worker pipe.
    fn mirror_bytes(&self, _bytes: &[u8]) {}

    /// A non-empty batch handed over by a drain, in emission order.
    fn publish_batch(&self, _batch: &PointBatch) {}
}

/// Sink that discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl OutputSink for NullSink {}
