use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::{
    decode::{decode_records, DecodeMode},
    point::PointBatch,
};

/// Raw undecoded bytes accumulated from the worker pipe since the last
/// drain.
///
/// Appends come from the read loop; drains may come from any caller
/// thread. Every access is scoped by the mutex, so append and drain never
/// interleave at the byte level and a drain always sees a byte-for-byte
/// consistent snapshot. Critical sections are bounded by the time to copy
/// or scan the currently buffered bytes; nothing `await`s under the lock.
#[derive(Debug, Default)]
pub struct SharedIngestBuffer {
    bytes: Mutex<Vec<u8>>,
}

impl SharedIngestBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a chunk in arrival order. Called by the read loop only.
    pub fn append(&self, chunk: &[u8]) {
        self.lock().extend_from_slice(chunk);
    }

    /// Decodes every complete record currently buffered, removes the
    /// consumed prefix, and retains any trailing partial record for the
    /// next accumulation cycle. The returned batch is an owned copy with
    /// no aliasing into the buffer.
    pub fn drain_and_decode(&self, mode: DecodeMode) -> PointBatch {
        let mut bytes = self.lock();
        let decoded = decode_records(&bytes, mode);
        bytes.drain(..decoded.consumed);
        PointBatch::from_points(decoded.points)
    }

    /// Number of retained, not-yet-decoded bytes.
    pub fn pending_len(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<u8>> {
        self.bytes.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
