use super::*;

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

mod support;
use support::write_fake_worker;


/// Sink that records everything it is handed, for assertions.
#[derive(Debug, Default)]
struct CollectingSink {
    bytes: Mutex<Vec<u8>>,
    batches: Mutex<Vec<PointBatch>>,
}

impl OutputSink for CollectingSink {
    fn mirror_bytes(&self, bytes: &[u8]) {
        self.bytes.lock().unwrap().extend_from_slice(bytes);
    }

    fn publish_batch(&self, batch: &PointBatch) {
        self.batches.lock().unwrap().push(batch.clone());
    }
}

impl CollectingSink {
    fn mirrored(&self) -> Vec<u8> {
        self.bytes.lock().unwrap().clone()
    }

    fn published(&self) -> Vec<PointBatch> {
        self.batches.lock().unwrap().clone()
    }
}
