use std::sync::Arc;

use tokio::{
    io::{AsyncRead, AsyncReadExt},
    sync::watch,
};
use tracing::{debug, warn};

use crate::{buffer::SharedIngestBuffer, sink::OutputSink};

/// Drives the worker's stdout pipe: one outstanding read at a time,
/// re-armed after each completion until the pipe closes or a pause is
/// requested. Each completed chunk is mirrored to the sink and appended to
/// the shared buffer in arrival order.
///
/// Transport errors degrade to pipe closure: they are logged and end the
/// read phase, never the task.
pub(crate) async fn run<R>(
    mut pipe: R,
    buffer: Arc<SharedIngestBuffer>,
    sink: Arc<dyn OutputSink>,
    mut pause: watch::Receiver<bool>,
) where
    R: AsyncRead + Unpin,
{
    debug!("read loop started");
    let mut chunk = [0u8; 4096];
    loop {
        // Park between reads while paused. An in-flight read is never
        // cancelled; pausing only stops re-arming.
        while *pause.borrow() {
            if pause.changed().await.is_err() {
                debug!("pause channel dropped, stopping read loop");
                return;
            }
        }
        match pipe.read(&mut chunk).await {
            Ok(0) => {
                debug!("worker pipe closed");
                return;
            }
            Ok(read) => {
                sink.mirror_bytes(&chunk[..read]);
                buffer.append(&chunk[..read]);
            }
            Err(error) => {
                warn!(%error, "transport error on worker pipe, treating as closure");
                return;
            }
        }
    }
}
