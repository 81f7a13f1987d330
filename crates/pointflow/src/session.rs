use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use tokio::{sync::watch, task::JoinHandle};
use tracing::debug;

use crate::{
    buffer::SharedIngestBuffer,
    decode::DecodeMode,
    error::TaskError,
    point::PointBatch,
    process::{self, ExitOutcome},
    read_loop,
    sink::OutputSink,
};

/// Fixed invocation of a worker: executable path plus an ordered numeric
/// argument list, immutable for the task's lifetime.
#[derive(Clone, Debug)]
pub struct TaskConfig {
    binary: PathBuf,
    arguments: Vec<f64>,
    mode: DecodeMode,
}

impl TaskConfig {
    pub fn new(binary: impl Into<PathBuf>, arguments: impl Into<Vec<f64>>) -> Self {
        Self {
            binary: binary.into(),
            arguments: arguments.into(),
            mode: DecodeMode::default(),
        }
    }

    /// Selects the decoding strategy drains run with; defaults to
    /// [`DecodeMode::Fast`].
    pub fn decode_mode(mut self, mode: DecodeMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    pub fn arguments(&self) -> &[f64] {
        &self.arguments
    }

    pub(crate) fn mode(&self) -> DecodeMode {
        self.mode
    }
}

/// One running worker task: the child process, the background driver task
/// draining its stdout, and the shared buffer the caller drains.
///
/// Data flows worker → pipe → read loop → buffer → (on drain) decoder →
/// batch; control flows the other way through [`start`](Self::start),
/// [`pause`](Self::pause)/[`resume`](Self::resume), and
/// [`shutdown`](Self::shutdown).
pub struct TaskSession {
    buffer: Arc<SharedIngestBuffer>,
    sink: Arc<dyn OutputSink>,
    mode: DecodeMode,
    pause: watch::Sender<bool>,
    exit: watch::Receiver<ExitOutcome>,
    driver: Option<JoinHandle<Result<ExitOutcome, TaskError>>>,
}

impl TaskSession {
    /// Spawns the worker and launches the background driver task.
    ///
    /// The driver runs the read loop until the pipe closes, joins the
    /// child, publishes the [`ExitOutcome`], and invokes `on_complete` at
    /// most once, if and only if the worker exited with status zero.
    /// Invocation happens on the background context, never on the caller's
    /// thread.
    ///
    /// Spawn failures are the only synchronous, caller-visible errors;
    /// everything that goes wrong during streaming degrades to
    /// end-of-stream. Must be called from within a Tokio runtime.
    pub fn start<F>(
        config: TaskConfig,
        sink: Arc<dyn OutputSink>,
        on_complete: F,
    ) -> Result<Self, TaskError>
    where
        F: FnOnce() + Send + 'static,
    {
        let (mut child, stdout) = process::spawn_worker(&config)?;

        let buffer = Arc::new(SharedIngestBuffer::new());
        let (pause_tx, pause_rx) = watch::channel(false);
        let (exit_tx, exit_rx) = watch::channel(ExitOutcome::Running);

        let loop_buffer = Arc::clone(&buffer);
        let loop_sink = Arc::clone(&sink);
        let driver = tokio::spawn(async move {
            read_loop::run(stdout, loop_buffer, loop_sink, pause_rx).await;
            let outcome = process::wait_outcome(&mut child).await?;
            debug!(?outcome, "worker task finished");
            let _ = exit_tx.send(outcome);
            if outcome == ExitOutcome::Success {
                on_complete();
            }
            Ok(outcome)
        });
        debug!("ingestion driver started");

        Ok(Self {
            buffer,
            sink,
            mode: config.mode(),
            pause: pause_tx,
            exit: exit_rx,
            driver: Some(driver),
        })
    }

    /// Atomically decodes and removes every complete record buffered so
    /// far, retaining any trailing partial record for the next drain. A
    /// non-empty batch is also forwarded to the output sink.
    ///
    /// This is a snapshot-and-clear: the background reader keeps running.
    /// Use [`pause`](Self::pause) if the caller's protocol additionally
    /// requires the loop to stop re-arming.
    pub fn suspend(&self) -> PointBatch {
        let batch = self.buffer.drain_and_decode(self.mode);
        if !batch.is_empty() {
            self.sink.publish_batch(&batch);
        }
        batch
    }

    /// Stops the read loop from re-arming once its in-flight read
    /// completes. Idempotent.
    pub fn pause(&self) {
        let _ = self.pause.send(true);
    }

    /// Re-arms a paused read loop. No-op when the loop was never paused;
    /// idempotent.
    pub fn resume(&self) {
        let _ = self.pause.send(false);
    }

    /// Last observed process state; stays [`ExitOutcome::Running`] until
    /// the driver has joined the child.
    pub fn exit_outcome(&self) -> ExitOutcome {
        *self.exit.borrow()
    }

    /// Waits for the pipe to close and the worker process to be joined,
    /// then returns the definite outcome. Un-pauses the loop first so a
    /// paused session cannot stall its own teardown.
    ///
    /// This is the session's single join point; calling it twice is a
    /// logic error and panics. A final [`suspend`](Self::suspend) after
    /// shutdown yields whatever complete records arrived last.
    pub async fn shutdown(&mut self) -> Result<ExitOutcome, TaskError> {
        let _ = self.pause.send(false);
        let driver = self
            .driver
            .take()
            .expect("TaskSession::shutdown called twice");
        driver.await?
    }
}

impl Drop for TaskSession {
    fn drop(&mut self) {
        // A never-joined driver is aborted rather than detached; the child
        // is reaped via kill_on_drop.
        if let Some(driver) = self.driver.take() {
            driver.abort();
        }
    }
}
