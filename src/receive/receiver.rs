use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use crossbeam_channel::Sender;

use crate::foundation::cancel::CancelToken;
use crate::foundation::error::{LumaError, LumaResult};
use crate::foundation::worker::Worker;
use crate::lifecycle::state::LinkEvent;
use crate::receive::frame::decode_bgrx;
use crate::receive::slot::FrameSlot;
use crate::source::wire::{Capture, CaptureError, VideoConnector, VideoReceive, VideoSource};

const LOG_EVERY_FRAMES: u64 = 30;
const LOG_INTERVAL: Duration = Duration::from_secs(5);
const WAITING_LOG_INTERVAL: Duration = Duration::from_secs(2);

/// Timing knobs for the acquisition loop.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ReceiverOpts {
    /// Bounded wait passed to each `receive_next` call.
    pub receive_timeout_ms: u64,
    /// Sleep after an empty receive, so the loop does not spin.
    pub idle_backoff_ms: u64,
    /// How long `stop` waits for the loop thread to exit.
    pub stop_timeout_ms: u64,
    /// Name this receiver announces to senders.
    pub receiver_name: String,
}

impl Default for ReceiverOpts {
    fn default() -> Self {
        Self {
            receive_timeout_ms: 5,
            idle_backoff_ms: 10,
            stop_timeout_ms: 1000,
            receiver_name: "lumamap".to_string(),
        }
    }
}

impl ReceiverOpts {
    fn receive_timeout(&self) -> Duration {
        Duration::from_millis(self.receive_timeout_ms)
    }

    fn idle_backoff(&self) -> Duration {
        Duration::from_millis(self.idle_backoff_ms)
    }

    pub(crate) fn stop_timeout(&self) -> Duration {
        Duration::from_millis(self.stop_timeout_ms)
    }
}

/// Frame counters of one receiver.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct ReceiverStats {
    /// Video frames taken off the session.
    pub frames_received: u64,
    /// Frames decoded and published to the slot.
    pub frames_published: u64,
    /// Frames dropped as undecodable or of an unsupported type.
    pub frames_skipped: u64,
}

#[derive(Debug, Default)]
struct Counters {
    received: AtomicU64,
    published: AtomicU64,
    skipped: AtomicU64,
}

impl Counters {
    fn snapshot(&self) -> ReceiverStats {
        ReceiverStats {
            frames_received: self.received.load(Ordering::Relaxed),
            frames_published: self.published.load(Ordering::Relaxed),
            frames_skipped: self.skipped.load(Ordering::Relaxed),
        }
    }
}

/// An open connection to one source with its dedicated acquisition thread.
///
/// The thread owns the receive session and closes it on exit.
#[derive(Debug)]
pub struct FrameReceiver {
    source: String,
    worker: Option<Worker>,
    counters: Arc<Counters>,
    stop_timeout: Duration,
}

impl FrameReceiver {
    /// Open a session on `source` and start the acquisition loop, publishing into `slot`.
    ///
    /// `cancel` is checked once the session is open: a caller cancelled during the connect call
    /// gets the session closed and no loop started.
    pub(crate) fn connect(
        connector: &dyn VideoConnector,
        source: &VideoSource,
        slot: FrameSlot,
        opts: &ReceiverOpts,
        events: Sender<LinkEvent>,
        cancel: &CancelToken,
    ) -> LumaResult<Self> {
        let mut session = connector
            .connect(source, &opts.receiver_name)
            .map_err(|e| match e {
                LumaError::Connect(_) => e,
                other => LumaError::connect(format!("{}: {other}", source.name)),
            })?;
        if cancel.is_cancelled() {
            if let Err(err) = session.close() {
                tracing::warn!(source = %source.name, error = %err, "error closing receive session");
            }
            return Err(LumaError::connect(format!(
                "{}: cancelled while connecting",
                source.name
            )));
        }

        let counters = Arc::new(Counters::default());
        let loop_ctx = AcquisitionLoop {
            source: source.name.clone(),
            slot,
            counters: Arc::clone(&counters),
            opts: opts.clone(),
            events,
        };
        let worker = Worker::spawn(format!("lumamap-recv-{}", source.name), move |token| {
            loop_ctx.run(session, &token);
        })?;
        tracing::info!(source = %source.name, "frame receiver started");

        Ok(Self {
            source: source.name.clone(),
            worker: Some(worker),
            counters,
            stop_timeout: opts.stop_timeout(),
        })
    }

    /// Display name of the connected source.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Return `true` while the acquisition thread is running.
    pub fn is_running(&self) -> bool {
        self.worker.as_ref().is_some_and(Worker::is_alive)
    }

    /// Current frame counters.
    pub fn stats(&self) -> ReceiverStats {
        self.counters.snapshot()
    }

    /// Signal the loop to exit and wait (bounded) for it. Idempotent.
    ///
    /// Returns `false` if the loop had not exited when the stop timeout elapsed.
    pub fn stop(&mut self) -> bool {
        let Some(mut worker) = self.worker.take() else {
            return true;
        };
        let exited = worker.stop(self.stop_timeout);
        tracing::info!(source = %self.source, exited, "frame receiver stopped");
        exited
    }
}

impl Drop for FrameReceiver {
    fn drop(&mut self) {
        self.stop();
    }
}

struct AcquisitionLoop {
    source: String,
    slot: FrameSlot,
    counters: Arc<Counters>,
    opts: ReceiverOpts,
    events: Sender<LinkEvent>,
}

impl AcquisitionLoop {
    fn run(self, mut session: Box<dyn VideoReceive>, token: &CancelToken) {
        tracing::info!(source = %self.source, "receive loop started, waiting for frames");
        let mut frames = 0u64;
        let mut last_log = Instant::now();

        while !token.is_cancelled() {
            match session.receive_next(self.opts.receive_timeout()) {
                Ok(Capture::Video(raw)) => {
                    if token.is_cancelled() {
                        break;
                    }
                    frames += 1;
                    self.counters.received.fetch_add(1, Ordering::Relaxed);
                    if frames % LOG_EVERY_FRAMES == 0 || last_log.elapsed() > LOG_INTERVAL {
                        tracing::debug!(
                            source = %self.source,
                            frames,
                            width = raw.width,
                            height = raw.height,
                            "receiving video"
                        );
                        last_log = Instant::now();
                    }
                    match decode_bgrx(&raw) {
                        Ok(frame) => {
                            self.slot.publish(frame);
                            self.counters.published.fetch_add(1, Ordering::Relaxed);
                        }
                        Err(err) => {
                            self.counters.skipped.fetch_add(1, Ordering::Relaxed);
                            tracing::warn!(source = %self.source, error = %err, "dropping frame");
                        }
                    }
                }
                Ok(Capture::Nothing) => {
                    if frames == 0 && last_log.elapsed() > WAITING_LOG_INTERVAL {
                        tracing::info!(source = %self.source, "still waiting for frames");
                        last_log = Instant::now();
                    }
                    if token.wait(self.opts.idle_backoff()) {
                        break;
                    }
                }
                Ok(Capture::Other(kind)) => {
                    tracing::trace!(source = %self.source, kind, "ignoring non-video capture");
                }
                Err(CaptureError::UnsupportedFrameType(detail)) => {
                    self.counters.skipped.fetch_add(1, Ordering::Relaxed);
                    tracing::debug!(source = %self.source, %detail, "unsupported frame type; continuing");
                }
                Err(err @ CaptureError::Session(_)) => {
                    if !token.is_cancelled() {
                        tracing::error!(source = %self.source, error = %err, "receive loop failed");
                        let event = LinkEvent::ReceiverFailed {
                            source: self.source.clone(),
                            reason: err.to_string(),
                        };
                        if self.events.try_send(event).is_err() {
                            tracing::debug!(source = %self.source, "event buffer full; dropping failure event");
                        }
                    }
                    break;
                }
            }
        }

        if let Err(err) = session.close() {
            tracing::warn!(source = %self.source, error = %err, "error closing receive session");
        }
        tracing::info!(source = %self.source, frames, "receive loop exited");
    }
}

#[cfg(test)]
#[path = "../../tests/unit/receive/receiver.rs"]
mod tests;
