use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crossbeam_channel::{Receiver, Sender, bounded};

use crate::foundation::cancel::CancelToken;
use crate::foundation::worker::Worker;
use crate::lifecycle::retry::RetryPolicy;
use crate::lifecycle::state::{LinkEvent, ReceiverState};
use crate::receive::receiver::{FrameReceiver, ReceiverOpts, ReceiverStats};
use crate::receive::slot::FrameSlot;
use crate::source::directory::SourceDirectory;
use crate::source::wire::{VideoConnector, VideoSource};

/// Capacity of the lifecycle event channel. Events past it are dropped until the host drains.
pub const EVENT_BUFFER: usize = 64;

#[derive(Debug, Default)]
struct Link {
    state: ReceiverState,
    receiver: Option<FrameReceiver>,
}

struct Shared {
    directory: Arc<SourceDirectory>,
    connector: Arc<dyn VideoConnector>,
    slot: FrameSlot,
    opts: ReceiverOpts,
    link: Mutex<Link>,
    events: Sender<LinkEvent>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Link> {
        self.link.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, event: LinkEvent) {
        if let Err(err) = self.events.try_send(event) {
            tracing::debug!(event = ?err.into_inner(), "event buffer full; dropping event");
        }
    }

    fn retry_until_found(&self, policy: &RetryPolicy, target: &str, token: &CancelToken) {
        for attempt in 0..policy.max_attempts {
            if token.wait(policy.delay_before(attempt)) {
                tracing::debug!(source = target, "retry cancelled");
                return;
            }

            // A name missing from the previous listing may show up in a fresh one.
            self.directory.refresh();
            let n = attempt + 1;
            match self.directory.resolve(target) {
                Some(source) => {
                    tracing::info!(source = target, attempts = n, "video source found");
                    self.connect(&source, n, token);
                    return;
                }
                None if n == 1 || n == policy.max_attempts => {
                    tracing::info!(
                        source = target,
                        "video source not yet available, attempt {n}/{}",
                        policy.max_attempts
                    );
                }
                None => {
                    tracing::debug!(
                        source = target,
                        "video source not yet available, attempt {n}/{}",
                        policy.max_attempts
                    );
                }
            }
        }

        let mut link = self.lock();
        if token.is_cancelled() || link.state != ReceiverState::Retrying {
            return;
        }
        link.state = ReceiverState::Idle;
        drop(link);
        tracing::error!(
            source = target,
            attempts = policy.max_attempts,
            "failed to find video source"
        );
        self.emit(LinkEvent::RetryExhausted {
            target: target.to_string(),
            attempts: policy.max_attempts,
        });
    }

    fn connect(&self, source: &VideoSource, attempt: u32, token: &CancelToken) {
        let result = FrameReceiver::connect(
            self.connector.as_ref(),
            source,
            self.slot.clone(),
            &self.opts,
            self.events.clone(),
            token,
        );

        let mut link = self.lock();
        if token.is_cancelled() || link.state != ReceiverState::Retrying {
            // Stopped while connecting; tear the new receiver down outside the lock.
            drop(link);
            drop(result);
            return;
        }
        match result {
            Ok(receiver) => {
                link.receiver = Some(receiver);
                link.state = ReceiverState::Connected;
                drop(link);
                self.emit(LinkEvent::Connected {
                    source: source.name.clone(),
                    attempt,
                });
            }
            Err(err) => {
                link.state = ReceiverState::Idle;
                drop(link);
                tracing::error!(source = %source.name, error = %err, "failed to start frame receiver");
                self.emit(LinkEvent::ConnectFailed {
                    source: source.name.clone(),
                    reason: err.to_string(),
                });
            }
        }
    }
}

/// Start/stop state machine for one session's video connection.
///
/// `Idle → Retrying → Connected`, back to `Idle` through `Stopping` on [`stop`], or straight
/// to `Idle` when the retry budget runs out or the connect call fails. At most one retry
/// driver and one receiver exist at a time.
///
/// [`stop`]: Self::stop
pub struct ReceiverLifecycle {
    shared: Arc<Shared>,
    policy: RetryPolicy,
    retry: Option<Worker>,
    events: Receiver<LinkEvent>,
}

impl std::fmt::Debug for ReceiverLifecycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReceiverLifecycle")
            .field("state", &self.state())
            .field("policy", &self.policy)
            .field("retry", &self.retry.as_ref().map(Worker::name))
            .finish_non_exhaustive()
    }
}

impl ReceiverLifecycle {
    /// Create an idle lifecycle that publishes received frames into `slot`.
    pub fn new(
        directory: Arc<SourceDirectory>,
        connector: Arc<dyn VideoConnector>,
        slot: FrameSlot,
        policy: RetryPolicy,
        opts: ReceiverOpts,
    ) -> Self {
        let (tx, rx) = bounded(EVENT_BUFFER);
        Self {
            shared: Arc::new(Shared {
                directory,
                connector,
                slot,
                opts,
                link: Mutex::new(Link::default()),
                events: tx,
            }),
            policy,
            retry: None,
            events: rx,
        }
    }

    /// Current state.
    pub fn state(&self) -> ReceiverState {
        self.shared.lock().state
    }

    /// Stream of reported outcomes, buffered up to [`EVENT_BUFFER`] undrained events.
    pub fn events(&self) -> Receiver<LinkEvent> {
        self.events.clone()
    }

    /// Return `true` while the retry driver thread is alive.
    pub fn retry_active(&self) -> bool {
        self.retry.as_ref().is_some_and(Worker::is_alive)
    }

    /// Return `true` while an acquisition loop is running.
    pub fn receiver_active(&self) -> bool {
        self.shared
            .lock()
            .receiver
            .as_ref()
            .is_some_and(FrameReceiver::is_running)
    }

    /// Name of the source the current receiver is attached to.
    pub fn connected_source(&self) -> Option<String> {
        self.shared
            .lock()
            .receiver
            .as_ref()
            .map(|r| r.source().to_string())
    }

    /// Counters of the current receiver.
    pub fn receiver_stats(&self) -> Option<ReceiverStats> {
        self.shared.lock().receiver.as_ref().map(FrameReceiver::stats)
    }

    /// Begin looking for `target` (`Idle → Retrying`).
    ///
    /// No-op returning `false` when `target` is empty or an attempt or connection is already
    /// live. A connection whose acquisition loop has failed does not count as live.
    pub fn start(&mut self, target: &str) -> bool {
        if target.is_empty() {
            tracing::debug!("no target source; not starting");
            return false;
        }
        let dead = {
            let mut link = self.shared.lock();
            let failed = link.state == ReceiverState::Connected
                && !link.receiver.as_ref().is_some_and(FrameReceiver::is_running);
            if link.state.is_engaged() && !failed {
                tracing::debug!(state = ?link.state, "receiver already engaged; start ignored");
                return false;
            }
            link.state = ReceiverState::Retrying;
            link.receiver.take()
        };
        // A receiver whose loop already failed is reaped before reconnecting.
        drop(dead);

        // A previous driver may still be unwinding after setting `Idle`.
        if let Some(mut previous) = self.retry.take() {
            previous.stop(self.shared.opts.stop_timeout());
        }

        let shared = Arc::clone(&self.shared);
        let policy = self.policy.clone();
        let target_name = target.to_string();
        let spawned = Worker::spawn("lumamap-retry", move |token| {
            shared.retry_until_found(&policy, &target_name, &token);
        });
        match spawned {
            Ok(worker) => {
                tracing::info!(source = target, "looking for video source");
                self.retry = Some(worker);
                true
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to start retry driver");
                self.shared.lock().state = ReceiverState::Idle;
                false
            }
        }
    }

    /// Tear down any pending attempt and the receiver, synchronously, then go `Idle`.
    ///
    /// Clears the published frame. Idempotent.
    pub fn stop(&mut self) {
        let timeout = self.shared.opts.stop_timeout();
        let mut engaged = false;
        if let Some(mut retry) = self.retry.take() {
            engaged |= retry.is_alive();
            retry.stop(timeout);
        }

        let receiver = {
            let mut link = self.shared.lock();
            engaged |= link.state != ReceiverState::Idle || link.receiver.is_some();
            link.state = ReceiverState::Stopping;
            link.receiver.take()
        };
        if let Some(mut receiver) = receiver {
            receiver.stop();
        }
        self.shared.lock().state = ReceiverState::Idle;
        self.shared.slot.clear();

        if engaged {
            tracing::info!("receiver lifecycle stopped");
            self.shared.emit(LinkEvent::Stopped);
        }
    }

    /// Stop and release the discovery capability.
    pub fn shutdown(&mut self) {
        self.stop();
        self.shared.directory.close();
    }
}

impl Drop for ReceiverLifecycle {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/lifecycle/machine.rs"]
mod tests;
