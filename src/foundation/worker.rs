use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, bounded};

use crate::foundation::cancel::{CancelHandle, CancelToken, cancel_pair};
use crate::foundation::error::{LumaError, LumaResult};

/// A named background thread with cooperative cancellation and a bounded stop.
///
/// The closure receives a [`CancelToken`]; it is expected to check it at every wait boundary.
#[derive(Debug)]
pub(crate) struct Worker {
    name: String,
    cancel: CancelHandle,
    // Disconnects when the thread body returns or unwinds.
    done: Receiver<()>,
    join: Option<JoinHandle<()>>,
}

impl Worker {
    pub(crate) fn spawn<F>(name: impl Into<String>, body: F) -> LumaResult<Self>
    where
        F: FnOnce(CancelToken) + Send + 'static,
    {
        let name = name.into();
        let (cancel, token) = cancel_pair();
        let (done_tx, done) = bounded::<()>(0);
        let join = std::thread::Builder::new()
            .name(name.clone())
            .spawn(move || {
                let _done = done_tx;
                body(token);
            })
            .map_err(|e| LumaError::Other(anyhow::anyhow!("failed to spawn {name}: {e}")))?;
        Ok(Self {
            name,
            cancel,
            done,
            join: Some(join),
        })
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn is_alive(&self) -> bool {
        self.join.as_ref().is_some_and(|j| !j.is_finished())
    }

    /// Cancel and wait up to `timeout` for the thread to exit.
    ///
    /// Returns `false` if the thread was still running when the timeout elapsed; it is then
    /// detached and finishes on its own once it observes the cancellation. Safe to call again.
    pub(crate) fn stop(&mut self, timeout: Duration) -> bool {
        self.cancel.cancel();
        let Some(join) = self.join.take() else {
            return true;
        };
        match self.done.recv_timeout(timeout) {
            Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                if join.join().is_err() {
                    tracing::error!(worker = %self.name, "worker thread panicked");
                }
                true
            }
            Err(RecvTimeoutError::Timeout) => {
                tracing::warn!(
                    worker = %self.name,
                    timeout_ms = timeout.as_millis() as u64,
                    "worker did not exit in time; detaching"
                );
                false
            }
        }
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/worker.rs"]
mod tests;
