use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, bounded};

/// Owning side of a cancellation pair. Cancelling sets the flag and disconnects the wake
/// channel, which releases every [`CancelToken::wait`] immediately.
#[derive(Debug)]
pub(crate) struct CancelHandle {
    flag: Arc<AtomicBool>,
    wake: Option<Sender<()>>,
}

/// Observing side of a cancellation pair, moved into background loops.
#[derive(Clone, Debug)]
pub(crate) struct CancelToken {
    flag: Arc<AtomicBool>,
    wake: Receiver<()>,
}

pub(crate) fn cancel_pair() -> (CancelHandle, CancelToken) {
    let flag = Arc::new(AtomicBool::new(false));
    let (tx, rx) = bounded(0);
    (
        CancelHandle {
            flag: Arc::clone(&flag),
            wake: Some(tx),
        },
        CancelToken { flag, wake: rx },
    )
}

impl CancelHandle {
    pub(crate) fn cancel(&mut self) {
        self.flag.store(true, Ordering::SeqCst);
        drop(self.wake.take());
    }
}

impl CancelToken {
    pub(crate) fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Sleep for up to `timeout`. Returns `true` if cancellation was requested before or
    /// during the wait.
    pub(crate) fn wait(&self, timeout: Duration) -> bool {
        if self.is_cancelled() {
            return true;
        }
        match self.wake.recv_timeout(timeout) {
            Err(RecvTimeoutError::Timeout) => self.is_cancelled(),
            Ok(()) | Err(RecvTimeoutError::Disconnected) => true,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/cancel.rs"]
mod tests;
