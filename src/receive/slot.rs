use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::receive::frame::Frame;

#[derive(Debug, Default)]
struct SlotInner {
    current: Mutex<Option<Arc<Frame>>>,
    generation: AtomicU64,
}

/// Single-writer "current frame" cell shared by the acquisition loop and the render tick.
///
/// Publishing swaps a fully built `Arc<Frame>` in; readers clone the `Arc` out. The lock only
/// guards the pointer swap, never pixel access, so a reader cannot observe a partial frame.
#[derive(Clone, Debug, Default)]
pub struct FrameSlot {
    inner: Arc<SlotInner>,
}

impl FrameSlot {
    /// Create an empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current frame.
    pub fn publish(&self, frame: Frame) {
        let frame = Arc::new(frame);
        let previous = self
            .inner
            .current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(frame);
        self.inner.generation.fetch_add(1, Ordering::Release);
        // Freed outside the lock.
        drop(previous);
    }

    /// Remove the current frame.
    pub fn clear(&self) {
        let previous = self
            .inner
            .current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        drop(previous);
    }

    /// Snapshot of the most recently published frame, if any.
    pub fn latest(&self) -> Option<Arc<Frame>> {
        self.inner
            .current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of frames published over the slot's lifetime.
    pub fn generation(&self) -> u64 {
        self.inner.generation.load(Ordering::Acquire)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/receive/slot.rs"]
mod tests;
