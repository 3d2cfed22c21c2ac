use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, unbounded};

use crate::foundation::error::{LumaError, LumaResult};
use crate::source::wire::{
    Capture, CaptureError, RawVideoFrame, SourceDiscovery, SourceHandle, VideoConnector,
    VideoReceive, VideoSource,
};

enum FeedItem {
    Video(RawVideoFrame),
    Unsupported(String),
    Failure(String),
    Other(&'static str),
}

struct Announced {
    source: VideoSource,
    frames: Receiver<FeedItem>,
}

#[derive(Default)]
struct NetState {
    announced: Vec<Announced>,
    discovery_failure: Option<String>,
    refused: HashSet<String>,
    next_id: u64,
}

#[derive(Default)]
struct Shared {
    state: Mutex<NetState>,
    open_sessions: AtomicUsize,
    connects: AtomicUsize,
    discovery_closed: AtomicBool,
}

/// In-process video network: sources are announced by name and fed frames directly.
///
/// Implements both [`SourceDiscovery`] and [`VideoConnector`]; clones share one network.
#[derive(Clone, Default)]
pub struct LoopbackNetwork {
    shared: Arc<Shared>,
}

impl std::fmt::Debug for LoopbackNetwork {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<String> = self
            .lock()
            .announced
            .iter()
            .map(|a| a.source.name.clone())
            .collect();
        f.debug_struct("LoopbackNetwork")
            .field("sources", &names)
            .field("open_sessions", &self.open_sessions())
            .finish()
    }
}

impl LoopbackNetwork {
    /// Create an empty network.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, NetState> {
        self.shared
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Advertise a source named `name`, replacing any earlier source of that name.
    ///
    /// Each item pushed into the returned feed is delivered to one open session; items pushed
    /// while nobody is connected queue up. Dropping every clone of the feed ends open sessions
    /// with a session failure.
    pub fn announce(&self, name: impl Into<String>) -> LoopbackFeed {
        let name = name.into();
        let (tx, rx) = unbounded();
        let mut state = self.lock();
        state.next_id += 1;
        let handle = SourceHandle::new(format!("loopback://{}/{name}", state.next_id));
        state.announced.retain(|a| a.source.name != name);
        state.announced.push(Announced {
            source: VideoSource::new(name.clone(), handle),
            frames: rx,
        });
        drop(state);
        tracing::debug!(%name, "loopback source announced");
        LoopbackFeed { name, tx }
    }

    /// Stop advertising `name`. Open sessions keep running.
    pub fn withdraw(&self, name: &str) {
        self.lock().announced.retain(|a| a.source.name != name);
    }

    /// Make every discovery refresh fail with `reason`, or succeed again with `None`.
    pub fn set_discovery_failure(&self, reason: Option<&str>) {
        self.lock().discovery_failure = reason.map(str::to_string);
    }

    /// Refuse (or, with `false`, accept again) connections to `name`.
    pub fn refuse_connections(&self, name: &str, refuse: bool) {
        let mut state = self.lock();
        if refuse {
            state.refused.insert(name.to_string());
        } else {
            state.refused.remove(name);
        }
    }

    /// Number of receive sessions currently open.
    pub fn open_sessions(&self) -> usize {
        self.shared.open_sessions.load(Ordering::SeqCst)
    }

    /// Number of successful `connect` calls so far.
    pub fn connect_count(&self) -> usize {
        self.shared.connects.load(Ordering::SeqCst)
    }

    /// Return `true` once a discovery user has closed the network.
    pub fn discovery_closed(&self) -> bool {
        self.shared.discovery_closed.load(Ordering::SeqCst)
    }
}

impl SourceDiscovery for LoopbackNetwork {
    fn refresh(&self) -> LumaResult<()> {
        match &self.lock().discovery_failure {
            Some(reason) => Err(LumaError::discovery(reason.clone())),
            None => Ok(()),
        }
    }

    fn current_sources(&self) -> LumaResult<Vec<VideoSource>> {
        Ok(self
            .lock()
            .announced
            .iter()
            .map(|a| a.source.clone())
            .collect())
    }

    fn close(&self) {
        self.shared.discovery_closed.store(true, Ordering::SeqCst);
    }
}

impl VideoConnector for LoopbackNetwork {
    fn connect(
        &self,
        source: &VideoSource,
        receiver_name: &str,
    ) -> LumaResult<Box<dyn VideoReceive>> {
        let state = self.lock();
        if state.refused.contains(&source.name) {
            return Err(LumaError::connect(format!(
                "{} refused the connection",
                source.name
            )));
        }
        let frames = state
            .announced
            .iter()
            .find(|a| a.source.handle == source.handle)
            .map(|a| a.frames.clone())
            .ok_or_else(|| LumaError::connect(format!("{} is no longer advertised", source.name)))?;
        drop(state);

        self.shared.open_sessions.fetch_add(1, Ordering::SeqCst);
        self.shared.connects.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(source = %source.name, receiver_name, "loopback session opened");
        Ok(Box::new(LoopbackSession {
            name: source.name.clone(),
            frames,
            shared: Arc::clone(&self.shared),
            open: true,
        }))
    }
}

/// Producer side of one announced source.
#[derive(Debug, Clone)]
pub struct LoopbackFeed {
    name: String,
    tx: Sender<FeedItem>,
}

impl LoopbackFeed {
    /// Name the source is announced under.
    pub fn name(&self) -> &str {
        &self.name
    }

    fn push(&self, item: FeedItem) {
        // No receiver left only once the network itself is gone.
        let _ = self.tx.send(item);
    }

    /// Send a video frame.
    pub fn push_video(&self, frame: RawVideoFrame) {
        self.push(FeedItem::Video(frame));
    }

    /// Send a frame of a type the transport does not recognize.
    pub fn push_unsupported(&self, detail: impl Into<String>) {
        self.push(FeedItem::Unsupported(detail.into()));
    }

    /// Send a non-video capture such as audio or metadata.
    pub fn push_other(&self, kind: &'static str) {
        self.push(FeedItem::Other(kind));
    }

    /// Fail the session that reads this item.
    pub fn push_failure(&self, reason: impl Into<String>) {
        self.push(FeedItem::Failure(reason.into()));
    }
}

struct LoopbackSession {
    name: String,
    frames: Receiver<FeedItem>,
    shared: Arc<Shared>,
    open: bool,
}

impl LoopbackSession {
    fn release(&mut self) {
        if std::mem::replace(&mut self.open, false) {
            self.shared.open_sessions.fetch_sub(1, Ordering::SeqCst);
        }
    }
}

impl VideoReceive for LoopbackSession {
    fn receive_next(&mut self, timeout: Duration) -> Result<Capture, CaptureError> {
        match self.frames.recv_timeout(timeout) {
            Ok(FeedItem::Video(frame)) => Ok(Capture::Video(frame)),
            Ok(FeedItem::Other(kind)) => Ok(Capture::Other(kind)),
            Ok(FeedItem::Unsupported(detail)) => Err(CaptureError::UnsupportedFrameType(detail)),
            Ok(FeedItem::Failure(reason)) => {
                Err(CaptureError::Session(anyhow::anyhow!("{}: {reason}", self.name)))
            }
            Err(RecvTimeoutError::Timeout) => Ok(Capture::Nothing),
            Err(RecvTimeoutError::Disconnected) => Err(CaptureError::Session(anyhow::anyhow!(
                "{}: feed closed",
                self.name
            ))),
        }
    }

    fn close(&mut self) -> LumaResult<()> {
        self.release();
        tracing::debug!(source = %self.name, "loopback session closed");
        Ok(())
    }
}

impl Drop for LoopbackSession {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/backend/loopback.rs"]
mod tests;
