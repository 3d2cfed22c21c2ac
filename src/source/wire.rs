use std::sync::Arc;
use std::time::Duration;

use crate::foundation::error::LumaResult;

/// Opaque connect token for an advertised source, as handed out by discovery.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SourceHandle(Arc<str>);

impl SourceHandle {
    /// Wrap a backend-specific address or identifier.
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    /// Backend-specific identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A currently advertised video source. Identity is the display name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VideoSource {
    /// Human-readable name, unique at a point in time.
    pub name: String,
    /// Token passed to [`VideoConnector::connect`].
    pub handle: SourceHandle,
}

impl VideoSource {
    /// Create a source entry.
    pub fn new(name: impl Into<String>, handle: SourceHandle) -> Self {
        Self {
            name: name.into(),
            handle,
        }
    }
}

/// One video frame exactly as it came off the wire: 4 bytes per pixel in B, G, R, X order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawVideoFrame {
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
    /// Bytes per row; `0` means tightly packed (`width * 4`).
    pub line_stride: usize,
    /// Pixel bytes, row-major.
    pub data: Vec<u8>,
}

impl RawVideoFrame {
    /// A tightly packed frame.
    pub fn packed(width: i32, height: i32, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            line_stride: 0,
            data,
        }
    }
}

/// Result of one bounded wait on a receive session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Capture {
    /// A video frame arrived.
    Video(RawVideoFrame),
    /// Nothing arrived within the wait.
    Nothing,
    /// A non-video capture (audio, metadata, status change) that this core ignores.
    Other(&'static str),
}

/// Failures raised by a receive session.
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    /// The transport produced a frame type it does not recognize. Recoverable: skip it.
    #[error("unsupported frame type: {0}")]
    UnsupportedFrameType(String),
    /// The session itself failed and will not produce more frames.
    #[error("receive session failed: {0}")]
    Session(#[source] anyhow::Error),
}

/// Video source discovery capability provided by the platform.
pub trait SourceDiscovery: Send + Sync {
    /// Ask the platform to re-scan. Backends that scan continuously can keep the default.
    fn refresh(&self) -> LumaResult<()> {
        Ok(())
    }

    /// Sources visible right now, in enumeration order.
    fn current_sources(&self) -> LumaResult<Vec<VideoSource>>;

    /// Release discovery resources.
    fn close(&self) {}
}

/// An open receive session on one source.
pub trait VideoReceive: Send {
    /// Wait up to `timeout` for the next capture.
    fn receive_next(&mut self, timeout: Duration) -> Result<Capture, CaptureError>;

    /// Release the session.
    fn close(&mut self) -> LumaResult<()>;
}

/// Video receive capability: opens sessions on resolved sources.
pub trait VideoConnector: Send + Sync {
    /// Establish a session. `receiver_name` identifies this receiver to the sender.
    fn connect(
        &self,
        source: &VideoSource,
        receiver_name: &str,
    ) -> LumaResult<Box<dyn VideoReceive>>;
}
