//! lumamap maps a live network video stream onto sparse 3D point layouts.
//!
//! A [`MappingSession`] owns the whole path from a named video source to per-point colors:
//!
//! - discover and resolve the source by name, retrying while it is not yet advertised
//! - receive and decode frames on a dedicated thread, publishing the latest one
//! - project the host's points onto a unit UV square and resample each frame per point
//!
//! The video transport is abstracted behind [`SourceDiscovery`] and [`VideoConnector`];
//! [`LoopbackNetwork`] is an in-process implementation used by the CLI and the tests.
#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod foundation;

pub(crate) mod backend;
pub(crate) mod config;
pub(crate) mod geometry;
pub(crate) mod lifecycle;
pub(crate) mod receive;
pub(crate) mod sample;
pub(crate) mod session;
pub(crate) mod source;

pub use crate::foundation::core::{Affine, Point, Rgb8, Vec3};
pub use crate::foundation::error::{LumaError, LumaResult};

pub use crate::backend::loopback::{LoopbackFeed, LoopbackNetwork};
pub use crate::backend::still::{bgrx_from_image, load_still};
pub use crate::config::{ConfigChange, SessionConfig, SessionOpts};
pub use crate::geometry::point::{GeometryPoint, GeometryProvider, StaticGeometry};
pub use crate::geometry::uv::{UvFallbacks, UvPoint, UvTable, compute_uvs};
pub use crate::lifecycle::machine::{EVENT_BUFFER, ReceiverLifecycle};
pub use crate::lifecycle::retry::RetryPolicy;
pub use crate::lifecycle::state::{LinkEvent, ReceiverState};
pub use crate::receive::frame::{Frame, WIRE_BYTES_PER_PIXEL, decode_bgrx};
pub use crate::receive::receiver::{FrameReceiver, ReceiverOpts, ReceiverStats};
pub use crate::receive::slot::FrameSlot;
pub use crate::sample::sampler::{SampleStats, TILE_EPSILON, pixel_for, sample_into, transform_uv};
pub use crate::sample::transform::TransformConfig;
pub use crate::session::{MappingSession, TickOutcome};
pub use crate::source::directory::{SourceDirectory, display_label};
pub use crate::source::wire::{
    Capture, CaptureError, RawVideoFrame, SourceDiscovery, SourceHandle, VideoConnector,
    VideoReceive, VideoSource,
};
