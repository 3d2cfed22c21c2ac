use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::Receiver;

use crate::config::{ConfigChange, SessionConfig, SessionOpts};
use crate::foundation::core::Rgb8;
use crate::foundation::error::LumaResult;
use crate::geometry::point::GeometryProvider;
use crate::geometry::uv::{UvTable, compute_uvs};
use crate::lifecycle::machine::ReceiverLifecycle;
use crate::lifecycle::state::{LinkEvent, ReceiverState};
use crate::receive::receiver::ReceiverStats;
use crate::receive::slot::FrameSlot;
use crate::sample::sampler::{SampleStats, sample_into};
use crate::sample::transform::TransformConfig;
use crate::source::directory::SourceDirectory;
use crate::source::wire::{SourceDiscovery, VideoConnector};

/// Result of one render tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// No frame is published; the output buffer was left untouched.
    NoFrame,
    /// The current frame was resampled into the output buffer.
    Sampled(SampleStats),
}

/// One mapped video layer: a target source, its connection, and the cached UV layout of the
/// host's points.
///
/// Host callbacks map onto [`on_activate`](Self::on_activate),
/// [`on_deactivate`](Self::on_deactivate) and [`shutdown`](Self::shutdown); the render loop
/// calls [`tick`](Self::tick).
pub struct MappingSession {
    config: SessionConfig,
    directory: Arc<SourceDirectory>,
    geometry: Arc<dyn GeometryProvider>,
    slot: FrameSlot,
    lifecycle: ReceiverLifecycle,
    uvs: UvTable,
    uvs_dirty: bool,
    active: bool,
    closed: bool,
}

impl std::fmt::Debug for MappingSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MappingSession")
            .field("config", &self.config)
            .field("lifecycle", &self.lifecycle)
            .field("uv_points", &self.uvs.len())
            .field("active", &self.active)
            .finish_non_exhaustive()
    }
}

impl MappingSession {
    /// Build an inactive session. Nothing connects until [`on_activate`](Self::on_activate)
    /// or a target change.
    pub fn new(
        opts: SessionOpts,
        discovery: Arc<dyn SourceDiscovery>,
        connector: Arc<dyn VideoConnector>,
        geometry: Arc<dyn GeometryProvider>,
    ) -> LumaResult<Self> {
        opts.validate()?;
        let SessionOpts {
            retry,
            receiver,
            config,
        } = opts;

        let directory = Arc::new(SourceDirectory::new(discovery));
        directory.select(&config.target_source);
        let slot = FrameSlot::new();
        let lifecycle =
            ReceiverLifecycle::new(Arc::clone(&directory), connector, slot.clone(), retry, receiver);

        Ok(Self {
            config,
            directory,
            geometry,
            slot,
            lifecycle,
            uvs: UvTable::default(),
            uvs_dirty: true,
            active: false,
            closed: false,
        })
    }

    /// Current settings.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Apply a configuration edit, then react to it.
    pub fn apply(&mut self, change: ConfigChange) {
        if !self.config.update(&change) {
            return;
        }
        match change {
            ConfigChange::TargetSource(_) => self.retarget(),
            ConfigChange::AutoConnect(true) if self.active && !self.closed => {
                self.lifecycle.start(&self.config.target_source);
            }
            ConfigChange::AutoConnect(_) | ConfigChange::Transform(_) => {}
        }
    }

    /// Select a source by name; empty disconnects.
    pub fn set_target_source(&mut self, name: impl Into<String>) {
        self.apply(ConfigChange::TargetSource(name.into()));
    }

    /// Toggle auto-connect. Turning it off keeps an existing connection.
    pub fn set_auto_connect(&mut self, on: bool) {
        self.apply(ConfigChange::AutoConnect(on));
    }

    /// Replace the resampling transform; takes effect on the next tick.
    pub fn set_transform(&mut self, transform: TransformConfig) {
        self.apply(ConfigChange::Transform(transform));
    }

    fn retarget(&mut self) {
        let target = self.config.target_source.as_str();
        tracing::info!(source = target, "target source changed");
        self.directory.select(target);
        self.lifecycle.stop();
        if self.config.auto_connect && !target.is_empty() && !self.closed {
            self.lifecycle.start(target);
        }
    }

    /// Host made the layer visible.
    pub fn on_activate(&mut self) {
        self.active = true;
        self.uvs_dirty = true;
        if self.config.auto_connect && !self.closed {
            self.lifecycle.start(&self.config.target_source);
        }
    }

    /// Host hid the layer: stop retrying and disconnect, synchronously.
    pub fn on_deactivate(&mut self) {
        self.active = false;
        self.lifecycle.stop();
    }

    /// The host's point layout changed; rebuild UVs on the next tick.
    pub fn on_geometry_changed(&mut self) {
        self.uvs_dirty = true;
    }

    /// Resample the current frame into `colors`, indexed by each point's output index.
    ///
    /// Leaves `colors` untouched while no frame is published.
    pub fn tick(&mut self, _delta: Duration, colors: &mut [Rgb8]) -> TickOutcome {
        let Some(frame) = self.slot.latest() else {
            return TickOutcome::NoFrame;
        };

        let points = self.geometry.points();
        if self.uvs_dirty || self.uvs.len() != points.len() {
            self.uvs = compute_uvs(&points);
            self.uvs_dirty = false;
            if self.uvs.fallbacks().any() {
                tracing::warn!(fallbacks = ?self.uvs.fallbacks(), "degenerate point layout");
            }
        }

        let stats = sample_into(&frame, &self.uvs, &self.config.transform, colors);
        if stats.is_stale() {
            self.uvs_dirty = true;
        }
        TickOutcome::Sampled(stats)
    }

    /// Cached UV table from the last rebuild.
    pub fn uv_table(&self) -> &UvTable {
        &self.uvs
    }

    /// Refresh the directory and list source names.
    pub fn list_sources(&self) -> Vec<String> {
        self.directory.refresh();
        self.directory.names()
    }

    /// Advance the target to the next listed source, wrapping around.
    ///
    /// With no sources the target becomes empty and any connection stops.
    pub fn cycle_source(&mut self) -> String {
        let next = self.directory.cycle_next().unwrap_or_default();
        self.set_target_source(next.clone());
        next
    }

    /// Stop everything and release the discovery capability. Idempotent.
    pub fn shutdown(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.active = false;
        self.lifecycle.shutdown();
        tracing::debug!("mapping session shut down");
    }

    /// Connection state.
    pub fn state(&self) -> ReceiverState {
        self.lifecycle.state()
    }

    /// Lifecycle outcomes, in order.
    pub fn events(&self) -> Receiver<LinkEvent> {
        self.lifecycle.events()
    }

    /// Name of the source the receiver is attached to, if connected.
    pub fn connected_source(&self) -> Option<String> {
        self.lifecycle.connected_source()
    }

    /// Counters of the running receiver, if connected.
    pub fn receiver_stats(&self) -> Option<ReceiverStats> {
        self.lifecycle.receiver_stats()
    }

    /// Return `true` while a retry driver or an acquisition loop is alive.
    pub fn has_live_threads(&self) -> bool {
        self.lifecycle.retry_active() || self.lifecycle.receiver_active()
    }
}

impl Drop for MappingSession {
    fn drop(&mut self) {
        self.shutdown();
    }
}
