use std::path::Path;

use crate::foundation::error::{LumaError, LumaResult};
use crate::lifecycle::retry::RetryPolicy;
use crate::receive::receiver::ReceiverOpts;
use crate::sample::transform::TransformConfig;

/// Host-persisted settings of one mapping session.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Display name of the video source to connect to; empty means none.
    pub target_source: String,
    /// Connect automatically on activation and on target changes.
    pub auto_connect: bool,
    /// Resampling transform.
    pub transform: TransformConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            target_source: String::new(),
            auto_connect: true,
            transform: TransformConfig::default(),
        }
    }
}

/// A single configuration edit, applied by [`MappingSession::apply`].
///
/// [`MappingSession::apply`]: crate::MappingSession::apply
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigChange {
    /// Select a different source by name.
    TargetSource(String),
    /// Toggle auto-connect.
    AutoConnect(bool),
    /// Replace the resampling transform.
    Transform(TransformConfig),
}

impl SessionConfig {
    /// Apply `change` to the data only. Returns `true` when a value actually changed.
    pub fn update(&mut self, change: &ConfigChange) -> bool {
        match change {
            ConfigChange::TargetSource(name) if *name != self.target_source => {
                self.target_source.clone_from(name);
                true
            }
            ConfigChange::AutoConnect(on) if *on != self.auto_connect => {
                self.auto_connect = *on;
                true
            }
            ConfigChange::Transform(t) if *t != self.transform => {
                self.transform = t.clone();
                true
            }
            _ => false,
        }
    }
}

/// Everything needed to build a [`MappingSession`](crate::MappingSession).
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SessionOpts {
    /// Retry schedule for resolving the target source.
    pub retry: RetryPolicy,
    /// Acquisition loop timing.
    pub receiver: ReceiverOpts,
    /// Initial session settings.
    pub config: SessionConfig,
}

impl SessionOpts {
    /// Parse options from JSON; absent fields take their defaults.
    pub fn from_json_str(s: &str) -> LumaResult<Self> {
        let opts: Self = serde_json::from_str(s)
            .map_err(|e| LumaError::config(format!("invalid session options: {e}")))?;
        opts.validate()?;
        Ok(opts)
    }

    /// Read and parse a JSON options file.
    pub fn from_path(path: impl AsRef<Path>) -> LumaResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| LumaError::config(format!("read {}: {e}", path.display())))?;
        Self::from_json_str(&text)
    }

    /// Check every nested section.
    pub fn validate(&self) -> LumaResult<()> {
        self.retry.validate()?;
        self.config.transform.validate()?;
        if self.receiver.receiver_name.trim().is_empty() {
            return Err(LumaError::config("receiver_name must be non-empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
