use crate::foundation::error::LumaError;

/// Connection state of one mapping session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize)]
pub enum ReceiverState {
    /// No connection and no pending attempt.
    #[default]
    Idle,
    /// The retry driver is waiting for the target source to appear.
    Retrying,
    /// A frame receiver is running against the target source.
    Connected,
    /// Tearing down; transient.
    Stopping,
}

impl ReceiverState {
    /// Return `true` while an attempt or a connection is live.
    pub fn is_engaged(self) -> bool {
        matches!(self, Self::Retrying | Self::Connected)
    }
}

/// Reported outcomes of the receiver lifecycle, delivered in order over
/// `MappingSession::events`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LinkEvent {
    /// A receiver started on `source`.
    Connected {
        /// Source display name.
        source: String,
        /// 1-based attempt that found it.
        attempt: u32,
    },
    /// `source` resolved but the session could not be established. Not retried.
    ConnectFailed {
        /// Source display name.
        source: String,
        /// Error text.
        reason: String,
    },
    /// `target` never appeared within the retry budget.
    RetryExhausted {
        /// Target source name.
        target: String,
        /// Attempts made.
        attempts: u32,
    },
    /// The acquisition loop hit a permanent session failure and exited.
    ReceiverFailed {
        /// Source display name.
        source: String,
        /// Error text.
        reason: String,
    },
    /// The connection or pending attempt was torn down.
    Stopped,
}

impl LinkEvent {
    /// The reported failure carried by this event, if any.
    pub fn failure(&self) -> Option<LumaError> {
        match self {
            Self::ConnectFailed { source, reason } => {
                Some(LumaError::connect(format!("{source}: {reason}")))
            }
            Self::RetryExhausted { target, attempts } => Some(LumaError::source_not_found(
                format!("{target} (after {attempts} attempts)"),
            )),
            Self::ReceiverFailed { source, reason } => Some(LumaError::Other(anyhow::anyhow!(
                "receiver for {source} failed: {reason}"
            ))),
            Self::Connected { .. } | Self::Stopped => None,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/lifecycle/state.rs"]
mod tests;
