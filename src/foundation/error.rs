/// Convenience result type used across lumamap.
pub type LumaResult<T> = Result<T, LumaError>;

/// Top-level error taxonomy used by the mapping core.
///
/// None of these are fatal to the host: each call site has a fallback (empty source list,
/// receiver left stopped, frame skipped) and only reports the error.
#[derive(thiserror::Error, Debug)]
pub enum LumaError {
    /// Invalid caller-provided data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Source enumeration failed.
    #[error("discovery error: {0}")]
    Discovery(String),

    /// A source resolved but the receive session could not be established.
    #[error("connect error: {0}")]
    Connect(String),

    /// The named source is not currently advertised.
    #[error("source not found: {0}")]
    SourceNotFound(String),

    /// A received frame could not be turned into a sampleable image.
    #[error("decode error: {0}")]
    Decode(String),

    /// Configuration could not be loaded or is inconsistent.
    #[error("config error: {0}")]
    Config(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LumaError {
    /// Build a [`LumaError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`LumaError::Discovery`] value.
    pub fn discovery(msg: impl Into<String>) -> Self {
        Self::Discovery(msg.into())
    }

    /// Build a [`LumaError::Connect`] value.
    pub fn connect(msg: impl Into<String>) -> Self {
        Self::Connect(msg.into())
    }

    /// Build a [`LumaError::SourceNotFound`] value.
    pub fn source_not_found(name: impl Into<String>) -> Self {
        Self::SourceNotFound(name.into())
    }

    /// Build a [`LumaError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`LumaError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
