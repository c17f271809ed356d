/// Crate-wide result alias.
pub type TilemuxResult<T> = Result<T, TilemuxError>;

/// Errors raised by the compositor, the scheduler and their collaborators.
///
/// Recoverable conditions (unknown viewport on disable, undersized tiles, dropped output
/// targets) are logged and never surface as an error.
#[derive(thiserror::Error, Debug)]
pub enum TilemuxError {
    /// The engine was destroyed and can no longer be used.
    #[error("engine destroyed: this instance can no longer be used, create a new one")]
    Destroyed,

    /// A viewport kind name that no pipeline recognizes.
    #[error("unsupported viewport kind: {0}")]
    UnsupportedViewportKind(String),

    /// A shared-surface viewport dispatched on an engine without a scene renderer.
    #[error("gpu unavailable: viewport '{0}' has no custom render pipeline")]
    GpuUnavailable(String),

    /// A typed lookup for an id that is not registered.
    #[error("viewport not found: {0}")]
    ViewportNotFound(String),

    /// A typed lookup that found a viewport of another kind.
    #[error("viewport '{id}' is not a {expected} viewport")]
    WrongKind { id: String, expected: &'static str },

    /// Invalid configuration, input or surface dimensions.
    #[error("validation error: {0}")]
    Validation(String),

    /// Failure raised by a scene renderer or a custom pipeline.
    #[error("render error: {0}")]
    Render(String),

    /// Errors when serializing or deserializing layout documents.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TilemuxError {
    /// Build a [`TilemuxError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`TilemuxError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`TilemuxError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Return `true` for programmer/configuration errors that abort the calling operation
    /// regardless of which viewport triggered them.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Destroyed | Self::UnsupportedViewportKind(_) | Self::GpuUnavailable(_)
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
