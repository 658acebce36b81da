/// Convenience result type used across reelplay.
pub type ReelResult<T> = Result<T, ReelError>;

/// Top-level error taxonomy used by load, prepare and draw APIs.
#[derive(thiserror::Error, Debug)]
pub enum ReelError {
    /// Scene document violates a structural contract (corrupt export).
    #[error("scene error: {0}")]
    Scene(String),

    /// Bitmap asset failed to load or was used before loading completed.
    #[error("asset error: {0}")]
    Asset(String),

    /// Style, instruction or instance kind outside the supported set.
    #[error("unsupported feature: {0}")]
    Unsupported(String),

    /// Drawing surface could not be created or read back.
    #[error("render error: {0}")]
    Render(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ReelError {
    /// Build a [`ReelError::Scene`] value.
    pub fn scene(msg: impl Into<String>) -> Self {
        Self::Scene(msg.into())
    }

    /// Build a [`ReelError::Asset`] value.
    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }

    /// Build a [`ReelError::Unsupported`] value.
    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported(msg.into())
    }

    /// Build a [`ReelError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`ReelError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Message without the category prefix.
    pub(crate) fn detail(&self) -> String {
        match self {
            Self::Scene(m)
            | Self::Asset(m)
            | Self::Unsupported(m)
            | Self::Render(m)
            | Self::Serde(m) => m.clone(),
            Self::Other(e) => e.to_string(),
        }
    }

    /// `true` for [`ReelError::Unsupported`].
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::Unsupported(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
