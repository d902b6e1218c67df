/// Convenience result type used across the crate.
pub type CheckinResult<T> = Result<T, CheckinError>;

/// Top-level error type for the check-in QR engine.
///
/// Cosmetic inputs (colors, logos) never surface here; they resolve to fallbacks instead.
#[derive(thiserror::Error, Debug)]
pub enum CheckinError {
    /// Invalid input or configuration.
    #[error("validation error: {0}")]
    Validation(String),

    /// The payload could not be encoded into a QR symbol.
    #[error("encode error: {0}")]
    Encode(String),

    /// Raster rendering failed.
    #[error("render error: {0}")]
    Render(String),

    /// The token store rejected or failed a read/write.
    #[error("persistence error: {0}")]
    Persistence(String),

    /// Serializing or writing an exported raster failed.
    #[error("export error: {0}")]
    Export(String),

    /// Configuration (de)serialization failed.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CheckinError {
    /// Build [`CheckinError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build [`CheckinError::Encode`].
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build [`CheckinError::Render`].
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build [`CheckinError::Persistence`].
    pub fn persistence(msg: impl Into<String>) -> Self {
        Self::Persistence(msg.into())
    }

    /// Build [`CheckinError::Export`].
    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export(msg.into())
    }

    /// Build [`CheckinError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
