//! Error types for Sentiscope

/// Result type alias using Sentiscope's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for Sentiscope operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No artifact is loaded; every classification call fails with this
    #[error("Model not loaded")]
    ModelUnavailable,

    /// The predict/probability computation failed
    #[error("inference error: {0}")]
    Inference(String),

    /// The artifact file could not be read, parsed or validated
    #[error("artifact error: {0}")]
    Artifact(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Network/IO errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic internal errors
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new inference error
    pub fn inference(msg: impl Into<String>) -> Self {
        Self::Inference(msg.into())
    }

    /// Create a new artifact error
    pub fn artifact(msg: impl Into<String>) -> Self {
        Self::Artifact(msg.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Short machine-readable name, used as a metrics label
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ModelUnavailable => "model_unavailable",
            Self::Inference(_) => "inference",
            Self::Artifact(_) => "artifact",
            Self::Config(_) => "config",
            Self::Io(_) => "io",
            Self::Internal(_) => "internal",
        }
    }
}
