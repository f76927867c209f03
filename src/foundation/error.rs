/// Convenience result type used across tessera.
pub type TesseraResult<T> = Result<T, TesseraError>;

/// Top-level error taxonomy used by the fallible engine APIs.
///
/// Scene-graph misuse is not represented here: tree operations silently ignore invalid input and
/// painters log unsupported calls instead of failing.
#[derive(thiserror::Error, Debug)]
pub enum TesseraError {
    /// Invalid caller-provided data (dimensions, colors, option documents).
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while building or converting animation keyframes.
    #[error("animation error: {0}")]
    Animation(String),

    /// Errors raised by a painter backend (allocation, encoding).
    #[error("render error: {0}")]
    Render(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped foreign error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TesseraError {
    /// Build a [`TesseraError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`TesseraError::Animation`].
    pub fn animation(msg: impl Into<String>) -> Self {
        Self::Animation(msg.into())
    }

    /// Build a [`TesseraError::Render`].
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`TesseraError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for TesseraError {
    fn from(err: serde_json::Error) -> Self {
        Self::serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
