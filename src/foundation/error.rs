/// Convenience result type used across lexvis.
pub type LexvisResult<T> = Result<T, LexvisError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum LexvisError {
    /// Invalid authored data (token lists, colors, settings).
    #[error("validation error: {0}")]
    Validation(String),

    /// Broken graph topology, e.g. an edge pointing past the node list.
    #[error("graph error: {0}")]
    Graph(String),

    /// Errors while stepping tasks or touching animated properties.
    #[error("animation error: {0}")]
    Animation(String),

    /// Errors while turning a scene into pixels.
    #[error("render error: {0}")]
    Render(String),

    /// Errors while streaming frames to an encoder.
    #[error("encode error: {0}")]
    Encode(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LexvisError {
    /// Build a [`LexvisError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`LexvisError::Graph`] value.
    pub fn graph(msg: impl Into<String>) -> Self {
        Self::Graph(msg.into())
    }

    /// Build a [`LexvisError::Animation`] value.
    pub fn animation(msg: impl Into<String>) -> Self {
        Self::Animation(msg.into())
    }

    /// Build a [`LexvisError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`LexvisError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
