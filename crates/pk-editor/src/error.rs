/// Result alias used by the fallible editor boundaries.
pub type EditorResult<T> = Result<T, EditorError>;

/// Errors surfaced by the editor.
///
/// Ordinary editing never fails: operations on a missing canvas or an
/// unknown element return `false`/`None`. Only the boundaries that consume
/// external data report errors.
#[derive(thiserror::Error, Debug)]
pub enum EditorError {
    /// A serialized canvas state could not be loaded.
    #[error("invalid canvas state: {0}")]
    InvalidState(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// The remote project store rejected a request.
    #[error("project store error: {0}")]
    Store(String),
}

impl EditorError {
    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }
}

impl From<serde_json::Error> for EditorError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}
