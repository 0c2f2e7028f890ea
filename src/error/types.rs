use thiserror::Error;

/// Unified result type for the foyer crate.
pub type Result<T> = std::result::Result<T, UiError>;

/// Errors surfaced by layout construction and the session loops.
///
/// Parse-time faults abort layout construction entirely; there is never a
/// partial widget list. Channel faults end the owning session.
#[derive(Debug, Error)]
pub enum UiError {
    #[error("unknown widget kind `{0}`")]
    UnknownWidgetKind(String),
    #[error("unknown property `{key}` on {kind}")]
    UnknownProperty { kind: String, key: String },
    #[error("unknown style `{0}`")]
    UnknownStyle(String),
    #[error("malformed layout near `{0}`")]
    Malformed(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
