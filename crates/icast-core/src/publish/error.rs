use thiserror::Error;

/// Errors returned while publishing a snapshot.
///
/// # Examples
/// ```
/// use icast_core::PublishError;
///
/// let err = PublishError::Io {
///     context: "create temporary file",
///     source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
/// };
/// assert!(err.to_string().starts_with("I/O error (create temporary file)"));
/// ```
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("JSON serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("I/O error ({context}): {source}")]
    Io {
        context: &'static str,
        source: std::io::Error,
    },
}

impl PublishError {
    pub(crate) fn io(context: &'static str) -> impl FnOnce(std::io::Error) -> Self {
        move |source| PublishError::Io { context, source }
    }
}
