/// Errors that end a session.
///
/// Every variant is a transport fault or a runtime failure; operator mistakes
/// and lookup misses are never errors.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Reading from the link failed.
    #[error("link read failed: {0}")]
    Read(#[source] std::io::Error),

    /// Writing to the link failed.
    #[error("link write failed: {0}")]
    Write(#[source] std::io::Error),

    /// The link accepted zero bytes.
    #[error("link closed")]
    LinkClosed,

    /// A worker thread could not be started.
    #[error("failed to spawn {name} thread: {source}")]
    Spawn {
        name: &'static str,
        source: std::io::Error,
    },

    /// A worker thread panicked.
    #[error("{0} thread panicked")]
    ThreadPanicked(&'static str),
}

pub type Result<T> = std::result::Result<T, SessionError>;
