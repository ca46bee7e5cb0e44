use std::path::PathBuf;

/// Errors that can occur while opening or driving the serial link.
#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    /// Failed to open the device node.
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to apply line settings (speed, raw mode, timeouts).
    #[error("failed to configure {path}: {source}")]
    Configure {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The requested baud rate has no termios speed constant.
    #[error("unsupported baud rate {0}")]
    UnsupportedBaud(u32),

    /// The device path is not a terminal.
    #[error("{0} is not a terminal device")]
    NotATerminal(PathBuf),

    /// An I/O error occurred on the link.
    #[error("link I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, LinkError>;
