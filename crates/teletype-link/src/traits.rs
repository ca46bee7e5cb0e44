use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use crate::error::Result;

/// An open link to the device. Implements `Read + Write`.
///
/// This is the fundamental I/O type returned by [`crate::SerialPort::open`].
/// On Unix it wraps the tty file descriptor. The reader and writer sides of a
/// session each get their own handle through [`LinkStream::try_clone`].
pub struct LinkStream {
    inner: LinkStreamInner,
}

enum LinkStreamInner {
    #[cfg(unix)]
    Tty {
        file: std::fs::File,
        path: PathBuf,
    },
}

impl Read for LinkStream {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match &mut self.inner {
            #[cfg(unix)]
            LinkStreamInner::Tty { file, .. } => file.read(buf),
        }
    }
}

impl Write for LinkStream {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match &mut self.inner {
            #[cfg(unix)]
            LinkStreamInner::Tty { file, .. } => file.write(buf),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match &mut self.inner {
            #[cfg(unix)]
            LinkStreamInner::Tty { file, .. } => file.flush(),
        }
    }
}

impl LinkStream {
    /// Wrap an already configured tty file.
    #[cfg(unix)]
    pub(crate) fn from_tty(file: std::fs::File, path: PathBuf) -> Self {
        Self {
            inner: LinkStreamInner::Tty { file, path },
        }
    }

    /// Device path this stream was opened from.
    pub fn path(&self) -> &Path {
        match &self.inner {
            #[cfg(unix)]
            LinkStreamInner::Tty { path, .. } => path,
        }
    }

    /// Try to clone this stream (creates a new file descriptor).
    pub fn try_clone(&self) -> Result<Self> {
        match &self.inner {
            #[cfg(unix)]
            LinkStreamInner::Tty { file, path } => {
                let cloned = file.try_clone()?;
                Ok(Self::from_tty(cloned, path.clone()))
            }
        }
    }

    /// Transport name for diagnostics.
    pub fn transport_name(&self) -> &'static str {
        match &self.inner {
            #[cfg(unix)]
            LinkStreamInner::Tty { .. } => "tty",
        }
    }
}

impl std::fmt::Debug for LinkStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.inner {
            #[cfg(unix)]
            LinkStreamInner::Tty { path, .. } => f
                .debug_struct("LinkStream")
                .field("type", &"tty")
                .field("path", path)
                .finish(),
        }
    }
}
