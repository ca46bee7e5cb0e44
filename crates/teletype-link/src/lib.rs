//! Serial line transport for teletype-class devices.
//!
//! This is the lowest layer of teletype. It opens a tty device, puts it in raw
//! mode at a fixed (usually very low) baud rate and hands back a [`LinkStream`]
//! that implements `Read + Write`. Everything above this layer only sees the
//! two byte-stream directions.

pub mod error;
pub mod traits;

#[cfg(unix)]
pub mod serial;

pub use error::{LinkError, Result};
pub use traits::LinkStream;

#[cfg(unix)]
pub use serial::{SerialConfig, SerialPort, MAX_READ_TIMEOUT, SUPPORTED_BAUD_RATES};
