use std::fs::OpenOptions;
use std::io;
use std::os::fd::{AsRawFd, RawFd};
use std::os::unix::fs::OpenOptionsExt;
use std::path::Path;
use std::time::Duration;

use tracing::{debug, info};

use crate::error::{LinkError, Result};
use crate::traits::LinkStream;

/// Baud rates that map onto a termios speed constant.
pub const SUPPORTED_BAUD_RATES: &[u32] = &[
    50, 75, 110, 134, 150, 200, 300, 600, 1200, 1800, 2400, 4800, 9600, 19200, 38400, 57600,
    115200,
];

/// Longest read timeout termios can express (255 tenths of a second).
pub const MAX_READ_TIMEOUT: Duration = Duration::from_millis(25_500);

/// Line settings applied when the port is opened.
#[derive(Debug, Clone)]
pub struct SerialConfig {
    /// Line speed. Default: 110 baud (Model 33 teletype).
    pub baud: u32,
    /// Read timeout. Reads that see no data return `Ok(0)` after this long.
    /// Rounded up to tenths of a second and capped at [`MAX_READ_TIMEOUT`].
    pub read_timeout: Duration,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            baud: 110,
            read_timeout: Duration::from_millis(100),
        }
    }
}

/// Serial port opener.
///
/// The device is opened without becoming the controlling terminal and put in
/// raw 8N1 mode with the receiver enabled and modem control lines ignored.
pub struct SerialPort;

impl SerialPort {
    /// Open and configure the tty at `path`.
    pub fn open(path: impl AsRef<Path>, config: &SerialConfig) -> Result<LinkStream> {
        let path = path.as_ref().to_path_buf();
        let speed = speed_for(config.baud).ok_or(LinkError::UnsupportedBaud(config.baud))?;

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .custom_flags(libc::O_NOCTTY)
            .open(&path)
            .map_err(|source| LinkError::Open {
                path: path.clone(),
                source,
            })?;

        let fd = file.as_raw_fd();
        // SAFETY: `fd` is an open descriptor owned by `file` for the duration of the call.
        if unsafe { libc::isatty(fd) } != 1 {
            return Err(LinkError::NotATerminal(path));
        }

        configure_line(fd, speed, config.read_timeout).map_err(|source| LinkError::Configure {
            path: path.clone(),
            source,
        })?;

        info!(?path, baud = config.baud, read_timeout = ?config.read_timeout, "opened serial port");
        Ok(LinkStream::from_tty(file, path))
    }
}

fn speed_for(baud: u32) -> Option<libc::speed_t> {
    let speed = match baud {
        50 => libc::B50,
        75 => libc::B75,
        110 => libc::B110,
        134 => libc::B134,
        150 => libc::B150,
        200 => libc::B200,
        300 => libc::B300,
        600 => libc::B600,
        1200 => libc::B1200,
        1800 => libc::B1800,
        2400 => libc::B2400,
        4800 => libc::B4800,
        9600 => libc::B9600,
        19200 => libc::B19200,
        38400 => libc::B38400,
        57600 => libc::B57600,
        115200 => libc::B115200,
        _ => return None,
    };
    Some(speed)
}

/// termios expresses read timeouts in tenths of a second, 1..=255.
fn deciseconds(timeout: Duration) -> libc::cc_t {
    let tenths = timeout.as_millis().div_ceil(100);
    tenths.clamp(1, libc::cc_t::MAX as u128) as libc::cc_t
}

fn get_attrs(fd: RawFd) -> io::Result<libc::termios> {
    // SAFETY: termios is a plain C struct; all-zero is a valid bit pattern and
    // tcgetattr overwrites it entirely on success.
    let mut tio: libc::termios = unsafe { std::mem::zeroed() };
    // SAFETY: `fd` is open and `tio` is a valid writable termios.
    if unsafe { libc::tcgetattr(fd, &mut tio) } != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(tio)
}

fn set_attrs(fd: RawFd, tio: &libc::termios) -> io::Result<()> {
    // SAFETY: `fd` is open and `tio` points to a fully initialised termios.
    if unsafe { libc::tcsetattr(fd, libc::TCSANOW, tio) } != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

fn configure_line(fd: RawFd, speed: libc::speed_t, read_timeout: Duration) -> io::Result<()> {
    let mut tio = get_attrs(fd)?;

    // SAFETY: `tio` is a valid termios obtained from tcgetattr.
    unsafe { libc::cfmakeraw(&mut tio) };
    tio.c_cflag |= libc::CLOCAL | libc::CREAD;
    tio.c_cflag &= !(libc::CSTOPB | libc::PARENB);

    // SAFETY: `tio` is valid and `speed` comes from the termios speed table.
    let rc = unsafe { libc::cfsetispeed(&mut tio, speed) | libc::cfsetospeed(&mut tio, speed) };
    if rc != 0 {
        return Err(io::Error::last_os_error());
    }

    // Pure timed read: return whatever arrived, or nothing, after VTIME.
    tio.c_cc[libc::VMIN] = 0;
    tio.c_cc[libc::VTIME] = deciseconds(read_timeout);
    set_attrs(fd, &tio)?;

    // Drop anything the line picked up before we owned it.
    // SAFETY: `fd` is an open terminal descriptor.
    if unsafe { libc::tcflush(fd, libc::TCIOFLUSH) } != 0 {
        return Err(io::Error::last_os_error());
    }

    debug!(vtime = tio.c_cc[libc::VTIME], "line configured raw 8N1");
    Ok(())
}
