use std::io::{ErrorKind, Read};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;

use bytes::Bytes;
use tracing::trace;

use crate::error::{Result, SessionError};
use crate::hex::hex;
use crate::message::Inbound;

/// Bytes requested per physical read.
pub const DEFAULT_READ_BURST: usize = 4;

/// Parity bit set by the device on every character.
pub const PARITY_BIT: u8 = 0x80;

/// Reads input bursts from any `Read` link.
///
/// The link is expected to time out idle reads (returning `Ok(0)` or a
/// `WouldBlock`/`TimedOut` error) so the reader can notice shutdown.
pub struct InputReader<T> {
    inner: T,
    buf: Vec<u8>,
}

impl<T: Read> InputReader<T> {
    /// Create a reader with the default burst size.
    pub fn new(inner: T) -> Self {
        Self::with_burst(inner, DEFAULT_READ_BURST)
    }

    /// Create a reader that asks for at most `burst` bytes per read.
    pub fn with_burst(inner: T, burst: usize) -> Self {
        Self {
            inner,
            buf: vec![0u8; burst.max(1)],
        }
    }

    /// Read the next burst (blocking up to the link timeout).
    ///
    /// Returns `Ok(None)` when the read timed out with no data.
    pub fn read_unit(&mut self) -> Result<Option<Inbound>> {
        loop {
            let read = match self.inner.read(&mut self.buf) {
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if matches!(err.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {
                    return Ok(None)
                }
                Err(err) => return Err(SessionError::Read(err)),
            };

            if read == 0 {
                return Ok(None);
            }

            let unit: Vec<u8> = self.buf[..read].iter().map(|b| b & !PARITY_BIT).collect();
            return Ok(Some(Inbound::new(Bytes::from(unit))));
        }
    }

    /// Forward bursts to `tx` until `running` is cleared or the receiver goes away.
    pub fn run(mut self, running: &AtomicBool, tx: &Sender<Inbound>) -> Result<()> {
        while running.load(Ordering::SeqCst) {
            let Some(event) = self.read_unit()? else {
                continue;
            };
            trace!(data = %hex(&event.unit), "read");
            if tx.send(event).is_err() {
                break;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::io::Cursor;
    use std::sync::{mpsc, Arc};

    use super::*;

    /// Replays scripted read results, then times out forever.
    struct Scripted {
        steps: VecDeque<std::io::Result<Vec<u8>>>,
    }

    impl Scripted {
        fn new(steps: Vec<std::io::Result<Vec<u8>>>) -> Self {
            Self {
                steps: steps.into(),
            }
        }
    }

    impl Read for Scripted {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            match self.steps.pop_front() {
                Some(Ok(bytes)) => {
                    let n = bytes.len().min(buf.len());
                    buf[..n].copy_from_slice(&bytes[..n]);
                    Ok(n)
                }
                Some(Err(err)) => Err(err),
                None => Ok(0),
            }
        }
    }

    #[test]
    fn strips_parity_bit() {
        let mut reader = InputReader::new(Cursor::new(vec![0xC1, 0x8D]));
        let event = reader.read_unit().unwrap().unwrap();
        assert_eq!(event.unit.as_ref(), &[0x41, 0x0D]);
    }

    #[test]
    fn reads_at_most_one_burst() {
        let mut reader = InputReader::new(Cursor::new(b"HELLO WORLD".to_vec()));
        let first = reader.read_unit().unwrap().unwrap();
        let second = reader.read_unit().unwrap().unwrap();
        assert_eq!(first.unit.as_ref(), b"HELL");
        assert_eq!(second.unit.as_ref(), b"O WO");
    }

    #[test]
    fn custom_burst_size() {
        let mut reader = InputReader::with_burst(Cursor::new(b"abc".to_vec()), 1);
        assert_eq!(reader.read_unit().unwrap().unwrap().unit.as_ref(), b"a");
    }

    #[test]
    fn zero_byte_read_is_timeout() {
        let mut reader = InputReader::new(Cursor::new(Vec::<u8>::new()));
        assert!(reader.read_unit().unwrap().is_none());
    }

    #[test]
    fn would_block_and_timed_out_are_timeouts() {
        let mut reader = InputReader::new(Scripted::new(vec![
            Err(ErrorKind::WouldBlock.into()),
            Err(ErrorKind::TimedOut.into()),
            Ok(b"x".to_vec()),
        ]));
        assert!(reader.read_unit().unwrap().is_none());
        assert!(reader.read_unit().unwrap().is_none());
        assert_eq!(reader.read_unit().unwrap().unwrap().unit.as_ref(), b"x");
    }

    #[test]
    fn interrupted_read_retries() {
        let mut reader = InputReader::new(Scripted::new(vec![
            Err(ErrorKind::Interrupted.into()),
            Ok(b"ok".to_vec()),
        ]));
        assert_eq!(reader.read_unit().unwrap().unwrap().unit.as_ref(), b"ok");
    }

    #[test]
    fn transport_error_is_fatal() {
        let mut reader = InputReader::new(Scripted::new(vec![Err(std::io::Error::other(
            "line dropped",
        ))]));
        let err = reader.read_unit().unwrap_err();
        assert!(matches!(err, SessionError::Read(_)));
    }

    #[test]
    fn run_forwards_in_order_until_flag_cleared() {
        let reader = InputReader::new(Scripted::new(vec![
            Ok(b"M".to_vec()),
            Ok(vec![]),
            Ok(b"\r".to_vec()),
        ]));
        let running = Arc::new(AtomicBool::new(true));
        let (tx, rx) = mpsc::channel();

        let handle = {
            let running = Arc::clone(&running);
            std::thread::spawn(move || reader.run(&running, &tx))
        };

        let first = rx.recv().unwrap();
        let second = rx.recv().unwrap();
        assert_eq!(first.unit.as_ref(), b"M");
        assert_eq!(second.unit.as_ref(), b"\r");

        running.store(false, Ordering::SeqCst);
        handle.join().unwrap().unwrap();
    }

    #[test]
    fn run_stops_when_receiver_gone() {
        let reader = InputReader::new(Cursor::new(b"abcdefgh".to_vec()));
        let running = AtomicBool::new(true);
        let (tx, rx) = mpsc::channel();
        drop(rx);

        reader.run(&running, &tx).unwrap();
    }

    #[test]
    fn run_exits_when_flag_cleared() {
        let reader = InputReader::new(Cursor::new(b"ignored".to_vec()));
        let running = AtomicBool::new(false);
        let (tx, rx) = mpsc::channel();

        reader.run(&running, &tx).unwrap();
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn run_propagates_read_failure() {
        let reader = InputReader::new(Scripted::new(vec![Err(std::io::Error::other("boom"))]));
        let running = AtomicBool::new(true);
        let (tx, _rx) = mpsc::channel();

        let err = reader.run(&running, &tx).unwrap_err();
        assert!(matches!(err, SessionError::Read(_)));
    }
}
