use std::io::{ErrorKind, Write};
use std::sync::mpsc::Receiver;
use std::thread;
use std::time::Duration;

use tracing::debug;

use crate::error::{Result, SessionError};
use crate::hex::hex;
use crate::message::Outbound;

/// Carriage return control byte.
pub const CARRIAGE_RETURN: u8 = b'\r';

/// Null bytes sent after a carriage return in text output.
///
/// A mechanical carriage needs about three character times to travel back to
/// the left margin; characters sent sooner are printed mid-flight.
pub const CARRIAGE_SETTLE_NULS: usize = 3;

const NUL: u8 = 0x00;

/// Pause before retrying a write the link refused with `WouldBlock`.
pub const WOULD_BLOCK_BACKOFF: Duration = Duration::from_millis(1);

/// Writes outbound requests to any `Write` link, one byte per write.
pub struct OutputWriter<T> {
    inner: T,
}

impl<T: Write> OutputWriter<T> {
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    /// Put one request on the wire (blocking).
    ///
    /// Returns `Ok(false)` for `Terminate`, after writing nothing.
    pub fn write_request(&mut self, request: &Outbound) -> Result<bool> {
        let (payload, settle) = match request {
            Outbound::Terminate => return Ok(false),
            Outbound::Text(payload) => (payload, true),
            Outbound::Binary(payload) => (payload, false),
        };

        debug!(
            kind = request.kind(),
            len = payload.len(),
            data = %hex(payload),
            "writing"
        );

        for &byte in payload.iter() {
            self.put(byte)?;
            if settle && byte == CARRIAGE_RETURN {
                for _ in 0..CARRIAGE_SETTLE_NULS {
                    self.put(NUL)?;
                }
            }
        }

        self.flush()?;
        Ok(true)
    }

    /// Drain `rx` until `Terminate` arrives or every sender is gone.
    pub fn run(mut self, rx: &Receiver<Outbound>) -> Result<()> {
        while let Ok(request) = rx.recv() {
            if !self.write_request(&request)? {
                break;
            }
        }
        Ok(())
    }

    fn put(&mut self, byte: u8) -> Result<()> {
        loop {
            match self.inner.write(&[byte]) {
                Ok(0) => return Err(SessionError::LinkClosed),
                Ok(_) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => {
                    thread::sleep(WOULD_BLOCK_BACKOFF)
                }
                Err(err) => return Err(SessionError::Write(err)),
            }
        }
    }

    /// Flush the underlying link.
    pub fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => {
                    thread::sleep(WOULD_BLOCK_BACKOFF)
                }
                Err(err) => return Err(SessionError::Write(err)),
            }
        }
    }

    /// Consume the writer and return the inner link.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use super::*;

    /// Records every individual write call.
    #[derive(Default)]
    struct RecordingWriter {
        writes: Vec<Vec<u8>>,
        flushes: usize,
    }

    impl Write for RecordingWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.writes.push(buf.to_vec());
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            self.flushes += 1;
            Ok(())
        }
    }

    fn singles(bytes: &[u8]) -> Vec<Vec<u8>> {
        bytes.iter().map(|b| vec![*b]).collect()
    }

    #[test]
    fn text_pads_carriage_return_with_three_nuls() {
        let mut writer = OutputWriter::new(RecordingWriter::default());
        assert!(writer.write_request(&Outbound::text("a\rb")).unwrap());

        let inner = writer.into_inner();
        assert_eq!(inner.writes, singles(b"a\r\x00\x00\x00b"));
        assert_eq!(inner.flushes, 1);
    }

    #[test]
    fn binary_is_sent_verbatim() {
        let mut writer = OutputWriter::new(RecordingWriter::default());
        assert!(writer.write_request(&Outbound::binary(&b"a\rb"[..])).unwrap());

        assert_eq!(writer.into_inner().writes, singles(b"a\rb"));
    }

    #[test]
    fn line_feed_is_not_padded() {
        let mut writer = OutputWriter::new(RecordingWriter::default());
        writer.write_request(&Outbound::text("\n\r>")).unwrap();

        assert_eq!(writer.into_inner().writes, singles(b"\n\r\x00\x00\x00>"));
    }

    #[test]
    fn terminate_writes_nothing() {
        let mut writer = OutputWriter::new(RecordingWriter::default());
        assert!(!writer.write_request(&Outbound::Terminate).unwrap());

        let inner = writer.into_inner();
        assert!(inner.writes.is_empty());
        assert_eq!(inner.flushes, 0);
    }

    #[test]
    fn run_stops_at_terminate_in_fifo_order() {
        let (tx, rx) = mpsc::channel();
        tx.send(Outbound::text("ab")).unwrap();
        tx.send(Outbound::binary(&b"\r"[..])).unwrap();
        tx.send(Outbound::Terminate).unwrap();
        tx.send(Outbound::text("never")).unwrap();

        let mut sink = RecordingWriter::default();
        OutputWriter::new(&mut sink).run(&rx).unwrap();

        assert_eq!(sink.writes, singles(b"ab\r"));
        assert_eq!(rx.recv().unwrap(), Outbound::text("never"));
    }

    #[test]
    fn run_stops_when_senders_gone() {
        let (tx, rx) = mpsc::channel();
        tx.send(Outbound::text("x")).unwrap();
        drop(tx);

        let mut sink = RecordingWriter::default();
        OutputWriter::new(&mut sink).run(&rx).unwrap();
        assert_eq!(sink.writes, singles(b"x"));
    }

    #[test]
    fn handles_interrupted_and_would_block() {
        let mut writer = OutputWriter::new(FlakyWriter {
            failures: vec![ErrorKind::Interrupted, ErrorKind::WouldBlock],
            data: Vec::new(),
        });
        writer.write_request(&Outbound::text("ok")).unwrap();
        assert_eq!(writer.into_inner().data, b"ok");
    }

    #[test]
    fn zero_write_is_link_closed() {
        let mut writer = OutputWriter::new(ZeroWriter);
        let err = writer.write_request(&Outbound::text("x")).unwrap_err();
        assert!(matches!(err, SessionError::LinkClosed));
    }

    #[test]
    fn write_error_is_fatal() {
        let mut writer = OutputWriter::new(FlakyWriter {
            failures: vec![ErrorKind::BrokenPipe],
            data: Vec::new(),
        });
        let err = writer.write_request(&Outbound::text("x")).unwrap_err();
        assert!(matches!(err, SessionError::Write(e) if e.kind() == ErrorKind::BrokenPipe));
    }

    #[test]
    fn would_block_backs_off_before_retrying() {
        let mut writer = OutputWriter::new(FlakyWriter {
            failures: vec![ErrorKind::WouldBlock; 3],
            data: Vec::new(),
        });
        let started = std::time::Instant::now();
        writer.write_request(&Outbound::binary(vec![0x1F])).unwrap();

        assert!(started.elapsed() >= WOULD_BLOCK_BACKOFF * 3);
        assert_eq!(writer.into_inner().data, [0x1F]);
    }

    struct FlakyWriter {
        failures: Vec<ErrorKind>,
        data: Vec<u8>,
    }

    impl Write for FlakyWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            if !self.failures.is_empty() {
                return Err(self.failures.remove(0).into());
            }
            self.data.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    struct ZeroWriter;

    impl Write for ZeroWriter {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Ok(0)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }
}
