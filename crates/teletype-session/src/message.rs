use bytes::Bytes;

/// A request from the session loop to the writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    /// Stop the writer. Nothing is written.
    Terminate,
    /// Printable output. Carriage returns get settle padding.
    Text(Bytes),
    /// Punch data. Sent verbatim.
    Binary(Bytes),
}

impl Outbound {
    /// Text request from anything that converts into bytes.
    pub fn text(payload: impl Into<Bytes>) -> Self {
        Self::Text(payload.into())
    }

    /// Binary request from anything that converts into bytes.
    pub fn binary(payload: impl Into<Bytes>) -> Self {
        Self::Binary(payload.into())
    }

    /// Request payload; empty for `Terminate`.
    pub fn payload(&self) -> &[u8] {
        match self {
            Self::Terminate => &[],
            Self::Text(payload) | Self::Binary(payload) => payload.as_ref(),
        }
    }

    /// Short name for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Terminate => "terminate",
            Self::Text(_) => "text",
            Self::Binary(_) => "binary",
        }
    }
}

/// One burst of decoded input from the reader.
///
/// Holds the bytes of a single physical read with the parity bit cleared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inbound {
    pub unit: Bytes,
}

impl Inbound {
    pub fn new(unit: impl Into<Bytes>) -> Self {
        Self { unit: unit.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_and_kind() {
        assert_eq!(Outbound::Terminate.payload(), b"");
        assert_eq!(Outbound::Terminate.kind(), "terminate");

        let text = Outbound::text("hi\r");
        assert_eq!(text.payload(), b"hi\r");
        assert_eq!(text.kind(), "text");

        let binary = Outbound::binary(vec![0x00, 0x1F]);
        assert_eq!(binary.payload(), &[0x00, 0x1F]);
        assert_eq!(binary.kind(), "binary");
    }

    #[test]
    fn inbound_wraps_bytes() {
        let event = Inbound::new(&b"M\r"[..]);
        assert_eq!(event.unit.as_ref(), b"M\r");
    }
}
