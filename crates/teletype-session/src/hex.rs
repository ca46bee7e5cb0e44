use std::fmt::Write as _;

/// Lower-case hex dump for trace output.
pub(crate) fn hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        let _ = write!(out, "{byte:02x}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_lower_case_pairs() {
        assert_eq!(hex(b"\r\x00A\xff"), "0d0041ff");
        assert_eq!(hex(&[]), "");
    }
}
