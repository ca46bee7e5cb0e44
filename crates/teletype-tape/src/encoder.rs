use bytes::{BufMut, Bytes, BytesMut};
use tracing::debug;

use crate::glyph::{GlyphTable, MAX_GLYPH_ROWS};

/// Blank rows punched before the first glyph.
pub const DEFAULT_LEAD_IN: usize = 9;

/// Blank rows punched after the last glyph.
pub const DEFAULT_FEED_OUT: usize = 23;

/// A row with no holes.
pub const BLANK_ROW: u8 = 0x00;

/// Slack around the punched text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TapeLayout {
    /// Blank rows before the text, for the feed mechanism. Default: 9.
    pub lead_in: usize,
    /// Blank rows after the text, so it can be torn off. Default: 23.
    pub feed_out: usize,
}

impl Default for TapeLayout {
    fn default() -> Self {
        Self {
            lead_in: DEFAULT_LEAD_IN,
            feed_out: DEFAULT_FEED_OUT,
        }
    }
}

/// Renders text into a punch-ready row stream.
///
/// Stream layout:
/// ```text
/// ┌──────────────┬─────┬──────────┬─────┬──────────┬───┬───────────────┐
/// │ lead-in      │ 0x00│ glyph 1  │ 0x00│ glyph 2  │ … │ feed-out      │
/// │ (9 × 0x00)   │ sep │ rows     │ sep │ rows     │   │ (23 × 0x00)   │
/// └──────────────┴─────┴──────────┴─────┴──────────┴───┴───────────────┘
/// ```
#[derive(Debug, Clone)]
pub struct TapeEncoder {
    table: GlyphTable,
    layout: TapeLayout,
}

impl Default for TapeEncoder {
    fn default() -> Self {
        Self::new(GlyphTable::builtin())
    }
}

impl TapeEncoder {
    /// Create an encoder with the default layout.
    pub fn new(table: GlyphTable) -> Self {
        Self::with_layout(table, TapeLayout::default())
    }

    /// Create an encoder with an explicit layout.
    pub fn with_layout(table: GlyphTable, layout: TapeLayout) -> Self {
        Self { table, layout }
    }

    pub fn table(&self) -> &GlyphTable {
        &self.table
    }

    pub fn layout(&self) -> TapeLayout {
        self.layout
    }

    /// Encode `text` into a fresh buffer.
    pub fn encode(&self, text: &str) -> Bytes {
        let capacity = self.layout.lead_in
            + self.layout.feed_out
            + text.chars().count() * (MAX_GLYPH_ROWS + 1);
        let mut dst = BytesMut::with_capacity(capacity);
        self.encode_into(text, &mut dst);
        dst.freeze()
    }

    /// Append the encoded stream for `text` to `dst`.
    ///
    /// Text is title-cased first. Characters with no glyph are left out,
    /// separator included.
    pub fn encode_into(&self, text: &str, dst: &mut BytesMut) {
        let text = title_case(text);

        dst.put_bytes(BLANK_ROW, self.layout.lead_in);
        for ch in text.chars() {
            match self.table.get(ch) {
                Some(glyph) => {
                    dst.put_u8(BLANK_ROW);
                    dst.put_slice(glyph.rows());
                }
                None => debug!(?ch, "no glyph; character skipped"),
            }
        }
        dst.put_bytes(BLANK_ROW, self.layout.feed_out);
    }
}

/// Upper-case the first character of every whitespace-delimited word.
///
/// Other characters are left as they are.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut word_start = true;
    for ch in text.chars() {
        if ch.is_whitespace() {
            word_start = true;
            out.push(ch);
        } else if word_start {
            word_start = false;
            out.extend(ch.to_uppercase());
        } else {
            out.push(ch);
        }
    }
    out
}
