use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{Result, TapeError};

/// Number of hole positions across the tape.
pub const LANE_BITS: u32 = 5;

/// Mask of the bits a row may set.
pub const LANE_MASK: u8 = (1 << LANE_BITS) - 1;

/// Longest glyph, in tape rows.
pub const MAX_GLYPH_ROWS: usize = 5;

/// Punched rows for a single character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph {
    rows: [u8; MAX_GLYPH_ROWS],
    len: usize,
}

impl Glyph {
    /// Build a glyph, checking it fits the tape.
    pub fn new(ch: char, rows: &[u8]) -> Result<Self> {
        if rows.is_empty() || rows.len() > MAX_GLYPH_ROWS {
            return Err(TapeError::BadGlyphWidth {
                ch,
                rows: rows.len(),
                max: MAX_GLYPH_ROWS,
            });
        }
        if let Some(&row) = rows.iter().find(|&&row| row & !LANE_MASK != 0) {
            return Err(TapeError::RowOutOfLane {
                ch,
                row,
                lanes: LANE_BITS,
            });
        }

        let mut fixed = [0u8; MAX_GLYPH_ROWS];
        fixed[..rows.len()].copy_from_slice(rows);
        Ok(Self {
            rows: fixed,
            len: rows.len(),
        })
    }

    /// The glyph's rows in punch order.
    pub fn rows(&self) -> &[u8] {
        &self.rows[..self.len]
    }

    /// Number of tape rows the glyph occupies.
    pub fn width(&self) -> usize {
        self.len
    }
}

// Letters are listed once; lower case shares the upper-case rows.
const LETTERS: &[(char, &[u8])] = &[
    ('A', &[0x1E, 0x05, 0x05, 0x1E]),
    ('B', &[0x1F, 0x15, 0x15, 0x0E]),
    ('C', &[0x0E, 0x11, 0x11, 0x0A]),
    ('D', &[0x1F, 0x11, 0x11, 0x0E]),
    ('E', &[0x1F, 0x15, 0x15, 0x15]),
    ('F', &[0x1F, 0x05, 0x05, 0x05]),
    ('G', &[0x0E, 0x11, 0x15, 0x0D]),
    ('H', &[0x1F, 0x04, 0x04, 0x1F]),
    ('I', &[0x1F]),
    ('J', &[0x08, 0x10, 0x10, 0x0F]),
    ('K', &[0x1F, 0x04, 0x0A, 0x11]),
    ('L', &[0x1F, 0x10, 0x10]),
    ('M', &[0x1F, 0x02, 0x04, 0x02, 0x1F]),
    ('N', &[0x1F, 0x02, 0x04, 0x08, 0x1F]),
    ('O', &[0x0E, 0x11, 0x11, 0x0E]),
    ('P', &[0x1F, 0x05, 0x05, 0x02]),
    ('Q', &[0x0E, 0x11, 0x09, 0x16]),
    ('R', &[0x1F, 0x05, 0x0D, 0x12]),
    ('S', &[0x12, 0x15, 0x15, 0x09]),
    ('T', &[0x01, 0x1F, 0x01]),
    ('U', &[0x0F, 0x10, 0x10, 0x0F]),
    ('V', &[0x03, 0x0C, 0x10, 0x0C, 0x03]),
    ('W', &[0x0F, 0x10, 0x0E, 0x10, 0x0F]),
    ('X', &[0x11, 0x0A, 0x04, 0x0A, 0x11]),
    ('Y', &[0x01, 0x02, 0x1C, 0x02, 0x01]),
    ('Z', &[0x19, 0x15, 0x13]),
];

// Every symbol is keyed by its bare character, `;` through `~` included, so
// all of them are reachable from typed text.
const SYMBOLS: &[(char, &[u8])] = &[
    (' ', &[0x00, 0x00]),
    ('"', &[0x03, 0x00, 0x03]),
    ('#', &[0x0A, 0x1F, 0x0A, 0x1F, 0x0A]),
    ('$', &[0x12, 0x1D, 0x17, 0x09]),
    ('%', &[0x03, 0x1B, 0x04, 0x1B, 0x18]),
    ('&', &[0x0A, 0x15, 0x16, 0x08, 0x11]),
    ('\'', &[0x03]),
    ('(', &[0x0E, 0x11]),
    (')', &[0x11, 0x0E]),
    ('*', &[0x0A, 0x04, 0x1F, 0x04, 0x0A]),
    ('+', &[0x04, 0x04, 0x1F, 0x04, 0x04]),
    (',', &[0x10, 0x08]),
    ('-', &[0x04, 0x04, 0x04]),
    ('.', &[0x10]),
    ('/', &[0x18, 0x04, 0x03]),
    ('0', &[0x0E, 0x11, 0x11, 0x0E]),
    ('1', &[0x11, 0x1F, 0x10]),
    ('2', &[0x19, 0x15, 0x15, 0x12]),
    ('3', &[0x11, 0x11, 0x15, 0x15, 0x0A]),
    ('4', &[0x07, 0x04, 0x1F, 0x04]),
    ('5', &[0x17, 0x15, 0x15, 0x09]),
    ('6', &[0x0E, 0x15, 0x15, 0x08]),
    ('7', &[0x01, 0x19, 0x05, 0x03]),
    ('8', &[0x0A, 0x15, 0x15, 0x0A]),
    ('9', &[0x02, 0x15, 0x15, 0x0E]),
    (':', &[0x0A]),
    (';', &[0x10, 0x0A]),
    ('<', &[0x11, 0x0A, 0x04]),
    ('=', &[0x0A, 0x0A, 0x0A]),
    ('>', &[0x04, 0x0A, 0x11]),
    ('?', &[0x01, 0x15, 0x05, 0x02]),
    ('@', &[0x0E, 0x11, 0x17, 0x15, 0x02]),
    ('[', &[0x1F, 0x11]),
    ('\\', &[0x03, 0x04, 0x18]),
    (']', &[0x11, 0x1F]),
    ('^', &[0x02, 0x01, 0x02]),
    ('_', &[0x10, 0x10, 0x10]),
    ('`', &[0x01, 0x02]),
    ('{', &[0x04, 0x1B, 0x11]),
    ('|', &[0x1F]),
    ('}', &[0x11, 0x1B, 0x04]),
    ('~', &[0x02, 0x01, 0x02, 0x01]),
    ('\x7f', &[0x00, 0x00]),
];

/// Character to glyph mapping used by the encoder.
///
/// Immutable once built. Every entry has been checked against the lane width,
/// so the encoder never has to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlyphTable {
    glyphs: BTreeMap<char, Glyph>,
}

impl GlyphTable {
    /// The builtin 5x5 dot-matrix font.
    pub fn builtin() -> Self {
        let mut glyphs = BTreeMap::new();
        for &(ch, rows) in LETTERS {
            if let Ok(glyph) = Glyph::new(ch, rows) {
                glyphs.insert(ch, glyph);
                glyphs.insert(ch.to_ascii_lowercase(), glyph);
            }
        }
        for &(ch, rows) in SYMBOLS {
            if let Ok(glyph) = Glyph::new(ch, rows) {
                glyphs.insert(ch, glyph);
            }
        }
        Self { glyphs }
    }

    /// Build a table from `(character, rows)` pairs, validating every glyph.
    pub fn from_entries<I, R>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (char, R)>,
        R: AsRef<[u8]>,
    {
        let mut glyphs = BTreeMap::new();
        for (ch, rows) in entries {
            glyphs.insert(ch, Glyph::new(ch, rows.as_ref())?);
        }
        Ok(Self { glyphs })
    }

    /// Parse a JSON table of the form `{"A": [30, 5, 5, 30], ...}`.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: BTreeMap<String, Vec<u8>> = serde_json::from_str(json)?;
        let mut entries = Vec::with_capacity(raw.len());
        for (key, rows) in raw {
            let mut chars = key.chars();
            match (chars.next(), chars.next()) {
                (Some(ch), None) => entries.push((ch, rows)),
                _ => return Err(TapeError::InvalidKey(key)),
            }
        }
        Self::from_entries(entries)
    }

    /// Load a JSON table from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Glyph for `ch`, if the table has one.
    pub fn get(&self, ch: char) -> Option<&Glyph> {
        self.glyphs.get(&ch)
    }

    pub fn contains(&self, ch: char) -> bool {
        self.glyphs.contains_key(&ch)
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Entries in character order.
    pub fn iter(&self) -> impl Iterator<Item = (char, &Glyph)> {
        self.glyphs.iter().map(|(ch, glyph)| (*ch, glyph))
    }

    /// Characters of `text` the encoder would skip, in first-seen order.
    pub fn missing(&self, text: &str) -> Vec<char> {
        let mut missing = Vec::new();
        for ch in text.chars() {
            if !self.contains(ch) && !missing.contains(&ch) {
                missing.push(ch);
            }
        }
        missing
    }
}
