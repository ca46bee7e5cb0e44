/// Errors that can occur while building a glyph table.
#[derive(Debug, thiserror::Error)]
pub enum TapeError {
    /// A glyph row sets holes outside the 5-lane tape.
    #[error("glyph {ch:?} row {row:#04x} does not fit the {lanes}-lane tape")]
    RowOutOfLane { ch: char, row: u8, lanes: u32 },

    /// A glyph has no rows or more rows than a glyph may span.
    #[error("glyph {ch:?} has {rows} rows (expected 1..={max})")]
    BadGlyphWidth { ch: char, rows: usize, max: usize },

    /// A table key is not exactly one character.
    #[error("glyph key {0:?} must be a single character")]
    InvalidKey(String),

    /// The glyph table could not be parsed.
    #[error("glyph table parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The glyph table file could not be read.
    #[error("glyph table I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TapeError>;
