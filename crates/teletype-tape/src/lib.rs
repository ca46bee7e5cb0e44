//! Paper-tape dot-matrix encoder.
//!
//! Text is punched as readable letters: every glyph is a short run of tape
//! rows, each row a 5-bit mask of punched holes across the tape. A stream is
//! laid out as:
//! - lead-in blank rows for the feed mechanism
//! - for every renderable character, one blank separator row then its glyph rows
//! - a longer run of blank feed-out rows
//!
//! Characters without a glyph are skipped.

pub mod encoder;
pub mod error;
pub mod glyph;
pub mod preview;

pub use encoder::{title_case, TapeEncoder, TapeLayout, DEFAULT_FEED_OUT, DEFAULT_LEAD_IN};
pub use error::{Result, TapeError};
pub use glyph::{Glyph, GlyphTable, LANE_BITS, LANE_MASK, MAX_GLYPH_ROWS};
pub use preview::preview;
