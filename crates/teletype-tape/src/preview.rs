//! ASCII rendering of a punch stream, for checking output without a punch.

use crate::glyph::LANE_BITS;

const HOLE: char = 'o';
const BLANK: char = '.';
const SPROCKET: char = '·';

/// Lanes before the sprocket track on 5-level tape.
const SPROCKET_AFTER: u32 = 3;

/// Draw `rows` as tape, one row per line, lane 0 on the left.
pub fn preview(rows: &[u8]) -> String {
    let mut out = String::with_capacity(rows.len() * (LANE_BITS as usize + 2));
    for &row in rows {
        for lane in 0..LANE_BITS {
            if lane == SPROCKET_AFTER {
                out.push(SPROCKET);
            }
            out.push(if row & (1 << lane) != 0 { HOLE } else { BLANK });
        }
        out.push('\n');
    }
    out
}
