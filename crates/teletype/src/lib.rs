//! Serial driver and paper-tape punch for teletype terminals.
//!
//! # Crate Structure
//!
//! - [`link`]: serial line transport (tty opening, raw mode, read timeouts)
//! - [`tape`]: paper-tape dot-matrix encoder and glyph tables
//! - [`session`]: operator session, reader and writer threads, runtime

/// Re-export link types.
pub mod link {
    pub use teletype_link::*;
}

/// Re-export tape types.
pub mod tape {
    pub use teletype_tape::*;
}

/// Re-export session types.
pub mod session {
    pub use teletype_session::*;
}
