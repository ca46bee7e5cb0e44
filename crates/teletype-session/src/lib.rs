//! Operator session and concurrent read/write pipeline.
//!
//! Three activities make up a running session:
//! - a reader thread that polls the link, strips the parity bit and forwards
//!   each burst as an [`Inbound`] event
//! - the session loop, the only owner of session state, which turns events
//!   into [`Outbound`] requests
//! - a writer thread that puts requests on the wire, padding carriage returns
//!   in text output so the carriage has time to travel home
//!
//! The two threads never talk to each other; everything passes through the
//! session loop over two FIFO channels.

pub mod command;
pub mod error;
pub mod message;
pub mod reader;
pub mod resources;
pub mod runtime;
pub mod session;
pub mod writer;

mod hex;

pub use command::{Command, MISSIONS};
pub use error::{Result, SessionError};
pub use message::{Inbound, Outbound};
pub use reader::{InputReader, DEFAULT_READ_BURST};
pub use resources::{DirectoryResources, NoResources, ResourceLookup};
pub use runtime::{run, SessionConfig, SessionOutcome};
pub use session::{Mode, Session};
pub use writer::{OutputWriter, CARRIAGE_SETTLE_NULS};
