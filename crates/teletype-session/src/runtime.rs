use std::io::{Read, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::{debug, error, info};

use crate::error::{Result, SessionError};
use crate::message::{Inbound, Outbound};
use crate::reader::{InputReader, DEFAULT_READ_BURST};
use crate::resources::ResourceLookup;
use crate::session::Session;
use crate::writer::OutputWriter;

const READER_THREAD: &str = "teletype-reader";
const WRITER_THREAD: &str = "teletype-writer";

/// Pipeline tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Bytes requested per physical read.
    pub read_burst: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            read_burst: DEFAULT_READ_BURST,
        }
    }
}

/// How a session that ended without a fault came to an end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// The operator typed `EXIT`.
    Exited,
    /// The running flag was cleared from outside (e.g. Ctrl-C).
    Interrupted,
}

/// Run a session to completion.
///
/// `input` and `output` are the two halves of the link; `input` must time out
/// idle reads so the reader notices when `running` is cleared. The greeting is
/// sent first, and on exit every queued request (the farewell included) is
/// written before the writer stops. A read or write fault stops the whole
/// pipeline and is returned once both threads are joined.
pub fn run<R, W, L>(
    input: R,
    output: W,
    mut session: Session<L>,
    config: &SessionConfig,
    running: Arc<AtomicBool>,
) -> Result<SessionOutcome>
where
    R: Read + Send + 'static,
    W: Write + Send + 'static,
    L: ResourceLookup,
{
    let (in_tx, in_rx) = mpsc::channel::<Inbound>();
    let (out_tx, out_rx) = mpsc::channel::<Outbound>();

    let reader = {
        let flag = Arc::clone(&running);
        let burst = config.read_burst;
        spawn(READER_THREAD, &running, move || {
            InputReader::with_burst(input, burst).run(&flag, &in_tx)
        })?
    };

    let writer = match spawn(WRITER_THREAD, &running, move || {
        OutputWriter::new(output).run(&out_rx)
    }) {
        Ok(handle) => handle,
        Err(err) => {
            if let Err(reader_err) = stop_reader(&running, reader) {
                error!(error = %reader_err, "reader fault while writer failed to start");
            }
            return Err(err);
        }
    };

    info!(burst = config.read_burst, "session started");
    let outcome = drive(&mut session, &in_rx, &out_tx);

    running.store(false, Ordering::SeqCst);
    let _ = out_tx.send(Outbound::Terminate);
    drop(out_tx);

    let read_result = join(reader, READER_THREAD);
    let write_result = join(writer, WRITER_THREAD);
    read_result?;
    write_result?;

    info!(?outcome, mode = ?session.mode(), "session ended");
    Ok(outcome)
}

/// The session loop: the only place session state is touched.
fn drive<L: ResourceLookup>(
    session: &mut Session<L>,
    rx: &Receiver<Inbound>,
    tx: &Sender<Outbound>,
) -> SessionOutcome {
    if tx.send(session.greeting()).is_err() {
        return SessionOutcome::Interrupted;
    }

    while let Ok(event) = rx.recv() {
        for request in session.on_input(&event.unit) {
            if tx.send(request).is_err() {
                debug!("writer gone");
                return SessionOutcome::Interrupted;
            }
        }
        if session.is_finished() {
            return SessionOutcome::Exited;
        }
    }

    debug!("reader gone");
    SessionOutcome::Interrupted
}

/// Start a worker that clears `running` if it fails.
fn spawn<F>(
    name: &'static str,
    running: &Arc<AtomicBool>,
    work: F,
) -> Result<JoinHandle<Result<()>>>
where
    F: FnOnce() -> Result<()> + Send + 'static,
{
    let running = Arc::clone(running);
    thread::Builder::new()
        .name(name.to_string())
        .spawn(move || {
            let result = work();
            match &result {
                Ok(()) => debug!(thread = name, "stopped"),
                Err(err) => {
                    error!(thread = name, error = %err, "stopped on fault");
                    running.store(false, Ordering::SeqCst);
                }
            }
            result
        })
        .map_err(|source| SessionError::Spawn { name, source })
}

/// Clear `running` and wait for the reader to notice.
fn stop_reader(running: &AtomicBool, reader: JoinHandle<Result<()>>) -> Result<()> {
    running.store(false, Ordering::SeqCst);
    join(reader, READER_THREAD)
}

fn join(handle: JoinHandle<Result<()>>, name: &'static str) -> Result<()> {
    handle
        .join()
        .map_err(|_| SessionError::ThreadPanicked(name))?
}
