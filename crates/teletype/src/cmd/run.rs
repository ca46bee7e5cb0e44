use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use teletype_session::{DirectoryResources, NoResources, ResourceLookup};
use tracing::info;

use crate::cmd::RunArgs;
use crate::exit::{CliError, CliResult, USAGE};

#[cfg(unix)]
pub fn run(args: RunArgs) -> CliResult<i32> {
    use teletype_link::{SerialConfig, SerialPort};
    use teletype_session::{Session, SessionConfig, SessionOutcome};
    use teletype_tape::TapeEncoder;

    use crate::cmd::{load_glyphs, parse_read_timeout};
    use crate::exit::{link_error, session_error, SUCCESS};

    let port = args.port.ok_or_else(|| {
        CliError::new(USAGE, "no serial port given (pass PORT or set TELETYPE_PORT)")
    })?;
    let serial = SerialConfig {
        baud: args.baud,
        read_timeout: parse_read_timeout(&args.read_timeout)?,
    };

    let encoder = TapeEncoder::new(load_glyphs(args.glyphs.as_deref())?);
    let resources = resources_for(args.resources)?;

    let link = SerialPort::open(&port, &serial).map_err(|err| link_error("open failed", err))?;
    let output = link
        .try_clone()
        .map_err(|err| link_error("open failed", err))?;

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(running.clone())?;

    let outcome = teletype_session::run(
        link,
        output,
        Session::new(resources, encoder),
        &SessionConfig::default(),
        running,
    )
    .map_err(|err| session_error("session failed", err))?;

    match outcome {
        SessionOutcome::Exited => info!(port = %port.display(), "operator exited"),
        SessionOutcome::Interrupted => info!(port = %port.display(), "interrupted"),
    }
    Ok(SUCCESS)
}

#[cfg(not(unix))]
pub fn run(_args: RunArgs) -> CliResult<i32> {
    Err(CliError::new(
        USAGE,
        "serial ports are only supported on Unix platforms",
    ))
}

fn resources_for(dir: Option<std::path::PathBuf>) -> CliResult<Box<dyn ResourceLookup>> {
    match dir {
        Some(dir) if dir.is_dir() => {
            info!(dir = %dir.display(), "serving resources");
            Ok(Box::new(DirectoryResources::new(dir)))
        }
        Some(dir) => Err(CliError::new(
            USAGE,
            format!("resource directory {} does not exist", dir.display()),
        )),
        None => Ok(Box::new(NoResources)),
    }
}

fn install_ctrlc_handler(running: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .map_err(|err| {
        CliError::new(
            crate::exit::INTERNAL,
            format!("signal handler setup failed: {err}"),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_resource_dir_is_usage_error() {
        let err = resources_for(Some("/nonexistent/teletype-art".into()))
            .err()
            .expect("missing dir should fail");
        assert_eq!(err.code, USAGE);
    }

    #[test]
    fn no_resource_dir_finds_nothing() {
        let resources = resources_for(None).unwrap();
        assert!(resources.lookup("rocket").is_none());
    }
}
