use clap::{Args, Subcommand};
use std::path::{Path, PathBuf};
#[cfg(unix)]
use std::time::Duration;

use teletype_tape::GlyphTable;

use crate::exit::{tape_error, CliResult};
#[cfg(unix)]
use crate::exit::{CliError, USAGE};
use crate::output::OutputFormat;

pub mod glyphs;
pub mod punch;
pub mod run;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Drive a teletype on a serial port until EXIT or Ctrl-C.
    Run(RunArgs),
    /// Encode text as paper tape without a device.
    Punch(PunchArgs),
    /// List the active glyph table.
    Glyphs(GlyphsArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Run(args) => run::run(args),
        Command::Punch(args) => punch::run(args, format),
        Command::Glyphs(args) => glyphs::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Serial device path (e.g. /dev/ttyUSB0).
    #[arg(env = "TELETYPE_PORT")]
    pub port: Option<PathBuf>,
    /// Line speed in baud.
    #[arg(long, env = "TELETYPE_BAUD", default_value_t = 110)]
    pub baud: u32,
    /// Idle read timeout (e.g. 100ms, 2ds, 1s; at most 25.5s).
    #[arg(long, default_value = "100ms")]
    pub read_timeout: String,
    /// Directory of `<name>.txt` resources printable by name.
    #[arg(long, value_name = "DIR", env = "TELETYPE_RESOURCES")]
    pub resources: Option<PathBuf>,
    /// JSON glyph table replacing the builtin one.
    #[arg(long, value_name = "FILE", env = "TELETYPE_GLYPHS")]
    pub glyphs: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct PunchArgs {
    /// Text to punch. Title-cased before encoding.
    pub text: String,
    /// JSON glyph table replacing the builtin one.
    #[arg(long, value_name = "FILE", env = "TELETYPE_GLYPHS")]
    pub glyphs: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct GlyphsArgs {
    /// JSON glyph table replacing the builtin one.
    #[arg(long, value_name = "FILE", env = "TELETYPE_GLYPHS")]
    pub glyphs: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

/// Builtin glyphs, or the table at `path`.
pub(crate) fn load_glyphs(path: Option<&Path>) -> CliResult<GlyphTable> {
    match path {
        Some(path) => GlyphTable::load(path)
            .map_err(|err| tape_error(&format!("glyph table {}", path.display()), err)),
        None => Ok(GlyphTable::builtin()),
    }
}

/// Parse a `--read-timeout` value: `250ms`, `3ds` (tenths, as termios counts
/// them) or `2s`. A bare number is seconds.
#[cfg(unix)]
pub(crate) fn parse_read_timeout(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    let split = input
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(input.len());
    let (number, unit) = input.split_at(split);

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid read timeout: {input:?}")))?;
    let timeout = match unit {
        "ms" => Duration::from_millis(value),
        "ds" => Duration::from_millis(value.saturating_mul(100)),
        "s" | "" => Duration::from_secs(value),
        other => {
            return Err(CliError::new(
                USAGE,
                format!("unknown read timeout unit {other:?} (use ms, ds or s)"),
            ))
        }
    };

    if timeout.is_zero() {
        return Err(CliError::new(USAGE, "read timeout must be greater than zero"));
    }
    if timeout > teletype_link::MAX_READ_TIMEOUT {
        return Err(CliError::new(
            USAGE,
            format!(
                "read timeout {input} exceeds the tty limit of {}ms",
                teletype_link::MAX_READ_TIMEOUT.as_millis()
            ),
        ));
    }
    Ok(timeout)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn read_timeout_units() {
        assert_eq!(parse_read_timeout("250ms").unwrap(), Duration::from_millis(250));
        assert_eq!(parse_read_timeout("3ds").unwrap(), Duration::from_millis(300));
        assert_eq!(parse_read_timeout("2s").unwrap(), Duration::from_secs(2));
        assert_eq!(parse_read_timeout(" 4 ").unwrap(), Duration::from_secs(4));
    }

    #[cfg(unix)]
    #[test]
    fn read_timeout_rejects_zero_in_any_unit() {
        for input in ["0", "0ms", "0ds", "0s"] {
            let err = parse_read_timeout(input).unwrap_err();
            assert_eq!(err.code, USAGE, "{input}");
            assert!(err.message.contains("greater than zero"), "{input}");
        }
    }

    #[cfg(unix)]
    #[test]
    fn read_timeout_is_capped_at_vtime_range() {
        assert_eq!(parse_read_timeout("255ds").unwrap(), teletype_link::MAX_READ_TIMEOUT);
        let err = parse_read_timeout("30s").unwrap_err();
        assert_eq!(err.code, USAGE);
        assert!(err.message.contains("25500ms"));
    }

    #[cfg(unix)]
    #[test]
    fn read_timeout_rejects_garbage() {
        for input in ["", "ms", "fast", "10min", "-5s"] {
            assert_eq!(parse_read_timeout(input).unwrap_err().code, USAGE, "{input}");
        }
    }

    #[test]
    fn load_glyphs_defaults_to_builtin() {
        let table = load_glyphs(None).unwrap();
        assert!(table.contains('A'));
    }

    #[test]
    fn load_glyphs_missing_file_is_an_error() {
        let err = load_glyphs(Some(Path::new("/nonexistent/glyphs.json"))).unwrap_err();
        assert_ne!(err.code, crate::exit::SUCCESS);
    }
}
