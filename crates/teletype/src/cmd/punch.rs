use teletype_tape::{title_case, TapeEncoder};
use tracing::{info, warn};

use crate::cmd::{load_glyphs, PunchArgs};
use crate::exit::{CliResult, SUCCESS};
use crate::output::{print_punch, OutputFormat, PunchOutput};

pub fn run(args: PunchArgs, format: OutputFormat) -> CliResult<i32> {
    let table = load_glyphs(args.glyphs.as_deref())?;
    let title = title_case(&args.text);
    let skipped = table.missing(&title);
    if !skipped.is_empty() {
        warn!(?skipped, "characters without a glyph will be skipped");
    }

    let encoder = TapeEncoder::new(table);
    let tape = encoder.encode(&args.text);
    info!(length = tape.len(), "tape encoded");

    let out = PunchOutput {
        text: &args.text,
        title,
        length: tape.len(),
        skipped,
        rows: &tape,
    };
    print_punch(&out, format);

    Ok(SUCCESS)
}
