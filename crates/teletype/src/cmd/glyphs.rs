use crate::cmd::{load_glyphs, GlyphsArgs};
use crate::exit::{CliResult, SUCCESS};
use crate::output::{print_glyphs, OutputFormat};

pub fn run(args: GlyphsArgs, format: OutputFormat) -> CliResult<i32> {
    let table = load_glyphs(args.glyphs.as_deref())?;
    print_glyphs(&table, format);
    Ok(SUCCESS)
}
