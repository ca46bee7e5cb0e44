use std::collections::BTreeMap;
use std::io::{IsTerminal, Write};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use teletype_tape::{preview, GlyphTable};

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

/// Result of encoding one piece of text.
#[derive(Serialize)]
pub struct PunchOutput<'a> {
    pub text: &'a str,
    pub title: String,
    pub length: usize,
    pub skipped: Vec<char>,
    pub rows: &'a [u8],
}

pub fn print_punch(out: &PunchOutput<'_>, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(out),
        OutputFormat::Table => {
            let skipped: String = out.skipped.iter().collect();
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["TEXT", "PUNCHED AS", "ROWS", "SKIPPED"])
                .add_row(vec![
                    out.text.to_string(),
                    out.title.clone(),
                    out.length.to_string(),
                    skipped,
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => print!("{}", preview(out.rows)),
        OutputFormat::Raw => print_raw(out.rows),
    }
}

pub fn print_glyphs(table: &GlyphTable, format: OutputFormat) {
    match format {
        OutputFormat::Json | OutputFormat::Raw => {
            let map: BTreeMap<String, &[u8]> = table
                .iter()
                .map(|(ch, glyph)| (ch.to_string(), glyph.rows()))
                .collect();
            print_json(&map);
        }
        OutputFormat::Table => {
            let mut out = Table::new();
            out.load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["CHAR", "WIDTH", "ROWS"]);
            for (ch, glyph) in table.iter() {
                out.add_row(vec![
                    display_char(ch),
                    glyph.width().to_string(),
                    hex_rows(glyph.rows()),
                ]);
            }
            println!("{out}");
        }
        OutputFormat::Pretty => {
            for (ch, glyph) in table.iter() {
                println!("{} ({})", display_char(ch), hex_rows(glyph.rows()));
                print!("{}", preview(glyph.rows()));
            }
        }
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    println!(
        "{}",
        serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
    );
}

fn display_char(ch: char) -> String {
    match ch {
        ' ' => "SPACE".to_string(),
        '\x7f' => "DEL".to_string(),
        other => other.to_string(),
    }
}

fn hex_rows(rows: &[u8]) -> String {
    rows.iter()
        .map(|row| format!("{row:02x}"))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_rows_are_space_separated() {
        assert_eq!(hex_rows(&[0x1f, 0x05, 0x0d]), "1f 05 0d");
        assert_eq!(hex_rows(&[]), "");
    }

    #[test]
    fn invisible_chars_get_names() {
        assert_eq!(display_char(' '), "SPACE");
        assert_eq!(display_char('\x7f'), "DEL");
        assert_eq!(display_char('Q'), "Q");
    }
}
