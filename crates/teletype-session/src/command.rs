//! Operator commands and the fixed texts printed in response.

use bytes::{BufMut, Bytes, BytesMut};

/// Printed once when the session starts.
pub const GREETING: &str = "\r\n\n\n\nSPACE MISSION CONTROL 2.0: READY FOR COMMANDS\r\n\n\n>";

pub const HELP: &str = "\n\rP - Print name on papertape\r\nM - Print a Mission\r\n>";

pub const NAME_PROMPT: &str = "\n\rType your name>";

/// Asks the operator to switch the punch on before the tape is sent.
pub const CONFIRM_PROMPT: &str = "\n\rPress On then Return>";

pub const FAREWELL: &str = "\n\rExiting\n\r";

pub const PROMPT: &str = "\n\r>";

/// Mission briefings, handed out in rotation by `M`.
pub const MISSIONS: [&str; 3] = [
    "Curiosity: Start at -140,60 and travel to 120,20 [Gale Crater]\n\r",
    "Spirit: Start at -140,30 and travel to 170,-20\n\r",
    "Viking 2: Start -140, 70 and travel to 140,40\n\r",
];

const MISSION_HEAD: &str = "\n\r\n\n\n\n";
const MISSION_TAIL: &str = "\n\r\n\n\n\n\n\n\n\n\n\n\n\n\n>";
const RESOURCE_HEAD: &[u8] = b"\n\r\n\n\n";
const RESOURCE_TAIL: &[u8] = b"\n\r\n\n\n\n";

/// A completed line typed in `Normal` mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `?`
    Help,
    /// `M`
    Mission,
    /// `P`
    PrintName,
    /// `EXIT`
    Exit,
    /// Nothing but whitespace.
    Blank,
    /// Anything else names a text resource.
    Resource(String),
}

impl Command {
    /// Interpret a line. Surrounding whitespace is ignored; matching is exact.
    pub fn parse(line: &str) -> Self {
        match line.trim() {
            "?" => Self::Help,
            "M" => Self::Mission,
            "P" => Self::PrintName,
            "EXIT" => Self::Exit,
            "" => Self::Blank,
            other => Self::Resource(other.to_string()),
        }
    }
}

/// Briefing for rotation slot `index` (wraps), padded for the platen.
pub fn mission_text(index: usize) -> String {
    let mission = MISSIONS[index % MISSIONS.len()];
    format!("{MISSION_HEAD}{mission}{MISSION_TAIL}")
}

/// Resource contents with blank-line padding above and below.
pub fn wrap_resource(content: &[u8]) -> Bytes {
    let mut out =
        BytesMut::with_capacity(RESOURCE_HEAD.len() + content.len() + RESOURCE_TAIL.len());
    out.put_slice(RESOURCE_HEAD);
    out.put_slice(content);
    out.put_slice(RESOURCE_TAIL);
    out.freeze()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_fixed_commands() {
        assert_eq!(Command::parse("?"), Command::Help);
        assert_eq!(Command::parse(" M "), Command::Mission);
        assert_eq!(Command::parse("P\t"), Command::PrintName);
        assert_eq!(Command::parse("EXIT"), Command::Exit);
        assert_eq!(Command::parse("   "), Command::Blank);
        assert_eq!(Command::parse(""), Command::Blank);
    }

    #[test]
    fn commands_are_case_sensitive() {
        assert_eq!(Command::parse("m"), Command::Resource("m".to_string()));
        assert_eq!(Command::parse("exit"), Command::Resource("exit".to_string()));
    }

    #[test]
    fn anything_else_is_a_resource() {
        assert_eq!(
            Command::parse("  Apollo 11 "),
            Command::Resource("Apollo 11".to_string())
        );
    }

    #[test]
    fn mission_text_wraps_rotation() {
        assert_eq!(mission_text(0), mission_text(3));
        assert!(mission_text(1).contains("Spirit"));
        assert!(mission_text(2).starts_with("\n\r\n\n\n\nViking 2"));
        assert!(mission_text(0).ends_with(&format!("\n\r{}>", "\n".repeat(13))));
    }

    #[test]
    fn resource_is_padded() {
        assert_eq!(wrap_resource(b"ART").as_ref(), b"\n\r\n\n\nART\n\r\n\n\n\n");
    }
}
