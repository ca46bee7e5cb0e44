use bytes::Bytes;
use teletype_tape::TapeEncoder;
use tracing::{debug, info, trace};

use crate::command::{
    self, Command, CONFIRM_PROMPT, FAREWELL, GREETING, HELP, MISSIONS, NAME_PROMPT, PROMPT,
};
use crate::message::Outbound;

const NUL: u8 = 0x00;
const LINE_FEED: u8 = b'\n';
const CARRIAGE_RETURN: u8 = b'\r';
const DELETE: u8 = 0x7F;
const BACKSPACE: &[u8] = b"\x08";

/// Where the session is in the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Waiting for a command line.
    Normal,
    /// Waiting for the name to punch.
    GetName,
    /// Waiting for the operator to confirm the punch is on.
    PrintTape,
    /// Finished; no further input is consumed.
    Exit,
}

/// Operator session state.
///
/// Owned by the session loop alone. Input is fed in as decoded bytes and the
/// requests to send back are returned in order.
pub struct Session<L> {
    mode: Mode,
    pending: Vec<u8>,
    captured_name: String,
    mission: usize,
    resources: L,
    encoder: TapeEncoder,
}

impl<L: crate::resources::ResourceLookup> Session<L> {
    pub fn new(resources: L, encoder: TapeEncoder) -> Self {
        Self {
            mode: Mode::Normal,
            pending: Vec::new(),
            captured_name: String::new(),
            mission: 0,
            resources,
            encoder,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Characters typed since the last line terminator.
    pub fn pending_line(&self) -> &[u8] {
        &self.pending
    }

    /// The most recent name entry.
    pub fn captured_name(&self) -> &str {
        &self.captured_name
    }

    /// Rotation slot the next `M` will print.
    pub fn mission_index(&self) -> usize {
        self.mission
    }

    pub fn is_finished(&self) -> bool {
        self.mode == Mode::Exit
    }

    /// Banner sent when the session starts.
    pub fn greeting(&self) -> Outbound {
        Outbound::text(GREETING)
    }

    /// Feed one decoded input unit.
    ///
    /// Bytes are handled one at a time, so a terminator that shares a burst
    /// with other characters still ends the line. Once the session reaches
    /// `Exit` the rest of the unit is dropped.
    pub fn on_input(&mut self, unit: &[u8]) -> Vec<Outbound> {
        let mut out = Vec::new();
        for &byte in unit {
            if self.is_finished() {
                break;
            }
            self.on_byte(byte, &mut out);
        }
        out
    }

    fn on_byte(&mut self, byte: u8, out: &mut Vec<Outbound>) {
        match byte {
            LINE_FEED | CARRIAGE_RETURN => self.complete_line(out),
            NUL => {}
            DELETE => out.push(Outbound::text(BACKSPACE)),
            _ => {
                trace!(byte, "echo");
                self.pending.push(byte);
                out.push(Outbound::text(Bytes::copy_from_slice(&[byte])));
            }
        }
    }

    fn complete_line(&mut self, out: &mut Vec<Outbound>) {
        let line = String::from_utf8_lossy(&std::mem::take(&mut self.pending)).into_owned();
        let next = match self.mode {
            Mode::Normal => self.run_command(&line, out),
            Mode::GetName => {
                debug!(name = %line, "name captured");
                self.captured_name = line;
                out.push(Outbound::text(CONFIRM_PROMPT));
                Mode::PrintTape
            }
            Mode::PrintTape => {
                let tape = self.encoder.encode(&self.captured_name);
                info!(name = %self.captured_name, bytes = tape.len(), "punching name");
                out.push(Outbound::Binary(tape));
                Mode::Normal
            }
            Mode::Exit => Mode::Exit,
        };

        if next != self.mode {
            debug!(from = ?self.mode, to = ?next, "mode change");
        }
        self.mode = next;
    }

    fn run_command(&mut self, line: &str, out: &mut Vec<Outbound>) -> Mode {
        let command = Command::parse(line);
        info!(?command, "command");

        match command {
            Command::Help => {
                out.push(Outbound::text(HELP));
                Mode::Normal
            }
            Command::Mission => {
                out.push(Outbound::text(command::mission_text(self.mission)));
                self.mission = (self.mission + 1) % MISSIONS.len();
                Mode::Normal
            }
            Command::PrintName => {
                out.push(Outbound::text(NAME_PROMPT));
                Mode::GetName
            }
            Command::Exit => {
                out.push(Outbound::text(FAREWELL));
                Mode::Exit
            }
            Command::Blank => {
                out.push(Outbound::text(PROMPT));
                Mode::Normal
            }
            Command::Resource(name) => {
                if let Some(content) = self.resources.lookup(&name.to_lowercase()) {
                    out.push(Outbound::Text(command::wrap_resource(&content)));
                }
                out.push(Outbound::text(PROMPT));
                Mode::Normal
            }
        }
    }
}
