//! Outbound command encoding
//!
//! Every command is a three byte HID feature report:
//!
//! ```text
//! [OPCODE] [ARG1] [ARG2]
//! ```
//!
//! The opcode doubles as the report id.

use crate::band::Band;
use crate::error::ParseError;
use crate::state::AudioMode;

/// Size of every outbound command
pub const COMMAND_LEN: usize = 3;

/// Largest feature report accepted for raw sending
pub const MAX_REPORT_LEN: usize = 64;

/// Command opcodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Opcode {
    /// Set frequency (ARG1/ARG2 = frequency hi/lo)
    SetFrequency = 0x02,
    /// Mute (ARG1 = 0 off, 1 on)
    Mute = 0x05,
    /// Audio mode (ARG1 = mode)
    AudioMode = 0x06,
    /// Seek (ARG1 = direction)
    Seek = 0x09,
    /// Band (ARG1 = band code, ARG2 = 0x02)
    Band = 0x0A,
}

impl Opcode {
    /// Raw opcode byte
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Reverse lookup from the wire byte
    pub fn from_code(code: u8) -> Option<Opcode> {
        match code {
            0x02 => Some(Opcode::SetFrequency),
            0x05 => Some(Opcode::Mute),
            0x06 => Some(Opcode::AudioMode),
            0x09 => Some(Opcode::Seek),
            0x0A => Some(Opcode::Band),
            _ => None,
        }
    }
}

/// Seek direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SeekDirection {
    Up = 0x01,
    Down = 0x02,
}

impl SeekDirection {
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            SeekDirection::Up => "up",
            SeekDirection::Down => "down",
        }
    }
}

/// Trailer byte the set-band command always carries
const BAND_TRAILER: u8 = 0x02;

/// A command to the tuner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Command {
    /// Tune to a frequency in wire units
    SetFrequency { freq: u16 },
    /// Switch band
    SetBand { band: Band },
    /// Select mono or stereo
    SetAudioMode { mode: AudioMode },
    /// Mute or unmute the audio output
    SetMute { muted: bool },
    /// Start a device-side seek
    Seek { direction: SeekDirection },
}

impl Command {
    /// Opcode this command is sent with
    pub fn opcode(&self) -> Opcode {
        match self {
            Command::SetFrequency { .. } => Opcode::SetFrequency,
            Command::SetBand { .. } => Opcode::Band,
            Command::SetAudioMode { .. } => Opcode::AudioMode,
            Command::SetMute { .. } => Opcode::Mute,
            Command::Seek { .. } => Opcode::Seek,
        }
    }

    /// Encode to wire bytes
    ///
    /// Returns `None` for a band or audio mode that has no wire code.
    pub fn encode(&self) -> Option<[u8; COMMAND_LEN]> {
        let (arg1, arg2) = match *self {
            Command::SetFrequency { freq } => {
                let [hi, lo] = freq.to_be_bytes();
                (hi, lo)
            }
            Command::SetBand { band } => (band.code()?, BAND_TRAILER),
            Command::SetAudioMode { mode } => (mode.code()?, 0x00),
            Command::SetMute { muted } => (u8::from(muted), 0x00),
            Command::Seek { direction } => (direction.code(), 0x00),
        };
        Some(encode_command(self.opcode(), arg1, arg2))
    }

    /// Parse wire bytes back into a command
    pub fn parse(data: &[u8]) -> Option<Command> {
        let [op, arg1, arg2] = <[u8; COMMAND_LEN]>::try_from(data).ok()?;
        let cmd = match Opcode::from_code(op)? {
            Opcode::SetFrequency => Command::SetFrequency {
                freq: u16::from_be_bytes([arg1, arg2]),
            },
            Opcode::Band => Command::SetBand {
                band: match arg1 {
                    0x80 => Band::Am,
                    0x02 => Band::Fm,
                    _ => return None,
                },
            },
            Opcode::AudioMode => Command::SetAudioMode {
                mode: match arg1 {
                    0x00 => AudioMode::Mono,
                    0x01 => AudioMode::Stereo,
                    _ => return None,
                },
            },
            Opcode::Mute => Command::SetMute { muted: arg1 != 0 },
            Opcode::Seek => Command::Seek {
                direction: match arg1 {
                    0x01 => SeekDirection::Up,
                    0x02 => SeekDirection::Down,
                    _ => return None,
                },
            },
        };
        Some(cmd)
    }
}

/// Assemble a raw command
pub fn encode_command(opcode: Opcode, arg1: u8, arg2: u8) -> [u8; COMMAND_LEN] {
    [opcode.code(), arg1, arg2]
}

/// Parse a raw feature report given as hex bytes, e.g. `["0a", "80", "02"]`
///
/// Each word is one byte, with or without a `0x` prefix. The first byte is
/// the report id.
pub fn parse_report<S: AsRef<str>>(words: &[S]) -> Result<Vec<u8>, ParseError> {
    if words.is_empty() || words.len() > MAX_REPORT_LEN {
        return Err(ParseError::ReportLength(words.len()));
    }
    words
        .iter()
        .map(|word| {
            let word = word.as_ref().trim();
            let digits = word
                .strip_prefix("0x")
                .or_else(|| word.strip_prefix("0X"))
                .unwrap_or(word);
            u8::from_str_radix(digits, 16)
                .map_err(|_| ParseError::InvalidReportByte(word.to_string()))
        })
        .collect()
}
