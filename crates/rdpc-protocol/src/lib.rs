//! RDPC-101 Protocol Library
//!
//! This crate provides the wire protocol of the SUNTAC RDPC-101 USB AM/FM
//! tuner, independent of how the bytes travel:
//!
//! - **Band table**: classification of wire frequencies into AM/FM and
//!   their tuning steps
//! - **State packets**: 13-byte interrupt reports describing frequency,
//!   audio mode, seeking flag and signal intensity
//! - **Commands**: 3-byte HID feature reports (set frequency, set band,
//!   set audio mode, mute, seek)
//! - **Display and parsing**: frequency formatting and parsing of user
//!   typed frequencies with step rounding
//!
//! # Example
//!
//! ```rust
//! use rdpc_protocol::{decode, encode_state_packet, AudioMode, Band, Command};
//!
//! let decoded = decode(&encode_state_packet(0x01, 40, 8600));
//! assert!(!decoded.is_anomalous());
//! assert_eq!(decoded.state.audio_mode(), AudioMode::Stereo);
//! assert_eq!(decoded.state.band(), Band::Fm);
//!
//! let bytes = Command::SetFrequency { freq: 8600 }.encode();
//! assert_eq!(bytes, Some([0x02, 0x21, 0x98]));
//! ```

pub mod band;
pub mod command;
pub mod display;
pub mod error;
pub mod state;
pub mod tuning;

pub use band::{band_index, classify, freq_max, freq_min, step, Band, BandDescriptor, BandSlot};
pub use command::{
    encode_command, parse_report, Command, Opcode, SeekDirection, COMMAND_LEN, MAX_REPORT_LEN,
};
pub use display::{audio_mode_label, format_frequency, format_packet, FREQ_DISPLAY_WIDTH};
pub use error::ParseError;
pub use state::{
    decode, encode_state_packet, Anomaly, AudioMode, DecodedState, TunerState, SEEKING_MASK,
    STATE_PACKET_HEADER, STATE_PACKET_SIZE,
};
pub use tuning::{parse_frequency, round_to_step, TargetFrequency};
