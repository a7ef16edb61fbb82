//! State packet decoding
//!
//! The tuner answers every interrupt-IN poll with a 13 byte report:
//!
//! ```text
//! [0x12] [STATUS] [INTENSITY] [FREQ_HI] [FREQ_LO] [00 .. 00]
//!   0       1         2           3         4       5 .. 12
//! ```
//!
//! `STATUS` carries the audio mode in every bit except bit 4, which is set
//! while the tuner is seeking. Packets that do not match this shape are
//! still decoded as far as possible; the deviations are reported as
//! [`Anomaly`] values so the caller can log them.

use tracing::trace;

use crate::band::{classify, Band};

/// Exact size of a state packet on the wire
pub const STATE_PACKET_SIZE: usize = 13;

/// Report id every state packet starts with
pub const STATE_PACKET_HEADER: u8 = 0x12;

/// Seeking flag inside the status byte
pub const SEEKING_MASK: u8 = 1 << 4;

const INDEX_STATUS: usize = 1;
const INDEX_INTENSITY: usize = 2;
const INDEX_FREQ_HI: usize = 3;
const INDEX_FREQ_LO: usize = 4;
/// First byte past the known fields; everything from here on must be zero
const INDEX_TRAILER: usize = 5;

/// Status values (seeking bit cleared) the tuner is known to send
/// without a documented meaning
const UNNAMED_MODES: [u8; 3] = [
    0x3E & !SEEKING_MASK,
    0x3F & !SEEKING_MASK,
    0xA7 & !SEEKING_MASK,
];

/// Audio mode reported or requested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AudioMode {
    /// Monaural
    Mono,
    /// Stereo
    Stereo,
    /// No reading yet
    #[default]
    Unspecified,
    /// A status value the device sends but whose meaning is unknown
    Unknown,
    /// A status value never seen from a healthy device
    Error,
}

impl AudioMode {
    /// Classify a status byte with the seeking bit already cleared
    pub fn from_status(mode: u8) -> AudioMode {
        match mode {
            0x00 => AudioMode::Mono,
            0x01 => AudioMode::Stereo,
            m if UNNAMED_MODES.contains(&m) => AudioMode::Unknown,
            _ => AudioMode::Error,
        }
    }

    /// Wire value used by the set-audio-mode command
    pub fn code(&self) -> Option<u8> {
        match self {
            AudioMode::Mono => Some(0x00),
            AudioMode::Stereo => Some(0x01),
            _ => None,
        }
    }

    /// Default audio mode for a band
    pub fn default_for(band: Band) -> Option<AudioMode> {
        match band {
            Band::Am => Some(AudioMode::Mono),
            Band::Fm => Some(AudioMode::Stereo),
            _ => None,
        }
    }
}

/// Decoded tuner reading
///
/// Only produced by [`decode`]; the default value stands for a device that
/// has not been read yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TunerState {
    audio_mode: AudioMode,
    seeking: bool,
    signal_intensity: u8,
    frequency: u16,
}

impl TunerState {
    pub fn audio_mode(&self) -> AudioMode {
        self.audio_mode
    }

    /// True while the device is still searching for a station
    pub fn seeking(&self) -> bool {
        self.seeking
    }

    pub fn signal_intensity(&self) -> u8 {
        self.signal_intensity
    }

    /// Frequency in wire units (kHz for AM, 10 kHz for FM)
    pub fn frequency(&self) -> u16 {
        self.frequency
    }

    /// Band the reported frequency falls into
    pub fn band(&self) -> Band {
        classify(self.frequency)
    }
}

/// A deviation from the expected state packet shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anomaly {
    /// Packet was not exactly [`STATE_PACKET_SIZE`] bytes
    Length(usize),
    /// First byte was not [`STATE_PACKET_HEADER`]
    Header(u8),
    /// Status byte outside the known set
    AudioMode(u8),
    /// Frequency outside the band table
    Frequency(u16),
    /// Non-zero byte past the known fields
    Trailer { offset: usize, value: u8 },
}

impl std::fmt::Display for Anomaly {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Anomaly::Length(n) => write!(f, "length {} (expected {})", n, STATE_PACKET_SIZE),
            Anomaly::Header(b) => write!(f, "header 0x{:02X}", b),
            Anomaly::AudioMode(b) => write!(f, "audio mode 0x{:02X}", b),
            Anomaly::Frequency(freq) => write!(f, "frequency {}", freq),
            Anomaly::Trailer { offset, value } => {
                write!(f, "trailing byte 0x{:02X} at {}", value, offset)
            }
        }
    }
}

/// Result of decoding a state packet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedState {
    pub state: TunerState,
    pub anomalies: Vec<Anomaly>,
}

impl DecodedState {
    /// True when the packet deviated from the expected shape
    pub fn is_anomalous(&self) -> bool {
        !self.anomalies.is_empty()
    }
}

/// Decode a raw state packet, best effort
///
/// Missing bytes in a short packet read as zero.
pub fn decode(raw: &[u8]) -> DecodedState {
    let byte = |i: usize| raw.get(i).copied().unwrap_or(0);
    let mut anomalies = Vec::new();

    if raw.len() != STATE_PACKET_SIZE {
        anomalies.push(Anomaly::Length(raw.len()));
    }
    if let Some(&header) = raw.first() {
        if header != STATE_PACKET_HEADER {
            anomalies.push(Anomaly::Header(header));
        }
    }

    let status = byte(INDEX_STATUS);
    let audio_mode = AudioMode::from_status(status & !SEEKING_MASK);
    if audio_mode == AudioMode::Error {
        anomalies.push(Anomaly::AudioMode(status));
    }

    let frequency = u16::from(byte(INDEX_FREQ_HI)) << 8 | u16::from(byte(INDEX_FREQ_LO));
    if classify(frequency) == Band::Error {
        anomalies.push(Anomaly::Frequency(frequency));
    }

    if let Some((offset, &value)) = raw
        .iter()
        .enumerate()
        .skip(INDEX_TRAILER)
        .find(|(_, b)| **b != 0)
    {
        anomalies.push(Anomaly::Trailer { offset, value });
    }
    if !anomalies.is_empty() {
        trace!("Anomalous state packet {:02X?}: {:?}", raw, anomalies);
    }

    DecodedState {
        state: TunerState {
            audio_mode,
            seeking: status & SEEKING_MASK != 0,
            signal_intensity: byte(INDEX_INTENSITY),
            frequency,
        },
        anomalies,
    }
}

/// Build a well-formed state packet
///
/// Used by simulators and fixtures; `status` is the raw status byte
/// including the seeking bit.
pub fn encode_state_packet(status: u8, intensity: u8, frequency: u16) -> [u8; STATE_PACKET_SIZE] {
    let mut packet = [0u8; STATE_PACKET_SIZE];
    let [hi, lo] = frequency.to_be_bytes();
    packet[0] = STATE_PACKET_HEADER;
    packet[INDEX_STATUS] = status;
    packet[INDEX_INTENSITY] = intensity;
    packet[INDEX_FREQ_HI] = hi;
    packet[INDEX_FREQ_LO] = lo;
    packet
}
