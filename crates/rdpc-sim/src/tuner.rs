//! Virtual tuner simulation
//!
//! Provides a simulated tuner that reacts to command feature reports the
//! way the hardware does and answers polls with protocol-accurate state
//! packets.

use std::collections::VecDeque;

use rdpc_protocol::band::BAND_TABLE;
use rdpc_protocol::{
    classify, encode_state_packet, freq_min, AudioMode, Band, BandSlot, Command, Opcode,
    SeekDirection, SEEKING_MASK,
};
use rdpc_usb::TransportError;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// A receivable station
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Station {
    /// Frequency in wire units
    pub freq: u16,
    /// Signal intensity reported while tuned to it
    pub intensity: u8,
}

impl Station {
    pub const fn new(freq: u16, intensity: u8) -> Self {
        Self { freq, intensity }
    }
}

/// Configuration for creating a virtual tuner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VirtualTunerConfig {
    /// USB serial number string
    pub serial_number: String,
    /// Frequency reported before any command
    pub initial_frequency: u16,
    /// Audio mode reported before any command
    pub initial_audio_mode: AudioMode,
    /// Stations a seek can lock onto
    pub stations: Vec<Station>,
    /// Number of polls that report the seeking flag after a seek starts
    pub seek_polls: usize,
}

impl Default for VirtualTunerConfig {
    fn default() -> Self {
        Self {
            serial_number: "0001".to_string(),
            initial_frequency: 8000,
            initial_audio_mode: AudioMode::Stereo,
            stations: vec![
                Station::new(594, 38),
                Station::new(693, 41),
                Station::new(954, 44),
                Station::new(1134, 30),
                Station::new(7700, 22),
                Station::new(8000, 35),
                Station::new(8250, 31),
                Station::new(8520, 40),
            ],
            seek_polls: 3,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct PendingSeek {
    target: u16,
    polls_left: usize,
}

/// A simulated tuner
#[derive(Debug)]
pub struct VirtualTuner {
    serial_number: String,
    frequency: u16,
    audio_mode: AudioMode,
    muted: bool,
    stations: Vec<Station>,
    seek_polls: usize,
    seek: Option<PendingSeek>,
    /// Raw packets returned ahead of the simulated state
    injected: VecDeque<Vec<u8>>,
    commands: Vec<Command>,
    reads: usize,
    opens: usize,
    closes: usize,
    fail_opcode: Option<Opcode>,
    fail_reads_after: Option<usize>,
    fail_open: bool,
}

/// Overall limits of a band across all of its table rows
fn band_limits(band: Band) -> Option<(u16, u16)> {
    let rows = BAND_TABLE.iter().filter(|d| d.band == band);
    let min = rows.clone().map(|d| d.min).min()?;
    let max = rows.map(|d| d.max).max()?;
    Some((min, max))
}

impl VirtualTuner {
    /// Create a virtual tuner from configuration
    pub fn from_config(config: VirtualTunerConfig) -> Self {
        Self {
            serial_number: config.serial_number,
            frequency: config.initial_frequency,
            audio_mode: config.initial_audio_mode,
            muted: false,
            stations: config.stations,
            seek_polls: config.seek_polls,
            seek: None,
            injected: VecDeque::new(),
            commands: Vec::new(),
            reads: 0,
            opens: 0,
            closes: 0,
            fail_opcode: None,
            fail_reads_after: None,
            fail_open: false,
        }
    }

    /// Create a virtual tuner with default stations
    pub fn new(serial_number: impl Into<String>) -> Self {
        Self::from_config(VirtualTunerConfig {
            serial_number: serial_number.into(),
            ..Default::default()
        })
    }

    pub fn serial_number(&self) -> &str {
        &self.serial_number
    }

    /// Current frequency in wire units
    pub fn frequency(&self) -> u16 {
        self.frequency
    }

    pub fn audio_mode(&self) -> AudioMode {
        self.audio_mode
    }

    pub fn muted(&self) -> bool {
        self.muted
    }

    /// True while a seek has not settled yet
    pub fn is_seeking(&self) -> bool {
        self.seek.is_some()
    }

    /// Number of polls reporting the seeking flag after each seek
    pub fn set_seek_polls(&mut self, polls: usize) {
        self.seek_polls = polls;
    }

    /// Every command received, in order
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Number of state packets read so far, including failed reads
    pub fn reads(&self) -> usize {
        self.reads
    }

    pub fn opens(&self) -> usize {
        self.opens
    }

    pub fn closes(&self) -> usize {
        self.closes
    }

    /// Make every write with this opcode fail
    pub fn fail_writes(&mut self, opcode: Option<Opcode>) {
        self.fail_opcode = opcode;
    }

    /// Make reads fail once `count` reads have succeeded
    pub fn fail_reads_after(&mut self, count: Option<usize>) {
        self.fail_reads_after = count;
    }

    /// Make the next opens fail
    pub fn fail_open(&mut self, fail: bool) {
        self.fail_open = fail;
    }

    /// Queue a raw packet to be returned by the next read
    pub fn inject_packet(&mut self, packet: Vec<u8>) {
        self.injected.push_back(packet);
    }

    pub(crate) fn record_open(&mut self) -> Result<(), TransportError> {
        if self.fail_open {
            return Err(TransportError::OpenFailed {
                device: self.serial_number.clone(),
                reason: "simulated open failure".to_string(),
            });
        }
        self.opens += 1;
        Ok(())
    }

    pub(crate) fn record_close(&mut self) {
        self.closes += 1;
    }

    fn intensity_at(&self, freq: u16) -> u8 {
        self.stations
            .iter()
            .find(|s| s.freq == freq)
            .map(|s| s.intensity)
            .unwrap_or(0)
    }

    fn seek_target(&self, direction: SeekDirection) -> u16 {
        let band = classify(self.frequency);
        let Some((min, max)) = band_limits(band) else {
            return self.frequency;
        };
        let in_band = self
            .stations
            .iter()
            .map(|s| s.freq)
            .filter(|f| (min..=max).contains(f));
        match direction {
            SeekDirection::Up => in_band
                .filter(|f| *f > self.frequency)
                .min()
                .unwrap_or(max),
            SeekDirection::Down => in_band
                .filter(|f| *f < self.frequency)
                .max()
                .unwrap_or(min),
        }
    }

    /// Apply a feature report written by the host
    pub fn handle_report(&mut self, data: &[u8]) -> Result<(), TransportError> {
        if let Some(op) = self.fail_opcode {
            if data.first() == Some(&op.code()) {
                return Err(TransportError::Io(format!(
                    "simulated write failure for {:?}",
                    op
                )));
            }
        }

        let Some(cmd) = Command::parse(data) else {
            warn!("Virtual tuner {} ignoring report {:02X?}", self.serial_number, data);
            return Ok(());
        };
        debug!("Virtual tuner {} received {:?}", self.serial_number, cmd);
        self.commands.push(cmd);

        match cmd {
            Command::SetFrequency { freq } => {
                self.frequency = freq;
                self.seek = None;
            }
            Command::SetBand { band } => {
                if classify(self.frequency) != band {
                    if let Some(min) = BandSlot::for_band(band).and_then(freq_min) {
                        self.frequency = min;
                    }
                }
                self.seek = None;
            }
            Command::SetAudioMode { mode } => self.audio_mode = mode,
            Command::SetMute { muted } => self.muted = muted,
            Command::Seek { direction } => {
                self.seek = Some(PendingSeek {
                    target: self.seek_target(direction),
                    polls_left: self.seek_polls,
                });
            }
        }
        Ok(())
    }

    /// Produce the next state packet for a poll
    pub fn next_packet(&mut self) -> Result<Vec<u8>, TransportError> {
        self.reads += 1;
        if let Some(limit) = self.fail_reads_after {
            if self.reads > limit {
                return Err(TransportError::Disconnected);
            }
        }
        if let Some(packet) = self.injected.pop_front() {
            return Ok(packet);
        }

        let mut status = self.audio_mode.code().unwrap_or(0);
        if let Some(seek) = self.seek.as_mut() {
            if seek.polls_left > 0 {
                seek.polls_left -= 1;
                status |= SEEKING_MASK;
                return Ok(encode_state_packet(status, 0, self.frequency).to_vec());
            }
            self.frequency = seek.target;
            self.seek = None;
        }

        let intensity = self.intensity_at(self.frequency);
        Ok(encode_state_packet(status, intensity, self.frequency).to_vec())
    }
}
