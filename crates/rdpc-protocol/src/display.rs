//! Display helpers for frequencies, audio modes and raw packets

use crate::band::{descriptor, Band};
use crate::state::AudioMode;

/// Width of the widest formatted frequency ("108.00 MHz")
pub const FREQ_DISPLAY_WIDTH: usize = 10;

/// Placeholder for a frequency outside the band table
pub const UNKNOWN_FREQUENCY: &str = "---- _Hz";

/// Format a wire frequency for display
///
/// AM renders as whole kHz, FM as MHz with two decimals.
pub fn format_frequency(freq: u16) -> String {
    match descriptor(freq).map(|d| d.band) {
        Some(Band::Am) => format!("{} KHz", freq),
        Some(Band::Fm) => format!("{}.{:02} MHz", freq / 100, freq % 100),
        _ => UNKNOWN_FREQUENCY.to_string(),
    }
}

/// Label shown for an audio mode
pub fn audio_mode_label(mode: AudioMode) -> &'static str {
    match mode {
        AudioMode::Mono => "Monaural",
        AudioMode::Stereo => "Stereo",
        _ => "unspec",
    }
}

/// Space separated hex dump of a packet
pub fn format_packet(data: &[u8]) -> String {
    data.iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(" ")
}
