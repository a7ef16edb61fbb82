//! Error types for tuner control

use rdpc_protocol::{format_frequency, format_packet, Band, SeekDirection};
use rdpc_usb::TransportError;
use thiserror::Error;

fn freq_label(freq: &u16) -> String {
    format_frequency(*freq)
}

fn report_label(report: &[u8]) -> String {
    format_packet(report)
}

/// Errors that can occur while controlling a tuner
#[derive(Debug, Error)]
pub enum TunerError {
    /// Transport failure outside a more specific step
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Requested device index does not exist
    #[error("no device at index {index} ({count} found)")]
    DeviceNotFound { index: usize, count: usize },

    /// Current frequency does not fall into any band
    #[error("unknown band for frequency {0}")]
    UnknownBand(u16),

    /// Band has no range the device can be tuned across
    #[error("band {0} cannot be tuned")]
    InvalidBand(Band),

    /// Switching band failed
    #[error("cannot set band to {band}: {source}")]
    SetBand {
        band: Band,
        #[source]
        source: TransportError,
    },

    /// Tuning failed
    #[error("cannot set frequency to {}: {source}", freq_label(.freq))]
    SetFrequency {
        freq: u16,
        #[source]
        source: TransportError,
    },

    /// The seek command itself failed
    #[error("cannot seek {}: {source}", .direction.name())]
    Seek {
        direction: SeekDirection,
        #[source]
        source: TransportError,
    },

    /// Returning to the pre-scan band or frequency failed
    #[error("cannot restore {}: {source}", freq_label(.freq))]
    Restore {
        freq: u16,
        #[source]
        source: TransportError,
    },

    /// A raw feature report could not be written
    #[error("cannot send report {}: {source}", report_label(.report))]
    Report {
        report: Vec<u8>,
        #[source]
        source: TransportError,
    },

    /// Operation interrupted by a cancellation request
    #[error("cancelled")]
    Cancelled,
}
