//! Error types for USB transports

use thiserror::Error;

/// Errors that can occur while talking to a tuner over USB
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Failed to enumerate USB devices
    #[error("failed to enumerate devices: {0}")]
    EnumerationFailed(String),

    /// Device vanished between enumeration and open
    #[error("device not found: {0}")]
    NotFound(String),

    /// Failed to open the device
    #[error("failed to open {device}: {reason}")]
    OpenFailed { device: String, reason: String },

    /// Failed to detach the kernel driver or claim the HID interface
    #[error("failed to claim interface {interface} on {device}: {reason}")]
    ClaimFailed {
        device: String,
        interface: u8,
        reason: String,
    },

    /// Transfer did not complete in time
    #[error("timeout after {0}ms")]
    Timeout(u64),

    /// Read completed without any data
    #[error("no data received")]
    NoData,

    /// Fewer bytes were transferred than requested
    #[error("short transfer: {actual} of {expected} bytes")]
    ShortTransfer { expected: usize, actual: usize },

    /// Report was refused before reaching the wire
    #[error("invalid report: {0}")]
    InvalidReport(String),

    /// Device was unplugged mid-operation
    #[error("device disconnected")]
    Disconnected,

    /// Any other backend failure
    #[error("I/O error: {0}")]
    Io(String),
}
