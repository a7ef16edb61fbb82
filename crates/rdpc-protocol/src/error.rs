//! Error types for parsing user input

use thiserror::Error;

/// Errors that can occur while parsing a user supplied frequency or report
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Not a decimal number
    #[error("invalid frequency: {0}")]
    InvalidFrequency(String),

    /// Number outside both the AM and FM ranges
    #[error("invalid freq range: {0}")]
    OutOfRange(String),

    /// Rounding to the band step moved the value off the band table
    #[error("frequency {input} rounds to {rounded}, outside the band")]
    RoundedOutOfRange { input: String, rounded: u32 },

    /// A raw report byte that is not one or two hex digits
    #[error("invalid report byte: {0}")]
    InvalidReportByte(String),

    /// Raw report empty or longer than the device accepts
    #[error("report must be 1 to 64 bytes, got {0}")]
    ReportLength(usize),
}
