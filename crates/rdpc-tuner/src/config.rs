//! Tuner configuration

use std::time::Duration;

use rdpc_usb::{usb_ids, DEFAULT_TIMEOUT};

/// Delay between state polls while the device is settling
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Settings threaded from the caller into every session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TunerConfig {
    /// USB vendor id to enumerate
    pub vendor_id: u16,
    /// USB product id to enumerate
    pub product_id: u16,
    /// Timeout for each blocking read or write
    pub io_timeout: Duration,
    /// Sleep between polls while a seek or tune settles
    pub poll_interval: Duration,
}

impl Default for TunerConfig {
    fn default() -> Self {
        Self {
            vendor_id: usb_ids::RDPC_101.vid,
            product_id: usb_ids::RDPC_101.pid,
            io_timeout: DEFAULT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl TunerConfig {
    /// Same settings with a different poll interval
    pub fn with_poll_interval(self, poll_interval: Duration) -> Self {
        Self {
            poll_interval,
            ..self
        }
    }
}
