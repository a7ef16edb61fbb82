//! Device listing

use rdpc_protocol::{audio_mode_label, format_frequency, TunerState};
use rdpc_usb::{Transport, TransportError};
use tracing::warn;

use crate::device::DeviceList;

/// One row of a device listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceSummary {
    pub index: usize,
    /// Serial number, or the transport path when the device has none
    pub serial: String,
    /// Reading after the refresh, or the previous one if it failed
    pub state: TunerState,
    /// Why the refresh failed, if it did
    pub error: Option<TransportError>,
}

impl DeviceSummary {
    pub fn frequency_label(&self) -> String {
        format_frequency(self.state.frequency())
    }

    pub fn audio_label(&self) -> &'static str {
        audio_mode_label(self.state.audio_mode())
    }
}

impl<T: Transport> DeviceList<T> {
    /// Refresh every device and summarize its reading
    ///
    /// A device that cannot be read is still listed with whatever reading
    /// it last had.
    pub fn summaries(&mut self) -> Vec<DeviceSummary> {
        (0..self.len())
            .filter_map(|index| {
                let mut session = self.session(index).ok()?;
                let error = session.refresh().err();
                if let Some(e) = &error {
                    warn!("Cannot read device {}: {}", index, e);
                }
                Some(DeviceSummary {
                    index,
                    serial: session.info().display_name().to_string(),
                    state: session.state(),
                    error,
                })
            })
            .collect()
    }
}
