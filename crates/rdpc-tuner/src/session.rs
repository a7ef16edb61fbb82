//! Per-device read/write operations

use rdpc_protocol::{decode, format_packet, AudioMode, Band, Command, SeekDirection, TunerState};
use rdpc_usb::{DeviceInfo, Transport, TransportError};
use tracing::{debug, error, trace, warn};

use crate::config::TunerConfig;
use crate::device::Device;

/// Exclusive access to one device of a [`DeviceList`](crate::DeviceList)
///
/// Command methods only write; the device's reading changes solely
/// through [`Session::refresh`].
pub struct Session<'a, T: Transport> {
    transport: &'a T,
    config: &'a TunerConfig,
    device: &'a mut Device<T::Handle>,
    index: usize,
}

impl<'a, T: Transport> Session<'a, T> {
    pub(crate) fn new(
        transport: &'a T,
        config: &'a TunerConfig,
        device: &'a mut Device<T::Handle>,
        index: usize,
    ) -> Self {
        Self {
            transport,
            config,
            device,
            index,
        }
    }

    /// Position of the device in its list
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn info(&self) -> &DeviceInfo {
        &self.device.info
    }

    pub fn config(&self) -> &TunerConfig {
        self.config
    }

    /// Latest reading
    pub fn state(&self) -> TunerState {
        self.device.current
    }

    /// Reading before the latest one
    pub fn previous_state(&self) -> TunerState {
        self.device.previous
    }

    pub fn is_open(&self) -> bool {
        self.device.handle.is_some()
    }

    /// Cached handle, opening the device on first use
    fn handle(&mut self) -> Result<&mut T::Handle, TransportError> {
        let handle = match self.device.handle.take() {
            Some(handle) => handle,
            None => {
                let handle = self.transport.open(&self.device.info)?;
                debug!(
                    "Opened device {} ({})",
                    self.index,
                    self.device.info.display_name()
                );
                handle
            }
        };
        Ok(self.device.handle.insert(handle))
    }

    /// Open the device now instead of on first use
    pub fn open(&mut self) -> Result<(), TransportError> {
        self.handle().map(|_| ())
    }

    /// Close the cached handle; a later operation reopens it
    pub fn close(&mut self) {
        if let Some(handle) = self.device.handle.take() {
            self.transport.close(handle);
            debug!("Closed device {}", self.index);
        }
    }

    /// Read and decode one state packet
    ///
    /// Packets with anomalies are logged and still stored. On a transport
    /// failure the stored reading is left untouched.
    pub fn refresh(&mut self) -> Result<(), TransportError> {
        let transport = self.transport;
        let timeout = self.config.io_timeout;
        let raw = transport.read_state_packet(self.handle()?, timeout)?;
        if raw.is_empty() {
            return Err(TransportError::NoData);
        }

        let decoded = decode(&raw);
        if decoded.is_anomalous() {
            let reasons: Vec<_> = decoded.anomalies.iter().map(ToString::to_string).collect();
            warn!(
                "Device {}: unexpected state packet ({}): {}",
                self.index,
                reasons.join(", "),
                format_packet(&raw)
            );
        } else {
            trace!("Device {}: {}", self.index, format_packet(&raw));
        }

        self.device.previous = std::mem::replace(&mut self.device.current, decoded.state);
        Ok(())
    }

    /// Write one raw feature report; the first byte is the report id
    ///
    /// The attempted bytes are logged on failure and the error is returned
    /// as is.
    pub fn send_command(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        let index = self.index;
        let transport = self.transport;
        let timeout = self.config.io_timeout;
        let result = self
            .handle()
            .and_then(|handle| transport.write_feature_report(handle, bytes, timeout));
        if let Err(e) = &result {
            error!(
                "Device {}: failed to send {}: {}",
                index,
                format_packet(bytes),
                e
            );
        }
        result
    }

    fn execute(&mut self, command: Command) -> Result<(), TransportError> {
        let bytes = command
            .encode()
            .ok_or_else(|| TransportError::InvalidReport(format!("{:?}", command)))?;
        debug!("Device {}: {:?}", self.index, command);
        self.send_command(&bytes)
    }

    /// Tune to a frequency in wire units
    pub fn set_frequency(&mut self, freq: u16) -> Result<(), TransportError> {
        self.execute(Command::SetFrequency { freq })
    }

    /// Switch band; only AM and FM can be sent
    pub fn set_band(&mut self, band: Band) -> Result<(), TransportError> {
        self.execute(Command::SetBand { band })
    }

    /// Select mono or stereo
    pub fn set_audio_mode(&mut self, mode: AudioMode) -> Result<(), TransportError> {
        self.execute(Command::SetAudioMode { mode })
    }

    pub fn set_mute(&mut self, muted: bool) -> Result<(), TransportError> {
        self.execute(Command::SetMute { muted })
    }

    /// Start a device-side seek; completion is observed by polling
    pub fn seek(&mut self, direction: SeekDirection) -> Result<(), TransportError> {
        self.execute(Command::Seek { direction })
    }
}
