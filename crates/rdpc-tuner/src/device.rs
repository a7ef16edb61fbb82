//! Enumerated devices and their lifetime
//!
//! A [`DeviceList`] is built once from the transport's enumeration and owns
//! every device for the rest of the program. Handles are opened lazily by
//! the first [`Session`] operation that needs one and are closed exactly
//! once, either explicitly or when the list is dropped.

use rdpc_protocol::TunerState;
use rdpc_usb::{DeviceInfo, Transport};
use tracing::{debug, info};

use crate::config::TunerConfig;
use crate::error::TunerError;
use crate::session::Session;

/// One tuner: its identity, cached handle and latest readings
#[derive(Debug)]
pub struct Device<H> {
    pub(crate) info: DeviceInfo,
    pub(crate) handle: Option<H>,
    pub(crate) previous: TunerState,
    pub(crate) current: TunerState,
}

impl<H> Device<H> {
    fn new(info: DeviceInfo) -> Self {
        Self {
            info,
            handle: None,
            previous: TunerState::default(),
            current: TunerState::default(),
        }
    }

    pub fn info(&self) -> &DeviceInfo {
        &self.info
    }

    /// Latest reading
    pub fn state(&self) -> TunerState {
        self.current
    }

    /// Reading before the latest one
    pub fn previous_state(&self) -> TunerState {
        self.previous
    }

    pub fn is_open(&self) -> bool {
        self.handle.is_some()
    }
}

/// All tuners found at startup, indexable by position
pub struct DeviceList<T: Transport> {
    transport: T,
    config: TunerConfig,
    devices: Vec<Device<T::Handle>>,
}

impl<T: Transport> DeviceList<T> {
    /// Enumerate tuners matching the configured vendor/product ids
    ///
    /// An empty bus is not an error here; callers decide what to do with
    /// an empty list.
    pub fn enumerate(transport: T, config: TunerConfig) -> Result<Self, TunerError> {
        let devices: Vec<_> = transport
            .enumerate(config.vendor_id, config.product_id)?
            .into_iter()
            .map(Device::new)
            .collect();
        info!(
            "Enumerated {} tuner(s) via {}",
            devices.len(),
            transport.name()
        );
        Ok(Self {
            transport,
            config,
            devices,
        })
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    pub fn config(&self) -> &TunerConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn device(&self, index: usize) -> Option<&Device<T::Handle>> {
        self.devices.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Device<T::Handle>> {
        self.devices.iter()
    }

    /// Start working with the device at `index`
    pub fn session(&mut self, index: usize) -> Result<Session<'_, T>, TunerError> {
        let count = self.devices.len();
        let device = self
            .devices
            .get_mut(index)
            .ok_or(TunerError::DeviceNotFound { index, count })?;
        Ok(Session::new(&self.transport, &self.config, device, index))
    }

    /// Close every open handle
    ///
    /// Devices that were never opened are skipped, and a closed device is
    /// reopened by its next operation.
    pub fn close_all(&mut self) {
        for (index, device) in self.devices.iter_mut().enumerate() {
            if let Some(handle) = device.handle.take() {
                self.transport.close(handle);
                debug!("Closed device {} ({})", index, device.info.display_name());
            }
        }
    }
}

impl<T: Transport> Drop for DeviceList<T> {
    fn drop(&mut self) {
        self.close_all();
    }
}
