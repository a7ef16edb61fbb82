//! Transport abstraction
//!
//! A transport knows how to find tuners on the bus, open them, read state
//! packets and write command feature reports. Handles are plain values
//! owned by the caller; the transport itself keeps no per-device state.

use std::time::Duration;

use crate::error::TransportError;

/// A tuner found during enumeration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    /// Backend specific locator used to reopen the device
    pub path: String,
    /// USB Vendor ID
    pub vendor_id: u16,
    /// USB Product ID
    pub product_id: u16,
    /// USB serial number string, if the device exposes one
    pub serial_number: Option<String>,
    /// USB product string
    pub product: Option<String>,
}

impl DeviceInfo {
    /// Identity shown to users; falls back to the bus path
    pub fn display_name(&self) -> &str {
        self.serial_number.as_deref().unwrap_or(&self.path)
    }
}

/// Backend used to talk to tuners
pub trait Transport {
    /// Open device handle
    type Handle;

    /// Short backend name for logs
    fn name(&self) -> &'static str;

    /// List attached devices matching the given ids, in bus order
    fn enumerate(&self, vendor_id: u16, product_id: u16)
        -> Result<Vec<DeviceInfo>, TransportError>;

    /// Open a device and make it ready for transfers
    fn open(&self, device: &DeviceInfo) -> Result<Self::Handle, TransportError>;

    /// Blocking read of one state packet
    fn read_state_packet(
        &self,
        handle: &mut Self::Handle,
        timeout: Duration,
    ) -> Result<Vec<u8>, TransportError>;

    /// Blocking write of one feature report; `data[0]` is the report id
    fn write_feature_report(
        &self,
        handle: &mut Self::Handle,
        data: &[u8],
        timeout: Duration,
    ) -> Result<(), TransportError>;

    /// Release a handle; errors are logged, never returned
    fn close(&self, handle: Self::Handle);
}

pub(crate) fn timeout_ms(timeout: Duration) -> u64 {
    u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX)
}
