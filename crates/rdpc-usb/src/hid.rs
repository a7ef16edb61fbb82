//! HID API backend
//!
//! Uses the platform HID stack through hidapi, so no driver detaching is
//! needed. The device list is captured when the transport is created.

use std::collections::HashSet;
use std::ffi::CString;
use std::time::Duration;

use hidapi::{HidApi, HidDevice};
use tracing::{info, trace};

use crate::error::TransportError;
use crate::transport::{timeout_ms, DeviceInfo, Transport};

/// Read buffer; larger than any report the tuner sends
const READ_BUFFER_SIZE: usize = 64;

/// hidapi transport
pub struct HidapiTransport {
    api: HidApi,
}

impl HidapiTransport {
    /// Initialise hidapi and snapshot attached HID devices
    pub fn new() -> Result<Self, TransportError> {
        let api = HidApi::new().map_err(|e| TransportError::EnumerationFailed(e.to_string()))?;
        Ok(Self { api })
    }
}

fn hid_error(e: hidapi::HidError) -> TransportError {
    TransportError::Io(e.to_string())
}

impl Transport for HidapiTransport {
    type Handle = HidDevice;

    fn name(&self) -> &'static str {
        "hidapi"
    }

    fn enumerate(
        &self,
        vendor_id: u16,
        product_id: u16,
    ) -> Result<Vec<DeviceInfo>, TransportError> {
        let mut seen = HashSet::new();
        let result: Vec<_> = self
            .api
            .device_list()
            .filter(|d| d.vendor_id() == vendor_id && d.product_id() == product_id)
            .map(|d| DeviceInfo {
                path: d.path().to_string_lossy().into_owned(),
                vendor_id,
                product_id,
                serial_number: d.serial_number().map(str::to_owned),
                product: d.product_string().map(str::to_owned),
            })
            // Some platforms list one entry per top-level collection
            .filter(|d| seen.insert(d.path.clone()))
            .collect();

        info!("Found {} tuner(s) via hidapi", result.len());
        Ok(result)
    }

    fn open(&self, info: &DeviceInfo) -> Result<HidDevice, TransportError> {
        let path = CString::new(info.path.as_str()).map_err(|e| TransportError::OpenFailed {
            device: info.path.clone(),
            reason: e.to_string(),
        })?;
        let device = self
            .api
            .open_path(&path)
            .map_err(|e| TransportError::OpenFailed {
                device: info.path.clone(),
                reason: e.to_string(),
            })?;
        info!("Opened tuner {} via hidapi", info.display_name());
        Ok(device)
    }

    fn read_state_packet(
        &self,
        handle: &mut HidDevice,
        timeout: Duration,
    ) -> Result<Vec<u8>, TransportError> {
        let mut buf = [0u8; READ_BUFFER_SIZE];
        let millis = i32::try_from(timeout.as_millis()).unwrap_or(i32::MAX);
        let n = handle.read_timeout(&mut buf, millis).map_err(hid_error)?;
        if n == 0 {
            // hidapi reports an expired timeout as a zero-length read
            return Err(TransportError::Timeout(timeout_ms(timeout)));
        }
        trace!("state packet: {:02X?}", &buf[..n]);
        Ok(buf[..n].to_vec())
    }

    fn write_feature_report(
        &self,
        handle: &mut HidDevice,
        data: &[u8],
        _timeout: Duration,
    ) -> Result<(), TransportError> {
        handle.send_feature_report(data).map_err(hid_error)?;
        trace!("feature report: {:02X?}", data);
        Ok(())
    }

    fn close(&self, handle: HidDevice) {
        drop(handle);
    }
}
