//! Raw USB backend built on libusb
//!
//! Talks to the tuner's HID interface directly: state packets arrive as
//! interrupt transfers on endpoint 1 IN, commands go out as class
//! `SET_REPORT` control transfers. On Linux the `usbhid` driver normally
//! owns the interface, so it is detached on open and re-attached on close.

use std::time::Duration;

use rusb::{
    Context, Device, DeviceDescriptor, DeviceHandle, Direction, Recipient, RequestType,
    UsbContext,
};
use tracing::{debug, info, trace, warn};

use crate::error::TransportError;
use crate::transport::{timeout_ms, DeviceInfo, Transport};

/// HID interface carrying both directions
const HID_INTERFACE: u8 = 0;
/// Interrupt IN endpoint delivering state packets
const STATE_ENDPOINT: u8 = 0x81;
/// HID class request: SET_REPORT
const HID_SET_REPORT: u8 = 0x09;
/// HID report type: feature
const HID_REPORT_TYPE_FEATURE: u16 = 0x03;
/// Largest interrupt packet on a full-speed endpoint
const READ_BUFFER_SIZE: usize = 64;

/// libusb transport
pub struct LibusbTransport {
    context: Context,
}

/// Open libusb device with its claimed HID interface
pub struct LibusbHandle {
    handle: DeviceHandle<Context>,
    path: String,
    reattach_kernel_driver: bool,
}

impl LibusbTransport {
    /// Create a transport with its own libusb context
    pub fn new() -> Result<Self, TransportError> {
        let context =
            Context::new().map_err(|e| TransportError::EnumerationFailed(e.to_string()))?;
        Ok(Self { context })
    }

    fn find_device(&self, info: &DeviceInfo) -> Result<Device<Context>, TransportError> {
        let devices = self
            .context
            .devices()
            .map_err(|e| TransportError::EnumerationFailed(e.to_string()))?;
        devices
            .iter()
            .find(|d| device_path(d) == info.path)
            .ok_or_else(|| TransportError::NotFound(info.path.clone()))
    }
}

/// Bus/address locator, e.g. `001:004`
fn device_path(device: &Device<Context>) -> String {
    format!("{:03}:{:03}", device.bus_number(), device.address())
}

/// Read serial and product strings; needs a short-lived handle
fn read_strings(
    device: &Device<Context>,
    desc: &DeviceDescriptor,
) -> (Option<String>, Option<String>) {
    match device.open() {
        Ok(handle) => (
            handle.read_serial_number_string_ascii(desc).ok(),
            handle.read_product_string_ascii(desc).ok(),
        ),
        Err(e) => {
            debug!("Cannot read strings of {}: {}", device_path(device), e);
            (None, None)
        }
    }
}

fn map_error(e: rusb::Error, timeout: Duration) -> TransportError {
    match e {
        rusb::Error::Timeout => TransportError::Timeout(timeout_ms(timeout)),
        rusb::Error::NoDevice => TransportError::Disconnected,
        rusb::Error::NotFound => TransportError::NotFound(e.to_string()),
        other => TransportError::Io(other.to_string()),
    }
}

impl Transport for LibusbTransport {
    type Handle = LibusbHandle;

    fn name(&self) -> &'static str {
        "libusb"
    }

    fn enumerate(
        &self,
        vendor_id: u16,
        product_id: u16,
    ) -> Result<Vec<DeviceInfo>, TransportError> {
        let devices = self
            .context
            .devices()
            .map_err(|e| TransportError::EnumerationFailed(e.to_string()))?;

        let mut result = Vec::new();
        for device in devices.iter() {
            let desc = match device.device_descriptor() {
                Ok(desc) => desc,
                Err(e) => {
                    trace!("Skipping {}: {}", device_path(&device), e);
                    continue;
                }
            };
            if desc.vendor_id() != vendor_id || desc.product_id() != product_id {
                continue;
            }
            let (serial_number, product) = read_strings(&device, &desc);
            result.push(DeviceInfo {
                path: device_path(&device),
                vendor_id,
                product_id,
                serial_number,
                product,
            });
        }

        info!("Found {} tuner(s) via libusb", result.len());
        Ok(result)
    }

    fn open(&self, info: &DeviceInfo) -> Result<LibusbHandle, TransportError> {
        let device = self.find_device(info)?;
        let mut handle = device.open().map_err(|e| TransportError::OpenFailed {
            device: info.path.clone(),
            reason: e.to_string(),
        })?;

        let claim_failed = |reason: String| TransportError::ClaimFailed {
            device: info.path.clone(),
            interface: HID_INTERFACE,
            reason,
        };

        let mut reattach_kernel_driver = false;
        match handle.kernel_driver_active(HID_INTERFACE) {
            Ok(true) => {
                debug!("Detaching kernel driver from {}", info.path);
                handle
                    .detach_kernel_driver(HID_INTERFACE)
                    .map_err(|e| claim_failed(e.to_string()))?;
                reattach_kernel_driver = true;
            }
            Ok(false) => {}
            // Platforms without kernel drivers report NotSupported
            Err(rusb::Error::NotSupported) => {}
            Err(e) => warn!("Cannot query kernel driver on {}: {}", info.path, e),
        }

        if let Err(e) = handle.claim_interface(HID_INTERFACE) {
            if reattach_kernel_driver {
                if let Err(e) = handle.attach_kernel_driver(HID_INTERFACE) {
                    warn!("Failed to re-attach kernel driver on {}: {}", info.path, e);
                }
            }
            return Err(claim_failed(e.to_string()));
        }

        info!("Opened tuner {} via libusb", info.display_name());
        Ok(LibusbHandle {
            handle,
            path: info.path.clone(),
            reattach_kernel_driver,
        })
    }

    fn read_state_packet(
        &self,
        handle: &mut LibusbHandle,
        timeout: Duration,
    ) -> Result<Vec<u8>, TransportError> {
        let mut buf = [0u8; READ_BUFFER_SIZE];
        let n = handle
            .handle
            .read_interrupt(STATE_ENDPOINT, &mut buf, timeout)
            .map_err(|e| map_error(e, timeout))?;
        if n == 0 {
            return Err(TransportError::NoData);
        }
        trace!("{} state packet: {:02X?}", handle.path, &buf[..n]);
        Ok(buf[..n].to_vec())
    }

    fn write_feature_report(
        &self,
        handle: &mut LibusbHandle,
        data: &[u8],
        timeout: Duration,
    ) -> Result<(), TransportError> {
        let report_id = data.first().copied().unwrap_or(0);
        let request_type = rusb::request_type(Direction::Out, RequestType::Class, Recipient::Interface);
        let value = HID_REPORT_TYPE_FEATURE << 8 | u16::from(report_id);

        let n = handle
            .handle
            .write_control(
                request_type,
                HID_SET_REPORT,
                value,
                u16::from(HID_INTERFACE),
                data,
                timeout,
            )
            .map_err(|e| map_error(e, timeout))?;
        if n != data.len() {
            return Err(TransportError::ShortTransfer {
                expected: data.len(),
                actual: n,
            });
        }
        trace!("{} feature report: {:02X?}", handle.path, data);
        Ok(())
    }

    fn close(&self, mut handle: LibusbHandle) {
        if let Err(e) = handle.handle.release_interface(HID_INTERFACE) {
            warn!("Failed to release interface on {}: {}", handle.path, e);
        }
        if handle.reattach_kernel_driver {
            if let Err(e) = handle.handle.attach_kernel_driver(HID_INTERFACE) {
                warn!("Failed to re-attach kernel driver on {}: {}", handle.path, e);
            }
        }
        debug!("Closed {}", handle.path);
    }
}
