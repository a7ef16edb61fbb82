//! RDPC-101 USB Transport Library
//!
//! This crate finds RDPC-101 tuners on the USB bus and moves raw protocol
//! bytes to and from them. Two interchangeable backends implement the same
//! [`Transport`] trait:
//!
//! - **libusb** (feature `libusb`, default): raw interrupt/control
//!   transfers, detaching the kernel HID driver when necessary
//! - **hidapi** (feature `hidapi`): the platform HID stack
//!
//! # Example
//!
//! ```rust,no_run
//! # #[cfg(feature = "libusb")]
//! # fn main() -> Result<(), rdpc_usb::TransportError> {
//! use rdpc_usb::{usb_ids, LibusbTransport, Transport};
//!
//! let transport = LibusbTransport::new()?;
//! for device in transport.enumerate(usb_ids::RDPC_101.vid, usb_ids::RDPC_101.pid)? {
//!     println!("Found tuner: {}", device.display_name());
//! }
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "libusb"))]
//! # fn main() {}
//! ```

pub mod error;
#[cfg(feature = "hidapi")]
pub mod hid;
#[cfg(feature = "libusb")]
pub mod libusb;
pub mod transport;
pub mod usb_ids;

use std::time::Duration;

pub use error::TransportError;
#[cfg(feature = "hidapi")]
pub use hid::HidapiTransport;
#[cfg(feature = "libusb")]
pub use libusb::{LibusbHandle, LibusbTransport};
pub use transport::{DeviceInfo, Transport};

/// Timeout for request/response style transfers
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(3000);
