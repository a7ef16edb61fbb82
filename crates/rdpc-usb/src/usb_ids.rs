//! USB Vendor/Product IDs of supported tuners

/// USB Vendor ID / Product ID pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsbId {
    pub vid: u16,
    pub pid: u16,
}

impl UsbId {
    pub const fn new(vid: u16, pid: u16) -> Self {
        Self { vid, pid }
    }
}

/// Silicon Labs, whose USB controller the RDPC-101 is built on
pub mod silabs {
    pub const VID: u16 = 0x10C4;
}

/// SUNTAC RDPC-101 AM/FM tuner
pub const RDPC_101: UsbId = UsbId::new(silabs::VID, 0x818A);

/// Check if a VID/PID belongs to a supported tuner
pub fn is_supported_tuner(vid: u16, pid: u16) -> bool {
    UsbId::new(vid, pid) == RDPC_101
}
