//! RDPC-101 Simulation Library
//!
//! This crate provides a simulation layer for exercising tuner control
//! without hardware. It includes:
//!
//! - **VirtualTuner**: reacts to command feature reports and produces
//!   protocol-accurate state packets, including the seeking flag
//! - **SimTransport**: a [`rdpc_usb::Transport`] over a set of virtual
//!   tuners, with fault injection and open/close accounting
//!
//! # Example
//!
//! ```rust
//! use rdpc_sim::{SimTransport, VirtualTuner};
//! use rdpc_usb::{usb_ids::RDPC_101, Transport};
//!
//! let transport = SimTransport::new(vec![VirtualTuner::new("0001")]);
//! let devices = transport.enumerate(RDPC_101.vid, RDPC_101.pid).unwrap();
//! assert_eq!(devices.len(), 1);
//! ```

pub mod transport;
pub mod tuner;

pub use transport::{SharedTuner, SimHandle, SimTransport};
pub use tuner::{Station, VirtualTuner, VirtualTunerConfig};
