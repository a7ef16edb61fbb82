//! RDPC-101 Tuner Control Library
//!
//! This crate drives RDPC-101 tuners on top of any [`rdpc_usb::Transport`]:
//!
//! - **DeviceList / Session**: enumeration, lazily opened handles that are
//!   closed exactly once, state refresh and the five device commands
//! - **Controller**: single seek, full-band scan and direct tuning, each
//!   sequenced as mute/seek/poll/unmute where applicable, plus raw feature
//!   reports for diagnosis
//! - **CancelToken**: cooperative cancellation that is deferred while a
//!   seek cycle is in flight
//!
//! # Example
//!
//! ```rust
//! use rdpc_protocol::SeekDirection;
//! use rdpc_sim::SimTransport;
//! use rdpc_tuner::{seek, CancelToken, DeviceList, NullObserver, TunerConfig};
//! use std::time::Duration;
//!
//! let config = TunerConfig::default().with_poll_interval(Duration::ZERO);
//! let mut devices = DeviceList::enumerate(SimTransport::single(), config).unwrap();
//! let mut session = devices.session(0).unwrap();
//! session.refresh().unwrap();
//!
//! seek(&mut session, SeekDirection::Up, &CancelToken::new(), &mut NullObserver).unwrap();
//! assert!(!session.state().seeking());
//! ```

pub mod cancel;
pub mod config;
pub mod controller;
pub mod device;
pub mod error;
pub mod listing;
pub mod observer;
pub mod session;

pub use cancel::{CancelToken, DeferGuard};
pub use config::{TunerConfig, DEFAULT_POLL_INTERVAL};
pub use controller::{apply_audio_mode, scan, seek, seek_once, send_report, tune};
pub use device::{Device, DeviceList};
pub use error::TunerError;
pub use listing::DeviceSummary;
pub use observer::{NullObserver, SeekObserver};
pub use session::Session;
