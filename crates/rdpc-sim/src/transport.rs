//! In-memory transport backed by virtual tuners

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use rdpc_usb::{usb_ids, DeviceInfo, Transport, TransportError};
use tracing::debug;

use crate::tuner::VirtualTuner;

/// Shared reference to a virtual tuner
pub type SharedTuner = Arc<Mutex<VirtualTuner>>;

const PATH_PREFIX: &str = "sim:";

/// Open handle to a virtual tuner
#[derive(Debug)]
pub struct SimHandle {
    tuner: SharedTuner,
}

/// Transport exposing a fixed set of virtual tuners as RDPC-101 devices
#[derive(Debug, Clone, Default)]
pub struct SimTransport {
    tuners: Vec<SharedTuner>,
}

fn lock(tuner: &SharedTuner) -> MutexGuard<'_, VirtualTuner> {
    tuner.lock().unwrap_or_else(PoisonError::into_inner)
}

impl SimTransport {
    /// Create a transport exposing the given tuners, in order
    pub fn new(tuners: Vec<VirtualTuner>) -> Self {
        Self {
            tuners: tuners
                .into_iter()
                .map(|t| Arc::new(Mutex::new(t)))
                .collect(),
        }
    }

    /// Create a transport with a single default tuner
    pub fn single() -> Self {
        Self::new(vec![VirtualTuner::new("0001")])
    }

    /// Shared access to a tuner for inspection and fault injection
    pub fn tuner(&self, index: usize) -> Option<SharedTuner> {
        self.tuners.get(index).cloned()
    }

    /// Run a closure against a tuner
    pub fn with_tuner<R>(
        &self,
        index: usize,
        f: impl FnOnce(&mut VirtualTuner) -> R,
    ) -> Option<R> {
        self.tuners.get(index).map(|t| f(&mut lock(t)))
    }

    fn tuner_for(&self, info: &DeviceInfo) -> Result<&SharedTuner, TransportError> {
        info.path
            .strip_prefix(PATH_PREFIX)
            .and_then(|i| i.parse::<usize>().ok())
            .and_then(|i| self.tuners.get(i))
            .ok_or_else(|| TransportError::NotFound(info.path.clone()))
    }
}

impl Transport for SimTransport {
    type Handle = SimHandle;

    fn name(&self) -> &'static str {
        "sim"
    }

    fn enumerate(
        &self,
        vendor_id: u16,
        product_id: u16,
    ) -> Result<Vec<DeviceInfo>, TransportError> {
        if !usb_ids::is_supported_tuner(vendor_id, product_id) {
            return Ok(Vec::new());
        }
        Ok(self
            .tuners
            .iter()
            .enumerate()
            .map(|(i, t)| DeviceInfo {
                path: format!("{}{}", PATH_PREFIX, i),
                vendor_id,
                product_id,
                serial_number: Some(lock(t).serial_number().to_string()),
                product: Some("Virtual RDPC-101".to_string()),
            })
            .collect())
    }

    fn open(&self, info: &DeviceInfo) -> Result<SimHandle, TransportError> {
        let tuner = self.tuner_for(info)?;
        lock(tuner).record_open()?;
        debug!("Opened virtual tuner {}", info.path);
        Ok(SimHandle {
            tuner: Arc::clone(tuner),
        })
    }

    fn read_state_packet(
        &self,
        handle: &mut SimHandle,
        _timeout: Duration,
    ) -> Result<Vec<u8>, TransportError> {
        lock(&handle.tuner).next_packet()
    }

    fn write_feature_report(
        &self,
        handle: &mut SimHandle,
        data: &[u8],
        _timeout: Duration,
    ) -> Result<(), TransportError> {
        lock(&handle.tuner).handle_report(data)
    }

    fn close(&self, handle: SimHandle) {
        lock(&handle.tuner).record_close();
    }
}
