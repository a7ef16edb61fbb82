//! Progress callbacks for settling operations

use rdpc_protocol::TunerState;

/// Receives readings while a seek, scan step or tune settles
pub trait SeekObserver {
    /// Called before every poll with the reading in hand
    fn on_poll(&mut self, state: &TunerState);

    /// Called once the operation stops, whether or not polling succeeded
    fn on_settled(&mut self, state: &TunerState);
}

/// Observer that ignores everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl SeekObserver for NullObserver {
    fn on_poll(&mut self, _state: &TunerState) {}

    fn on_settled(&mut self, _state: &TunerState) {}
}

impl<O: SeekObserver + ?Sized> SeekObserver for &mut O {
    fn on_poll(&mut self, state: &TunerState) {
        (**self).on_poll(state);
    }

    fn on_settled(&mut self, state: &TunerState) {
        (**self).on_settled(state);
    }
}
