//! Seek, scan and tune sequences
//!
//! A single seek is the sequence
//!
//! ```text
//! mute -> seek(direction) -> poll until not seeking -> unmute -> report
//! ```
//!
//! Mute and unmute are best effort; only the seek command itself is fatal.
//! Each sequence runs inside a deferred cancellation section, so a
//! cancellation request never leaves the device muted or mid-seek. A scan
//! repeats seek-up cycles across a band and returns the device to where it
//! started.

use std::thread;

use rdpc_protocol::{
    band_index, format_packet, freq_max, freq_min, AudioMode, Band, BandSlot, SeekDirection,
    TargetFrequency, TunerState,
};
use rdpc_usb::{Transport, TransportError};
use tracing::{debug, info, warn};

use crate::cancel::CancelToken;
use crate::error::TunerError;
use crate::observer::SeekObserver;
use crate::session::Session;

/// Poll until the device stops reporting the seeking flag
///
/// Sleeps before every read. Stops at the first failed read without
/// retrying.
fn poll_until_settled<T, O>(
    session: &mut Session<'_, T>,
    observer: &mut O,
) -> Result<(), TransportError>
where
    T: Transport,
    O: SeekObserver + ?Sized,
{
    let interval = session.config().poll_interval;
    loop {
        observer.on_poll(&session.state());
        thread::sleep(interval);
        session.refresh()?;
        if !session.state().seeking() {
            return Ok(());
        }
    }
}

fn set_mute_best_effort<T: Transport>(session: &mut Session<'_, T>, muted: bool) {
    if let Err(e) = session.set_mute(muted) {
        warn!(
            "Device {}: cannot {}: {}",
            session.index(),
            if muted { "mute" } else { "unmute" },
            e
        );
    }
}

/// Run one mute/seek/poll/unmute cycle
///
/// The caller is responsible for deferring cancellation around it. The
/// observer sees the last reading on every exit, even when the seek command
/// or a poll failed.
pub fn seek_once<T, O>(
    session: &mut Session<'_, T>,
    direction: SeekDirection,
    observer: &mut O,
) -> Result<(), TunerError>
where
    T: Transport,
    O: SeekObserver + ?Sized,
{
    set_mute_best_effort(session, true);
    if let Err(source) = session.seek(direction) {
        set_mute_best_effort(session, false);
        observer.on_settled(&session.state());
        return Err(TunerError::Seek { direction, source });
    }

    let polled = poll_until_settled(session, observer);
    set_mute_best_effort(session, false);
    observer.on_settled(&session.state());

    if let Err(e) = &polled {
        warn!("Device {}: seek failed: {}", session.index(), e);
    }
    Ok(polled?)
}

/// Seek once from the current frequency
///
/// The current reading must fall into a known band.
pub fn seek<T, O>(
    session: &mut Session<'_, T>,
    direction: SeekDirection,
    cancel: &CancelToken,
    observer: &mut O,
) -> Result<(), TunerError>
where
    T: Transport,
    O: SeekObserver + ?Sized,
{
    cancel.checkpoint()?;
    let freq = session.state().frequency();
    if band_index(freq).is_none() {
        return Err(TunerError::UnknownBand(freq));
    }

    let _section = cancel.defer();
    seek_once(session, direction, observer)
}

/// Scan range for a band: the slot's minimum and maximum
fn scan_range(band: Band) -> Result<(u16, u16), TunerError> {
    BandSlot::for_band(band)
        .and_then(|slot| Some((freq_min(slot)?, freq_max(slot)?)))
        .ok_or(TunerError::InvalidBand(band))
}

/// Return to the band and frequency the device had before a scan
fn restore<T: Transport>(
    session: &mut Session<'_, T>,
    scanned: Band,
    original: &TunerState,
) -> Result<(), TunerError> {
    let freq = original.frequency();
    let band = original.band();
    if band != scanned && band.is_tunable() {
        session
            .set_band(band)
            .map_err(|source| TunerError::Restore { freq, source })?;
    }
    session
        .set_frequency(freq)
        .map_err(|source| TunerError::Restore { freq, source })
}

/// Seek up across a whole band
///
/// Tunes to the band minimum and repeats seek-up cycles until the device
/// reaches the band maximum or stops advancing. Returns the reading each
/// cycle settled on. Afterwards the original band and frequency are
/// restored, also after a failed cycle. A cancellation request ends the
/// scan between cycles without restoring.
pub fn scan<T, O>(
    session: &mut Session<'_, T>,
    band: Band,
    cancel: &CancelToken,
    observer: &mut O,
) -> Result<Vec<TunerState>, TunerError>
where
    T: Transport,
    O: SeekObserver + ?Sized,
{
    cancel.checkpoint()?;
    let (min, max) = scan_range(band)?;
    let original = session.state();

    if original.band() != band {
        session
            .set_band(band)
            .map_err(|source| TunerError::SetBand { band, source })?;
    }
    session
        .set_frequency(min)
        .map_err(|source| TunerError::SetFrequency { freq: min, source })?;
    info!("Device {}: scanning {} from {} to {}", session.index(), band, min, max);

    let mut readings = Vec::new();
    let mut position = min;
    let outcome = loop {
        if position >= max {
            break Ok(());
        }
        cancel.checkpoint()?;

        let cycle = {
            let _section = cancel.defer();
            seek_once(session, SeekDirection::Up, observer)
        };
        if let Err(e) = cycle {
            break Err(e);
        }

        let reading = session.state();
        readings.push(reading);
        if reading.frequency() <= position {
            debug!(
                "Device {}: seek did not advance past {}",
                session.index(),
                position
            );
            break Ok(());
        }
        position = reading.frequency();
    };

    let restored = restore(session, band, &original);
    match outcome {
        Ok(()) => restored.map(|()| readings),
        Err(e) => {
            if let Err(restore_err) = restored {
                warn!("Device {}: {}", session.index(), restore_err);
            }
            Err(e)
        }
    }
}

/// Tune directly to a target frequency and wait for it to settle
///
/// Band and frequency are only sent when they differ from the current
/// reading. The device is not muted. Targets outside AM and FM are refused
/// before anything is sent.
pub fn tune<T, O>(
    session: &mut Session<'_, T>,
    target: &TargetFrequency,
    cancel: &CancelToken,
    observer: &mut O,
) -> Result<(), TunerError>
where
    T: Transport,
    O: SeekObserver + ?Sized,
{
    cancel.checkpoint()?;
    if !target.band.is_tunable() {
        return Err(TunerError::InvalidBand(target.band));
    }
    let current = session.state();

    if target.band != current.band() {
        session.set_band(target.band).map_err(|source| TunerError::SetBand {
            band: target.band,
            source,
        })?;
    }
    if target.freq != current.frequency() {
        session
            .set_frequency(target.freq)
            .map_err(|source| TunerError::SetFrequency {
                freq: target.freq,
                source,
            })?;
    }

    let _section = cancel.defer();
    let polled = poll_until_settled(session, observer);
    observer.on_settled(&session.state());
    Ok(polled?)
}

/// Write a raw feature report and read the state back
///
/// The bytes go to the device unchecked; the first one is the report id.
/// Returns the reading taken afterwards.
pub fn send_report<T: Transport>(
    session: &mut Session<'_, T>,
    report: &[u8],
    cancel: &CancelToken,
) -> Result<TunerState, TunerError> {
    cancel.checkpoint()?;
    info!(
        "Device {}: sending report {}",
        session.index(),
        format_packet(report)
    );
    session
        .send_command(report)
        .map_err(|source| TunerError::Report {
            report: report.to_vec(),
            source,
        })?;
    session.refresh()?;
    Ok(session.state())
}

/// Select mono or stereo if the device reports something else
///
/// Returns whether a command was sent. Modes without a wire value are
/// ignored.
pub fn apply_audio_mode<T: Transport>(
    session: &mut Session<'_, T>,
    mode: AudioMode,
) -> Result<bool, TransportError> {
    if mode.code().is_none() || mode == session.state().audio_mode() {
        return Ok(false);
    }
    session.set_audio_mode(mode)?;
    Ok(true)
}
