//! Parsing user supplied frequencies
//!
//! Users type AM frequencies in kHz (`900`) and FM frequencies in MHz
//! (`86.0`, `86.05`). The integer part decides which: if it reads as an FM
//! frequency in MHz it is FM, otherwise it must be an AM frequency in kHz.
//! Unless expert mode is on, the value is rounded to the nearest multiple
//! of the band's step.

use crate::band::{classify, step, Band};
use crate::error::ParseError;
use crate::state::AudioMode;

/// Wire units per MHz on the FM band
const FM_UNITS_PER_MHZ: u32 = 100;

/// A parsed tuning target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetFrequency {
    /// Frequency in wire units
    pub freq: u16,
    /// Band the frequency belongs to; `Error` for an expert value off the
    /// band table
    pub band: Band,
    /// Audio mode to select when the caller did not ask for one;
    /// `Unspecified` off the band table
    pub audio_mode: AudioMode,
}

/// Round `value` to the nearest multiple of `step`, halves rounding up
pub fn round_to_step(value: u32, step: u16) -> u32 {
    let step = u32::from(step);
    if step == 0 {
        return value;
    }
    (value + step / 2) / step * step
}

fn classify_u32(value: u32) -> Band {
    u16::try_from(value).map(classify).unwrap_or(Band::Error)
}

/// Parse a frequency typed by the user
pub fn parse_frequency(text: &str, expert: bool) -> Result<TargetFrequency, ParseError> {
    let text = text.trim();
    let invalid = || ParseError::InvalidFrequency(text.to_string());

    let (whole, frac) = text.split_once('.').unwrap_or((text, ""));
    if whole.is_empty()
        || !whole.bytes().all(|b| b.is_ascii_digit())
        || !frac.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(invalid());
    }
    let whole: u32 = whole.parse().map_err(|_| invalid())?;

    let fm_base = whole.checked_mul(FM_UNITS_PER_MHZ).unwrap_or(u32::MAX);
    let (band, raw) = if classify_u32(fm_base) == Band::Fm {
        // Hundredths only; further digits are dropped
        let hundredths: String = frac.chars().chain("00".chars()).take(2).collect();
        let hundredths: u32 = hundredths.parse().map_err(|_| invalid())?;
        (Band::Fm, fm_base + hundredths)
    } else if classify_u32(whole) == Band::Am {
        (Band::Am, whole)
    } else {
        return Err(ParseError::OutOfRange(text.to_string()));
    };

    let value = if expert {
        raw
    } else {
        // The typed value picks the step when it lies on the table; values
        // in the gap between FM regimes fall back to the integer part's step
        let base = if band == Band::Fm { fm_base } else { whole };
        let step = u16::try_from(raw)
            .ok()
            .and_then(step)
            .or_else(|| u16::try_from(base).ok().and_then(step))
            .unwrap_or(1);
        let rounded = round_to_step(raw, step);
        if classify_u32(rounded) != band {
            return Err(ParseError::RoundedOutOfRange {
                input: text.to_string(),
                rounded,
            });
        }
        rounded
    };

    let freq = u16::try_from(value).map_err(|_| ParseError::OutOfRange(text.to_string()))?;
    // Expert values are not forced onto the table; they keep their own class
    let band = classify(freq);
    Ok(TargetFrequency {
        freq,
        band,
        audio_mode: AudioMode::default_for(band).unwrap_or_default(),
    })
}
