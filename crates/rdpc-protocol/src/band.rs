//! Frequency/band classification
//!
//! The tuner reports and accepts frequencies as a 16-bit integer whose unit
//! depends on the band: whole kHz for AM and 10 kHz (hundredths of a MHz)
//! for FM. The two unit systems do not overlap, so a single table of
//! inclusive ranges is enough to tell them apart.
//!
//! ```text
//! AM    522 ..  1629   step 9   (522 kHz .. 1629 kHz)
//! FM   7600 ..  9000   step 10  (76.00 MHz .. 90.00 MHz)
//! FM   9005 .. 10800   step 5   (90.05 MHz .. 108.00 MHz)
//! ```

/// Coarse tuning category of a frequency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Band {
    /// Amplitude modulation broadcast band
    Am,
    /// Frequency modulation broadcast band
    Fm,
    /// Device has not reported a frequency yet (0x0000 or 0xFFFF)
    Unspecified,
    /// Band code the device sent but we do not recognise
    Unknown,
    /// Frequency outside every known range
    Error,
}

impl Band {
    /// Returns a human-readable name for the band
    pub fn name(&self) -> &'static str {
        match self {
            Band::Am => "AM",
            Band::Fm => "FM",
            Band::Unspecified => "unspecified",
            Band::Unknown => "unknown",
            Band::Error => "error",
        }
    }

    /// Wire code used by the set-band command
    pub fn code(&self) -> Option<u8> {
        match self {
            Band::Am => Some(0x80),
            Band::Fm => Some(0x02),
            _ => None,
        }
    }

    /// Returns true for bands the device can be switched to
    pub fn is_tunable(&self) -> bool {
        matches!(self, Band::Am | Band::Fm)
    }
}

impl std::fmt::Display for Band {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One row of the band table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BandDescriptor {
    pub band: Band,
    pub min: u16,
    pub max: u16,
    pub step: u16,
}

impl BandDescriptor {
    const fn new(band: Band, min: u16, max: u16, step: u16) -> Self {
        Self {
            band,
            min,
            max,
            step,
        }
    }

    /// Inclusive range membership
    pub fn contains(&self, freq: u16) -> bool {
        self.min <= freq && freq <= self.max
    }
}

/// Band table, scanned in order; first match wins
pub const BAND_TABLE: [BandDescriptor; 3] = [
    BandDescriptor::new(Band::Am, 522, 1629, 9),
    BandDescriptor::new(Band::Fm, 7600, 9000, 10),
    BandDescriptor::new(Band::Fm, 9005, 10800, 5),
];

/// Sentinel frequencies reported before the tuner has locked on anything
const UNSPECIFIED_FREQS: [u16; 2] = [0x0000, 0xFFFF];

/// Named slots used to look up a band's limits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BandSlot {
    Am,
    Fm,
    /// Reserved; the device has no TV band
    Tv,
}

impl BandSlot {
    /// Slot covering a tunable band
    pub fn for_band(band: Band) -> Option<BandSlot> {
        match band {
            Band::Am => Some(BandSlot::Am),
            Band::Fm => Some(BandSlot::Fm),
            _ => None,
        }
    }

    fn descriptor(self) -> Option<&'static BandDescriptor> {
        match self {
            BandSlot::Am => BAND_TABLE.first(),
            BandSlot::Fm => BAND_TABLE.get(1),
            BandSlot::Tv => None,
        }
    }
}

/// Index of the table row containing `freq`
pub fn band_index(freq: u16) -> Option<usize> {
    BAND_TABLE.iter().position(|d| d.contains(freq))
}

/// Table row containing `freq`
pub fn descriptor(freq: u16) -> Option<&'static BandDescriptor> {
    band_index(freq).map(|i| &BAND_TABLE[i])
}

/// Classify a wire frequency into its band
pub fn classify(freq: u16) -> Band {
    match descriptor(freq) {
        Some(d) => d.band,
        None if UNSPECIFIED_FREQS.contains(&freq) => Band::Unspecified,
        None => Band::Error,
    }
}

/// Tuning increment for `freq`, if it falls inside the table
pub fn step(freq: u16) -> Option<u16> {
    descriptor(freq).map(|d| d.step)
}

/// Lowest frequency of a slot
pub fn freq_min(slot: BandSlot) -> Option<u16> {
    slot.descriptor().map(|d| d.min)
}

/// Highest frequency of a slot
pub fn freq_max(slot: BandSlot) -> Option<u16> {
    slot.descriptor().map(|d| d.max)
}
