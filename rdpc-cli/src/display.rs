//! Terminal output

use std::io::{self, IsTerminal, Write};

use rdpc_protocol::{
    audio_mode_label, format_frequency, format_packet, TunerState, FREQ_DISPLAY_WIDTH,
};
use rdpc_tuner::{DeviceSummary, SeekObserver};

pub const LISTING_HEADER: &str = "No Serial  Station    Audio    Int";

/// One listing row
pub fn listing_row(row: &DeviceSummary) -> String {
    format!(
        "{:2} {}  {:>width$} {:<8} {:2}",
        row.index,
        row.serial,
        row.frequency_label(),
        row.audio_label(),
        row.state.signal_intensity(),
        width = FREQ_DISPLAY_WIDTH
    )
}

pub fn print_listing(rows: &[DeviceSummary]) {
    println!("{}", LISTING_HEADER);
    for row in rows {
        println!("{}", listing_row(row));
    }
}

/// Final line printed when an operation settles
pub fn settled_line(state: &TunerState) -> String {
    format!(
        "{:>width$}  {:3}",
        format_frequency(state.frequency()),
        state.signal_intensity(),
        width = FREQ_DISPLAY_WIDTH
    )
}

/// Bytes of a raw report and the reading taken after it
pub fn report_line(report: &[u8], state: &TunerState) -> String {
    format!(
        "{} => {:>width$} {:<8} {:2}",
        format_packet(report),
        format_frequency(state.frequency()),
        audio_mode_label(state.audio_mode()),
        state.signal_intensity(),
        width = FREQ_DISPLAY_WIDTH
    )
}

/// Single-line status that rewrites itself while seeking
///
/// Intermediate frequencies are only shown on a terminal.
pub struct LiveDisplay {
    tty: bool,
}

impl LiveDisplay {
    pub fn new() -> Self {
        Self {
            tty: io::stdout().is_terminal(),
        }
    }
}

impl Default for LiveDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl SeekObserver for LiveDisplay {
    fn on_poll(&mut self, state: &TunerState) {
        if self.tty {
            let mut out = io::stdout().lock();
            let _ = write!(
                out,
                "\r{:>width$}",
                format_frequency(state.frequency()),
                width = FREQ_DISPLAY_WIDTH
            );
            let _ = out.flush();
        }
    }

    fn on_settled(&mut self, state: &TunerState) {
        if self.tty {
            print!("\r");
        }
        println!("{}", settled_line(state));
    }
}
