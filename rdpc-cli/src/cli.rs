//! Command line arguments

use clap::{ArgAction, ArgGroup, Parser};
use rdpc_protocol::{AudioMode, Band, SeekDirection};

/// Band selector for `-S`
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ScanBand {
    Am,
    Fm,
}

impl From<ScanBand> for Band {
    fn from(band: ScanBand) -> Band {
        match band {
            ScanBand::Am => Band::Am,
            ScanBand::Fm => Band::Fm,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "rdpc101", version)]
#[command(about = "Control the SUNTAC RDPC-101 USB AM/FM tuner", long_about = None)]
#[command(group(ArgGroup::new("audio").args(["mono", "stereo"])))]
#[command(group(
    ArgGroup::new("action").args(["frequency", "scan", "seek_up", "seek_down", "raw"])
))]
pub struct Cli {
    /// Device index, as shown by --list
    #[arg(short = 'd', long = "device", value_name = "INDEX", default_value_t = 0)]
    pub device: usize,

    /// List attached tuners
    #[arg(short = 'l', long)]
    pub list: bool,

    /// Monaural
    #[arg(short = 'm', long)]
    pub mono: bool,

    /// Stereo
    #[arg(short = 's', long)]
    pub stereo: bool,

    /// Scan a whole band
    #[arg(short = 'S', long, value_enum, ignore_case = true, value_name = "BAND")]
    pub scan: Option<ScanBand>,

    /// Seek up
    #[arg(short = 'U', long)]
    pub seek_up: bool,

    /// Seek down
    #[arg(short = 'D', long)]
    pub seek_down: bool,

    /// Use the frequency exactly as given, without step rounding
    #[arg(short = 'x', long)]
    pub expert: bool,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short = 'v', long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Send a raw feature report given as hex bytes and print the state
    /// read back, e.g. `--raw 0a 80 02`
    #[arg(long, value_name = "BYTE", num_args = 1..)]
    pub raw: Vec<String>,

    /// Drive a simulated tuner instead of USB hardware
    #[arg(long)]
    pub simulate: bool,

    /// Frequency to tune: 900 for 900 kHz AM, 86.0 for 86.00 MHz FM
    #[arg(value_name = "FREQ")]
    pub frequency: Option<String>,
}

impl Cli {
    /// Audio mode requested with -m or -s
    pub fn audio_mode(&self) -> Option<AudioMode> {
        if self.mono {
            Some(AudioMode::Mono)
        } else if self.stereo {
            Some(AudioMode::Stereo)
        } else {
            None
        }
    }

    pub fn seek_direction(&self) -> Option<SeekDirection> {
        if self.seek_up {
            Some(SeekDirection::Up)
        } else if self.seek_down {
            Some(SeekDirection::Down)
        } else {
            None
        }
    }

    /// Default log filter for the workspace crates
    pub fn log_filter(&self) -> String {
        let level = match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        };
        ["rdpc101", "rdpc_protocol", "rdpc_usb", "rdpc_tuner", "rdpc_sim"]
            .iter()
            .map(|target| format!("{}={}", target, level))
            .collect::<Vec<_>>()
            .join(",")
    }
}
