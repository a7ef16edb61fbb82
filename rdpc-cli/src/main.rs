//! rdpc101 - SUNTAC RDPC-101 USB tuner control
//!
//! Lists attached tuners, tunes to a frequency, seeks up or down, scans
//! whole bands and sends raw feature reports for diagnosis. Termination requests (Ctrl-C, SIGTERM) never interrupt a
//! seek half-way: the device is always unmuted before the program exits.

#[cfg(not(any(feature = "libusb", feature = "hidapi")))]
compile_error!("enable at least one transport backend: `libusb` or `hidapi`");

mod cli;
mod display;

use std::process::ExitCode;

use anyhow::{bail, Context};
use clap::Parser;
use rdpc_protocol::{audio_mode_label, parse_frequency, parse_report, Band};
use rdpc_sim::{SimTransport, VirtualTuner};
use rdpc_tuner::{
    apply_audio_mode, scan, seek, send_report, tune, CancelToken, DeviceList, TunerConfig,
    TunerError,
};
use rdpc_usb::{Transport, TransportError};
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::Cli;
use display::LiveDisplay;

#[cfg(feature = "hidapi")]
fn native_transport() -> Result<rdpc_usb::HidapiTransport, TransportError> {
    rdpc_usb::HidapiTransport::new()
}

#[cfg(all(feature = "libusb", not(feature = "hidapi")))]
fn native_transport() -> Result<rdpc_usb::LibusbTransport, TransportError> {
    rdpc_usb::LibusbTransport::new()
}

fn run<T: Transport>(cli: &Cli, transport: T, cancel: &CancelToken) -> anyhow::Result<()> {
    let target = cli
        .frequency
        .as_deref()
        .map(|text| parse_frequency(text, cli.expert))
        .transpose()?;
    if let Some(target) = &target {
        if !target.band.is_tunable() {
            bail!("Frequency {} is outside the AM and FM bands", target.freq);
        }
    }
    let report = if cli.raw.is_empty() {
        None
    } else {
        Some(parse_report(cli.raw.as_slice())?)
    };

    let mut devices = DeviceList::enumerate(transport, TunerConfig::default())?;
    if devices.is_empty() {
        bail!("Cannot find an RDPC-101");
    }
    if cli.device >= devices.len() {
        bail!("Invalid device index {} ({} found)", cli.device, devices.len());
    }

    if cli.list {
        display::print_listing(&devices.summaries());
    }

    let mut session = devices.session(cli.device)?;
    if !cli.list {
        session
            .refresh()
            .with_context(|| format!("Cannot read device {}", cli.device))?;
    }
    debug!("Device {} reports {:?}", cli.device, session.state());

    let mut live = LiveDisplay::new();
    if let Some(target) = &target {
        info!("Tuning to {}", rdpc_protocol::format_frequency(target.freq));
        tune(&mut session, target, cancel, &mut live)?;
    } else if let Some(direction) = cli.seek_direction() {
        seek(&mut session, direction, cancel, &mut live).context("Cannot seek")?;
    } else if let Some(band) = cli.scan {
        let band = Band::from(band);
        let readings = scan(&mut session, band, cancel, &mut live).context("Cannot scan")?;
        info!("Scan of {} settled {} time(s)", band, readings.len());
    } else if let Some(report) = &report {
        let state = send_report(&mut session, report, cancel)?;
        println!("{}", display::report_line(report, &state));
    }
    cancel.checkpoint()?;

    if let Some(mode) = cli.audio_mode().or(target.map(|t| t.audio_mode)) {
        if let Err(e) = apply_audio_mode(&mut session, mode) {
            warn!("Cannot set audio mode to {}: {}", audio_mode_label(mode), e);
        }
    }
    Ok(())
}

fn execute(cli: &Cli, cancel: &CancelToken) -> anyhow::Result<()> {
    if cli.simulate {
        let transport = SimTransport::new(vec![VirtualTuner::new("SIM0001")]);
        return run(cli, transport, cancel);
    }
    let transport = native_transport().context("Cannot initialise USB")?;
    run(cli, transport, cancel)
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| cli.log_filter().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cancel = CancelToken::new();
    let handler = cancel.clone();
    if let Err(e) = ctrlc::set_handler(move || handler.cancel()) {
        warn!("Cannot install termination handler: {}", e);
    }

    match execute(&cli, &cancel) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if matches!(e.downcast_ref::<TunerError>(), Some(TunerError::Cancelled)) {
                eprintln!("\nInterrupted");
            } else {
                eprintln!("rdpc101: {:#}", e);
            }
            ExitCode::FAILURE
        }
    }
}
