//! Integration tests for RDPC-101 tuner control
//!
//! These tests drive the controller against simulated tuners and verify:
//! - Seek sequencing (mute, seek, poll, unmute) and poll counts
//! - Full-band scans and restoration of the original band/frequency
//! - Failure paths for commands and reads
//! - Deferred cancellation
//! - Lazy handle opening and single close

use std::time::Duration;

use rdpc_protocol::{AudioMode, Band, Command, SeekDirection, TunerState};
use rdpc_sim::{SimTransport, VirtualTuner, VirtualTunerConfig};
use rdpc_tuner::{CancelToken, DeviceList, SeekObserver, TunerConfig};

// ============================================================================
// Helper Functions
// ============================================================================

mod helpers {
    use super::*;

    /// Configuration without poll delays
    pub fn fast_config() -> TunerConfig {
        TunerConfig::default().with_poll_interval(Duration::ZERO)
    }

    /// Device list over one default virtual tuner, plus a handle on the
    /// transport for inspection
    pub fn single() -> (SimTransport, DeviceList<SimTransport>) {
        with_tuners(vec![VirtualTuner::new("0001")])
    }

    pub fn with_tuners(tuners: Vec<VirtualTuner>) -> (SimTransport, DeviceList<SimTransport>) {
        let transport = SimTransport::new(tuners);
        let list = DeviceList::enumerate(transport.clone(), fast_config()).unwrap();
        (transport, list)
    }

    /// Virtual tuner starting at a given frequency
    pub fn tuner_at(freq: u16) -> VirtualTuner {
        VirtualTuner::from_config(VirtualTunerConfig {
            serial_number: "0001".to_string(),
            initial_frequency: freq,
            ..Default::default()
        })
    }

    pub fn commands(transport: &SimTransport) -> Vec<Command> {
        transport.with_tuner(0, |t| t.commands().to_vec()).unwrap()
    }

    pub fn reads(transport: &SimTransport) -> usize {
        transport.with_tuner(0, |t| t.reads()).unwrap()
    }

    /// Observer that records what it is shown
    #[derive(Default)]
    pub struct Recorder {
        pub polls: usize,
        pub settled: Vec<TunerState>,
    }

    impl SeekObserver for Recorder {
        fn on_poll(&mut self, _state: &TunerState) {
            self.polls += 1;
        }

        fn on_settled(&mut self, state: &TunerState) {
            self.settled.push(*state);
        }
    }

    /// Observer that requests cancellation while polling
    pub struct CancelOnPoll {
        pub token: CancelToken,
    }

    impl SeekObserver for CancelOnPoll {
        fn on_poll(&mut self, _state: &TunerState) {
            self.token.cancel();
        }

        fn on_settled(&mut self, _state: &TunerState) {}
    }

    pub const MUTE: Command = Command::SetMute { muted: true };
    pub const UNMUTE: Command = Command::SetMute { muted: false };
    pub const SEEK_UP: Command = Command::Seek {
        direction: SeekDirection::Up,
    };
}

use helpers::*;

// ============================================================================
// Seek Tests
// ============================================================================

mod seek_tests {
    use super::*;
    use rdpc_tuner::seek;

    #[test]
    fn test_seek_sequence() {
        let (transport, mut list) = single();
        let mut session = list.session(0).unwrap();
        session.refresh().unwrap();

        let mut recorder = Recorder::default();
        seek(&mut session, SeekDirection::Up, &CancelToken::new(), &mut recorder).unwrap();

        assert_eq!(commands(&transport), vec![MUTE, SEEK_UP, UNMUTE]);
        assert_eq!(session.state().frequency(), 8250);
        assert_eq!(session.state().signal_intensity(), 31);
        assert!(!session.state().seeking());
        assert_eq!(recorder.settled.len(), 1);
        assert_eq!(recorder.settled[0].frequency(), 8250);
        assert!(!transport.with_tuner(0, |t| t.muted()).unwrap());
    }

    #[test]
    fn test_seek_down() {
        let (_transport, mut list) = single();
        let mut session = list.session(0).unwrap();
        session.refresh().unwrap();

        seek(
            &mut session,
            SeekDirection::Down,
            &CancelToken::new(),
            &mut Recorder::default(),
        )
        .unwrap();

        assert_eq!(session.state().frequency(), 7700);
    }

    #[test]
    fn test_seek_polls_until_settled() {
        let (transport, mut list) = single();
        transport.with_tuner(0, |t| t.set_seek_polls(4));
        let mut session = list.session(0).unwrap();
        session.refresh().unwrap();
        let before = reads(&transport);

        let mut recorder = Recorder::default();
        seek(&mut session, SeekDirection::Up, &CancelToken::new(), &mut recorder).unwrap();

        assert_eq!(reads(&transport) - before, 5);
        assert_eq!(recorder.polls, 5);
    }

    #[test]
    fn test_seek_from_unknown_band() {
        let (transport, mut list) = with_tuners(vec![tuner_at(0)]);
        let mut session = list.session(0).unwrap();
        session.refresh().unwrap();

        let result = seek(
            &mut session,
            SeekDirection::Up,
            &CancelToken::new(),
            &mut Recorder::default(),
        );

        assert!(matches!(result, Err(rdpc_tuner::TunerError::UnknownBand(0))));
        assert!(commands(&transport).is_empty());
    }

    #[test]
    fn test_seek_at_band_edge_settles_on_edge() {
        let (_transport, mut list) = with_tuners(vec![tuner_at(8520)]);
        let mut session = list.session(0).unwrap();
        session.refresh().unwrap();

        seek(
            &mut session,
            SeekDirection::Up,
            &CancelToken::new(),
            &mut Recorder::default(),
        )
        .unwrap();

        assert_eq!(session.state().frequency(), 10800);
        assert_eq!(session.state().band(), Band::Fm);
    }
}

// ============================================================================
// Scan Tests
// ============================================================================

mod scan_tests {
    use super::*;
    use rdpc_tuner::scan;

    #[test]
    fn test_scan_am_from_am() {
        let (transport, mut list) = with_tuners(vec![tuner_at(522)]);
        let mut session = list.session(0).unwrap();
        session.refresh().unwrap();

        let readings = scan(
            &mut session,
            Band::Am,
            &CancelToken::new(),
            &mut Recorder::default(),
        )
        .unwrap();

        let found: Vec<u16> = readings.iter().map(|s| s.frequency()).collect();
        assert_eq!(found, vec![594, 693, 954, 1134, 1629]);

        let cmds = commands(&transport);
        assert_eq!(cmds.first(), Some(&Command::SetFrequency { freq: 522 }));
        assert_eq!(cmds.last(), Some(&Command::SetFrequency { freq: 522 }));
        assert!(!cmds.iter().any(|c| matches!(c, Command::SetBand { .. })));
        assert_eq!(cmds.iter().filter(|c| **c == SEEK_UP).count(), 5);
        assert_eq!(cmds.iter().filter(|c| **c == UNMUTE).count(), 5);
    }

    #[test]
    fn test_scan_am_from_fm_restores_band() {
        let (transport, mut list) = single();
        let mut session = list.session(0).unwrap();
        session.refresh().unwrap();

        scan(
            &mut session,
            Band::Am,
            &CancelToken::new(),
            &mut Recorder::default(),
        )
        .unwrap();

        let cmds = commands(&transport);
        assert_eq!(cmds[0], Command::SetBand { band: Band::Am });
        assert_eq!(cmds[1], Command::SetFrequency { freq: 522 });
        assert_eq!(
            &cmds[cmds.len() - 2..],
            &[
                Command::SetBand { band: Band::Fm },
                Command::SetFrequency { freq: 8000 },
            ]
        );
        assert_eq!(transport.with_tuner(0, |t| t.frequency()), Some(8000));
    }

    #[test]
    fn test_scan_fm_stops_at_slot_maximum() {
        let (_transport, mut list) = single();
        let mut session = list.session(0).unwrap();
        session.refresh().unwrap();

        let readings = scan(
            &mut session,
            Band::Fm,
            &CancelToken::new(),
            &mut Recorder::default(),
        )
        .unwrap();

        let found: Vec<u16> = readings.iter().map(|s| s.frequency()).collect();
        assert_eq!(found, vec![7700, 8000, 8250, 8520, 10800]);
    }

    #[test]
    fn test_scan_stops_when_seek_does_not_advance() {
        let (transport, mut list) = with_tuners(vec![tuner_at(522)]);
        let mut session = list.session(0).unwrap();
        session.refresh().unwrap();

        let mut stall = Stall {
            tuner: transport.tuner(0).unwrap(),
        };
        let readings = scan(&mut session, Band::Am, &CancelToken::new(), &mut stall).unwrap();

        assert_eq!(readings.len(), 1);
        assert_eq!(readings[0].frequency(), 522);
    }

    /// Re-tunes the virtual tuner to the band minimum while it settles
    struct Stall {
        tuner: rdpc_sim::SharedTuner,
    }

    impl SeekObserver for Stall {
        fn on_poll(&mut self, _state: &TunerState) {
            let bytes = Command::SetFrequency { freq: 522 }.encode().unwrap();
            self.tuner.lock().unwrap().handle_report(&bytes).unwrap();
        }

        fn on_settled(&mut self, _state: &TunerState) {}
    }

    #[test]
    fn test_scan_invalid_band() {
        let (transport, mut list) = single();
        let mut session = list.session(0).unwrap();
        session.refresh().unwrap();

        let result = scan(
            &mut session,
            Band::Unknown,
            &CancelToken::new(),
            &mut Recorder::default(),
        );

        assert!(matches!(
            result,
            Err(rdpc_tuner::TunerError::InvalidBand(Band::Unknown))
        ));
        assert!(commands(&transport).is_empty());
    }
}

// ============================================================================
// Tune Tests
// ============================================================================

mod tune_tests {
    use super::*;
    use rdpc_protocol::parse_frequency;
    use rdpc_tuner::{apply_audio_mode, tune};

    #[test]
    fn test_tune_across_bands() {
        let (transport, mut list) = single();
        let mut session = list.session(0).unwrap();
        session.refresh().unwrap();

        let target = parse_frequency("954", false).unwrap();
        let mut recorder = Recorder::default();
        tune(&mut session, &target, &CancelToken::new(), &mut recorder).unwrap();

        assert_eq!(
            commands(&transport),
            vec![
                Command::SetBand { band: Band::Am },
                Command::SetFrequency { freq: 954 },
            ]
        );
        assert_eq!(session.state().frequency(), 954);
        assert_eq!(recorder.settled.len(), 1);
    }

    #[test]
    fn test_tune_to_current_frequency_sends_nothing() {
        let (transport, mut list) = single();
        let mut session = list.session(0).unwrap();
        session.refresh().unwrap();

        let target = parse_frequency("80.0", false).unwrap();
        tune(
            &mut session,
            &target,
            &CancelToken::new(),
            &mut Recorder::default(),
        )
        .unwrap();

        assert!(commands(&transport).is_empty());
        assert_eq!(reads(&transport), 2);
    }

    #[test]
    fn test_tune_off_table_target_is_refused() {
        let (transport, mut list) = single();
        let mut session = list.session(0).unwrap();
        session.refresh().unwrap();

        let target = parse_frequency("108.99", true).unwrap();
        let result = tune(
            &mut session,
            &target,
            &CancelToken::new(),
            &mut Recorder::default(),
        );

        assert!(matches!(
            result,
            Err(rdpc_tuner::TunerError::InvalidBand(Band::Error))
        ));
        assert!(commands(&transport).is_empty());
    }

    #[test]
    fn test_apply_audio_mode_only_when_different() {
        let (transport, mut list) = single();
        let mut session = list.session(0).unwrap();
        session.refresh().unwrap();

        assert!(!apply_audio_mode(&mut session, AudioMode::Stereo).unwrap());
        assert!(!apply_audio_mode(&mut session, AudioMode::Unspecified).unwrap());
        assert!(apply_audio_mode(&mut session, AudioMode::Mono).unwrap());

        assert_eq!(
            commands(&transport),
            vec![Command::SetAudioMode {
                mode: AudioMode::Mono
            }]
        );
    }
}

// ============================================================================
// Raw Report Tests
// ============================================================================

mod raw_report_tests {
    use super::*;
    use rdpc_protocol::{parse_report, Opcode};
    use rdpc_tuner::{send_report, TunerError};

    #[test]
    fn test_send_report_reads_state_back() {
        let (transport, mut list) = single();
        let mut session = list.session(0).unwrap();

        let report = parse_report(&["0a", "80", "02"]).unwrap();
        let state = send_report(&mut session, &report, &CancelToken::new()).unwrap();

        assert_eq!(commands(&transport), vec![Command::SetBand { band: Band::Am }]);
        assert_eq!(reads(&transport), 1);
        assert_eq!(state.frequency(), 522);
        assert_eq!(state.band(), Band::Am);
        assert_eq!(session.state(), state);
    }

    #[test]
    fn test_send_unknown_report() {
        let (transport, mut list) = single();
        let mut session = list.session(0).unwrap();

        let state = send_report(&mut session, &[0x13, 0x00], &CancelToken::new()).unwrap();

        assert!(commands(&transport).is_empty());
        assert_eq!(state.frequency(), 8000);
    }

    #[test]
    fn test_send_report_failure_skips_read() {
        let (transport, mut list) = single();
        transport.with_tuner(0, |t| t.fail_writes(Some(Opcode::Band)));
        let mut session = list.session(0).unwrap();

        let result = send_report(&mut session, &[0x0A, 0x80, 0x02], &CancelToken::new());

        match result {
            Err(TunerError::Report { report, .. }) => assert_eq!(report, vec![0x0A, 0x80, 0x02]),
            other => panic!("expected report error, got {:?}", other),
        }
        assert_eq!(reads(&transport), 0);
    }

    #[test]
    fn test_send_report_after_cancel() {
        let (transport, mut list) = single();
        let mut session = list.session(0).unwrap();
        let cancel = CancelToken::new();
        cancel.cancel();

        let result = send_report(&mut session, &[0x05, 0x01, 0x00], &cancel);

        assert!(matches!(result, Err(TunerError::Cancelled)));
        assert!(commands(&transport).is_empty());
    }
}

// ============================================================================
// Failure Tests
// ============================================================================

mod failure_tests {
    use super::*;
    use rdpc_protocol::{encode_state_packet, Opcode};
    use rdpc_tuner::{scan, seek, TunerError};
    use rdpc_usb::TransportError;

    #[test]
    fn test_seek_command_failure_is_fatal() {
        let (transport, mut list) = single();
        transport.with_tuner(0, |t| t.fail_writes(Some(Opcode::Seek)));
        let mut session = list.session(0).unwrap();
        session.refresh().unwrap();

        let mut recorder = Recorder::default();
        let result = seek(&mut session, SeekDirection::Up, &CancelToken::new(), &mut recorder);

        assert!(matches!(
            result,
            Err(TunerError::Seek {
                direction: SeekDirection::Up,
                ..
            })
        ));
        assert_eq!(commands(&transport), vec![MUTE, UNMUTE]);
        assert_eq!(recorder.polls, 0);
        assert_eq!(recorder.settled, vec![session.state()]);
    }

    #[test]
    fn test_mute_failure_is_not_fatal() {
        let (transport, mut list) = single();
        transport.with_tuner(0, |t| t.fail_writes(Some(Opcode::Mute)));
        let mut session = list.session(0).unwrap();
        session.refresh().unwrap();

        seek(
            &mut session,
            SeekDirection::Up,
            &CancelToken::new(),
            &mut Recorder::default(),
        )
        .unwrap();

        assert_eq!(commands(&transport), vec![SEEK_UP]);
        assert_eq!(session.state().frequency(), 8250);
    }

    #[test]
    fn test_poll_failure_still_unmutes_and_reports() {
        let (transport, mut list) = single();
        let mut session = list.session(0).unwrap();
        session.refresh().unwrap();
        transport.with_tuner(0, |t| t.fail_reads_after(Some(2)));

        let mut recorder = Recorder::default();
        let result = seek(&mut session, SeekDirection::Up, &CancelToken::new(), &mut recorder);

        assert!(matches!(
            result,
            Err(TunerError::Transport(TransportError::Disconnected))
        ));
        assert_eq!(commands(&transport), vec![MUTE, SEEK_UP, UNMUTE]);
        assert_eq!(recorder.settled.len(), 1);
        // one successful poll, then the failing one
        assert_eq!(reads(&transport), 3);
    }

    #[test]
    fn test_failed_refresh_keeps_state() {
        let (transport, mut list) = single();
        let mut session = list.session(0).unwrap();
        session.refresh().unwrap();
        let before = session.state();

        transport.with_tuner(0, |t| t.fail_reads_after(Some(0)));
        assert!(session.refresh().is_err());
        assert_eq!(session.state(), before);
    }

    #[test]
    fn test_empty_read_is_no_data() {
        let (transport, mut list) = single();
        let mut session = list.session(0).unwrap();
        session.refresh().unwrap();
        let before = session.state();

        transport.with_tuner(0, |t| t.inject_packet(Vec::new()));
        assert_eq!(session.refresh(), Err(TransportError::NoData));
        assert_eq!(session.state(), before);
    }

    #[test]
    fn test_anomalous_packet_is_stored() {
        let (transport, mut list) = single();
        let mut session = list.session(0).unwrap();

        let mut packet = encode_state_packet(0x00, 42, 900).to_vec();
        packet[8] = 0x55;
        transport.with_tuner(0, |t| t.inject_packet(packet));

        session.refresh().unwrap();
        assert_eq!(session.state().frequency(), 900);
        assert_eq!(session.state().signal_intensity(), 42);
        assert_eq!(session.state().audio_mode(), AudioMode::Mono);
    }

    #[test]
    fn test_refresh_shifts_previous_state() {
        let (transport, mut list) = single();
        let mut session = list.session(0).unwrap();
        session.refresh().unwrap();

        transport.with_tuner(0, |t| t.inject_packet(encode_state_packet(0x01, 10, 9005).to_vec()));
        session.refresh().unwrap();

        assert_eq!(session.previous_state().frequency(), 8000);
        assert_eq!(session.state().frequency(), 9005);
    }

    #[test]
    fn test_scan_band_switch_failure_aborts() {
        let (transport, mut list) = single();
        transport.with_tuner(0, |t| t.fail_writes(Some(Opcode::Band)));
        let mut session = list.session(0).unwrap();
        session.refresh().unwrap();

        let result = scan(
            &mut session,
            Band::Am,
            &CancelToken::new(),
            &mut Recorder::default(),
        );

        assert!(matches!(
            result,
            Err(TunerError::SetBand { band: Band::Am, .. })
        ));
        assert!(commands(&transport).is_empty());
    }

    #[test]
    fn test_scan_seek_failure_restores() {
        let (transport, mut list) = single();
        transport.with_tuner(0, |t| t.fail_writes(Some(Opcode::Seek)));
        let mut session = list.session(0).unwrap();
        session.refresh().unwrap();

        let result = scan(
            &mut session,
            Band::Am,
            &CancelToken::new(),
            &mut Recorder::default(),
        );

        assert!(matches!(result, Err(TunerError::Seek { .. })));
        assert_eq!(
            commands(&transport),
            vec![
                Command::SetBand { band: Band::Am },
                Command::SetFrequency { freq: 522 },
                MUTE,
                UNMUTE,
                Command::SetBand { band: Band::Fm },
                Command::SetFrequency { freq: 8000 },
            ]
        );
    }

    #[test]
    fn test_scan_restore_failure_is_reported() {
        let (transport, mut list) = with_tuners(vec![tuner_at(522)]);
        let mut session = list.session(0).unwrap();
        session.refresh().unwrap();

        // Fail frequency writes only after the scan has started seeking
        let tuner = transport.tuner(0).unwrap();
        let mut arm = ArmOnSettled { tuner };
        let result = scan(&mut session, Band::Am, &CancelToken::new(), &mut arm);

        assert!(matches!(result, Err(TunerError::Restore { freq: 522, .. })));
    }

    struct ArmOnSettled {
        tuner: rdpc_sim::SharedTuner,
    }

    impl SeekObserver for ArmOnSettled {
        fn on_poll(&mut self, _state: &TunerState) {}

        fn on_settled(&mut self, _state: &TunerState) {
            self.tuner
                .lock()
                .unwrap()
                .fail_writes(Some(Opcode::SetFrequency));
        }
    }

    #[test]
    fn test_invalid_device_index() {
        let (_transport, mut list) = single();
        assert!(matches!(
            list.session(3),
            Err(TunerError::DeviceNotFound { index: 3, count: 1 })
        ));
    }

    #[test]
    fn test_open_failure_propagates() {
        let (transport, mut list) = single();
        transport.with_tuner(0, |t| t.fail_open(true));
        let mut session = list.session(0).unwrap();

        assert!(matches!(
            session.refresh(),
            Err(TransportError::OpenFailed { .. })
        ));
        assert!(!session.is_open());
    }
}

// ============================================================================
// Cancellation Tests
// ============================================================================

mod cancellation_tests {
    use super::*;
    use rdpc_tuner::{scan, seek, TunerError};

    #[test]
    fn test_cancel_before_seek() {
        let (transport, mut list) = single();
        let mut session = list.session(0).unwrap();
        session.refresh().unwrap();

        let token = CancelToken::new();
        token.cancel();
        let result = seek(&mut session, SeekDirection::Up, &token, &mut Recorder::default());

        assert!(matches!(result, Err(TunerError::Cancelled)));
        assert!(commands(&transport).is_empty());
    }

    #[test]
    fn test_cancel_during_seek_is_deferred() {
        let (transport, mut list) = single();
        let mut session = list.session(0).unwrap();
        session.refresh().unwrap();

        let token = CancelToken::new();
        let mut observer = CancelOnPoll {
            token: token.clone(),
        };
        seek(&mut session, SeekDirection::Up, &token, &mut observer).unwrap();

        assert_eq!(commands(&transport), vec![MUTE, SEEK_UP, UNMUTE]);
        assert_eq!(session.state().frequency(), 8250);
        assert!(matches!(token.checkpoint(), Err(TunerError::Cancelled)));
    }

    #[test]
    fn test_cancel_during_scan_finishes_the_cycle() {
        let (transport, mut list) = single();
        let mut session = list.session(0).unwrap();
        session.refresh().unwrap();

        let token = CancelToken::new();
        let mut observer = CancelOnPoll {
            token: token.clone(),
        };
        let result = scan(&mut session, Band::Am, &token, &mut observer);

        assert!(matches!(result, Err(TunerError::Cancelled)));
        let cmds = commands(&transport);
        assert_eq!(cmds.iter().filter(|c| **c == SEEK_UP).count(), 1);
        assert_eq!(cmds.last(), Some(&UNMUTE));
        assert!(!transport.with_tuner(0, |t| t.muted()).unwrap());
    }
}

// ============================================================================
// Lifecycle Tests
// ============================================================================

mod lifecycle_tests {
    use super::*;

    #[test]
    fn test_open_is_lazy_and_memoized() {
        let (transport, mut list) = single();
        assert_eq!(transport.with_tuner(0, |t| t.opens()), Some(0));

        let mut session = list.session(0).unwrap();
        assert!(!session.is_open());
        session.refresh().unwrap();
        session.set_mute(true).unwrap();
        session.refresh().unwrap();
        assert!(session.is_open());

        assert_eq!(transport.with_tuner(0, |t| t.opens()), Some(1));
    }

    #[test]
    fn test_drop_closes_once() {
        let (transport, mut list) = single();
        list.session(0).unwrap().refresh().unwrap();
        list.session(0).unwrap().refresh().unwrap();
        drop(list);

        assert_eq!(
            transport.with_tuner(0, |t| (t.opens(), t.closes())),
            Some((1, 1))
        );
    }

    #[test]
    fn test_unopened_devices_are_not_closed() {
        let (transport, list) =
            with_tuners(vec![VirtualTuner::new("A"), VirtualTuner::new("B")]);
        drop(list);

        for i in 0..2 {
            assert_eq!(transport.with_tuner(i, |t| t.closes()), Some(0));
        }
    }

    #[test]
    fn test_close_all_then_drop() {
        let (transport, mut list) = single();
        list.session(0).unwrap().refresh().unwrap();
        list.close_all();
        assert!(!list.device(0).unwrap().is_open());
        drop(list);

        assert_eq!(transport.with_tuner(0, |t| t.closes()), Some(1));
    }

    #[test]
    fn test_reopen_after_close() {
        let (transport, mut list) = single();
        let mut session = list.session(0).unwrap();
        session.refresh().unwrap();
        session.close();
        session.refresh().unwrap();
        drop(list);

        assert_eq!(
            transport.with_tuner(0, |t| (t.opens(), t.closes())),
            Some((2, 2))
        );
    }

    #[test]
    fn test_summaries() {
        let (transport, mut list) =
            with_tuners(vec![VirtualTuner::new("A"), VirtualTuner::new("B")]);
        transport.with_tuner(1, |t| t.fail_reads_after(Some(0)));

        let rows = list.summaries();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].serial, "A");
        assert_eq!(rows[0].frequency_label(), "80.00 MHz");
        assert_eq!(rows[0].audio_label(), "Stereo");
        assert_eq!(rows[0].state.signal_intensity(), 35);
        assert!(rows[0].error.is_none());
        assert!(rows[1].error.is_some());
        assert_eq!(rows[1].frequency_label(), "---- _Hz");
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

mod proptest_tests {
    use super::*;
    use proptest::prelude::*;
    use rdpc_tuner::seek;

    proptest! {
        #[test]
        fn seek_reads_one_more_than_seeking_polls(polls in 0usize..12) {
            let (transport, mut list) = single();
            transport.with_tuner(0, |t| t.set_seek_polls(polls));
            let mut session = list.session(0).unwrap();
            session.refresh().unwrap();
            let before = reads(&transport);

            seek(&mut session, SeekDirection::Up, &CancelToken::new(), &mut Recorder::default()).unwrap();

            prop_assert_eq!(reads(&transport) - before, polls + 1);
            let unmutes = commands(&transport).iter().filter(|c| **c == UNMUTE).count();
            prop_assert_eq!(unmutes, 1);
        }
    }
}
