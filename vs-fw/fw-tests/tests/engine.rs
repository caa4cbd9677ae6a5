//! End-to-end tests: request frames in through `Ingress`, response frames out
//! through `Service` into a recording transport.

use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use fw_core::sim::{ManualClock, RecordingSink, SimMemory};
use fw_core::{Engine, EngineConfig, Ingress, Service};
use fw_tests::{
    DeviceFrame, SIM_BASE, monitor, parse_frames, raw_frame, request_bytes, set_variable,
};
use vs_protocol::{
    AckStatus, DEFAULT_SAMPLE_PERIOD_MS, MAX_MONITORED_VARS, Request, Value, VarType,
};

const START: u8 = 0x01;
const SET: u8 = 0x02;
const RATE: u8 = 0x03;

struct Rig {
    engine: Engine<NoopRawMutex>,
    clock: ManualClock,
    memory: SimMemory,
}

impl Rig {
    fn new(config: EngineConfig) -> Self {
        Self {
            engine: Engine::new(config),
            clock: ManualClock::new(1_000),
            memory: SimMemory::new(SIM_BASE, 256),
        }
    }

    fn split(&self) -> (Ingress<'_, NoopRawMutex, ManualClock, SimMemory>, Svc<'_>) {
        (
            self.engine.ingress(&self.clock, &self.memory),
            self.engine
                .service(&self.clock, &self.memory, RecordingSink::new()),
        )
    }
}

type Svc<'a> = Service<'a, NoopRawMutex, ManualClock, SimMemory, RecordingSink>;

/// Run one service tick and parse whatever it sent
fn tick(service: &mut Svc<'_>) -> Vec<DeviceFrame> {
    service.tick();
    parse_frames(&service.sink_mut().take())
}

#[test_log::test]
fn test_start_monitor_then_sample_every_period() {
    // ---------------------------------------------------------------------------------------------
    // Arrange
    //
    let rig = Rig::new(EngineConfig::new());
    let counter = rig.memory.address_of(0);
    let gain = rig.memory.address_of(4);
    let level = rig.memory.address_of(8);
    rig.memory.set(counter, Value::U32(42));
    rig.memory.set(gain, Value::F32(-0.5));
    rig.memory.set(level, Value::I16(-1200));
    let (mut ingress, mut service) = rig.split();

    // ---------------------------------------------------------------------------------------------
    // Act
    //
    ingress.feed_packet(&request_bytes(&monitor(&[
        (counter, VarType::U32),
        (gain, VarType::F32),
        (level, VarType::I16),
    ])));
    let first = tick(&mut service);

    rig.clock.advance(DEFAULT_SAMPLE_PERIOD_MS - 1);
    let early = tick(&mut service);

    rig.clock.advance(1);
    let due = tick(&mut service);

    // ---------------------------------------------------------------------------------------------
    // Assert
    //
    assert_eq!(first, vec![DeviceFrame::ack(START, AckStatus::Ok)]);
    assert!(early.is_empty());
    assert_eq!(
        due,
        vec![DeviceFrame::Data {
            timestamp: 1_000 + DEFAULT_SAMPLE_PERIOD_MS,
            values: vec![42.0, -0.5, -1200.0],
        }]
    );
    assert!(rig.engine.is_monitoring());
}

#[test_log::test]
fn test_monitor_data_length_is_timestamp_plus_four_per_variable() {
    for count in [1usize, 3, MAX_MONITORED_VARS] {
        let rig = Rig::new(EngineConfig::new());
        let (mut ingress, mut service) = rig.split();
        let variables: Vec<_> = (0..count)
            .map(|i| (rig.memory.address_of(i * 4), VarType::U32))
            .collect();

        ingress.feed_packet(&request_bytes(&monitor(&variables)));
        service.tick();
        service.sink_mut().take();
        rig.clock.advance(DEFAULT_SAMPLE_PERIOD_MS);
        service.tick();

        let frames = service.sink_mut().take();
        assert_eq!(frames.len(), 1);
        // SOP CMD LEN LEN | payload | CS EOP
        let payload_len = u16::from_le_bytes([frames[0][2], frames[0][3]]) as usize;
        assert_eq!(payload_len, 4 + count * 4);
        assert_eq!(frames[0].len(), payload_len + 6);
    }
}

#[test_log::test]
fn test_count_zero_stops_monitoring() {
    let rig = Rig::new(EngineConfig::new());
    let (mut ingress, mut service) = rig.split();

    ingress.feed_packet(&request_bytes(&monitor(&[(
        rig.memory.address_of(0),
        VarType::U8,
    )])));
    tick(&mut service);
    assert!(rig.engine.is_monitoring());

    ingress.feed_packet(&raw_frame(START, &[0]));
    assert_eq!(tick(&mut service), vec![DeviceFrame::ack(START, AckStatus::Ok)]);
    assert!(!rig.engine.is_monitoring());

    rig.clock.advance(1_000);
    assert!(tick(&mut service).is_empty());
}

#[test_log::test]
fn test_too_many_variables_is_limit_error_and_empties_table() {
    let rig = Rig::new(EngineConfig::new());
    let (mut ingress, mut service) = rig.split();

    ingress.feed_packet(&request_bytes(&monitor(&[(
        rig.memory.address_of(0),
        VarType::U8,
    )])));
    tick(&mut service);

    let count = (MAX_MONITORED_VARS + 1) as u8;
    let mut payload = vec![count];
    for i in 0..count as u32 {
        payload.extend_from_slice(&(SIM_BASE + i * 4).to_le_bytes());
        payload.push(VarType::U32.tag());
    }
    ingress.feed_packet(&raw_frame(START, &payload));

    assert_eq!(
        tick(&mut service),
        vec![DeviceFrame::ack(START, AckStatus::BusyOrLimit)]
    );
    assert_eq!(rig.engine.monitored_count(), 0);
    assert!(!rig.engine.is_monitoring());
}

#[test_log::test]
fn test_start_monitor_length_mismatch_is_invalid_payload() {
    let rig = Rig::new(EngineConfig::new());
    let (mut ingress, mut service) = rig.split();

    ingress.feed_packet(&raw_frame(START, &[2, 0, 0, 0, 0x20, 0x01]));

    assert_eq!(
        tick(&mut service),
        vec![DeviceFrame::ack(START, AckStatus::InvalidPayload)]
    );
    assert_eq!(rig.engine.monitored_count(), 0);
}

#[test_log::test]
fn test_corrupted_payload_bit_yields_checksum_ack_without_dispatch() {
    let rig = Rig::new(EngineConfig::new());
    let (mut ingress, mut service) = rig.split();
    let target = rig.memory.address_of(0);

    let clean = request_bytes(&set_variable(target, VarType::U8, 9.0));
    for byte_index in 4..clean.len() - 2 {
        for bit in 0..8 {
            let mut corrupted = clean.clone();
            corrupted[byte_index] ^= 1 << bit;
            ingress.feed_packet(&corrupted);

            assert_eq!(
                tick(&mut service),
                vec![DeviceFrame::ack(SET, AckStatus::ChecksumError)],
                "byte {byte_index} bit {bit}"
            );
        }
    }
    assert_eq!(rig.memory.get(target, VarType::U8), Value::U8(0));
}

#[test_log::test]
fn test_bad_end_marker_and_oversize_frames_are_silent() {
    let rig = Rig::new(EngineConfig::new());
    let (mut ingress, mut service) = rig.split();

    let mut bad_end = raw_frame(RATE, &5u32.to_le_bytes());
    let last = bad_end.len() - 1;
    bad_end[last] = 0x00;
    ingress.feed_packet(&bad_end);

    // Declares 0x0100 payload bytes, more than the buffer holds
    ingress.feed_packet(&[0xA5, RATE, 0x00, 0x01]);

    assert!(tick(&mut service).is_empty());
    assert_eq!(rig.engine.sample_period_ms(), DEFAULT_SAMPLE_PERIOD_MS);

    // The stream recovers for the next good frame
    ingress.feed_packet(&raw_frame(RATE, &5u32.to_le_bytes()));
    assert_eq!(tick(&mut service), vec![DeviceFrame::ack(RATE, AckStatus::Ok)]);
    assert_eq!(rig.engine.sample_period_ms(), 200);
}

#[test_log::test]
fn test_frame_split_across_packets() {
    let rig = Rig::new(EngineConfig::new());
    let (mut ingress, mut service) = rig.split();

    let bytes = request_bytes(&Request::SetSampleRate(100));
    let (head, tail) = bytes.split_at(3);
    ingress.feed_packet(head);
    assert!(tick(&mut service).is_empty());
    ingress.feed_packet(tail);

    assert_eq!(tick(&mut service), vec![DeviceFrame::ack(RATE, AckStatus::Ok)]);
}

#[test_log::test]
fn test_sample_due_across_tick_wraparound() {
    let rig = Rig::new(EngineConfig::new().with_default_sample_period_ms(10));
    let (mut ingress, mut service) = rig.split();
    let address = rig.memory.address_of(0);
    rig.memory.set(address, Value::U8(7));

    rig.clock.set(u32::MAX - 5);
    ingress.feed_packet(&request_bytes(&monitor(&[(address, VarType::U8)])));
    tick(&mut service);

    rig.clock.set(10);
    assert_eq!(
        tick(&mut service),
        vec![DeviceFrame::Data {
            timestamp: 10,
            values: vec![7.0]
        }]
    );
}

#[test_log::test]
fn test_missed_periods_do_not_burst() {
    let rig = Rig::new(EngineConfig::new());
    let (mut ingress, mut service) = rig.split();
    ingress.feed_packet(&request_bytes(&monitor(&[(
        rig.memory.address_of(0),
        VarType::U8,
    )])));
    tick(&mut service);

    rig.clock.advance(DEFAULT_SAMPLE_PERIOD_MS * 5);
    assert_eq!(tick(&mut service).len(), 1);
    assert!(tick(&mut service).is_empty());

    rig.clock.advance(DEFAULT_SAMPLE_PERIOD_MS);
    assert_eq!(tick(&mut service).len(), 1);
}

#[test_log::test]
fn test_latest_ack_wins() {
    let rig = Rig::new(EngineConfig::new());
    let (mut ingress, mut service) = rig.split();

    ingress.feed_packet(&request_bytes(&Request::SetSampleRate(50)));
    ingress.feed_packet(&raw_frame(0x55, &[]));

    assert_eq!(
        tick(&mut service),
        vec![DeviceFrame::ack(0x55, AckStatus::UnknownCommand)]
    );
    // The lost ack's command still ran
    assert_eq!(rig.engine.sample_period_ms(), 20);
}

#[test_log::test]
fn test_set_variable_converts_to_declared_type() {
    let rig = Rig::new(EngineConfig::new());
    let (mut ingress, mut service) = rig.split();

    let cases = [
        (0, VarType::I8, -3.7, Value::I8(-3)),
        (2, VarType::U16, 65535.9, Value::U16(65535)),
        (4, VarType::I32, -100000.2, Value::I32(-100000)),
        (8, VarType::F32, 1.25, Value::F32(1.25)),
        (24, VarType::Bool, 0.001, Value::Bool(true)),
        (25, VarType::Bool, 0.0, Value::Bool(false)),
    ];
    for (offset, var_type, value, expected) in cases {
        let address = rig.memory.address_of(offset);
        ingress.feed_packet(&request_bytes(&set_variable(address, var_type, value)));
        assert_eq!(tick(&mut service), vec![DeviceFrame::ack(SET, AckStatus::Ok)]);
        assert_eq!(rig.memory.get(address, var_type), expected);
    }
}

#[test_log::test]
fn test_set_variable_f64_is_refused_and_memory_untouched() {
    let rig = Rig::new(EngineConfig::new());
    let (mut ingress, mut service) = rig.split();
    let address = rig.memory.address_of(16);
    rig.memory.set(address, Value::F64(-7.0));

    ingress.feed_packet(&request_bytes(&set_variable(address, VarType::F64, 3.5)));

    assert_eq!(
        tick(&mut service),
        vec![DeviceFrame::ack(SET, AckStatus::TypeUnsupported)]
    );
    assert_eq!(rig.memory.get(address, VarType::F64), Value::F64(-7.0));
}

#[test_log::test]
fn test_f64_is_still_sampled_as_f32() {
    let rig = Rig::new(EngineConfig::new());
    let (mut ingress, mut service) = rig.split();
    let address = rig.memory.address_of(16);
    rig.memory.set(address, Value::F64(-7.25));

    ingress.feed_packet(&request_bytes(&monitor(&[(address, VarType::F64)])));
    tick(&mut service);
    rig.clock.advance(DEFAULT_SAMPLE_PERIOD_MS);

    assert_eq!(
        tick(&mut service),
        vec![DeviceFrame::Data {
            timestamp: 1_000 + DEFAULT_SAMPLE_PERIOD_MS,
            values: vec![-7.25],
        }]
    );
}

#[test_log::test]
fn test_set_variable_unsupported_type_leaves_memory_untouched() {
    let rig = Rig::new(EngineConfig::new());
    let (mut ingress, mut service) = rig.split();
    let address = rig.memory.address_of(0);
    rig.memory.set(address, Value::U32(0x1234_5678));
    let before = rig.memory.snapshot();

    let mut payload = address.to_le_bytes().to_vec();
    payload.push(0x09);
    payload.extend_from_slice(&99.0f32.to_le_bytes());
    ingress.feed_packet(&raw_frame(SET, &payload));

    assert_eq!(
        tick(&mut service),
        vec![DeviceFrame::ack(SET, AckStatus::TypeUnsupported)]
    );
    assert_eq!(rig.memory.snapshot(), before);
}

#[test_log::test]
fn test_set_variable_wrong_length_is_invalid_payload() {
    let rig = Rig::new(EngineConfig::new());
    let (mut ingress, mut service) = rig.split();

    ingress.feed_packet(&raw_frame(SET, &[0; 8]));

    assert_eq!(
        tick(&mut service),
        vec![DeviceFrame::ack(SET, AckStatus::InvalidPayload)]
    );
}

#[test_log::test]
fn test_sample_rate_zero_resets_default_and_high_rate_floors_to_one_ms() {
    let rig = Rig::new(EngineConfig::new());
    let (mut ingress, mut service) = rig.split();

    ingress.feed_packet(&request_bytes(&Request::SetSampleRate(2)));
    tick(&mut service);
    assert_eq!(rig.engine.sample_period_ms(), 500);

    ingress.feed_packet(&request_bytes(&Request::SetSampleRate(0)));
    assert_eq!(tick(&mut service), vec![DeviceFrame::ack(RATE, AckStatus::Ok)]);
    assert_eq!(rig.engine.sample_period_ms(), DEFAULT_SAMPLE_PERIOD_MS);

    ingress.feed_packet(&request_bytes(&Request::SetSampleRate(5_000)));
    assert_eq!(tick(&mut service), vec![DeviceFrame::ack(RATE, AckStatus::Ok)]);
    assert_eq!(rig.engine.sample_period_ms(), 1);
}

#[test_log::test]
fn test_null_and_unknown_type_entries_sample_as_zero() {
    let rig = Rig::new(EngineConfig::new());
    let (mut ingress, mut service) = rig.split();
    let good = rig.memory.address_of(0);
    rig.memory.set(good, Value::U8(200));

    let mut payload = vec![3];
    for (address, tag) in [(0u32, VarType::U32.tag()), (good, 0x42), (good, VarType::U8.tag())] {
        payload.extend_from_slice(&address.to_le_bytes());
        payload.push(tag);
    }
    ingress.feed_packet(&raw_frame(START, &payload));
    tick(&mut service);

    rig.clock.advance(DEFAULT_SAMPLE_PERIOD_MS);
    let frames = tick(&mut service);
    let [DeviceFrame::Data { values, .. }] = frames.as_slice() else {
        panic!("Expected one data frame, got {frames:?}");
    };
    assert_eq!(values, &vec![0.0, 0.0, 200.0]);
}

#[test_log::test]
fn test_ack_is_sent_before_data_in_one_tick() {
    let rig = Rig::new(EngineConfig::new());
    let (mut ingress, mut service) = rig.split();
    let address = rig.memory.address_of(0);

    ingress.feed_packet(&request_bytes(&monitor(&[(address, VarType::U8)])));
    tick(&mut service);

    rig.clock.advance(DEFAULT_SAMPLE_PERIOD_MS);
    ingress.feed_packet(&request_bytes(&set_variable(address, VarType::U8, 5.0)));
    let frames = tick(&mut service);

    assert_eq!(frames.len(), 2);
    assert_eq!(frames[0], DeviceFrame::ack(SET, AckStatus::Ok));
    assert!(matches!(&frames[1], DeviceFrame::Data { values, .. } if values == &vec![5.0]));
}

#[test_log::test]
fn test_error_report_sent_when_enabled() {
    let rig = Rig::new(EngineConfig::new().with_error_reports(true));
    let (mut ingress, mut service) = rig.split();

    ingress.feed_packet(&request_bytes(&Request::SetSampleRate(10)));
    rig.engine.report_error(0x21, b"brown-out").unwrap();
    assert!(rig.engine.report_error(0x22, b"again").is_err());

    assert_eq!(
        tick(&mut service),
        vec![
            DeviceFrame::ack(RATE, AckStatus::Ok),
            DeviceFrame::Error {
                code: 0x21,
                message: b"brown-out".to_vec()
            },
        ]
    );
    assert!(rig.engine.report_error(0x22, b"again").is_ok());
}

#[test_log::test]
fn test_long_error_report_still_fits_a_frame() {
    let rig = Rig::new(EngineConfig::new().with_error_reports(true));
    let (_ingress, mut service) = rig.split();

    rig.engine.report_error(1, &[b'!'; 300]).unwrap();
    let frames = tick(&mut service);

    let [DeviceFrame::Error { message, .. }] = frames.as_slice() else {
        panic!("Expected one error frame, got {frames:?}");
    };
    assert_eq!(message.len(), vs_protocol::ERROR_MESSAGE_CAPACITY);
}

#[test_log::test]
fn test_init_clears_monitoring_and_queue() {
    let rig = Rig::new(EngineConfig::new());
    let (mut ingress, mut service) = rig.split();

    ingress.feed_packet(&request_bytes(&monitor(&[(
        rig.memory.address_of(0),
        VarType::U8,
    )])));
    rig.engine.init();

    assert!(tick(&mut service).is_empty());
    assert!(!rig.engine.is_monitoring());
}
