//! End-to-end translation of a small powertrain/body catalog: frames in,
//! envelopes out, with the send policies of a typical gateway configuration.
mod helpers;

use can_translate::core::{
    BusConfig, DecodedValue, FrequencyPolicy, MessageKey, SignalDefinition, SignalState,
};
use can_translate::infra::codec::bitfield::encode_signal_bitfield;
use can_translate::protocol::decoding::decoder::Decoder;
use can_translate::protocol::gateway::Gateway;
use can_translate::protocol::publish::Envelope;
use can_translate::protocol::transport::can_frame::{extended_id, standard_id, RawFrame};
use embassy_time::Duration;
use helpers::{ManualTicks, RecordingPipeline};

const POWERTRAIN: MessageKey = MessageKey::standard(1, 0x0C9);
const BODY: MessageKey = MessageKey::standard(1, 0x3B3);

const GEAR_STATES: [SignalState; 4] = [
    SignalState::new(0, "neutral"),
    SignalState::new(1, "first"),
    SignalState::new(2, "second"),
    SignalState::new(15, "reverse"),
];

static SIGNALS: [SignalDefinition; 5] = [
    // 16 bits, 0.25 rpm, at most 10 Hz.
    SignalDefinition::new("EngSpd", POWERTRAIN, 8, 16)
        .with_generic_name("engine_speed")
        .with_scaling(0.25, 0.0)
        .with_policy(FrequencyPolicy::every(Duration::from_millis(100))),
    // Gear changes go out immediately, but the clock alone is slow.
    SignalDefinition::new("TrnsGr", POWERTRAIN, 24, 4)
        .with_generic_name("transmission_gear_position")
        .with_states(&GEAR_STATES)
        .with_policy(FrequencyPolicy::every(Duration::from_secs(5)).with_force_send_changed(true)),
    // Signed torque, -3200..3200 Nm.
    SignalDefinition::new("EngTrq", POWERTRAIN, 28, 12)
        .with_generic_name("torque_at_transmission")
        .signed()
        .with_scaling(2.0, 0.0)
        .with_range(-3200.0, 3200.0),
    SignalDefinition::new("PrkBrk", BODY, 0, 1)
        .with_generic_name("parking_brake_status")
        .with_decoder(Decoder::Boolean)
        .with_policy(FrequencyPolicy::every(Duration::from_secs(1)).with_send_same(true)),
    SignalDefinition::new("BodyCrc", BODY, 56, 8).with_decoder(Decoder::Ignore),
];

static BUSES: [BusConfig; 1] = [BusConfig::new(1).with_passthrough(
    FrequencyPolicy::every(Duration::from_secs(10)).with_force_send_changed(true),
)];

fn powertrain_frame(rpm: f64, gear: f64, torque: f64) -> RawFrame {
    let mut payload = [0u8; 8];
    encode_signal_bitfield(&SIGNALS[0], rpm, &mut payload).unwrap();
    encode_signal_bitfield(&SIGNALS[1], gear, &mut payload).unwrap();
    encode_signal_bitfield(&SIGNALS[2], torque, &mut payload).unwrap();
    RawFrame::on_bus(1, standard_id(0x0C9).unwrap(), &payload).unwrap()
}

fn body_frame(parking_brake: bool, crc: u8) -> RawFrame {
    let payload = [(parking_brake as u8) << 7, 0, 0, 0, 0, 0, 0, crc];
    RawFrame::on_bus(1, standard_id(0x3B3).unwrap(), &payload).unwrap()
}

fn gateway(ticks: &ManualTicks) -> Gateway<'static, ManualTicks, RecordingPipeline, 8, 4> {
    Gateway::new(&SIGNALS, &BUSES, ticks.clone(), RecordingPipeline::default()).unwrap()
}

#[test]
fn test_first_frame_publishes_every_signal() {
    let ticks = ManualTicks::default();
    let mut gateway = gateway(&ticks);

    gateway.handle_frame(&powertrain_frame(2000.0, 1.0, -150.0));
    let pipeline = gateway.pipeline();

    let speed = pipeline.named("engine_speed");
    assert_eq!(speed.len(), 1);
    assert_eq!(speed[0].value, DecodedValue::Number(2000.0));

    let gear = pipeline.named("transmission_gear_position");
    assert_eq!(gear[0].value.as_str(), Some("first"));

    let torque = pipeline.named("torque_at_transmission");
    assert_eq!(torque[0].value, DecodedValue::Number(-150.0));

    // First sighting registers the message, nothing raw yet.
    assert_eq!(pipeline.raw(0x0C9), 0);
    assert_eq!(gateway.context().registry().len(), 1);
}

#[test]
fn test_rate_limit_and_change_override() {
    let ticks = ManualTicks::default();
    let mut gateway = gateway(&ticks);

    gateway.handle_frame(&powertrain_frame(2000.0, 1.0, 0.0));
    gateway.pipeline_mut().clear();

    // 20 ms later: rpm changed but its clock holds it; gear change goes out.
    ticks.advance(20);
    gateway.handle_frame(&powertrain_frame(2100.0, 2.0, 0.0));
    assert!(gateway.pipeline().named("engine_speed").is_empty());
    assert_eq!(
        gateway.pipeline().named("transmission_gear_position")[0].value.as_str(),
        Some("second")
    );

    // Same gear again: no repeat.
    ticks.advance(20);
    gateway.handle_frame(&powertrain_frame(2100.0, 2.0, 0.0));
    assert_eq!(gateway.pipeline().named("transmission_gear_position").len(), 1);

    // Clock of engine speed fires at 100 ms.
    ticks.set(100);
    gateway.handle_frame(&powertrain_frame(2200.0, 2.0, 0.0));
    let speed = gateway.pipeline().named("engine_speed");
    assert_eq!(speed.len(), 1);
    assert_eq!(speed[0].value, DecodedValue::Number(2200.0));
}

#[test]
fn test_unknown_gear_code_is_silent() {
    let ticks = ManualTicks::default();
    let mut gateway = gateway(&ticks);

    gateway.handle_frame(&powertrain_frame(800.0, 7.0, 0.0));
    assert!(gateway.pipeline().named("transmission_gear_position").is_empty());
    assert_eq!(gateway.pipeline().named("engine_speed").len(), 1);

    // Mapping resumes as soon as a known code shows up.
    ticks.advance(1);
    gateway.handle_frame(&powertrain_frame(800.0, 15.0, 0.0));
    assert_eq!(
        gateway.pipeline().named("transmission_gear_position")[0].value.as_str(),
        Some("reverse")
    );
}

#[test]
fn test_send_same_repeats_on_clock() {
    let ticks = ManualTicks::default();
    let mut gateway = gateway(&ticks);

    for millis in [0, 500, 1000, 1500, 2000] {
        ticks.set(millis);
        gateway.handle_frame(&body_frame(true, millis as u8));
    }

    let brake = gateway.pipeline().named("parking_brake_status");
    assert_eq!(brake.len(), 3);
    assert!(brake.iter().all(|message| message.value == DecodedValue::Boolean(true)));
    // The ignored checksum never shows up, whatever its value.
    assert!(gateway.pipeline().named("BodyCrc").is_empty());
    assert_eq!(
        gateway.context().states().get("BodyCrc").unwrap().last_value(),
        Some((2000u64 as u8) as f64)
    );
}

#[test]
fn test_raw_passthrough_change_detection() {
    let ticks = ManualTicks::default();
    let mut gateway = gateway(&ticks);
    let frame = body_frame(false, 0x11);

    gateway.handle_frame(&frame);
    ticks.advance(10);
    gateway.handle_frame(&frame);
    assert_eq!(gateway.pipeline().raw(0x3B3), 0);

    ticks.advance(10);
    gateway.handle_frame(&body_frame(false, 0x12));
    assert_eq!(gateway.pipeline().raw(0x3B3), 1);

    let record = gateway
        .pipeline()
        .envelopes
        .iter()
        .find_map(|envelope| match envelope {
            Envelope::Can(record) => Some(*record),
            _ => None,
        })
        .unwrap();
    assert_eq!(record.bus, 1);
    assert_eq!(record.payload(), &[0, 0, 0, 0, 0, 0, 0, 0x12]);

    // Periodic forward after the 10 s clock elapses, even unchanged.
    ticks.advance(10_000);
    gateway.handle_frame(&body_frame(false, 0x12));
    assert_eq!(gateway.pipeline().raw(0x3B3), 2);
}

#[test]
fn test_frames_without_signals_only_pass_through() {
    let ticks = ManualTicks::default();
    let mut gateway = gateway(&ticks);
    let request = |did_low: u8| {
        RawFrame::on_bus(1, extended_id(0x18DAF110).unwrap(), &[0x03, 0x22, 0xF1, did_low])
            .unwrap()
    };

    gateway.handle_frame(&request(0x90));
    ticks.advance(5);
    gateway.handle_frame(&request(0x91));

    assert_eq!(gateway.pipeline().envelopes.len(), 1);
    assert_eq!(gateway.pipeline().raw(0x18DAF110), 1);
}
