//! Defines the "data contract" between the static catalog authored by the
//! firmware (signals, messages, buses) and the translation engine.
//!
//! Every type here is `const`-constructible so catalogs can live in `static`
//! tables. The engine only reads them; all mutable state lives in the
//! runtime tables owned by the [`DecodeContext`](crate::protocol::gateway::DecodeContext).
use embassy_time::Duration;
use heapless::String;

use crate::protocol::decoding::decoder::Decoder;

/// Payload size of a classic CAN frame.
pub const CAN_MESSAGE_SIZE: usize = 8;

/// Maximum length of a string value carried by an outbound envelope.
pub const MAX_STRING_VALUE: usize = 100;

//==================================================================================FRAME_FORMAT
/// Identifier width of a CAN frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameFormat {
    /// 11-bit identifier.
    Standard,
    /// 29-bit identifier.
    Extended,
}

/// Stable key of a message: the bus it was seen on, its identifier and format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MessageKey {
    /// Address of the bus carrying the message.
    pub bus: u8,
    /// Raw identifier (11 or 29 bits depending on `format`).
    pub id: u32,
    /// Identifier width.
    pub format: FrameFormat,
}

impl MessageKey {
    /// Key for a standard (11-bit) message.
    pub const fn standard(bus: u8, id: u32) -> Self {
        Self {
            bus,
            id,
            format: FrameFormat::Standard,
        }
    }

    /// Key for an extended (29-bit) message.
    pub const fn extended(bus: u8, id: u32) -> Self {
        Self {
            bus,
            id,
            format: FrameFormat::Extended,
        }
    }
}

//==================================================================================FREQUENCY_POLICY
/// Rate limiting rules shared by signals and raw messages.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrequencyPolicy {
    /// Minimum delay between two clock-driven emissions. Zero disables the
    /// limit: the clock fires on every check.
    pub interval: Duration,
    /// Emit as soon as the value changes, even if the clock has not fired.
    pub force_send_changed: bool,
    /// Emit even when the value is identical to the last observed one.
    /// Only meaningful for signals; raw messages ignore it.
    pub send_same: bool,
}

impl FrequencyPolicy {
    /// No rate limit, duplicates suppressed.
    pub const UNLIMITED: Self = Self::every(Duration::from_ticks(0));

    /// Clock-driven policy with the given interval, duplicates suppressed.
    pub const fn every(interval: Duration) -> Self {
        Self {
            interval,
            force_send_changed: false,
            send_same: false,
        }
    }

    /// Build a policy from a maximum frequency in Hz. `0.0` (or any
    /// non-positive rate) means unlimited.
    pub fn from_hz(hz: f32) -> Self {
        if hz > 0.0 {
            Self::every(Duration::from_micros((1_000_000.0 / hz) as u64))
        } else {
            Self::UNLIMITED
        }
    }

    pub const fn with_force_send_changed(mut self, force_send_changed: bool) -> Self {
        self.force_send_changed = force_send_changed;
        self
    }

    pub const fn with_send_same(mut self, send_same: bool) -> Self {
        self.send_same = send_same;
        self
    }
}

impl Default for FrequencyPolicy {
    fn default() -> Self {
        Self::UNLIMITED
    }
}

//==================================================================================MESSAGE
/// Raw message known before any frame is seen, forwarded under its own policy
/// instead of the bus default.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MessageConfig {
    pub key: MessageKey,
    pub policy: FrequencyPolicy,
}

impl MessageConfig {
    pub const fn new(key: MessageKey, policy: FrequencyPolicy) -> Self {
        Self { key, policy }
    }
}

//==================================================================================SIGNAL
/// One entry of an enumerated states table: a raw code and its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignalState {
    pub value: i32,
    pub name: &'static str,
}

impl SignalState {
    pub const fn new(value: i32, name: &'static str) -> Self {
        Self { value, name }
    }
}

/// Static description of a bit-addressed field inside a message.
#[derive(Debug, Clone, Copy)]
pub struct SignalDefinition {
    /// Unique name, used to locate the signal's runtime state.
    pub name: &'static str,
    /// Name published in outbound envelopes.
    pub generic_name: &'static str,
    /// Message carrying the signal.
    pub message: MessageKey,
    /// First bit of the field, counted from the most significant bit of byte 0.
    pub bit_position: u8,
    /// Width of the field in bits (1 to 64).
    pub bit_size: u8,
    /// Whether the raw field is a two's complement integer.
    pub signed: bool,
    pub factor: f64,
    pub offset: f64,
    /// Physical bounds enforced by `encode_signal_bitfield`; decoding
    /// publishes whatever the bus carries.
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
    pub policy: FrequencyPolicy,
    /// `None` publishes the scaled number as-is.
    pub decoder: Option<Decoder>,
    /// Table consulted by [`Decoder::State`].
    pub states: &'static [SignalState],
}

impl SignalDefinition {
    /// Unsigned, unscaled signal published under its own name without rate limit.
    pub const fn new(
        name: &'static str,
        message: MessageKey,
        bit_position: u8,
        bit_size: u8,
    ) -> Self {
        Self {
            name,
            generic_name: name,
            message,
            bit_position,
            bit_size,
            signed: false,
            factor: 1.0,
            offset: 0.0,
            min_value: None,
            max_value: None,
            policy: FrequencyPolicy::UNLIMITED,
            decoder: None,
            states: &[],
        }
    }

    pub const fn with_generic_name(mut self, generic_name: &'static str) -> Self {
        self.generic_name = generic_name;
        self
    }

    pub const fn with_scaling(mut self, factor: f64, offset: f64) -> Self {
        self.factor = factor;
        self.offset = offset;
        self
    }

    pub const fn with_range(mut self, min_value: f64, max_value: f64) -> Self {
        self.min_value = Some(min_value);
        self.max_value = Some(max_value);
        self
    }

    pub const fn signed(mut self) -> Self {
        self.signed = true;
        self
    }

    pub const fn with_policy(mut self, policy: FrequencyPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub const fn with_decoder(mut self, decoder: Decoder) -> Self {
        self.decoder = Some(decoder);
        self
    }

    /// Attach a states table and select the state decoder.
    pub const fn with_states(mut self, states: &'static [SignalState]) -> Self {
        self.states = states;
        self.decoder = Some(Decoder::State);
        self
    }

    /// Entry of the states table matching `value` exactly.
    pub fn lookup_state(&self, value: f64) -> Option<&'static SignalState> {
        self.states.iter().find(|state| state.value as f64 == value)
    }
}

//==================================================================================BUS
/// Static configuration of one CAN bus as seen by the translation core.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BusConfig {
    /// Bus address carried by frames and outbound raw records.
    pub address: u8,
    /// Forward raw frames (and auto-register unknown ids) for this bus.
    pub passthrough: bool,
    /// Policy given to message definitions registered on the fly.
    pub raw_policy: FrequencyPolicy,
}

impl BusConfig {
    /// Bus without passthrough. Auto-registered messages would be forwarded
    /// on change with no rate limit.
    pub const fn new(address: u8) -> Self {
        Self {
            address,
            passthrough: false,
            raw_policy: FrequencyPolicy::UNLIMITED.with_force_send_changed(true),
        }
    }

    pub const fn with_passthrough(mut self, raw_policy: FrequencyPolicy) -> Self {
        self.passthrough = true;
        self.raw_policy = raw_policy;
        self
    }
}

//==================================================================================DECODED_VALUE
/// Bounded string used by decoded values.
pub type ValueString = String<MAX_STRING_VALUE>;

/// Application-level value produced by a decoder.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DecodedValue {
    Number(f64),
    Boolean(bool),
    String(ValueString),
    #[default]
    None,
}

impl DecodedValue {
    /// Wrap a string, truncating it on a character boundary when it exceeds
    /// [`MAX_STRING_VALUE`] bytes.
    pub fn string(value: &str) -> Self {
        let mut bounded = ValueString::new();
        for c in value.chars() {
            if bounded.push(c).is_err() {
                break;
            }
        }
        DecodedValue::String(bounded)
    }

    pub fn is_none(&self) -> bool {
        matches!(self, DecodedValue::None)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            DecodedValue::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            DecodedValue::String(value) => Some(value.as_str()),
            _ => None,
        }
    }
}

impl From<f64> for DecodedValue {
    fn from(value: f64) -> Self {
        DecodedValue::Number(value)
    }
}

impl From<bool> for DecodedValue {
    fn from(value: bool) -> Self {
        DecodedValue::Boolean(value)
    }
}
