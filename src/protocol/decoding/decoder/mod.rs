//! Decoder dispatch: per-signal transform from a scaled physical value to an
//! application-level [`DecodedValue`].
//!
//! The built-in decoders form a closed set ([`Decoder`]). Firmware-specific
//! transforms plug in through [`SignalDecoder`] and are dispatched the same
//! way. Decoding runs for every signal on every frame, before the send policy
//! is consulted, since custom decoders may keep derived state of their own.
use core::fmt;

use crate::core::{DecodedValue, SignalDefinition};
use crate::error::BitReaderError;
use crate::infra::codec::bitfield::parse_signal_bitfield;
use crate::protocol::decoding::state_table::SignalRuntimeState;

/// Outcome of a decoder: the value, and whether it may be sent at all.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    pub value: DecodedValue,
    /// `false` when the decoder asks for the value to be suppressed.
    pub send: bool,
}

impl Decoded {
    /// Value eligible for publication (subject to the send policy).
    pub fn send(value: DecodedValue) -> Self {
        Self { value, send: true }
    }

    /// Nothing to report this cycle.
    pub fn suppressed() -> Self {
        Self {
            value: DecodedValue::None,
            send: false,
        }
    }
}

/// Read-only view of the whole signal catalog handed to decoders, so custom
/// ones can combine several signals.
#[derive(Clone, Copy)]
pub struct Candidates<'a> {
    signals: &'a [SignalDefinition],
    states: &'a [SignalRuntimeState],
}

impl<'a> Candidates<'a> {
    pub fn new(signals: &'a [SignalDefinition], states: &'a [SignalRuntimeState]) -> Self {
        Self { signals, states }
    }

    /// View over a catalog with no runtime state (nothing observed yet).
    pub fn catalog(signals: &'a [SignalDefinition]) -> Self {
        Self { signals, states: &[] }
    }

    pub fn signals(&self) -> &'a [SignalDefinition] {
        self.signals
    }

    pub fn find(&self, name: &str) -> Option<&'a SignalDefinition> {
        self.signals.iter().find(|signal| signal.name == name)
    }

    /// Last observed value of another signal, `None` if it was never seen.
    pub fn last_value(&self, name: &str) -> Option<f64> {
        self.states
            .iter()
            .find(|state| state.name() == name)
            .and_then(SignalRuntimeState::last_value)
    }
}

/// Extension point for decoders supplied by the firmware.
///
/// Implementations live in `static`s referenced by the catalog, hence `Sync`;
/// any derived state they keep needs interior mutability.
pub trait SignalDecoder: Sync {
    fn decode(&self, signal: &SignalDefinition, candidates: &Candidates<'_>, value: f64) -> Decoded;
}

/// Decoder selected by a signal definition.
#[derive(Clone, Copy)]
pub enum Decoder {
    /// Publish the scaled number unchanged.
    Number,
    /// `value != 0`.
    Boolean,
    /// Never publish; the signal only feeds other computations.
    Ignore,
    /// Name of the matching entry of the signal's states table.
    State,
    Custom(&'static dyn SignalDecoder),
}

impl fmt::Debug for Decoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decoder::Number => f.write_str("Number"),
            Decoder::Boolean => f.write_str("Boolean"),
            Decoder::Ignore => f.write_str("Ignore"),
            Decoder::State => f.write_str("State"),
            Decoder::Custom(_) => f.write_str("Custom"),
        }
    }
}

impl Decoder {
    pub fn decode(
        &self,
        signal: &SignalDefinition,
        candidates: &Candidates<'_>,
        value: f64,
    ) -> Decoded {
        match self {
            Decoder::Number => number_decoder(value),
            Decoder::Boolean => boolean_decoder(value),
            Decoder::Ignore => ignore_decoder(),
            Decoder::State => state_decoder(signal, value),
            Decoder::Custom(decoder) => decoder.decode(signal, candidates, value),
        }
    }
}

/// Run the signal's decoder, the numeric one when none is configured.
pub fn decode_signal(
    signal: &SignalDefinition,
    candidates: &Candidates<'_>,
    value: f64,
) -> Decoded {
    signal
        .decoder
        .unwrap_or(Decoder::Number)
        .decode(signal, candidates, value)
}

/// Extract the signal from `payload` and decode it in one step.
pub fn decode_signal_from_frame(
    signal: &SignalDefinition,
    candidates: &Candidates<'_>,
    payload: &[u8],
) -> Result<Decoded, BitReaderError> {
    let value = parse_signal_bitfield(signal, payload)?;
    Ok(decode_signal(signal, candidates, value))
}

pub fn number_decoder(value: f64) -> Decoded {
    Decoded::send(DecodedValue::Number(value))
}

pub fn boolean_decoder(value: f64) -> Decoded {
    Decoded::send(DecodedValue::Boolean(value != 0.0))
}

pub fn ignore_decoder() -> Decoded {
    Decoded::suppressed()
}

/// Exact match on the raw state code; an unknown code is suppressed, not an error.
pub fn state_decoder(signal: &SignalDefinition, value: f64) -> Decoded {
    match signal.lookup_state(value) {
        Some(state) => Decoded::send(DecodedValue::string(state.name)),
        None => Decoded::suppressed(),
    }
}
