//! Scaled bitfields: the bridge between raw CAN payload bits and physical
//! values (`value = raw * factor + offset`).
use crate::core::SignalDefinition;
use crate::error::{BitReaderError, BitWriterError};
use crate::infra::codec::bits::{BitReader, BitWriter};

/// Extract an unsigned field and scale it.
///
/// `bit_position` counts from the most significant bit of byte 0. The field
/// must lie within `payload`; an out-of-range field is reported instead of
/// being read partially.
pub fn extract_bitfield(
    payload: &[u8],
    bit_position: u8,
    bit_size: u8,
    factor: f64,
    offset: f64,
) -> Result<f64, BitReaderError> {
    let raw = BitReader::at(payload, bit_position as usize).read_u64(bit_size)?;
    Ok(raw as f64 * factor + offset)
}

/// Extract a signal's field from a payload, honouring its signedness.
pub fn parse_signal_bitfield(
    signal: &SignalDefinition,
    payload: &[u8],
) -> Result<f64, BitReaderError> {
    if !signal.signed {
        return extract_bitfield(
            payload,
            signal.bit_position,
            signal.bit_size,
            signal.factor,
            signal.offset,
        );
    }

    let raw = BitReader::at(payload, signal.bit_position as usize).read_u64(signal.bit_size)?;
    Ok(sign_extend(raw, signal.bit_size) as f64 * signal.factor + signal.offset)
}

/// Write a physical value into a signal's field: the inverse of
/// [`parse_signal_bitfield`]. The value must lie within the signal's
/// declared range, if any. The raw value is rounded to the nearest integer
/// and must fit the field.
pub fn encode_signal_bitfield(
    signal: &SignalDefinition,
    value: f64,
    payload: &mut [u8],
) -> Result<(), BitWriterError> {
    let bits = signal.bit_size;
    if !(1..=64).contains(&bits) {
        return Err(BitWriterError::TooLongForType {
            max: 64,
            asked: bits,
        });
    }
    if signal.factor == 0.0 {
        return Err(BitWriterError::ValueOutOfRange { bits });
    }
    let below = signal.min_value.is_some_and(|min| value < min);
    let above = signal.max_value.is_some_and(|max| value > max);
    if below || above {
        return Err(BitWriterError::OutsideSignalRange { name: signal.name });
    }

    let scaled = (value - signal.offset) / signal.factor;
    let raw = round_to_i128(scaled);

    let (min, max) = if signal.signed {
        (-(1i128 << (bits - 1)), (1i128 << (bits - 1)) - 1)
    } else {
        (0, (1i128 << bits) - 1)
    };
    if raw < min || raw > max {
        return Err(BitWriterError::ValueOutOfRange { bits });
    }

    BitWriter::at(payload, signal.bit_position as usize).write_u64(raw as u64, bits)
}

/// Interpret the `bits` low bits of `raw` as a two's complement integer.
fn sign_extend(raw: u64, bits: u8) -> i64 {
    if bits >= 64 {
        return raw as i64;
    }
    let sign_bit = 1u64 << (bits - 1);
    if raw & sign_bit != 0 {
        (raw | !((1u64 << bits) - 1)) as i64
    } else {
        raw as i64
    }
}

// `f64::round` lives in std; round half away from zero by hand.
fn round_to_i128(value: f64) -> i128 {
    if value >= 0.0 {
        (value + 0.5) as i128
    } else {
        (value - 0.5) as i128
    }
}
