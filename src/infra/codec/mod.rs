//! Bit-level access to CAN payloads and the scaled bitfield codec built on it.
pub mod bitfield;
pub mod bits;
