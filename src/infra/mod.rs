//! Low-level building blocks: the MSB-first bit codec used to address signal
//! fields inside CAN payloads, and the diagnostics macros.
pub mod codec;
pub(crate) mod trace;
