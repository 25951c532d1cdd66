//! `can-translate` library: the signal translation core of a CAN telemetry
//! gateway, usable in a `no_std` environment. Raw frames go in, named and
//! typed values (or raw passthrough records) come out, filtered by per-signal
//! and per-message send policies.
#![no_std]
//==================================================================================
/// Static catalog types and values shared by every stage of the pipeline.
pub mod core;
/// Construction-time and low-level errors (bit access, catalog, registry).
pub mod error;
/// Bit-level codec and diagnostics plumbing.
pub mod infra;
/// Frame transport types, timing, decoding, passthrough and publishing.
pub mod protocol;
//==================================================================================
