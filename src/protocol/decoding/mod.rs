//! Signal decoding: per-signal decoder dispatch, the runtime state table and
//! the send policy deciding whether a decoded value is emitted.
pub mod decoder;
pub mod send_policy;
pub mod state_table;
