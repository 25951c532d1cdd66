//! Send policy: decides, per signal, whether a freshly decoded value is
//! emitted this cycle.
//!
//! The frequency clock gates emissions; a changed value can force its way
//! through when the signal asks for it. Duplicate suppression then vetoes an
//! unchanged value unless the signal opts out with `send_same`.
use embassy_time::Instant;

use crate::core::SignalDefinition;
use crate::protocol::decoding::state_table::SignalRuntimeState;

/// Evaluate the policy of `signal` for `value` at `now`.
///
/// Whatever the outcome, `state` afterwards holds `value` as its last value
/// and is marked as observed.
pub fn should_send(
    signal: &SignalDefinition,
    state: &mut SignalRuntimeState,
    value: f64,
    now: Instant,
) -> bool {
    let changed = value != state.raw_last_value();

    // The clock is checked first so it ticks even when a change forces the send.
    let send = if state.clock.conditional_tick(now) || (changed && signal.policy.force_send_changed)
    {
        !(state.received() && !signal.policy.send_same && !changed)
    } else {
        false
    };

    state.record(value);
    send
}
