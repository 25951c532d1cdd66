//! Runtime state of every signal in the catalog, looked up by stable name.
use heapless::Vec;

use crate::core::SignalDefinition;
use crate::error::CatalogError;
use crate::protocol::timing::FrequencyClock;

/// Mutable per-signal state: last value, first-observation flag and the
/// signal's frequency clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalRuntimeState {
    name: &'static str,
    last_value: f64,
    received: bool,
    pub(crate) clock: FrequencyClock,
}

impl SignalRuntimeState {
    /// Fresh state for `signal`: never observed, clock not started.
    pub fn new(signal: &SignalDefinition) -> Self {
        Self {
            name: signal.name,
            last_value: 0.0,
            received: false,
            clock: FrequencyClock::new(signal.policy.interval),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Last value seen for the signal, `None` until the first observation.
    pub fn last_value(&self) -> Option<f64> {
        self.received.then_some(self.last_value)
    }

    pub fn received(&self) -> bool {
        self.received
    }

    pub fn clock(&self) -> &FrequencyClock {
        &self.clock
    }

    /// Raw last value, meaningful only once `received` is set.
    pub(crate) fn raw_last_value(&self) -> f64 {
        self.last_value
    }

    /// Remember `value` as the latest observation.
    pub(crate) fn record(&mut self, value: f64) {
        self.last_value = value;
        self.received = true;
    }
}

/// Fixed-capacity table holding one [`SignalRuntimeState`] per catalog signal.
#[derive(Debug, Clone)]
pub struct SignalStateTable<const N: usize> {
    states: Vec<SignalRuntimeState, N>,
}

impl<const N: usize> SignalStateTable<N> {
    /// Build one state per signal. Fails when the catalog exceeds `N` or two
    /// signals share a name.
    pub fn from_catalog(signals: &[SignalDefinition]) -> Result<Self, CatalogError> {
        if signals.len() > N {
            return Err(CatalogError::TooManySignals {
                count: signals.len(),
                capacity: N,
            });
        }

        let mut states = Vec::new();
        for signal in signals {
            if states
                .iter()
                .any(|state: &SignalRuntimeState| state.name == signal.name)
            {
                return Err(CatalogError::DuplicateSignal { name: signal.name });
            }
            // Capacity checked above.
            let _ = states.push(SignalRuntimeState::new(signal));
        }

        Ok(Self { states })
    }

    pub fn get(&self, name: &str) -> Option<&SignalRuntimeState> {
        self.states.iter().find(|state| state.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut SignalRuntimeState> {
        self.states.iter_mut().find(|state| state.name == name)
    }

    pub fn as_slice(&self) -> &[SignalRuntimeState] {
        &self.states
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}
