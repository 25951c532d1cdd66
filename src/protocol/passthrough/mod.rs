//! Raw message passthrough: forwards frames unmodified, rate limited per
//! message, and learns unknown message identifiers on the fly.
//!
//! The registry is a fixed-capacity arena keyed by (bus, id, format). There
//! is no eviction: once full, unknown identifiers are simply not forwarded
//! and registration is attempted again on their next occurrence.
use embassy_time::Instant;
use heapless::Vec;

use crate::core::{BusConfig, FrequencyPolicy, MessageKey, CAN_MESSAGE_SIZE};
use crate::error::RegistryError;
use crate::protocol::publish::CanRecord;
use crate::protocol::timing::FrequencyClock;
use crate::protocol::transport::can_frame::RawFrame;

/// Runtime definition of a message seen (or declared) on a bus.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MessageDefinition {
    key: MessageKey,
    policy: FrequencyPolicy,
    clock: FrequencyClock,
    /// Payload of the latest processed frame, zero padded past its length.
    last_value: [u8; CAN_MESSAGE_SIZE],
    /// Effective length of that frame, 0 until one is processed.
    last_len: usize,
}

impl MessageDefinition {
    pub fn key(&self) -> MessageKey {
        self.key
    }

    pub fn policy(&self) -> &FrequencyPolicy {
        &self.policy
    }

    pub fn clock(&self) -> &FrequencyClock {
        &self.clock
    }

    pub fn last_value(&self) -> &[u8; CAN_MESSAGE_SIZE] {
        &self.last_value
    }

    /// Bytes of [`last_value`](Self::last_value) that belong to the frame.
    pub fn last_payload(&self) -> &[u8] {
        &self.last_value[..self.last_len]
    }

    /// Whether `frame` carries something else than the stored payload,
    /// length included.
    fn differs_from(&self, frame: &RawFrame) -> bool {
        frame.effective_len() != self.last_len || frame.normalized_payload() != self.last_value
    }

    pub fn force_send_changed(&self) -> bool {
        self.policy.force_send_changed
    }
}

/// Outcome of [`MessageRegistry::process_raw_frame`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PassthroughResult {
    /// Unknown message, now registered. Nothing is forwarded this cycle.
    Registered,
    /// Unknown message and the registry is full: dropped, not registered.
    RegistryFull,
    /// Known message, held back by its rate limit.
    Suppressed,
    /// Known message to forward as a raw record.
    Forward(CanRecord),
}

/// Bounded set of message definitions shared by all buses.
#[derive(Debug, Clone)]
pub struct MessageRegistry<const N: usize> {
    definitions: Vec<MessageDefinition, N>,
}

impl<const N: usize> Default for MessageRegistry<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> MessageRegistry<N> {
    pub const fn new() -> Self {
        Self {
            definitions: Vec::new(),
        }
    }

    /// Declare a message known in advance. Its clock fires on the first
    /// frame received for it.
    pub fn register(
        &mut self,
        key: MessageKey,
        policy: FrequencyPolicy,
    ) -> Result<&MessageDefinition, RegistryError> {
        self.insert(MessageDefinition {
            key,
            policy,
            clock: FrequencyClock::new(policy.interval),
            last_value: [0; CAN_MESSAGE_SIZE],
            last_len: 0,
        })
    }

    /// Register a message first observed in `frame` at `now`. The payload
    /// becomes the reference for change detection and the clock starts now.
    pub fn register_observed(
        &mut self,
        frame: &RawFrame,
        policy: FrequencyPolicy,
        now: Instant,
    ) -> Result<&MessageDefinition, RegistryError> {
        self.insert(MessageDefinition {
            key: frame.key(),
            policy,
            clock: FrequencyClock::started_at(policy.interval, now),
            last_value: frame.normalized_payload(),
            last_len: frame.effective_len(),
        })
    }

    fn insert(
        &mut self,
        definition: MessageDefinition,
    ) -> Result<&MessageDefinition, RegistryError> {
        if self.lookup(&definition.key).is_some() {
            return Err(RegistryError::AlreadyRegistered {
                bus: definition.key.bus,
                id: definition.key.id,
            });
        }
        self.definitions
            .push(definition)
            .map_err(|_| RegistryError::Full { capacity: N })?;
        // Just pushed, so `last` is the new entry.
        self.definitions
            .last()
            .ok_or(RegistryError::Full { capacity: N })
    }

    pub fn lookup(&self, key: &MessageKey) -> Option<&MessageDefinition> {
        self.definitions.iter().find(|definition| definition.key == *key)
    }

    fn lookup_mut(&mut self, key: &MessageKey) -> Option<&mut MessageDefinition> {
        self.definitions
            .iter_mut()
            .find(|definition| definition.key == *key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MessageDefinition> {
        self.definitions.iter()
    }

    /// Definitions registered for one bus.
    pub fn on_bus(&self, bus: u8) -> impl Iterator<Item = &MessageDefinition> {
        self.definitions
            .iter()
            .filter(move |definition| definition.key.bus == bus)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.definitions.is_full()
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    /// Decide whether `frame` is forwarded as a raw record.
    ///
    /// Known messages are forwarded when their clock fires, or when the
    /// payload (bytes or length) changed and the definition forces changed
    /// payloads through.
    /// The stored payload is replaced by the frame's in every case.
    pub fn process_raw_frame(
        &mut self,
        bus: &BusConfig,
        frame: &RawFrame,
        now: Instant,
    ) -> PassthroughResult {
        let key = frame.key();

        let Some(definition) = self.lookup_mut(&key) else {
            return match self.register_observed(frame, bus.raw_policy, now) {
                Ok(_) => PassthroughResult::Registered,
                Err(_) => PassthroughResult::RegistryFull,
            };
        };

        let changed = definition.differs_from(frame);
        let forward = definition.clock.conditional_tick(now)
            || (changed && definition.policy.force_send_changed);
        definition.last_value = frame.normalized_payload();
        definition.last_len = frame.effective_len();

        if forward {
            PassthroughResult::Forward(CanRecord::from_frame(bus.address, frame))
        } else {
            PassthroughResult::Suppressed
        }
    }
}
