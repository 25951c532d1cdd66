//! Publisher façade: builds outbound envelopes and hands them to the
//! pipeline collaborator, one call per decision, without retries.
//!
//! Transmission and serialization belong to the [`Pipeline`] implementation.
//! The one provided here, [`ChannelPipeline`], enqueues into a bounded
//! [`embassy_sync::channel::Channel`] without ever blocking the decode loop.
use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::Sender;

use crate::core::{DecodedValue, CAN_MESSAGE_SIZE};
use crate::infra::trace::warn;
use crate::protocol::transport::can_frame::RawFrame;

/// Named value, optionally qualified by an event.
#[derive(Debug, Clone, PartialEq)]
pub struct SimpleMessage {
    pub name: &'static str,
    pub value: DecodedValue,
    /// `DecodedValue::None` when the message carries no event.
    pub event: DecodedValue,
}

/// Raw CAN message forwarded by the passthrough path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanRecord {
    pub bus: u8,
    pub id: u32,
    pub data: [u8; CAN_MESSAGE_SIZE],
    /// Number of valid bytes in `data`.
    pub len: usize,
}

impl CanRecord {
    /// Record for `frame` on `bus`, payload truncated to the frame's effective length.
    pub fn from_frame(bus: u8, frame: &RawFrame) -> Self {
        Self {
            bus,
            id: frame.raw_id(),
            data: frame.normalized_payload(),
            len: frame.effective_len(),
        }
    }

    pub fn payload(&self) -> &[u8] {
        &self.data[..self.len.min(CAN_MESSAGE_SIZE)]
    }
}

/// Outbound unit handed to the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    Simple(SimpleMessage),
    Can(CanRecord),
}

/// Outbound pipeline collaborator.
///
/// `publish` must return promptly: implementations queue or drop, they never
/// wait for the transport.
pub trait Pipeline {
    fn publish(&mut self, envelope: Envelope);
}

impl<P: Pipeline + ?Sized> Pipeline for &mut P {
    fn publish(&mut self, envelope: Envelope) {
        (**self).publish(envelope)
    }
}

//==================================================================================FACADE

/// Publish a named value with an optional event.
pub fn publish_vehicle_message<P: Pipeline + ?Sized>(
    name: &'static str,
    value: DecodedValue,
    event: Option<DecodedValue>,
    pipeline: &mut P,
) {
    pipeline.publish(Envelope::Simple(SimpleMessage {
        name,
        value,
        event: event.unwrap_or_default(),
    }));
}

pub fn publish_numerical_message<P: Pipeline + ?Sized>(
    name: &'static str,
    value: f64,
    pipeline: &mut P,
) {
    publish_vehicle_message(name, DecodedValue::Number(value), None, pipeline);
}

pub fn publish_boolean_message<P: Pipeline + ?Sized>(
    name: &'static str,
    value: bool,
    pipeline: &mut P,
) {
    publish_vehicle_message(name, DecodedValue::Boolean(value), None, pipeline);
}

pub fn publish_string_message<P: Pipeline + ?Sized>(
    name: &'static str,
    value: &str,
    pipeline: &mut P,
) {
    publish_vehicle_message(name, DecodedValue::string(value), None, pipeline);
}

/// String value qualified by a string event (e.g. a button and its action).
pub fn publish_string_evented_message<P: Pipeline + ?Sized>(
    name: &'static str,
    value: &str,
    event: &str,
    pipeline: &mut P,
) {
    publish_vehicle_message(
        name,
        DecodedValue::string(value),
        Some(DecodedValue::string(event)),
        pipeline,
    );
}

/// String value qualified by a boolean event (e.g. a door and whether it is ajar).
pub fn publish_string_evented_boolean_message<P: Pipeline + ?Sized>(
    name: &'static str,
    value: &str,
    event: bool,
    pipeline: &mut P,
) {
    publish_vehicle_message(
        name,
        DecodedValue::string(value),
        Some(DecodedValue::Boolean(event)),
        pipeline,
    );
}

pub fn publish_can_record<P: Pipeline + ?Sized>(record: CanRecord, pipeline: &mut P) {
    pipeline.publish(Envelope::Can(record));
}

//==================================================================================CHANNEL_PIPELINE

/// Pipeline enqueuing envelopes into a bounded channel drained by the
/// transport task. A full queue drops the envelope and counts it.
pub struct ChannelPipeline<'a, M: RawMutex, const N: usize> {
    sender: Sender<'a, M, Envelope, N>,
    dropped: u32,
}

impl<'a, M: RawMutex, const N: usize> ChannelPipeline<'a, M, N> {
    pub fn new(sender: Sender<'a, M, Envelope, N>) -> Self {
        Self { sender, dropped: 0 }
    }

    /// Envelopes dropped because the queue was full.
    pub fn dropped(&self) -> u32 {
        self.dropped
    }
}

impl<'a, M: RawMutex, const N: usize> Pipeline for ChannelPipeline<'a, M, N> {
    fn publish(&mut self, envelope: Envelope) {
        if self.sender.try_send(envelope).is_err() {
            self.dropped = self.dropped.wrapping_add(1);
            warn!("Outbound queue full, {} envelopes dropped", self.dropped);
        }
    }
}
