//! In-memory representation of a classic CAN frame as handed over by the
//! transport collaborator.
use embedded_can::{ExtendedId, Frame, Id, StandardId};

use crate::core::{FrameFormat, MessageKey, CAN_MESSAGE_SIZE};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Raw CAN data frame captured on a given bus.
pub struct RawFrame {
    /// Address of the bus the frame was received on.
    pub bus: u8,
    /// Standard or extended identifier.
    pub id: Id,
    /// Payload buffer. Bytes past `len` are not part of the frame.
    pub data: [u8; CAN_MESSAGE_SIZE],
    /// Number of valid payload bytes (Data Length Code, 0 to 8).
    pub len: usize,
}

impl RawFrame {
    /// Build a data frame on `bus`. Returns `None` when the payload exceeds
    /// eight bytes.
    pub fn on_bus(bus: u8, id: impl Into<Id>, payload: &[u8]) -> Option<Self> {
        if payload.len() > CAN_MESSAGE_SIZE {
            return None;
        }
        let mut data = [0u8; CAN_MESSAGE_SIZE];
        data[..payload.len()].copy_from_slice(payload);
        Some(Self {
            bus,
            id: id.into(),
            data,
            len: payload.len(),
        })
    }

    /// Copy any HAL frame into a `RawFrame` tagged with `bus`. Remote frames
    /// carry no signal data and are rejected.
    pub fn from_frame<F: Frame>(bus: u8, frame: &F) -> Option<Self> {
        if frame.is_remote_frame() {
            return None;
        }
        Self::on_bus(bus, frame.id(), frame.data())
    }

    /// Identifier as a plain integer.
    pub fn raw_id(&self) -> u32 {
        match self.id {
            Id::Standard(id) => id.as_raw() as u32,
            Id::Extended(id) => id.as_raw(),
        }
    }

    pub fn format(&self) -> FrameFormat {
        match self.id {
            Id::Standard(_) => FrameFormat::Standard,
            Id::Extended(_) => FrameFormat::Extended,
        }
    }

    /// Registry key of the message carried by this frame.
    pub fn key(&self) -> MessageKey {
        MessageKey {
            bus: self.bus,
            id: self.raw_id(),
            format: self.format(),
        }
    }

    /// Number of bytes that count for comparisons and forwarding: a length of
    /// zero stands for a full frame, anything larger than eight is clamped.
    pub fn effective_len(&self) -> usize {
        if self.len == 0 {
            CAN_MESSAGE_SIZE
        } else {
            self.len.min(CAN_MESSAGE_SIZE)
        }
    }

    /// Payload truncated to the effective length, zero padded to eight bytes.
    pub fn normalized_payload(&self) -> [u8; CAN_MESSAGE_SIZE] {
        let len = self.effective_len();
        let mut payload = [0u8; CAN_MESSAGE_SIZE];
        payload[..len].copy_from_slice(&self.data[..len]);
        payload
    }
}

impl Frame for RawFrame {
    fn new(id: impl Into<Id>, data: &[u8]) -> Option<Self> {
        Self::on_bus(0, id, data)
    }

    fn new_remote(_id: impl Into<Id>, _dlc: usize) -> Option<Self> {
        None
    }

    fn is_extended(&self) -> bool {
        matches!(self.id, Id::Extended(_))
    }

    fn is_remote_frame(&self) -> bool {
        false
    }

    fn id(&self) -> Id {
        self.id
    }

    fn dlc(&self) -> usize {
        self.len
    }

    fn data(&self) -> &[u8] {
        &self.data[..self.len.min(CAN_MESSAGE_SIZE)]
    }
}

/// Standard identifier from a raw value, `None` above 0x7FF.
pub fn standard_id(raw: u16) -> Option<Id> {
    StandardId::new(raw).map(Id::Standard)
}

/// Extended identifier from a raw value, `None` above 0x1FFF_FFFF.
pub fn extended_id(raw: u32) -> Option<Id> {
    ExtendedId::new(raw).map(Id::Extended)
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
