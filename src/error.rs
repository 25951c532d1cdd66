//! Error definitions shared across library modules.
//!
//! Frame processing itself never fails: anomalies met while translating a
//! frame are absorbed into "do not emit" / "do not register". These types
//! describe the individual failures that get absorbed, plus the few that are
//! surfaced at construction time or by the asynchronous frame pump.
use thiserror_no_std::Error;

//==================================================================================CATALOG_ERROR
#[derive(Error, Debug, PartialEq, Eq)]
/// Problems detected while building runtime tables from the static catalogs.
pub enum CatalogError {
    /// The catalog holds more signals than the runtime table can track.
    #[error("Catalog holds {count} signals, runtime table capacity is {capacity}")]
    TooManySignals { count: usize, capacity: usize },
    /// Two signals share the same name, so their runtime states would collide.
    #[error("Duplicate signal name {name}")]
    DuplicateSignal { name: &'static str },
    /// A declared message could not be added to the passthrough registry.
    #[error("Declared message rejected: {0}")]
    Registry(RegistryError),
}

//==================================================================================REGISTRY_ERROR
#[derive(Error, Debug, PartialEq, Eq)]
/// Failures while adding a message definition to the passthrough registry.
pub enum RegistryError {
    /// Fixed capacity exhausted; entries are never evicted.
    #[error("Message registry full (capacity {capacity})")]
    Full { capacity: usize },
    /// A definition already exists for this bus, identifier and format.
    #[error("Message {id} already registered on bus {bus}")]
    AlreadyRegistered { bus: u8, id: u32 },
}

//==================================================================================GATEWAY_ERROR
#[derive(Error, Debug)]
/// Errors ending the asynchronous frame pump.
pub enum GatewayError<E: core::fmt::Debug> {
    /// The frame source failed to deliver the next frame.
    #[error("Frame source error: {0:?}")]
    Source(E),
}

//==================================================================================BITREADER_ERRORS
#[derive(Debug, Error, PartialEq, Eq)]
/// Errors raised during bitwise buffer reads.
pub enum BitReaderError {
    /// Attempted to read past the end of the buffer.
    #[error("Attempted to read out of bounds -> asked: {asked}, available: {available}")]
    OutOfBounds { asked: usize, available: usize },
    /// Requested more bits than the target type can hold.
    #[error("Cannot read more than {max} bits. Requested: {asked}")]
    TooLongForType { max: u8, asked: u8 },
}
//==================================================================================BITWRITER_ERRORS
#[derive(Debug, Error, PartialEq, Eq)]
/// Errors raised during bitwise writes into a buffer.
pub enum BitWriterError {
    /// Attempted to write beyond the provided capacity.
    #[error("Attempted to write out of bounds -> asked: {asked}, available: {available}")]
    OutOfBounds { asked: usize, available: usize },
    /// Field is too large for the provided type.
    #[error("Cannot write more than {max} bits. Requested: {asked}")]
    TooLongForType { max: u8, asked: u8 },
    /// Physical value cannot be represented in the field once scaled.
    #[error("Value does not fit in a {bits}-bit field")]
    ValueOutOfRange { bits: u8 },
    /// Physical value outside the signal's declared minimum and maximum.
    #[error("Value outside the range declared for signal {name}")]
    OutsideSignalRange { name: &'static str },
}
