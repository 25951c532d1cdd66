//! Translation pipeline, from the raw frame handed over by the transport to
//! the envelopes handed to the outbound pipeline.
pub mod decoding;
pub mod gateway;
pub mod passthrough;
pub mod publish;
pub mod timing;
pub mod transport;
