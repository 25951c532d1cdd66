//! Minimal abstraction for an asynchronous CAN receiver. Allows the gateway
//! pump to plug into various implementations (embedded HAL, SocketCAN, a
//! queue filled from an interrupt handler, etc.).
use crate::protocol::transport::can_frame::RawFrame;
use futures_util::Future;

/// Contract to receive CAN frames one at a time.
///
/// Frames handed out are owned by the caller: the source must not mutate them
/// afterwards.
pub trait FrameSource {
    type Error: core::fmt::Debug;
    /// Retrieve the next available frame. Asynchronously waits until data arrives.
    fn recv<'a>(&'a mut self) -> impl Future<Output = Result<RawFrame, Self::Error>> + 'a;
}
