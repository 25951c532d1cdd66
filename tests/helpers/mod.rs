/// Test doubles standing in for the transport, timer and pipeline collaborators.
use can_translate::protocol::publish::{Envelope, Pipeline, SimpleMessage};
use can_translate::protocol::transport::{
    can_frame::RawFrame,
    traits::{frame_source::FrameSource, tick_source::TickSource},
};
use embassy_time::Instant;
use std::cell::Cell;
use std::rc::Rc;
use tokio::sync::mpsc;

#[derive(Clone, Default)]
#[allow(dead_code)]
/// Manually driven monotonic clock, shareable between the gateway and the test.
pub struct ManualTicks {
    millis: Rc<Cell<u64>>,
}

#[allow(dead_code)]
impl ManualTicks {
    pub fn set(&self, millis: u64) {
        self.millis.set(millis);
    }

    pub fn advance(&self, millis: u64) {
        self.millis.set(self.millis.get() + millis);
    }
}

impl TickSource for ManualTicks {
    fn now(&self) -> Instant {
        Instant::from_millis(self.millis.get())
    }
}

#[derive(Default)]
#[allow(dead_code)]
/// Pipeline keeping every envelope in publication order.
pub struct RecordingPipeline {
    pub envelopes: Vec<Envelope>,
}

#[allow(dead_code)]
impl RecordingPipeline {
    /// Simple messages published under `name`.
    pub fn named(&self, name: &str) -> Vec<&SimpleMessage> {
        self.envelopes
            .iter()
            .filter_map(|envelope| match envelope {
                Envelope::Simple(message) if message.name == name => Some(message),
                _ => None,
            })
            .collect()
    }

    /// Raw records forwarded for `id`.
    pub fn raw(&self, id: u32) -> usize {
        self.envelopes
            .iter()
            .filter(|envelope| matches!(envelope, Envelope::Can(record) if record.id == id))
            .count()
    }

    pub fn clear(&mut self) {
        self.envelopes.clear();
    }
}

impl Pipeline for RecordingPipeline {
    fn publish(&mut self, envelope: Envelope) {
        self.envelopes.push(envelope);
    }
}

#[allow(dead_code)]
/// Frame source fed through a tokio channel, standing in for a CAN driver.
pub struct ChannelSource {
    rx: mpsc::UnboundedReceiver<RawFrame>,
}

#[allow(dead_code)]
impl ChannelSource {
    pub fn create() -> (mpsc::UnboundedSender<RawFrame>, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        (tx, Self { rx })
    }
}

impl FrameSource for ChannelSource {
    type Error = ();

    async fn recv(&mut self) -> Result<RawFrame, Self::Error> {
        self.rx.recv().await.ok_or(())
    }
}
