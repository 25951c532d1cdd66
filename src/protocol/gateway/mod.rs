//! Frame processing entry points.
//!
//! [`DecodeContext`] owns every piece of mutable state of the core (signal
//! runtime states and the passthrough registry) and is passed explicitly to
//! each step. [`Gateway`] bundles it with the bus configuration, the tick
//! source and the pipeline, and pumps frames from a [`FrameSource`].
//!
//! Processing is run-to-completion: a frame is fully handled (passthrough,
//! then extract → decode → policy → publish for each of its signals) before
//! the next one is accepted. Nothing here fails: anomalies end up as "do not
//! emit" plus a diagnostic.
use embassy_time::Instant;

use crate::core::{BusConfig, MessageConfig, SignalDefinition};
use crate::error::{CatalogError, GatewayError};
use crate::infra::codec::bitfield::parse_signal_bitfield;
use crate::infra::trace::{debug, trace, warn};
use crate::protocol::decoding::decoder::{decode_signal, Candidates};
use crate::protocol::decoding::send_policy::should_send;
use crate::protocol::decoding::state_table::SignalStateTable;
use crate::protocol::passthrough::{MessageRegistry, PassthroughResult};
use crate::protocol::publish::{publish_can_record, publish_vehicle_message, Pipeline};
use crate::protocol::transport::can_frame::RawFrame;
use crate::protocol::transport::traits::{frame_source::FrameSource, tick_source::TickSource};

//==================================================================================DECODE_CONTEXT
/// Mutable state of the translation core for one signal catalog.
pub struct DecodeContext<'a, const SIGNALS: usize, const MESSAGES: usize> {
    signals: &'a [SignalDefinition],
    states: SignalStateTable<SIGNALS>,
    registry: MessageRegistry<MESSAGES>,
}

impl<'a, const SIGNALS: usize, const MESSAGES: usize> DecodeContext<'a, SIGNALS, MESSAGES> {
    /// Create one runtime state per catalog signal and an empty registry.
    pub fn new(signals: &'a [SignalDefinition]) -> Result<Self, CatalogError> {
        Self::with_messages(signals, &[])
    }

    /// Same as [`new`](Self::new), with `messages` registered up front.
    /// Their clocks fire on the first frame received for them.
    pub fn with_messages(
        signals: &'a [SignalDefinition],
        messages: &[MessageConfig],
    ) -> Result<Self, CatalogError> {
        let mut registry = MessageRegistry::new();
        for message in messages {
            registry
                .register(message.key, message.policy)
                .map_err(CatalogError::Registry)?;
        }

        Ok(Self {
            signals,
            states: SignalStateTable::from_catalog(signals)?,
            registry,
        })
    }

    pub fn signals(&self) -> &'a [SignalDefinition] {
        self.signals
    }

    pub fn states(&self) -> &SignalStateTable<SIGNALS> {
        &self.states
    }

    pub fn registry(&self) -> &MessageRegistry<MESSAGES> {
        &self.registry
    }

    /// Used to declare messages after construction.
    pub fn registry_mut(&mut self) -> &mut MessageRegistry<MESSAGES> {
        &mut self.registry
    }

    /// Extract, decode and (if the policy agrees) publish one signal of `frame`.
    ///
    /// The decoder always runs. When it suppresses the value the send policy
    /// is skipped, but the value is still recorded as the signal's latest.
    pub fn translate_signal<P: Pipeline + ?Sized>(
        &mut self,
        signal: &SignalDefinition,
        frame: &RawFrame,
        now: Instant,
        pipeline: &mut P,
    ) {
        let value = match parse_signal_bitfield(signal, &frame.data) {
            Ok(value) => value,
            Err(_) => {
                warn!("Signal {} lies outside its frame", signal.name);
                return;
            }
        };

        let decoded = decode_signal(
            signal,
            &Candidates::new(self.signals, self.states.as_slice()),
            value,
        );

        let Some(state) = self.states.get_mut(signal.name) else {
            warn!("No runtime state for signal {}", signal.name);
            return;
        };

        let send = if decoded.send {
            should_send(signal, state, value, now)
        } else {
            state.record(value);
            false
        };

        if send {
            publish_vehicle_message(signal.generic_name, decoded.value, None, pipeline);
        }
    }

    /// Process one frame received on `bus`: raw passthrough first (when the
    /// bus enables it), then every catalog signal carried by the message.
    /// A frame tagged with another bus address is ignored.
    pub fn process_frame<P: Pipeline + ?Sized>(
        &mut self,
        bus: &BusConfig,
        frame: &RawFrame,
        now: Instant,
        pipeline: &mut P,
    ) {
        if frame.bus != bus.address {
            debug!(
                "Frame from bus {} handed over as bus {}, ignored",
                frame.bus,
                bus.address
            );
            return;
        }

        if bus.passthrough {
            match self.registry.process_raw_frame(bus, frame, now) {
                PassthroughResult::Forward(record) => publish_can_record(record, pipeline),
                PassthroughResult::Registered => {
                    debug!(
                        "Added new message definition for message {} on bus {}",
                        frame.raw_id(),
                        bus.address
                    );
                }
                // Not worth spamming the log on every unknown frame.
                PassthroughResult::RegistryFull => {
                    trace!("Message registry full, dropped message {}", frame.raw_id());
                }
                PassthroughResult::Suppressed => {}
            }
        }

        let key = frame.key();
        let signals = self.signals;
        for signal in signals.iter().filter(|signal| signal.message == key) {
            self.translate_signal(signal, frame, now, pipeline);
        }
    }
}

//==================================================================================GATEWAY
/// Translation core wired to its collaborators.
pub struct Gateway<'a, T: TickSource, P: Pipeline, const SIGNALS: usize, const MESSAGES: usize> {
    context: DecodeContext<'a, SIGNALS, MESSAGES>,
    buses: &'a [BusConfig],
    ticks: T,
    pipeline: P,
}

impl<'a, T, P, const SIGNALS: usize, const MESSAGES: usize> Gateway<'a, T, P, SIGNALS, MESSAGES>
where
    T: TickSource,
    P: Pipeline,
{
    pub fn new(
        signals: &'a [SignalDefinition],
        buses: &'a [BusConfig],
        ticks: T,
        pipeline: P,
    ) -> Result<Self, CatalogError> {
        Self::with_messages(signals, &[], buses, ticks, pipeline)
    }

    /// Gateway whose passthrough registry starts with `messages`.
    pub fn with_messages(
        signals: &'a [SignalDefinition],
        messages: &[MessageConfig],
        buses: &'a [BusConfig],
        ticks: T,
        pipeline: P,
    ) -> Result<Self, CatalogError> {
        Ok(Self {
            context: DecodeContext::with_messages(signals, messages)?,
            buses,
            ticks,
            pipeline,
        })
    }

    pub fn context(&self) -> &DecodeContext<'a, SIGNALS, MESSAGES> {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut DecodeContext<'a, SIGNALS, MESSAGES> {
        &mut self.context
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    pub fn pipeline_mut(&mut self) -> &mut P {
        &mut self.pipeline
    }

    pub fn bus(&self, address: u8) -> Option<&'a BusConfig> {
        self.buses.iter().find(|bus| bus.address == address)
    }

    /// Process one frame. Frames from unconfigured buses are ignored.
    pub fn handle_frame(&mut self, frame: &RawFrame) {
        let Some(bus) = self.bus(frame.bus) else {
            debug!("Frame from unconfigured bus {} ignored", frame.bus);
            return;
        };
        let now = self.ticks.now();
        self.context.process_frame(bus, frame, now, &mut self.pipeline);
    }

    /// Pump frames from `source` until it fails.
    pub async fn run<S: FrameSource>(
        &mut self,
        source: &mut S,
    ) -> Result<(), GatewayError<S::Error>> {
        loop {
            let frame = source.recv().await.map_err(GatewayError::Source)?;
            self.handle_frame(&frame);
        }
    }

    /// Release the collaborators, e.g. to inspect the pipeline in tests.
    pub fn into_parts(self) -> (DecodeContext<'a, SIGNALS, MESSAGES>, T, P) {
        (self.context, self.ticks, self.pipeline)
    }
}
