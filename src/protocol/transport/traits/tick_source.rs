//! Monotonic time source consulted by frequency clocks.
use embassy_time::Instant;

/// Opaque monotonic tick source. Sampled once per processed frame.
pub trait TickSource {
    /// Current instant. Must never go backwards.
    fn now(&self) -> Instant;
}

impl<T: TickSource + ?Sized> TickSource for &T {
    fn now(&self) -> Instant {
        (**self).now()
    }
}

/// Tick source reading the embassy time driver linked by the firmware.
#[cfg(feature = "embassy-ticks")]
#[derive(Debug, Default, Clone, Copy)]
pub struct EmbassyTicks;

#[cfg(feature = "embassy-ticks")]
impl TickSource for EmbassyTicks {
    fn now(&self) -> Instant {
        Instant::now()
    }
}
