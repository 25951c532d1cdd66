//! Transport-facing side of the core: the raw frame representation and the
//! traits abstracting the frame source and the time source.
pub mod can_frame;
pub mod traits;
