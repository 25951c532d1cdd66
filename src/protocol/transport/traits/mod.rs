//! Abstraction traits for the collaborators feeding the core: the frame
//! source and the monotonic time source.
pub mod frame_source;
pub mod tick_source;
