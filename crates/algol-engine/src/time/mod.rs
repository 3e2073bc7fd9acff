//! Time subsystem.
//!
//! Frame timing without coupling to the runtime:
//! - one `FrameClock` per render loop
//! - call `tick()` once per presented frame to obtain `FrameTime`
//!
//! `FrameTime::elapsed` is the clock the scene animates against; `dt` is only
//! for frame-rate bookkeeping.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
