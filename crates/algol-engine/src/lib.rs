//! Algol engine crate.
//!
//! Owns the platform + GPU runtime pieces used by the studio: window loop,
//! device/surface, input translation, frame timing, logging, and the small
//! set of render helpers a compute-then-blit renderer needs.

pub mod device;
pub mod window;
pub mod input;
pub mod time;
pub mod core;

pub mod logging;
pub mod render;
