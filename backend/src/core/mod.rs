//! Clock and signal-grant primitives shared by the engine.

pub mod signal;
pub mod time;
