//! Deterministic random number generation
//!
//! Uses xorshift64* algorithm for fast, deterministic random number generation.
//! CRITICAL: All randomness in the engine MUST go through this module, so a
//! fixed seed reproduces the exact arrival stream and vehicle mix.

mod xorshift;

pub use xorshift::RngManager;
