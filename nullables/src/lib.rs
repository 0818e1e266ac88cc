//! Nullable infrastructure for deterministic testing.
//!
//! All external dependencies of the engine (clock, storage) are
//! abstracted behind traits. This crate provides test-friendly
//! implementations that return deterministic values, can be controlled
//! programmatically, and never touch a database or the network.
//!
//! Usage: swap real implementations for nullables in tests.

pub mod clock;
pub mod store;

pub use clock::NullClock;
pub use store::NullStore;
