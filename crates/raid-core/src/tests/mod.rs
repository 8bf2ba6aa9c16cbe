//! Crate-level tests that drive the whole engine.
//!
//! - `determinism.rs`: same seed and requests give the same event stream
//! - `integration.rs`: full encounters and the edge cases of round flow
//! - `properties.rs`: property tests for the formula and the clamps
//! - `helpers.rs`: setup utilities and event queries

mod helpers;

pub use helpers::*;
