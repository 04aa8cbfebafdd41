//! Checkpoint verification for scenario replay
//!
//! Defines expected intents and verifies them against the engine.

pub mod checkpoint;

pub use checkpoint::{CheckpointResult, CheckpointVerifier, Expectation, VerificationResult};
