//! Dodge scheduler
//!
//! This module provides:
//! - **Obligations**: cast-triggered, bounded-duration positioning responses
//! - **Scheduler**: per-obligation state machine with a single engaged slot
//!
//! # State machine
//!
//! `Idle → Triggered → Engaged → Idle`. Triggering and engaging happen on
//! the same tick the cast is first observed. An engagement ends when the
//! cast ends, `max_duration` elapses, a later-registered obligation
//! triggers, or the phase changes.

mod active;
mod definition;
mod scheduler;


pub use active::{CastKey, EngagedDodge};
pub use definition::{DodgeObligation, DodgeResponse};
pub use scheduler::{
    DodgeDirective, DodgeEvent, DodgeScheduler, DodgeUpdate, ObligationState, ReleaseReason,
};
