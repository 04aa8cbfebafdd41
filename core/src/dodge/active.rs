//! Engaged obligation (runtime state)
//!
//! # Lifecycle
//!
//! 1. A hostile starts a cast in an obligation's trigger set → engaged
//! 2. The agent follows / evacuates / spreads while engaged
//! 3. The cast ends, `max_duration` elapses, or something pre-empts it →
//!    released

use std::time::Duration;

use chrono::NaiveDateTime;

use crate::spread::SpreadDirective;
use crate::world::{CastContext, EntitySnapshot, deadline};

/// Identity of one observed cast. The same key seen on consecutive ticks is
/// the same ongoing cast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CastKey {
    pub caster_id: u64,
    pub ability_id: u32,
}

impl CastKey {
    pub fn new(caster_id: u64, ability_id: u32) -> Self {
        Self {
            caster_id,
            ability_id,
        }
    }

    /// Whether `caster` is still casting this
    pub fn is_ongoing(&self, caster: Option<&EntitySnapshot>) -> bool {
        caster.is_some_and(|e| e.is_alive && e.casting_ability() == Some(self.ability_id))
    }
}

#[derive(Debug, Clone)]
pub struct EngagedDodge {
    /// ID of the obligation that engaged
    pub obligation_id: String,

    // ─── Cast ───────────────────────────────────────────────────────────────
    pub cast: CastKey,
    pub cast_target: Option<u64>,

    // ─── Timing (game time from the world feed) ─────────────────────────────
    pub started_at: NaiveDateTime,
    pub expires_at: NaiveDateTime,
    pub duration: Duration,

    // ─── State ──────────────────────────────────────────────────────────────
    pub suppression: Option<String>,

    /// Slots computed once on engagement for spread responses
    pub spread: Option<SpreadDirective>,

    /// Whether an unresolved follow target was already reported
    pub unresolved_reported: bool,
}

impl EngagedDodge {
    pub fn new(
        obligation_id: String,
        cast: CastKey,
        cast_target: Option<u64>,
        started_at: NaiveDateTime,
        duration: Duration,
        suppression: Option<String>,
    ) -> Self {
        let expires_at = deadline(started_at, duration);
        Self {
            obligation_id,
            cast,
            cast_target,
            started_at,
            expires_at,
            duration,
            suppression,
            spread: None,
            unresolved_reported: false,
        }
    }

    pub fn has_expired(&self, now: NaiveDateTime) -> bool {
        now >= self.expires_at
    }

    pub fn cast_context(&self) -> CastContext {
        CastContext {
            caster_id: self.cast.caster_id,
            ability_id: self.cast.ability_id,
            target_id: self.cast_target,
        }
    }
}
