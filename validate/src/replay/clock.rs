//! Virtual clock for replay timing
//!
//! Supports multiple replay modes:
//! - Realtime (1x speed): sleep between ticks
//! - Accelerated: no sleeping, virtual time only
//! - Custom speed: any multiplier (0.5x slow-mo, 10x fast-forward, etc.)

use chrono::NaiveDateTime;
use std::time::Duration;

/// Virtual clock that maps scenario time to wall time
#[derive(Debug)]
pub struct VirtualClock {
    /// Scenario time zero
    start: NaiveDateTime,

    /// Current simulated game time
    current: NaiveDateTime,

    /// Speed multiplier (1.0 = realtime, 0.0 = instant, 10.0 = 10x speed)
    speed_multiplier: f32,
}

impl VirtualClock {
    pub fn new(start: NaiveDateTime, speed_multiplier: f32) -> Self {
        Self {
            start,
            current: start,
            speed_multiplier,
        }
    }

    /// Create a clock for instant (accelerated) replay
    pub fn instant(start: NaiveDateTime) -> Self {
        Self::new(start, 0.0)
    }

    /// Create a clock for realtime (1x) replay
    pub fn realtime(start: NaiveDateTime) -> Self {
        Self::new(start, 1.0)
    }

    /// Advance the clock to a specific game timestamp, sleeping if not in
    /// instant mode
    pub fn advance_to(&mut self, game_time: NaiveDateTime) {
        if self.speed_multiplier > 0.0 && game_time > self.current {
            let delta_ms = (game_time - self.current).num_milliseconds().max(0) as f32;
            let sleep_ms = (delta_ms / self.speed_multiplier) as u64;

            if sleep_ms > 0 {
                std::thread::sleep(Duration::from_millis(sleep_ms));
            }
        }

        self.current = game_time;
    }

    /// Scenario time of `offset_ms`
    pub fn at(&self, offset_ms: u64) -> NaiveDateTime {
        self.start + chrono::Duration::milliseconds(offset_ms as i64)
    }

    pub fn elapsed_secs(&self) -> f32 {
        (self.current - self.start).num_milliseconds() as f32 / 1000.0
    }

    /// Format elapsed time as MM:SS.ms
    pub fn format_elapsed(&self) -> String {
        let secs = self.elapsed_secs();
        let mins = (secs / 60.0).floor() as u32;
        format!("{:02}:{:05.2}", mins, secs % 60.0)
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn is_instant_mode(&self) -> bool {
        self.speed_multiplier == 0.0
    }

    pub fn speed(&self) -> f32 {
        self.speed_multiplier
    }
}
