//! The game clock: a fixed-timestep accumulator over the browser draw loop.
//!
//! The draw callback fires at ~60 fps with a variable delta; the clock
//! converts that into whole one-second ticks for passive income. It is
//! created once in `main()` and moved into the draw closure, so a second
//! clock (which would double the passive rate) cannot be started.

/// Passive-income ticks per real-time second.
pub const TICKS_PER_SEC: u32 = 1;

pub struct GameClock {
    /// Milliseconds per tick.
    ms_per_tick: f64,
    /// Milliseconds accumulated but not yet consumed as ticks.
    accumulator: f64,
    /// Total ticks emitted since creation.
    pub total_ticks: u64,
    /// Timestamp of the last update (ms); `None` on the first frame.
    last_timestamp: Option<f64>,
}

impl GameClock {
    pub fn new(ticks_per_sec: u32) -> Self {
        Self {
            ms_per_tick: 1000.0 / ticks_per_sec as f64,
            accumulator: 0.0,
            total_ticks: 0,
            last_timestamp: None,
        }
    }

    /// Feed a wall-clock timestamp (from `Date.now()`); returns how many
    /// whole ticks elapsed since the previous frame.
    ///
    /// The delta is clamped to one tick period: a backgrounded tab resumes
    /// at the normal rate instead of burst-firing the missed seconds.
    pub fn update(&mut self, now_ms: f64) -> u32 {
        let delta = match self.last_timestamp {
            Some(prev) => (now_ms - prev).clamp(0.0, self.ms_per_tick),
            None => 0.0,
        };
        self.last_timestamp = Some(now_ms);

        self.accumulator += delta;
        let ticks = (self.accumulator / self.ms_per_tick) as u32;
        self.accumulator -= ticks as f64 * self.ms_per_tick;
        self.total_ticks += ticks as u64;
        ticks
    }
}
