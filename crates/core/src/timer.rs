//! Tick-driven quiz clocks.
//!
//! Both clocks advance only when the owner calls `tick()` (once per second).
//! Neither persists anything; a restored session starts them from scratch.

use crate::config::QUESTION_TIME_SECS;

/// Formats whole seconds as `MM:SS`.
#[must_use]
pub fn format_mm_ss(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

//
// ─── SESSION CLOCK ─────────────────────────────────────────────────────────────
//

/// Elapsed time since the session started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionClock {
    elapsed_secs: u32,
    running: bool,
    visible: bool,
}

impl SessionClock {
    /// Restarts from zero.
    pub fn start(&mut self) {
        self.elapsed_secs = 0;
        self.running = true;
        self.visible = true;
    }

    /// Freezes the elapsed time. The value stays readable for the results view.
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Stops and hides the clock (review mode).
    pub fn disable(&mut self) {
        self.running = false;
        self.visible = false;
    }

    pub fn tick(&mut self) {
        if self.running {
            self.elapsed_secs = self.elapsed_secs.saturating_add(1);
        }
    }

    #[must_use]
    pub fn elapsed_secs(&self) -> u32 {
        self.elapsed_secs
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    #[must_use]
    pub fn format(&self) -> String {
        format_mm_ss(self.elapsed_secs)
    }
}

//
// ─── QUESTION CLOCK ────────────────────────────────────────────────────────────
//

/// Proof that a specific countdown ran out.
///
/// Carries the generation of the countdown that produced it; any reset or stop
/// after that makes it stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Expiry {
    generation: u64,
}

/// Per-question countdown with cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestionClock {
    duration_secs: u32,
    seconds_left: u32,
    running: bool,
    visible: bool,
    generation: u64,
}

impl Default for QuestionClock {
    fn default() -> Self {
        Self::new(QUESTION_TIME_SECS)
    }
}

impl QuestionClock {
    /// A stopped clock with the given countdown length.
    #[must_use]
    pub fn new(duration_secs: u32) -> Self {
        Self {
            duration_secs,
            seconds_left: duration_secs,
            running: false,
            visible: false,
            generation: 0,
        }
    }

    /// Restarts the countdown at full duration and cancels any pending expiry.
    pub fn reset(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.seconds_left = self.duration_secs;
        self.running = true;
        self.visible = true;
    }

    /// Cancels the countdown; the remaining seconds stay as they were.
    pub fn stop(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.running = false;
    }

    /// Stops and hides the clock (review mode).
    pub fn disable(&mut self) {
        self.stop();
        self.visible = false;
    }

    /// Counts down one second. Yields an [`Expiry`] exactly once, when the
    /// countdown reaches zero; the clock is stopped afterwards.
    pub fn tick(&mut self) -> Option<Expiry> {
        if !self.running {
            return None;
        }
        self.seconds_left = self.seconds_left.saturating_sub(1);
        if self.seconds_left > 0 {
            return None;
        }
        self.running = false;
        Some(Expiry {
            generation: self.generation,
        })
    }

    /// True if `expiry` came from the countdown that is still current, i.e.
    /// nothing reset or stopped the clock since it fired.
    #[must_use]
    pub fn is_current(&self, expiry: Expiry) -> bool {
        expiry.generation == self.generation
    }

    #[must_use]
    pub fn seconds_left(&self) -> u32 {
        self.seconds_left
    }

    #[must_use]
    pub fn duration_secs(&self) -> u32 {
        self.duration_secs
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Status line, e.g. `"42s — active"`.
    #[must_use]
    pub fn label(&self) -> String {
        let status = if self.running { "active" } else { "idle" };
        format!("{}s — {status}", self.seconds_left)
    }
}
