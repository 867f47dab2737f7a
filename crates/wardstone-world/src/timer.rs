//! Countdown events advanced once per simulation tick.
//!
//! A [`TimedEvent`] is the unit of the manager's timer bank: each
//! locking domain owns its events and the tick thread walks them inside
//! `update`. The type itself is deliberately not thread-safe; all access
//! happens under the owning domain's mutex.

/// A millisecond countdown that fires exactly once on expiry.
///
/// `remaining_ms == 0` means inactive (or already fired); a positive
/// value is strictly decremented by the elapsed delta and clamped at
/// zero. Nothing here ever re-arms a timer -- only the owning domain
/// transition does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimedEvent {
    /// Milliseconds until expiry; zero when inactive.
    remaining_ms: u64,
}

impl TimedEvent {
    /// An inactive timer.
    pub const fn new() -> Self {
        Self { remaining_ms: 0 }
    }

    /// A timer restored from persisted state.
    pub const fn from_remaining(remaining_ms: u64) -> Self {
        Self { remaining_ms }
    }

    /// Arm the timer to fire after `duration_ms`.
    pub const fn arm(&mut self, duration_ms: u64) {
        self.remaining_ms = duration_ms;
    }

    /// Whether the timer is counting down.
    pub const fn is_armed(&self) -> bool {
        self.remaining_ms > 0
    }

    /// Remaining milliseconds (zero when inactive).
    pub const fn remaining_ms(&self) -> u64 {
        self.remaining_ms
    }

    /// Advance by `delta_ms`; returns `true` on the single tick where
    /// the timer expires.
    pub const fn update(&mut self, delta_ms: u64) -> bool {
        if self.remaining_ms == 0 {
            return false;
        }
        if self.remaining_ms <= delta_ms {
            self.remaining_ms = 0;
            return true;
        }
        self.remaining_ms -= delta_ms;
        false
    }
}
