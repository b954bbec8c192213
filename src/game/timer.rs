//! Level countdown timer
//!
//! A cancelable once-per-second countdown, decoupled from any event loop.
//! The embedder schedules the real one-second callbacks and forwards each
//! firing through [`LevelTimer::on_tick`] with the epoch it scheduled
//! against. Every start/pause/resume/stop bumps the epoch, so a callback
//! scheduled before a cancellation reports [`Tick::Stale`] and mutates
//! nothing - cancellation is race-free on the single control thread.
//!
//! A paused-then-resumed timer continues from the same remaining value,
//! not from wall-clock elapsed since start.

use serde::{Deserialize, Serialize};

/// Token identifying one run of the countdown. Ticks carrying an old
/// epoch are ignored.
pub type TimerEpoch = u64;

/// Countdown lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerState {
    /// Never started
    Idle,
    /// Counting down
    Running,
    /// Suspended; remaining seconds frozen
    Paused,
    /// Halted by expiry or `stop`; only `start` re-arms
    Stopped,
}

/// Result of forwarding a scheduled tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// The tick was scheduled before a cancellation; nothing changed
    Stale,
    /// Countdown continues with this many seconds remaining
    Running(u32),
    /// The countdown just reached zero and stopped
    Expired,
}

/// Seconds granted for `level`: `2^level * 60`, saturating.
///
/// Level 1 gets 120s, level 2 gets 240s - deliberately generous so the
/// larger late-game boards stay completable.
pub fn time_for_level(level: u32) -> u32 {
    let secs = 60u64 * (1u64 << level.min(32));
    secs.min(u32::MAX as u64) as u32
}

/// The per-level countdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelTimer {
    remaining: u32,
    state: TimerState,
    epoch: TimerEpoch,
}

impl Default for LevelTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl LevelTimer {
    pub fn new() -> Self {
        Self {
            remaining: 0,
            state: TimerState::Idle,
            epoch: 0,
        }
    }

    /// Seconds left on the countdown
    #[inline]
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    #[inline]
    pub fn state(&self) -> TimerState {
        self.state
    }

    /// The epoch ticks must currently carry to be accepted
    #[inline]
    pub fn epoch(&self) -> TimerEpoch {
        self.epoch
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    /// Arm the countdown with `initial_seconds` and return the epoch to
    /// schedule ticks against. Invalidates any previously scheduled tick.
    pub fn start(&mut self, initial_seconds: u32) -> TimerEpoch {
        self.remaining = initial_seconds;
        self.state = TimerState::Running;
        self.bump()
    }

    /// Suspend the countdown, keeping the remaining seconds. Idempotent;
    /// a no-op unless running.
    pub fn pause(&mut self) {
        if self.state == TimerState::Running {
            self.state = TimerState::Paused;
            self.bump();
        }
    }

    /// Continue a paused countdown from its frozen remaining value.
    ///
    /// Returns the fresh epoch to schedule against, or `None` if the
    /// timer was not paused (already running, never started, stopped).
    pub fn resume(&mut self) -> Option<TimerEpoch> {
        if self.state == TimerState::Paused {
            self.state = TimerState::Running;
            Some(self.bump())
        } else {
            None
        }
    }

    /// Halt the countdown and invalidate any scheduled tick. Used on
    /// solve and game-over; only `start` re-arms.
    pub fn stop(&mut self) {
        self.state = TimerState::Stopped;
        self.bump();
    }

    /// Forward a scheduled one-second firing.
    ///
    /// A current-epoch tick decrements and reports the new remaining
    /// value; hitting zero reports [`Tick::Expired`] exactly once and
    /// stops the countdown.
    pub fn on_tick(&mut self, epoch: TimerEpoch) -> Tick {
        if epoch != self.epoch || self.state != TimerState::Running {
            return Tick::Stale;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.state = TimerState::Stopped;
            self.bump();
            Tick::Expired
        } else {
            Tick::Running(self.remaining)
        }
    }

    fn bump(&mut self) -> TimerEpoch {
        self.epoch += 1;
        self.epoch
    }
}
