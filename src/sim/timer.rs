//! Simulated clock and cancellable schedules
//!
//! Every recurring activity in a session (the one-second clock, the wave
//! timer, the weather check, storm lightning) owns exactly one handle from
//! this module. A cancelled handle refuses to re-arm, so a self-rescheduling
//! activity cannot outlive the session that cancelled it.

/// Monotonic simulated time in milliseconds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Clock {
    now_ms: u64,
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Advance by `ms` and return the new time
    pub fn advance(&mut self, ms: u64) -> u64 {
        self.now_ms += ms;
        self.now_ms
    }
}

/// Lifecycle of a one-shot timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimerState {
    /// Not scheduled
    #[default]
    Idle,
    /// Fires once simulated time reaches `due_ms`
    Armed { due_ms: u64 },
    /// Dead; ignores further scheduling
    Cancelled,
}

/// One-shot cancellable delay
#[derive(Debug, Clone, Default)]
pub struct Timer {
    state: TimerState,
}

impl Timer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    /// Schedule at an absolute time. Returns false if the timer is cancelled.
    pub fn arm_at(&mut self, due_ms: u64) -> bool {
        if self.state == TimerState::Cancelled {
            return false;
        }
        self.state = TimerState::Armed { due_ms };
        true
    }

    /// Schedule `delay_ms` after `now_ms`, saturating at the end of time
    pub fn arm(&mut self, now_ms: u64, delay_ms: u64) -> bool {
        self.arm_at(now_ms.saturating_add(delay_ms))
    }

    pub fn cancel(&mut self) {
        self.state = TimerState::Cancelled;
    }

    /// If due, disarm and return the time it was due at
    pub fn fire(&mut self, now_ms: u64) -> Option<u64> {
        match self.state {
            TimerState::Armed { due_ms } if due_ms <= now_ms => {
                self.state = TimerState::Idle;
                Some(due_ms)
            }
            _ => None,
        }
    }

    pub fn is_armed(&self) -> bool {
        matches!(self.state, TimerState::Armed { .. })
    }

    pub fn is_cancelled(&self) -> bool {
        self.state == TimerState::Cancelled
    }
}

/// Repeating schedule built on a [`Timer`]
#[derive(Debug, Clone)]
pub struct Interval {
    period_ms: u64,
    timer: Timer,
}

impl Interval {
    pub fn new(period_ms: u64) -> Self {
        Self {
            period_ms: period_ms.max(1),
            timer: Timer::new(),
        }
    }

    pub fn period_ms(&self) -> u64 {
        self.period_ms
    }

    /// First tick one period after `now_ms`
    pub fn start(&mut self, now_ms: u64) -> bool {
        self.timer.arm(now_ms, self.period_ms)
    }

    pub fn cancel(&mut self) {
        self.timer.cancel();
    }

    pub fn is_active(&self) -> bool {
        self.timer.is_armed()
    }

    pub fn is_cancelled(&self) -> bool {
        self.timer.is_cancelled()
    }

    /// Number of periods elapsed up to `now_ms`; re-arms from the due time
    /// so the cadence never drifts with the caller's step size.
    pub fn poll(&mut self, now_ms: u64) -> u32 {
        let mut fired = 0;
        while let Some(due_ms) = self.timer.fire(now_ms) {
            fired += 1;
            let next_ms = due_ms.saturating_add(self.period_ms);
            if next_ms == due_ms {
                // Saturated; there is no later tick to schedule
                break;
            }
            self.timer.arm_at(next_ms);
        }
        fired
    }
}
