use serde::{Deserialize, Serialize};

/// Observable state of a [`SettleTimer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimerState {
    #[default]
    Idle,
    Armed { armed_at_ms: u64, deadline_ms: u64 },
}

/// Cancellable one-shot timer driven by an external clock.
///
/// Re-arming slides the deadline, so the timer fires only once no new
/// trigger arrived within `window_ms`. Time is passed in by the caller,
/// which keeps every debounce deterministic under a fake clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettleTimer {
    window_ms: u64,
    state: TimerState,
}

impl SettleTimer {
    #[must_use]
    pub const fn new(window_ms: u64) -> Self {
        Self {
            window_ms,
            state: TimerState::Idle,
        }
    }

    #[must_use]
    pub const fn window_ms(&self) -> u64 {
        self.window_ms
    }

    #[must_use]
    pub const fn state(&self) -> TimerState {
        self.state
    }

    #[must_use]
    pub const fn is_armed(&self) -> bool {
        matches!(self.state, TimerState::Armed { .. })
    }

    #[must_use]
    pub const fn deadline_ms(&self) -> Option<u64> {
        match self.state {
            TimerState::Armed { deadline_ms, .. } => Some(deadline_ms),
            TimerState::Idle => None,
        }
    }

    /// (Re)starts the window at `now_ms`.
    pub fn arm(&mut self, now_ms: u64) {
        self.state = TimerState::Armed {
            armed_at_ms: now_ms,
            deadline_ms: now_ms.saturating_add(self.window_ms),
        };
    }

    /// Disarms the timer; returns whether it was armed.
    pub fn cancel(&mut self) -> bool {
        let was_armed = self.is_armed();
        self.state = TimerState::Idle;
        was_armed
    }

    /// Fires at most once when `now_ms` reached the deadline, disarming the timer.
    pub fn poll(&mut self, now_ms: u64) -> bool {
        match self.state {
            TimerState::Armed { deadline_ms, .. } if now_ms >= deadline_ms => {
                self.state = TimerState::Idle;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rearming_slides_the_deadline() {
        let mut timer = SettleTimer::new(400);
        timer.arm(0);
        timer.arm(300);
        assert!(!timer.poll(400));
        assert!(timer.poll(700));
        assert!(!timer.poll(800));
    }

    #[test]
    fn cancelled_timer_never_fires() {
        let mut timer = SettleTimer::new(50);
        timer.arm(10);
        assert!(timer.cancel());
        assert!(!timer.poll(1_000));
        assert!(!timer.cancel());
    }
}
