#![forbid(unsafe_code)]

//! Trailing-edge refresh throttle driven by host-supplied monotonic time.
//!
//! Resize and mutation signals can arrive in bursts (rapid DOM mutations
//! easily fire dozens of observer callbacks per frame). Each refresh forces a
//! synchronous layout read, so bursts must collapse: the first signal opens a
//! window and defers exactly one refresh to the window boundary; every
//! further signal inside the window coalesces into that pending refresh.
//!
//! The throttle never calls back on its own. It hands the deadline to the
//! host (which owns the timer) and the host reports the deadline back via
//! [`TrailingThrottle::fire`]. This keeps the controller deterministic and
//! lets teardown cancel the pending refresh explicitly instead of leaving a
//! dangling deferred call.

use core::time::Duration;

/// Outcome of reporting one refresh signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThrottleSignal {
    /// First signal of a window; the host should arm a timer for `deadline`.
    Scheduled {
        /// Monotonic instant at which the pending refresh becomes due.
        deadline: Duration,
    },
    /// A refresh is already pending; this signal coalesced into it.
    Coalesced,
}

/// Leading-call-suppressed, trailing-edge-guaranteed throttle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrailingThrottle {
    window: Duration,
    deadline: Option<Duration>,
}

impl TrailingThrottle {
    /// Default refresh window.
    pub const DEFAULT_WINDOW: Duration = Duration::from_millis(200);

    /// Create a throttle with an explicit window.
    #[must_use]
    pub const fn new(window: Duration) -> Self {
        Self {
            window,
            deadline: None,
        }
    }

    /// Create a throttle with the default 200 ms window.
    #[must_use]
    pub const fn with_default_window() -> Self {
        Self::new(Self::DEFAULT_WINDOW)
    }

    /// Configured window length.
    #[must_use]
    pub const fn window(&self) -> Duration {
        self.window
    }

    /// Deadline of the pending refresh, if one is scheduled.
    #[must_use]
    pub const fn pending(&self) -> Option<Duration> {
        self.deadline
    }

    /// Report one refresh signal at monotonic time `now`.
    pub fn signal(&mut self, now: Duration) -> ThrottleSignal {
        if self.deadline.is_some() {
            return ThrottleSignal::Coalesced;
        }
        let deadline = now.saturating_add(self.window);
        self.deadline = Some(deadline);
        ThrottleSignal::Scheduled { deadline }
    }

    /// Report that the host timer fired at `now`.
    ///
    /// Returns `true` exactly when a pending refresh was due; the caller runs
    /// the refresh in that case. A spurious or early timer returns `false`
    /// and leaves the pending deadline in place.
    pub fn fire(&mut self, now: Duration) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Drop any pending refresh. Used on teardown.
    pub fn cancel(&mut self) -> bool {
        self.deadline.take().is_some()
    }
}

impl Default for TrailingThrottle {
    fn default() -> Self {
        Self::with_default_window()
    }
}

#[cfg(test)]
mod tests {
    use super::{ThrottleSignal, TrailingThrottle};
    use core::time::Duration;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn first_signal_schedules_at_window_boundary() {
        let mut t = TrailingThrottle::with_default_window();
        assert_eq!(
            t.signal(ms(10)),
            ThrottleSignal::Scheduled { deadline: ms(210) }
        );
        assert_eq!(t.pending(), Some(ms(210)));
    }

    #[test]
    fn burst_coalesces_into_one_pending_refresh() {
        let mut t = TrailingThrottle::with_default_window();
        assert!(matches!(t.signal(ms(0)), ThrottleSignal::Scheduled { .. }));
        for offset in 1..10 {
            assert_eq!(t.signal(ms(offset * 5)), ThrottleSignal::Coalesced);
        }
        // Nothing runs before the boundary, exactly one run at it.
        assert!(!t.fire(ms(199)));
        assert!(t.fire(ms(200)));
        assert!(!t.fire(ms(200)));
    }

    #[test]
    fn window_reopens_after_trailing_fire() {
        let mut t = TrailingThrottle::new(ms(100));
        t.signal(ms(0));
        assert!(t.fire(ms(100)));
        assert_eq!(
            t.signal(ms(150)),
            ThrottleSignal::Scheduled { deadline: ms(250) }
        );
    }

    #[test]
    fn cancel_drops_pending_refresh() {
        let mut t = TrailingThrottle::new(ms(100));
        t.signal(ms(0));
        assert!(t.cancel());
        assert!(!t.fire(ms(100)));
        assert!(!t.cancel());
    }

    #[test]
    fn late_fire_still_runs_once() {
        let mut t = TrailingThrottle::new(ms(100));
        t.signal(ms(0));
        // Host timers can fire late; the trailing refresh must still happen.
        assert!(t.fire(ms(700)));
        assert_eq!(t.pending(), None);
    }
}
