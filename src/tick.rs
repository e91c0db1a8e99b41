//! Cancellable periodic ticks for display refresh
//!
//! A [`Tick`] is armed when the timer starts running and cancelled on every
//! transition away from running. The owner polls it from its event loop; an
//! unarmed tick never fires.

use std::time::{Duration, Instant};

use crate::timer::TimerState;

pub const TIMER_TICK: Duration = Duration::from_millis(1000);
pub const SUMMARY_TICK: Duration = Duration::from_millis(100);

#[derive(Debug)]
pub struct Tick {
    interval: Duration,
    next_due: Option<Instant>,
}

impl Tick {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_due: None,
        }
    }

    /// Schedule the first firing one interval after `now`; re-arming resets it
    pub fn arm(&mut self, now: Instant) {
        self.next_due = Some(now + self.interval);
    }

    pub fn cancel(&mut self) {
        self.next_due = None;
    }

    pub fn is_armed(&self) -> bool {
        self.next_due.is_some()
    }

    /// Fire if due and schedule the next firing
    ///
    /// Missed intervals are not replayed: a late poll fires once and the next
    /// deadline is one interval after `now`.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.next_due {
            Some(due) if now >= due => {
                self.next_due = Some(now + self.interval);
                true
            }
            _ => false,
        }
    }

    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.next_due.map(|due| due.saturating_duration_since(now))
    }
}

impl Drop for Tick {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Which display areas need a redraw after a poll
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TickFired {
    pub timer: bool,
    pub summary: bool,
}

impl TickFired {
    pub fn any(&self) -> bool {
        self.timer || self.summary
    }
}

/// The timer display tick and the summary display tick
#[derive(Debug)]
pub struct DisplayTicks {
    timer: Tick,
    summary: Tick,
}

impl DisplayTicks {
    pub fn new(timer_interval: Duration, summary_interval: Duration) -> Self {
        Self {
            timer: Tick::new(timer_interval),
            summary: Tick::new(summary_interval),
        }
    }

    /// Arm both ticks while running, cancel both otherwise
    ///
    /// Call after every timer transition. Ticks that are already armed stay
    /// on their current schedule.
    pub fn sync(&mut self, state: TimerState, now: Instant) {
        if state == TimerState::Running {
            if !self.timer.is_armed() {
                self.timer.arm(now);
            }
            if !self.summary.is_armed() {
                self.summary.arm(now);
            }
        } else {
            self.cancel_all();
        }
    }

    pub fn cancel_all(&mut self) {
        self.timer.cancel();
        self.summary.cancel();
    }

    pub fn is_armed(&self) -> bool {
        self.timer.is_armed() || self.summary.is_armed()
    }

    pub fn poll(&mut self, now: Instant) -> TickFired {
        TickFired {
            timer: self.timer.poll(now),
            summary: self.summary.poll(now),
        }
    }

    /// Time until the nearest armed tick, if any
    pub fn next_deadline(&self, now: Instant) -> Option<Duration> {
        match (self.timer.time_until_due(now), self.summary.time_until_due(now)) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }
}

impl Default for DisplayTicks {
    fn default() -> Self {
        Self::new(TIMER_TICK, SUMMARY_TICK)
    }
}

impl Drop for DisplayTicks {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unarmed_tick_never_fires() {
        let start = Instant::now();
        let mut tick = Tick::new(Duration::from_millis(100));
        assert!(!tick.poll(start + Duration::from_secs(10)));
        assert_eq!(tick.time_until_due(start), None);
    }

    #[test]
    fn test_tick_fires_after_interval() {
        let start = Instant::now();
        let mut tick = Tick::new(Duration::from_millis(100));
        tick.arm(start);

        assert!(!tick.poll(start + Duration::from_millis(50)));
        assert!(tick.poll(start + Duration::from_millis(100)));
        assert!(!tick.poll(start + Duration::from_millis(150)));
        assert!(tick.poll(start + Duration::from_millis(200)));
    }

    #[test]
    fn test_late_poll_fires_once() {
        let start = Instant::now();
        let mut tick = Tick::new(Duration::from_millis(100));
        tick.arm(start);
        let late = start + Duration::from_millis(1_000);
        assert!(tick.poll(late));
        assert!(!tick.poll(late));
        assert_eq!(tick.time_until_due(late), Some(Duration::from_millis(100)));
    }

    #[test]
    fn test_cancelled_tick_stops_firing() {
        let start = Instant::now();
        let mut tick = Tick::new(Duration::from_millis(100));
        tick.arm(start);
        tick.cancel();
        assert!(!tick.is_armed());
        assert!(!tick.poll(start + Duration::from_secs(1)));
    }

    #[test]
    fn test_display_ticks_follow_timer_state() {
        let start = Instant::now();
        let mut ticks = DisplayTicks::default();

        ticks.sync(TimerState::Running, start);
        assert!(ticks.is_armed());
        assert_eq!(ticks.next_deadline(start), Some(SUMMARY_TICK));

        let fired = ticks.poll(start + SUMMARY_TICK);
        assert!(fired.summary);
        assert!(!fired.timer);

        let fired = ticks.poll(start + TIMER_TICK);
        assert!(fired.timer);
        assert!(fired.any());

        for state in [TimerState::Paused, TimerState::Idle] {
            ticks.sync(TimerState::Running, start);
            ticks.sync(state, start);
            assert!(!ticks.is_armed());
            assert!(!ticks.poll(start + Duration::from_secs(60)).any());
            assert_eq!(ticks.next_deadline(start), None);
        }
    }

    #[test]
    fn test_sync_while_running_keeps_schedule() {
        let start = Instant::now();
        let mut ticks = DisplayTicks::default();
        ticks.sync(TimerState::Running, start);
        ticks.sync(TimerState::Running, start + Duration::from_millis(90));
        assert!(ticks.poll(start + SUMMARY_TICK).summary);
    }
}
