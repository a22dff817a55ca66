use std::time::{Duration, Instant};

use crate::util::format_clock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerTick {
    /// Still counting, with this many seconds left.
    Running(u64),
    /// Reached zero on this tick. Reported exactly once.
    Expired,
    /// Not started, stopped, or already expired.
    Idle,
}

/// Countdown clock owned by a single quiz session.
#[derive(Debug, Clone)]
pub struct SessionTimer {
    duration_secs: u64,
    remaining_secs: u64,
    running: bool,
    expired: bool,
    last_tick: Option<Instant>,
}

impl SessionTimer {
    pub fn new(duration_secs: u64) -> Self {
        Self {
            duration_secs,
            remaining_secs: duration_secs,
            running: false,
            expired: false,
            last_tick: None,
        }
    }

    pub fn start(&mut self) {
        self.start_at(Instant::now());
    }

    pub fn start_at(&mut self, now: Instant) {
        if self.has_expired() {
            return;
        }
        self.running = true;
        self.last_tick = Some(now);
    }

    pub fn stop(&mut self) {
        self.running = false;
        self.last_tick = None;
    }

    /// Count down exactly one second.
    pub fn tick(&mut self) -> TimerTick {
        if !self.running {
            return TimerTick::Idle;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            self.running = false;
            self.expired = true;
            self.last_tick = None;
            TimerTick::Expired
        } else {
            TimerTick::Running(self.remaining_secs)
        }
    }

    /// Apply every whole second elapsed since the last tick.
    pub fn advance(&mut self, now: Instant) -> TimerTick {
        let Some(last) = self.last_tick.filter(|_| self.running) else {
            return TimerTick::Idle;
        };
        let elapsed = now.saturating_duration_since(last).as_secs();
        if elapsed == 0 {
            return TimerTick::Running(self.remaining_secs);
        }

        let mut outcome = TimerTick::Running(self.remaining_secs);
        for _ in 0..elapsed {
            outcome = self.tick();
            if outcome == TimerTick::Expired {
                return outcome;
            }
        }
        self.last_tick = Some(last + Duration::from_secs(elapsed));
        outcome
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn duration_secs(&self) -> u64 {
        self.duration_secs
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    fn has_expired(&self) -> bool {
        self.expired
    }

    pub fn display(&self) -> String {
        format_clock(self.remaining_secs)
    }
}
