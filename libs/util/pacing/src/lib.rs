// This file is part of QuadSim.
//
// QuadSim is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// QuadSim is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with QuadSim.  If not, see <http://www.gnu.org/licenses/>.
use log::debug;
use std::{
    thread,
    time::{Duration, Instant},
};

/// The fixed-step simulation clock.
///
/// Elapsed time is derived from the step count rather than accumulated, so
/// that long runs do not drift from `count * dt`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimeStep {
    dt: f64,
    count: u64,
}

impl TimeStep {
    pub fn new(dt: f64) -> Self {
        assert!(dt > 0., "timestep must be positive");
        Self { dt, count: 0 }
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn step_duration(&self) -> Duration {
        Duration::from_secs_f64(self.dt)
    }

    /// Simulated seconds at the start of the current step.
    pub fn elapsed(&self) -> f64 {
        self.count as f64 * self.dt
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn advance(&mut self) {
        self.count += 1;
    }

    pub fn reset(&mut self) {
        self.count = 0;
    }
}

/// Keeps a loop in lock-step with the wall clock.
///
/// Each call to `wait` sleeps until the next deadline, one period after the
/// previous one. If the loop falls further behind than `max_lag` the
/// schedule is re-anchored at the current instant instead of trying to
/// catch up with a burst of unpaced steps.
#[derive(Debug)]
pub struct Pacer {
    period: Duration,
    max_lag: Duration,
    next: Instant,
    resyncs: u64,
}

impl Pacer {
    pub fn new(period: Duration) -> Self {
        Self::start(Instant::now(), period)
    }

    pub fn start(start: Instant, period: Duration) -> Self {
        Self {
            period,
            max_lag: period.saturating_mul(10),
            next: start + period,
            resyncs: 0,
        }
    }

    pub fn with_max_lag(mut self, max_lag: Duration) -> Self {
        self.max_lag = max_lag;
        self
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// How many times the schedule was abandoned because we fell behind.
    pub fn resyncs(&self) -> u64 {
        self.resyncs
    }

    /// Work out how long to sleep at `now` and move the deadline forward.
    pub fn schedule(&mut self, now: Instant) -> Option<Duration> {
        let deadline = self.next;
        if deadline > now {
            self.next += self.period;
            return Some(deadline - now);
        }
        let lag = now - deadline;
        if lag > self.max_lag {
            debug!(
                "pacer fell {:.1}ms behind; re-anchoring schedule",
                lag.as_secs_f64() * 1000.
            );
            self.resyncs += 1;
            self.next = now + self.period;
        } else {
            self.next += self.period;
        }
        None
    }

    pub fn wait(&mut self) {
        if let Some(remaining) = self.schedule(Instant::now()) {
            thread::sleep(remaining);
        }
    }
}
