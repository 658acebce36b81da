//! Fixed-interval animation clock and achieved-rate counter.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::foundation::core::FrameRate;
use crate::foundation::error::ReelResult;

/// Fires ticks every `1000 / frameRate` ms and tracks the achieved rate.
///
/// Timestamps are milliseconds on any monotonic scale chosen by the caller, which keeps the
/// counter deterministic under test. [`AnimationClock::run`] drives it from the wall clock.
#[derive(Clone, Debug)]
pub struct AnimationClock {
    frame_rate: FrameRate,
    running: bool,
    last_ms: f64,
    deltas: VecDeque<f64>,
}

impl AnimationClock {
    /// Stopped clock for `frame_rate`.
    pub fn new(frame_rate: FrameRate) -> Self {
        Self {
            frame_rate,
            running: false,
            last_ms: 0.0,
            deltas: VecDeque::with_capacity(frame_rate.sample_window() + 1),
        }
    }

    /// Tick interval.
    pub fn interval(&self) -> Duration {
        Duration::from_secs_f64(self.frame_rate.interval_ms() / 1000.0)
    }

    /// Start ticking at `now_ms`. The first delta is measured against `now_ms - interval`.
    pub fn start(&mut self, now_ms: f64) {
        self.last_ms = now_ms - self.frame_rate.interval_ms();
        self.running = true;
    }

    /// Stop ticking. Recorded deltas are kept.
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Whether the clock is started.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Record a tick at `now_ms` and return the delta since the previous one.
    pub fn tick(&mut self, now_ms: f64) -> f64 {
        let dt = now_ms - self.last_ms;
        self.last_ms = now_ms;
        self.deltas.push_back(dt);
        while self.deltas.len() > self.frame_rate.sample_window() {
            self.deltas.pop_front();
        }
        dt
    }

    /// Rolling average rate over the recent deltas, rounded to one decimal.
    ///
    /// `0.0` before the first tick or when no time has passed.
    pub fn achieved_rate(&self) -> f64 {
        let sum: f64 = self.deltas.iter().sum();
        if self.deltas.is_empty() || sum <= 0.0 {
            return 0.0;
        }
        (self.deltas.len() as f64 / sum * 1000.0 * 10.0).round() / 10.0
    }

    /// Start the clock and call `on_tick(delta_ms)` up to `ticks` times on the wall clock,
    /// sleeping to hold the fixed interval. Stops the clock when done, when `on_tick` returns
    /// `Ok(false)`, or when it fails.
    pub fn run(
        &mut self,
        ticks: u64,
        mut on_tick: impl FnMut(f64) -> ReelResult<bool>,
    ) -> ReelResult<()> {
        let epoch = Instant::now();
        let now_ms = |at: Instant| at.duration_since(epoch).as_secs_f64() * 1000.0;
        let interval = self.interval();

        self.start(0.0);
        let mut next = epoch + interval;
        let mut result = Ok(());
        for _ in 0..ticks {
            if !self.running {
                break;
            }
            let now = Instant::now();
            if next > now {
                std::thread::sleep(next - now);
            }
            let dt = self.tick(now_ms(Instant::now()));
            match on_tick(dt) {
                Ok(true) => {}
                Ok(false) => break,
                Err(e) => {
                    result = Err(e);
                    break;
                }
            }
            next += interval;
        }
        self.stop();
        result
    }
}

#[cfg(test)]
#[path = "../tests/unit/clock.rs"]
mod tests;
