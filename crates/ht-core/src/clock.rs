//! Simulated time model.
//!
//! # Design
//!
//! The engine runs in *scaled real time*: a corridor edge weighted 5 seconds
//! takes `5 / speed_factor` wall seconds to traverse.  `SimClock` owns the
//! mapping in both directions:
//!
//!   sim_time      = wall_elapsed_secs * speed_factor
//!   wall_duration = sim_secs / speed_factor
//!
//! The speed factor is fixed at construction and never changes mid-run, so
//! simulated time is monotone and nondecreasing by construction.  All sleeps
//! in the engine (edge traversals, rest periods, workload decay) go through
//! [`SimClock::real_duration`] so a single configuration knob scales the
//! whole simulation.

use std::time::{Duration, Instant};

/// Monotonic simulated-time source with a fixed speed factor.
///
/// `SimClock` is cheap to clone and intentionally holds no heap data.
#[derive(Clone, Debug)]
pub struct SimClock {
    /// Wall-clock instant of simulated time zero.
    origin: Instant,
    /// Simulated seconds per real second.  Default: 10.
    speed_factor: f64,
}

impl SimClock {
    pub const DEFAULT_SPEED_FACTOR: f64 = 10.0;

    /// Start a clock now with the given speed factor.
    ///
    /// Non-positive or non-finite factors fall back to the default.
    pub fn new(speed_factor: f64) -> Self {
        let speed_factor = if speed_factor.is_finite() && speed_factor > 0.0 {
            speed_factor
        } else {
            Self::DEFAULT_SPEED_FACTOR
        };
        Self { origin: Instant::now(), speed_factor }
    }

    /// Simulated seconds elapsed since the clock started.
    #[inline]
    pub fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * self.speed_factor
    }

    /// The configured speed factor.
    #[inline]
    pub fn speed_factor(&self) -> f64 {
        self.speed_factor
    }

    /// Wall-clock duration corresponding to `sim_secs` simulated seconds.
    ///
    /// Negative inputs clamp to zero so arithmetic slips upstream can never
    /// panic `Duration::from_secs_f64`.
    #[inline]
    pub fn real_duration(&self, sim_secs: f64) -> Duration {
        Duration::from_secs_f64(sim_secs.max(0.0) / self.speed_factor)
    }
}

impl Default for SimClock {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SPEED_FACTOR)
    }
}
