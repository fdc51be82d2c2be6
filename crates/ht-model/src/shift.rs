//! Shift management: mandatory rest after sustained workload.

/// Tracks when a transporter must rest and for how long.
///
/// The manager itself holds no clock; the engine sleeps for
/// `rest_duration_secs` (scaled to wall time) between
/// [`begin_rest`](Self::begin_rest) and [`end_rest`](Self::end_rest).
#[derive(Clone, Debug)]
pub struct ShiftManager {
    /// Cumulative workload at which a rest becomes mandatory.
    pub rest_threshold: f64,
    /// Length of a rest in simulated seconds.
    pub rest_duration_secs: f64,
    /// `true` from `begin_rest` until `end_rest`.
    resting: bool,
}

impl ShiftManager {
    pub fn new(rest_threshold: f64, rest_duration_secs: f64) -> Self {
        Self { rest_threshold, rest_duration_secs, resting: false }
    }

    /// `true` when `workload` has crossed the threshold and the worker is
    /// not already resting.
    #[inline]
    pub fn should_rest(&self, workload: f64) -> bool {
        !self.resting && workload >= self.rest_threshold
    }

    #[inline]
    pub fn is_resting(&self) -> bool {
        self.resting
    }

    pub fn begin_rest(&mut self) {
        self.resting = true;
    }

    pub fn end_rest(&mut self) {
        self.resting = false;
    }
}
