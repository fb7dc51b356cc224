//! Daily wait-time accumulators read by the capacity controller.

/// Waiting time and ride count accumulated since the last day boundary.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AggregateStats {
    /// Sum of `pickup_tick - request_tick` over all pickups today.
    pub total_waiting_ticks: u64,
    /// Pickups today.
    pub completed_rides: u64,
}

impl AggregateStats {
    /// Record one pickup that waited `wait` ticks.
    #[inline]
    pub fn record_pickup(&mut self, wait: u64) {
        self.total_waiting_ticks += wait;
        self.completed_rides += 1;
    }

    /// Mean wait in ticks, or `None` when no rides were completed.
    pub fn average_wait(&self) -> Option<f64> {
        (self.completed_rides > 0)
            .then(|| self.total_waiting_ticks as f64 / self.completed_rides as f64)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
