use std::time::Duration;

/// Smallest accepted interval between two steps, in milliseconds.
pub const MIN_INTERVAL_MS: u64 = 50;
/// Interval a fresh [`Pacing`] starts with, in milliseconds.
pub const DEFAULT_INTERVAL_MS: u64 = 100;
/// Amount [`Pacing::faster`] and [`Pacing::slower`] change the interval by.
pub const INTERVAL_STEP_MS: u64 = 50;

/// Real-time spacing between search steps.
///
/// Pacing only decides *when* the next step runs; it never changes which
/// events a search emits or their order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "u64", into = "u64")
)]
pub struct Pacing {
    interval_ms: u64,
}

impl Pacing {
    /// Create a pacing of `ms` milliseconds, clamped to [`MIN_INTERVAL_MS`].
    pub fn new(ms: u64) -> Self {
        Self {
            interval_ms: ms.max(MIN_INTERVAL_MS),
        }
    }

    /// The interval in milliseconds.
    #[inline]
    pub fn millis(self) -> u64 {
        self.interval_ms
    }

    /// The interval as a [`Duration`].
    #[inline]
    pub fn interval(self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    /// Replace the interval, clamped to [`MIN_INTERVAL_MS`].
    pub fn set_millis(&mut self, ms: u64) {
        *self = Self::new(ms);
    }

    /// Shorten the interval by one step, never below the floor.
    pub fn faster(&mut self) {
        self.set_millis(self.interval_ms.saturating_sub(INTERVAL_STEP_MS));
    }

    /// Lengthen the interval by one step.
    pub fn slower(&mut self) {
        self.set_millis(self.interval_ms.saturating_add(INTERVAL_STEP_MS));
    }
}

impl Default for Pacing {
    fn default() -> Self {
        Self::new(DEFAULT_INTERVAL_MS)
    }
}

impl From<u64> for Pacing {
    fn from(ms: u64) -> Self {
        Self::new(ms)
    }
}

impl From<Pacing> for u64 {
    fn from(p: Pacing) -> Self {
        p.interval_ms
    }
}
