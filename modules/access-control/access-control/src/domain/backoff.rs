use std::time::Duration;

/// Exponential backoff between timeout retries.
///
/// Delay before retry `n` (0-based) is `min(initial * multiplier^n, max)`.
/// No jitter: the portal talks to one backend and the schedule must stay
/// 1 s, 2 s, 4 s.
#[derive(Debug, Clone, PartialEq)]
pub struct Backoff {
    pub initial: Duration,
    pub max: Duration,
    pub multiplier: f64,
}

impl Default for Backoff {
    fn default() -> Self {
        Self {
            initial: Duration::from_secs(1),
            max: Duration::from_secs(8),
            multiplier: 2.0,
        }
    }
}

impl Backoff {
    #[must_use]
    pub fn new(initial: Duration, max: Duration, multiplier: f64) -> Self {
        Self {
            initial,
            max,
            multiplier,
        }
    }

    /// Delay to wait before retry number `retry` (0 is the first retry).
    #[must_use]
    pub fn delay(&self, retry: u32) -> Duration {
        let exponent = i32::try_from(retry).unwrap_or(i32::MAX);

        let multiplier = if self.multiplier.is_finite() && self.multiplier >= 0.0 {
            self.multiplier
        } else {
            1.0
        };
        let max_secs = self.max.as_secs_f64();
        let raw = self.initial.as_secs_f64() * multiplier.powi(exponent);

        // powi overflows to infinity long before u32::MAX retries
        let secs = if raw.is_finite() {
            raw.min(max_secs).max(0.0)
        } else {
            max_secs
        };
        Duration::from_secs_f64(secs)
    }
}
