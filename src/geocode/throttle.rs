use std::time::{Duration, Instant};

/// Default pacing between consecutive external lookups.
pub const DEFAULT_MIN_INTERVAL: Duration = Duration::from_secs(1);

/// Sequential, single-slot rate limiter.
///
/// [`RateLimiter::wait`] blocks the calling thread until `min_interval` has passed since the
/// previous call returned. The first call never blocks.
#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    last: Option<Instant>,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_INTERVAL)
    }
}

impl RateLimiter {
    /// Limiter enforcing `min_interval` between calls. Zero disables pacing.
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last: None,
        }
    }

    /// Configured interval.
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Block until the next call is allowed, then take the slot.
    ///
    /// Returns how long the caller was put to sleep.
    pub fn wait(&mut self) -> Duration {
        let slept = match self.last {
            Some(last) => {
                let remaining = self.min_interval.saturating_sub(last.elapsed());
                if !remaining.is_zero() {
                    tracing::debug!(wait_ms = remaining.as_millis() as u64, "rate limiting");
                    std::thread::sleep(remaining);
                }
                remaining
            }
            None => Duration::ZERO,
        };
        self.last = Some(Instant::now());
        slept
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geocode/throttle.rs"]
mod tests;
