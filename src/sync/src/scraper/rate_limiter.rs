//! Randomized delay applied before each page request.

use rand::Rng;
use tokio::time::Duration;

use crate::config::SourceConfig;

/// Sleeps a uniformly random duration in `[min_delay, max_delay]` per request
#[derive(Debug, Clone)]
pub struct Throttle {
    min_delay: Duration,
    max_delay: Duration,
}

impl Throttle {
    /// Create a new throttle
    ///
    /// # Arguments
    /// * `min_delay_secs` - Minimum delay before a request
    /// * `max_delay_secs` - Maximum delay before a request
    pub fn new(min_delay_secs: f64, max_delay_secs: f64) -> Self {
        let min = min_delay_secs.max(0.0);
        let max = max_delay_secs.max(min);

        Self {
            min_delay: Duration::from_secs_f64(min),
            max_delay: Duration::from_secs_f64(max),
        }
    }

    pub fn from_config(source: &SourceConfig) -> Self {
        Self::new(source.min_delay_secs, source.max_delay_secs)
    }

    /// Pick the delay for the next request
    pub fn next_delay(&self) -> Duration {
        if self.max_delay <= self.min_delay {
            return self.min_delay;
        }
        rand::thread_rng().gen_range(self.min_delay..=self.max_delay)
    }

    /// Wait before issuing a request
    pub async fn acquire(&self) {
        let delay = self.next_delay();
        if !delay.is_zero() {
            tracing::debug!("Waiting {:?} before next request", delay);
            tokio::time::sleep(delay).await;
        }
    }
}
