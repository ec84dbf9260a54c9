use async_trait::async_trait;
use rand::Rng;
use std::time::Duration;

/// Suspends the current task; injectable so tests do not wait on wall-clock time
#[async_trait]
pub trait Clock: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

#[async_trait]
impl<C: Clock + ?Sized> Clock for std::sync::Arc<C> {
    async fn sleep(&self, duration: Duration) {
        (**self).sleep(duration).await;
    }
}

/// Clock backed by the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

#[async_trait]
impl Clock for TokioClock {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Randomized pre-flight delay applied before every network fetch
///
/// The delay is a whole number of seconds drawn uniformly from
/// `[min_secs, max_secs]`, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayPolicy {
    min_secs: u64,
    max_secs: u64,
}

impl DelayPolicy {
    /// Creates a policy from inclusive bounds
    ///
    /// Configuration rejects `min_secs > max_secs` before a policy is built; callers
    /// constructing one directly get the bounds swapped instead of a panic in `pick`.
    pub fn new(min_secs: u64, max_secs: u64) -> Self {
        Self {
            min_secs: min_secs.min(max_secs),
            max_secs: min_secs.max(max_secs),
        }
    }

    /// No delay at all
    pub fn none() -> Self {
        Self::new(0, 0)
    }

    pub fn min_secs(&self) -> u64 {
        self.min_secs
    }

    pub fn max_secs(&self) -> u64 {
        self.max_secs
    }

    /// Draws the next delay
    pub fn pick(&self) -> Duration {
        let secs = rand::thread_rng().gen_range(self.min_secs..=self.max_secs);
        Duration::from_secs(secs)
    }
}

impl Default for DelayPolicy {
    fn default() -> Self {
        Self::new(1, 3)
    }
}
