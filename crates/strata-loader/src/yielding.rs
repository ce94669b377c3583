use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tracing::debug;

use crate::config::LoaderConfig;

/// Shared time-slice tracker.
///
/// Every clone shares one "last resumed" instant, so the budget bounds the
/// synchronous work of the whole session rather than of a single task.
#[derive(Clone, Debug)]
pub struct CooperativeYield {
    last_resume: Arc<Mutex<Instant>>,
    overruns: Arc<AtomicU64>,
    budget: Duration,
    overrun: Duration,
}

impl CooperativeYield {
    pub fn new(budget: Duration, overrun: Duration) -> Self {
        Self {
            last_resume: Arc::new(Mutex::new(Instant::now())),
            overruns: Arc::new(AtomicU64::new(0)),
            budget,
            overrun,
        }
    }

    pub fn from_config(config: &LoaderConfig) -> Self {
        Self::new(config.yield_budget(), config.yield_overrun())
    }

    /// Resumes that took at least the overrun threshold, across all clones.
    pub fn overruns(&self) -> u64 {
        self.overruns.load(Ordering::Relaxed)
    }

    /// Yield to the runtime if the budget since the last resume is spent.
    /// Returns whether a yield happened.
    pub async fn maybe_yield(&self) -> bool {
        let due = self.last_resume.lock().expect("lock poisoned").elapsed() >= self.budget;
        if !due {
            return false;
        }

        let paused = Instant::now();
        tokio::task::yield_now().await;
        let waited = paused.elapsed();
        if waited >= self.overrun {
            self.overruns.fetch_add(1, Ordering::Relaxed);
            debug!(waited_ms = waited.as_millis() as u64, "slow resume after yield");
        }

        *self.last_resume.lock().expect("lock poisoned") = Instant::now();
        true
    }
}

impl Default for CooperativeYield {
    fn default() -> Self {
        Self::from_config(&LoaderConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn zero_budget_always_yields() {
        let y = CooperativeYield::new(Duration::ZERO, Duration::from_secs(1));
        assert!(y.maybe_yield().await);
        assert!(y.maybe_yield().await);
    }

    #[tokio::test]
    async fn fresh_budget_does_not_yield() {
        let y = CooperativeYield::new(Duration::from_secs(3600), Duration::from_secs(1));
        assert!(!y.maybe_yield().await);
    }

    #[tokio::test]
    async fn slow_resume_is_counted() {
        let y = CooperativeYield::new(Duration::ZERO, Duration::ZERO);
        let other = y.clone();
        assert!(y.maybe_yield().await);
        assert!(other.maybe_yield().await);
        assert_eq!(y.overruns(), 2);
    }

    #[tokio::test]
    async fn prompt_resume_is_not_counted() {
        let y = CooperativeYield::new(Duration::ZERO, Duration::from_secs(3600));
        assert!(y.maybe_yield().await);
        assert_eq!(y.overruns(), 0);
    }

    #[tokio::test]
    async fn clones_share_the_slice() {
        let y = CooperativeYield::new(Duration::from_millis(50), Duration::from_secs(1));
        let other = y.clone();
        std::thread::sleep(Duration::from_millis(60));
        assert!(y.maybe_yield().await);
        // The yield above reset the shared instant.
        assert!(!other.maybe_yield().await);
    }
}
