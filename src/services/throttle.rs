use std::{sync::Arc, time::Duration};

use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use tokio::sync::{Mutex, MutexGuard};

/// Spaces out calls to a provider whose usage policy caps the request rate.
///
/// Holding the returned permit keeps other callers waiting, so calls never
/// overlap; the limiter then admits at most one call per `interval`.
#[derive(Clone)]
pub struct Throttle {
    limiter: Option<Arc<DefaultDirectRateLimiter>>,
    serial: Arc<Mutex<()>>,
}

pub struct ThrottlePermit<'a> {
    _guard: MutexGuard<'a, ()>,
}

impl Throttle {
    /// A zero interval only serializes calls.
    pub fn new(interval: Duration) -> Self {
        Throttle {
            limiter: Quota::with_period(interval).map(|q| Arc::new(RateLimiter::direct(q))),
            serial: Arc::new(Mutex::new(())),
        }
    }

    pub async fn acquire(&self) -> ThrottlePermit<'_> {
        let guard = self.serial.lock().await;

        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }

        ThrottlePermit { _guard: guard }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;

    #[tokio::test]
    async fn spaces_successive_calls() {
        let throttle = Throttle::new(Duration::from_millis(60));
        let started = Instant::now();

        for _ in 0..3 {
            let _permit = throttle.acquire().await;
        }

        assert!(started.elapsed() >= Duration::from_millis(120));
    }

    #[tokio::test]
    async fn first_call_is_immediate() {
        let throttle = Throttle::new(Duration::from_secs(5));
        let started = Instant::now();

        let _permit = throttle.acquire().await;

        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn held_permit_blocks_other_callers() {
        let throttle = Throttle::new(Duration::ZERO);
        let permit = throttle.acquire().await;

        let waiting = tokio::time::timeout(Duration::from_millis(50), throttle.acquire()).await;
        assert!(waiting.is_err());

        drop(permit);
        assert!(
            tokio::time::timeout(Duration::from_millis(50), throttle.acquire())
                .await
                .is_ok()
        );
    }
}
