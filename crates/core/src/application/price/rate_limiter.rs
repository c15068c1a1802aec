use std::time::Duration;

use tokio::{sync::Mutex, time::Instant};

/// Spaces calls to one upstream API by a fixed interval.
///
/// A single instance is shared (through `Arc`) by everything calling that API,
/// so calls stay serialized even when rows are processed concurrently.
#[derive(Debug)]
pub struct RateLimiter {
    interval: Duration,
    next_slot: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_slot: Mutex::new(None),
        }
    }

    /// Waits until the next slot is free and reserves it. The first call
    /// returns immediately.
    pub async fn acquire(&self) {
        let mut next_slot = self.next_slot.lock().await;
        if let Some(slot) = *next_slot {
            tokio::time::sleep_until(slot).await;
        }
        *next_slot = Some(Instant::now() + self.interval);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_first_acquire_is_immediate() {
        let limiter = RateLimiter::new(Duration::from_secs(2));
        let start = Instant::now();
        limiter.acquire().await;
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_calls_are_spaced() {
        let limiter = RateLimiter::new(Duration::from_millis(1500));
        let start = Instant::now();
        for _ in 0..4 {
            limiter.acquire().await;
        }
        assert_eq!(start.elapsed(), Duration::from_millis(4500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_time_counts_towards_interval() {
        let limiter = RateLimiter::new(Duration::from_secs(1));
        limiter.acquire().await;
        tokio::time::sleep(Duration::from_secs(5)).await;

        let before = Instant::now();
        limiter.acquire().await;
        assert_eq!(before.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shared_between_tasks() {
        let limiter = Arc::new(RateLimiter::new(Duration::from_secs(1)));
        let start = Instant::now();

        let handles = (0..3)
            .map(|_| {
                let limiter = limiter.clone();
                tokio::spawn(async move { limiter.acquire().await })
            })
            .collect::<Vec<_>>();
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(start.elapsed(), Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_interval_never_waits() {
        let limiter = RateLimiter::new(Duration::ZERO);
        let start = Instant::now();
        for _ in 0..10 {
            limiter.acquire().await;
        }
        assert_eq!(start.elapsed(), Duration::ZERO);
    }
}
