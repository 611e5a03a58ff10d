//! Sliding-window rate limiting so crawls do not overwhelm target sites.
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

const WINDOW: Duration = Duration::from_secs(60);

/// Sliding one-minute window over request timestamps.
///
/// `acquire` returns immediately while the window has room, otherwise it
/// sleeps until the oldest request falls out of the window.
#[derive(Debug)]
pub struct RateLimiter {
    max_per_minute: usize,
    requests: Mutex<VecDeque<Instant>>,
}

impl RateLimiter {
    pub fn new(max_per_minute: usize) -> Self {
        Self {
            max_per_minute,
            requests: Mutex::new(VecDeque::new()),
        }
    }

    /// Wait until a request slot is free, then take it.
    pub async fn acquire(&self) {
        loop {
            let wait = {
                let mut requests = self.requests.lock().unwrap();
                let now = Instant::now();
                while requests
                    .front()
                    .is_some_and(|t| now.duration_since(*t) >= WINDOW)
                {
                    requests.pop_front();
                }

                if requests.len() < self.max_per_minute {
                    requests.push_back(now);
                    None
                } else {
                    // The oldest request leaves the window first.
                    requests
                        .front()
                        .map(|t| WINDOW.saturating_sub(now.duration_since(*t)))
                }
            };

            match wait {
                None => return,
                Some(wait) => {
                    debug!("Rate limit reached, waiting {:?}", wait);
                    tokio::time::sleep(wait).await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn within_limit_no_wait() {
        let limiter = RateLimiter::new(3);
        let started = Instant::now();
        limiter.acquire().await;
        limiter.acquire().await;
        limiter.acquire().await;
        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn over_limit_waits_for_window() {
        let limiter = RateLimiter::new(2);
        limiter.acquire().await;
        limiter.acquire().await;

        let started = Instant::now();
        limiter.acquire().await;
        assert!(started.elapsed() >= WINDOW);
    }

    #[tokio::test(start_paused = true)]
    async fn slots_free_up_as_requests_age_out() {
        let limiter = RateLimiter::new(1);
        limiter.acquire().await;

        tokio::time::advance(WINDOW).await;
        let started = Instant::now();
        limiter.acquire().await;
        assert_eq!(started.elapsed(), Duration::ZERO);
    }
}
