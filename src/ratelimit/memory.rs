use std::{
    collections::{HashMap, VecDeque},
    sync::Mutex,
    time::{SystemTime, UNIX_EPOCH},
};

use async_trait::async_trait;

use super::{RateBudget, RateDecision, RateLimitError, RateLimiter};

const PRUNE_THRESHOLD: usize = 10_000;

/// Sliding-window log kept in process memory.
#[derive(Default)]
pub struct MemoryRateLimiter {
    windows: Mutex<HashMap<String, VecDeque<u64>>>,
}

impl MemoryRateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn check_at(
        &self,
        key: &str,
        budget: RateBudget,
        now_ms: u64,
    ) -> Result<RateDecision, RateLimitError> {
        let window_ms = budget.window.as_millis() as u64;
        let cutoff = now_ms.saturating_sub(window_ms);
        let mut windows = self.windows.lock().map_err(|_| RateLimitError::Poisoned)?;

        if windows.len() > PRUNE_THRESHOLD {
            windows.retain(|_, hits| hits.back().is_some_and(|last| *last > cutoff));
        }

        let hits = windows.entry(key.to_string()).or_default();
        while hits.front().is_some_and(|hit| *hit <= cutoff) {
            hits.pop_front();
        }

        let used = hits.len() as u32;
        if used >= budget.limit {
            let oldest = hits.front().copied().unwrap_or(now_ms);
            let reset_ms = (oldest + window_ms).saturating_sub(now_ms);
            return Ok(RateDecision {
                allowed: false,
                limit: budget.limit,
                remaining: 0,
                reset_secs: reset_ms.div_ceil(1000),
            });
        }

        hits.push_back(now_ms);
        let oldest = hits.front().copied().unwrap_or(now_ms);
        Ok(RateDecision {
            allowed: true,
            limit: budget.limit,
            remaining: budget.limit - used - 1,
            reset_secs: (oldest + window_ms).saturating_sub(now_ms).div_ceil(1000),
        })
    }
}

#[async_trait]
impl RateLimiter for MemoryRateLimiter {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn check(&self, key: &str, budget: RateBudget) -> Result<RateDecision, RateLimitError> {
        self.check_at(key, budget, now_ms())
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::MemoryRateLimiter;
    use crate::ratelimit::{RateBudget, RateClass, RateLimiter};

    const BUDGET: RateBudget = RateBudget {
        limit: 3,
        window: Duration::from_secs(60),
    };

    #[test]
    fn allows_limit_then_rejects_next() {
        let limiter = MemoryRateLimiter::new();
        let start = 1_000_000;

        for n in 0..3 {
            let decision = limiter
                .check_at("contact_1.2.3.4", BUDGET, start + n)
                .expect("check should succeed");
            assert!(decision.allowed);
            assert_eq!(decision.remaining, 2 - n as u32);
        }

        let rejected = limiter
            .check_at("contact_1.2.3.4", BUDGET, start + 10)
            .expect("check should succeed");
        assert!(!rejected.allowed);
        assert_eq!(rejected.remaining, 0);
        assert_eq!(rejected.reset_secs, 60);
    }

    #[test]
    fn window_slides_past_old_hits() {
        let limiter = MemoryRateLimiter::new();
        let start = 5_000_000;
        for n in 0..3 {
            limiter
                .check_at("k", BUDGET, start + n * 1000)
                .expect("check should succeed");
        }
        assert!(!limiter.check_at("k", BUDGET, start + 30_000).expect("check").allowed);

        let later = limiter.check_at("k", BUDGET, start + 60_500).expect("check");
        assert!(later.allowed);
    }

    #[tokio::test]
    async fn other_ip_has_its_own_budget() {
        let limiter = MemoryRateLimiter::new();
        for _ in 0..3 {
            assert!(limiter.check_or_allow(RateClass::Contact, "10.0.0.1").await.allowed);
        }
        assert!(!limiter.check_or_allow(RateClass::Contact, "10.0.0.1").await.allowed);
        assert!(limiter.check_or_allow(RateClass::Contact, "10.0.0.2").await.allowed);
        assert!(limiter.check_or_allow(RateClass::Newsletter, "10.0.0.1").await.allowed);
    }
}
