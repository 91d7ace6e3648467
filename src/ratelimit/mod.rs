mod memory;
mod upstash;

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use axum::http::HeaderMap;

use crate::config::{RateLimitBackend, RateLimitConfig};

pub use memory::MemoryRateLimiter;
pub use upstash::UpstashRateLimiter;

const FALLBACK_CLIENT_IP: &str = "127.0.0.1";
const CLIENT_IP_HEADERS: [&str; 3] = ["x-forwarded-for", "x-real-ip", "cf-connecting-ip"];

/// Action classes with their own budget per client IP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RateClass {
    Contact,
    Newsletter,
    Auth,
    Api,
    Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateBudget {
    pub limit: u32,
    pub window: Duration,
}

impl RateClass {
    pub fn as_str(self) -> &'static str {
        match self {
            RateClass::Contact => "contact",
            RateClass::Newsletter => "newsletter",
            RateClass::Auth => "auth",
            RateClass::Api => "api",
            RateClass::Admin => "admin",
        }
    }

    pub fn budget(self) -> RateBudget {
        let (limit, window_secs) = match self {
            RateClass::Contact => (3, 60 * 60),
            RateClass::Newsletter => (2, 24 * 60 * 60),
            RateClass::Auth => (5, 15 * 60),
            RateClass::Api => (100, 60),
            RateClass::Admin => (50, 60),
        };
        RateBudget {
            limit,
            window: Duration::from_secs(window_secs),
        }
    }

    pub fn key_for(self, client_ip: &str) -> String {
        format!("{}_{}", self.as_str(), client_ip)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateDecision {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    /// Seconds until the oldest counted request leaves the window.
    pub reset_secs: u64,
}

impl RateDecision {
    pub fn permissive(budget: RateBudget) -> Self {
        Self {
            allowed: true,
            limit: budget.limit,
            remaining: budget.limit,
            reset_secs: 0,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RateLimitError {
    #[error("rate limit backend request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("rate limit backend returned an unexpected reply: {0}")]
    Reply(String),
    #[error("rate limit state is unavailable")]
    Poisoned,
}

#[async_trait]
pub trait RateLimiter: Send + Sync {
    fn name(&self) -> &'static str;

    async fn check(&self, key: &str, budget: RateBudget) -> Result<RateDecision, RateLimitError>;

    /// Backend failures let the request through.
    async fn check_or_allow(&self, class: RateClass, client_ip: &str) -> RateDecision {
        let budget = class.budget();
        let key = class.key_for(client_ip);
        match self.check(&key, budget).await {
            Ok(decision) => decision,
            Err(err) => {
                tracing::warn!(
                    backend = self.name(),
                    key = %key,
                    error = %err,
                    "rate limit check failed; allowing request"
                );
                RateDecision::permissive(budget)
            }
        }
    }
}

/// Used when no backend is configured.
pub struct NoopRateLimiter;

#[async_trait]
impl RateLimiter for NoopRateLimiter {
    fn name(&self) -> &'static str {
        "noop"
    }

    async fn check(&self, _key: &str, budget: RateBudget) -> Result<RateDecision, RateLimitError> {
        Ok(RateDecision::permissive(budget))
    }
}

pub fn build_rate_limiter(cfg: Option<&RateLimitConfig>) -> Arc<dyn RateLimiter> {
    match cfg {
        Some(cfg) if cfg.backend == RateLimitBackend::Memory => {
            tracing::info!("rate limiting with in-memory sliding window");
            Arc::new(MemoryRateLimiter::new())
        }
        Some(cfg) if cfg.is_remote_configured() => {
            tracing::info!("rate limiting with hosted sliding window");
            Arc::new(UpstashRateLimiter::new(&cfg.url, &cfg.token))
        }
        _ => {
            tracing::warn!("rate limiter not configured; all requests will be allowed");
            Arc::new(NoopRateLimiter)
        }
    }
}

/// First present of the proxy headers, else loopback.
pub fn client_ip(headers: &HeaderMap) -> String {
    CLIENT_IP_HEADERS
        .iter()
        .filter_map(|name| headers.get(*name))
        .filter_map(|value| value.to_str().ok())
        .filter_map(|value| value.split(',').next())
        .map(str::trim)
        .find(|ip| !ip.is_empty())
        .unwrap_or(FALLBACK_CLIENT_IP)
        .to_string()
}

#[cfg(test)]
mod tests {
    use axum::http::{HeaderMap, HeaderValue};

    use super::{
        NoopRateLimiter, RateClass, RateLimiter, build_rate_limiter, client_ip,
    };
    use crate::config::{RateLimitBackend, RateLimitConfig};

    #[test]
    fn forwarded_for_takes_first_entry() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.7, 10.0.0.1"),
        );
        headers.insert("x-real-ip", HeaderValue::from_static("198.51.100.2"));
        assert_eq!(client_ip(&headers), "203.0.113.7");
    }

    #[test]
    fn falls_through_header_order_to_loopback() {
        let mut headers = HeaderMap::new();
        headers.insert("cf-connecting-ip", HeaderValue::from_static("192.0.2.9"));
        assert_eq!(client_ip(&headers), "192.0.2.9");

        headers.insert("x-real-ip", HeaderValue::from_static("198.51.100.2"));
        assert_eq!(client_ip(&headers), "198.51.100.2");

        assert_eq!(client_ip(&HeaderMap::new()), "127.0.0.1");
    }

    #[test]
    fn class_budgets_and_keys() {
        assert_eq!(RateClass::Contact.budget().limit, 3);
        assert_eq!(RateClass::Newsletter.budget().window.as_secs(), 86_400);
        assert_eq!(RateClass::Auth.budget().window.as_secs(), 900);
        assert_eq!(RateClass::Api.budget().limit, 100);
        assert_eq!(RateClass::Admin.budget().limit, 50);
        assert_eq!(RateClass::Auth.key_for("10.1.1.1"), "auth_10.1.1.1");
    }

    #[tokio::test]
    async fn noop_always_allows() {
        for _ in 0..10 {
            let decision = NoopRateLimiter.check_or_allow(RateClass::Contact, "1.1.1.1").await;
            assert!(decision.allowed);
        }
    }

    #[test]
    fn builder_picks_backend_from_config() {
        assert_eq!(build_rate_limiter(None).name(), "noop");

        let memory = RateLimitConfig {
            backend: RateLimitBackend::Memory,
            ..Default::default()
        };
        assert_eq!(build_rate_limiter(Some(&memory)).name(), "memory");

        let unconfigured_remote = RateLimitConfig::default();
        assert_eq!(build_rate_limiter(Some(&unconfigured_remote)).name(), "noop");

        let remote = RateLimitConfig {
            backend: RateLimitBackend::Upstash,
            url: "https://example.upstash.io".to_string(),
            token: "token".to_string(),
        };
        assert_eq!(build_rate_limiter(Some(&remote)).name(), "upstash");
    }
}
