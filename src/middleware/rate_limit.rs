use std::{
    sync::Arc,
    task::{Context, Poll},
};

use axum::{
    body::Body,
    http::{HeaderMap, HeaderValue, Request},
    response::{IntoResponse, Response},
};
use futures_util::future::BoxFuture;
use tower::{Layer, Service};

use crate::{
    error::AppError,
    ratelimit::{RateClass, RateDecision, RateLimiter, client_ip},
};

const LIMIT_HEADER: &str = "x-ratelimit-limit";
const REMAINING_HEADER: &str = "x-ratelimit-remaining";
const RESET_HEADER: &str = "x-ratelimit-reset";

/// Charges every request against `class`'s per-IP budget.
#[derive(Clone)]
pub struct RateLimitLayer {
    class: RateClass,
    limiter: Arc<dyn RateLimiter>,
}

impl RateLimitLayer {
    pub fn new(class: RateClass, limiter: Arc<dyn RateLimiter>) -> Self {
        Self { class, limiter }
    }
}

#[derive(Clone)]
pub struct RateLimited<S> {
    inner: S,
    class: RateClass,
    limiter: Arc<dyn RateLimiter>,
}

impl<S> Layer<S> for RateLimitLayer {
    type Service = RateLimited<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RateLimited {
            inner,
            class: self.class,
            limiter: self.limiter.clone(),
        }
    }
}

impl<S> Service<Request<Body>> for RateLimited<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
    S::Error: Send + 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let class = self.class;
        let limiter = self.limiter.clone();
        let mut inner = self.inner.clone();

        Box::pin(async move {
            let ip = client_ip(req.headers());
            let decision = limiter.check_or_allow(class, &ip).await;

            let mut response = if decision.allowed {
                inner.call(req).await?
            } else {
                tracing::info!(class = class.as_str(), client_ip = %ip, "rate limit exceeded");
                AppError::too_many_requests("Too many requests. Please try again later.")
                    .into_response()
            };
            apply_headers(response.headers_mut(), &decision);
            Ok(response)
        })
    }
}

fn apply_headers(headers: &mut HeaderMap, decision: &RateDecision) {
    headers.insert(LIMIT_HEADER, HeaderValue::from(decision.limit));
    headers.insert(REMAINING_HEADER, HeaderValue::from(decision.remaining));
    headers.insert(RESET_HEADER, HeaderValue::from(decision.reset_secs));
}
