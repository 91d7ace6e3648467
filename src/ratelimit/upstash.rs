use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use rand::{Rng, thread_rng};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};

use super::{RateBudget, RateDecision, RateLimitError, RateLimiter};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(2);

/// Sliding-window log in a hosted Redis sorted set, one script call per check.
pub struct UpstashRateLimiter {
    http: Client,
    url: String,
    token: String,
}

#[derive(Debug, Deserialize)]
struct ScriptReply {
    result: Option<Value>,
    error: Option<String>,
}

/// Trims the window, then records the request only while under the limit.
/// Returns `{allowed, used, oldest_ms}`.
const SLIDING_WINDOW_SCRIPT: &str = r#"
local key = KEYS[1]
local now = tonumber(ARGV[1])
local window = tonumber(ARGV[2])
local limit = tonumber(ARGV[3])
redis.call('ZREMRANGEBYSCORE', key, 0, now - window)
local used = redis.call('ZCARD', key)
local allowed = 0
if used < limit then
  redis.call('ZADD', key, now, ARGV[4])
  redis.call('PEXPIRE', key, window)
  used = used + 1
  allowed = 1
end
local oldest = redis.call('ZRANGE', key, 0, 0, 'WITHSCORES')
local oldest_ms = now
if oldest[2] then
  oldest_ms = tonumber(oldest[2])
end
return {allowed, used, oldest_ms}
"#;

impl UpstashRateLimiter {
    pub fn new(url: &str, token: &str) -> Self {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|err| {
                tracing::warn!(error = %err, "falling back to default http client");
                Client::new()
            });
        Self {
            http,
            url: url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        }
    }
}

pub(crate) fn script_command(key: &str, budget: RateBudget, now_ms: u64, member: &str) -> Value {
    let window_ms = budget.window.as_millis() as u64;
    json!([
        "EVAL",
        SLIDING_WINDOW_SCRIPT,
        "1",
        key,
        now_ms.to_string(),
        window_ms.to_string(),
        budget.limit.to_string(),
        member,
    ])
}

pub(crate) fn decision_from_outcome(
    allowed: bool,
    used: u64,
    oldest_ms: u64,
    budget: RateBudget,
    now_ms: u64,
) -> RateDecision {
    let limit = budget.limit;
    let used = used.min(u32::MAX as u64) as u32;
    let window_ms = budget.window.as_millis() as u64;
    RateDecision {
        allowed,
        limit,
        remaining: limit.saturating_sub(used),
        reset_secs: (oldest_ms + window_ms).saturating_sub(now_ms).div_ceil(1000),
    }
}

fn outcome_from_reply(reply: &ScriptReply) -> Result<(bool, u64, u64), RateLimitError> {
    if let Some(error) = &reply.error {
        return Err(RateLimitError::Reply(error.clone()));
    }
    let values = reply
        .result
        .as_ref()
        .and_then(Value::as_array)
        .ok_or_else(|| RateLimitError::Reply("missing script result".to_string()))?;
    let number = |index: usize| {
        values
            .get(index)
            .and_then(Value::as_u64)
            .ok_or_else(|| RateLimitError::Reply(format!("script result {index} is not a number")))
    };
    Ok((number(0)? == 1, number(1)?, number(2)?))
}

#[async_trait]
impl RateLimiter for UpstashRateLimiter {
    fn name(&self) -> &'static str {
        "upstash"
    }

    async fn check(&self, key: &str, budget: RateBudget) -> Result<RateDecision, RateLimitError> {
        let now_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis() as u64)
            .unwrap_or_default();
        let member = format!("{now_ms}-{:08x}", thread_rng().r#gen::<u32>());

        let reply: ScriptReply = self
            .http
            .post(&self.url)
            .bearer_auth(&self.token)
            .json(&script_command(key, budget, now_ms, &member))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let (allowed, used, oldest_ms) = outcome_from_reply(&reply)?;
        Ok(decision_from_outcome(allowed, used, oldest_ms, budget, now_ms))
    }
}
