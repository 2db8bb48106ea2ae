//! Per-identity rate limiting of generation requests.
//!
//! Each identity (signed-in email, else `anonymous`) owns a token bucket that
//! refills continuously up to its burst size.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Bucket capacity
    pub burst: u32,
    /// Tokens refilled per second
    pub refill_rate: f64,
    pub enabled: bool,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            burst: 5,
            // One roadmap every 20 seconds sustained
            refill_rate: 0.05,
            enabled: true,
        }
    }
}

#[derive(Debug)]
struct Bucket {
    tokens: f64,
    touched: Instant,
}

impl Bucket {
    fn full(capacity: u32, now: Instant) -> Self {
        Self {
            tokens: f64::from(capacity),
            touched: now,
        }
    }

    fn refill(&mut self, config: &RateLimitConfig, now: Instant) {
        let elapsed = now.saturating_duration_since(self.touched).as_secs_f64();
        self.tokens = (self.tokens + elapsed * config.refill_rate).min(f64::from(config.burst));
        self.touched = now;
    }

    fn wait_for_token(&self, config: &RateLimitConfig) -> Duration {
        let missing = (1.0 - self.tokens).max(0.0);
        if missing == 0.0 {
            Duration::ZERO
        } else if config.refill_rate <= 0.0 {
            Duration::MAX
        } else {
            Duration::from_secs_f64(missing / config.refill_rate)
        }
    }
}

#[derive(Debug)]
pub struct RateLimiter {
    config: RateLimitConfig,
    buckets: Mutex<HashMap<String, Bucket>>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            buckets: Mutex::new(HashMap::new()),
        }
    }

    /// Take one token for `identity`. On refusal returns how long until the
    /// next token is available.
    pub fn check(&self, identity: &str) -> Result<(), Duration> {
        self.check_at(identity, Instant::now())
    }

    fn check_at(&self, identity: &str, now: Instant) -> Result<(), Duration> {
        if !self.config.enabled {
            return Ok(());
        }

        let mut buckets = self.buckets.lock();
        let bucket = buckets
            .entry(identity.to_string())
            .or_insert_with(|| Bucket::full(self.config.burst, now));
        bucket.refill(&self.config, now);

        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            Ok(())
        } else {
            Err(bucket.wait_for_token(&self.config))
        }
    }

    /// Forget identities idle for longer than `max_idle`.
    pub fn prune(&self, max_idle: Duration) {
        let now = Instant::now();
        self.buckets
            .lock()
            .retain(|_, bucket| now.saturating_duration_since(bucket.touched) < max_idle);
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(RateLimitConfig::default())
    }
}
