use cinefetch_domain::config::BackoffConfig;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

use crate::ports::Clock;

#[derive(Debug, Default)]
struct BackoffState {
    consecutive_failures: u32,
    skip_until_ms: u64,
}

/// Cross-request backoff for one provider.
///
/// After `failure_threshold` consecutive failures the provider is skipped for
/// `base * 2^(failures - threshold)` ms, capped at `max_backoff_ms`, plus up to
/// `jitter_ratio` of that window. A single success resets it.
pub struct ProviderBackoff {
    name: String,
    config: BackoffConfig,
    clock: Arc<dyn Clock>,
    state: Mutex<BackoffState>,
}

impl ProviderBackoff {
    pub fn new(name: impl Into<String>, config: BackoffConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            name: name.into(),
            config,
            clock,
            state: Mutex::new(BackoffState::default()),
        }
    }

    pub fn should_skip(&self) -> bool {
        let now = self.clock.now_ms();
        match self.state.lock() {
            Ok(state) => now < state.skip_until_ms,
            Err(_) => false,
        }
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.state.lock().map(|s| s.consecutive_failures).unwrap_or(0)
    }

    pub fn record_success(&self) {
        if let Ok(mut state) = self.state.lock() {
            if state.consecutive_failures >= self.config.failure_threshold {
                info!(provider = %self.name, "Provider recovered, backoff cleared");
            }
            state.consecutive_failures = 0;
            state.skip_until_ms = 0;
        }
    }

    pub fn record_failure(&self) {
        let now = self.clock.now_ms();
        let Ok(mut state) = self.state.lock() else {
            return;
        };

        state.consecutive_failures = state.consecutive_failures.saturating_add(1);
        if state.consecutive_failures < self.config.failure_threshold {
            return;
        }

        let window = self.window_ms(state.consecutive_failures);
        state.skip_until_ms = now.saturating_add(window);
        warn!(
            provider = %self.name,
            failures = state.consecutive_failures,
            backoff_ms = window,
            "Provider backing off"
        );
    }

    fn window_ms(&self, failures: u32) -> u64 {
        let exponent = failures.saturating_sub(self.config.failure_threshold).min(32);
        let base = self
            .config
            .base_backoff_ms
            .saturating_mul(1u64 << exponent)
            .min(self.config.max_backoff_ms);

        let jitter_span = (base as f64 * self.config.jitter_ratio) as u64;
        if jitter_span == 0 {
            base
        } else {
            base + fastrand::u64(0..=jitter_span)
        }
    }
}
