use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::debug;

pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Debounced<T> {
    Completed(T),
    /// A newer call (or `cancel`) arrived first. Not an error.
    Superseded,
}

impl<T> Debounced<T> {
    pub fn completed(self) -> Option<T> {
        match self {
            Self::Completed(v) => Some(v),
            Self::Superseded => None,
        }
    }

    pub fn is_superseded(&self) -> bool {
        matches!(self, Self::Superseded)
    }
}

/// Runs only the latest call once the caller has been quiet for
/// `quiet_period`. Each call cancels the token of the one before it.
pub struct Debouncer {
    quiet_period: Duration,
    current: Mutex<Option<CancellationToken>>,
}

impl Debouncer {
    pub fn new(quiet_period: Duration) -> Self {
        Self {
            quiet_period,
            current: Mutex::new(None),
        }
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet_period
    }

    /// Waits out the quiet period, then runs `f(params)` unless a newer call
    /// superseded this one. A result produced after being superseded is
    /// discarded.
    pub async fn debounce<P, F, Fut, T>(&self, params: P, f: F) -> Debounced<T>
    where
        F: FnOnce(P) -> Fut,
        Fut: Future<Output = T>,
    {
        let token = self.arm();

        tokio::select! {
            biased;
            _ = token.cancelled() => {
                debug!("Debounced call superseded while waiting");
                return Debounced::Superseded;
            }
            _ = tokio::time::sleep(self.quiet_period) => {}
        }

        let result = f(params).await;

        if token.is_cancelled() {
            debug!("Debounced call superseded while in flight, result dropped");
            return Debounced::Superseded;
        }
        Debounced::Completed(result)
    }

    /// Supersedes whatever is pending or in flight.
    pub fn cancel(&self) {
        if let Some(token) = self.lock().take() {
            token.cancel();
        }
    }

    fn arm(&self) -> CancellationToken {
        let token = CancellationToken::new();
        if let Some(previous) = self.lock().replace(token.clone()) {
            previous.cancel();
        }
        token
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<CancellationToken>> {
        self.current.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_QUIET_PERIOD)
    }
}
