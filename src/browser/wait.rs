//! Bounded polling

use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep, timeout, Instant};

/// Default upper bound on a wait
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default delay between probes
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Timeout and cadence for [`poll_until`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WaitConfig {
    pub timeout: Duration,
    pub poll_interval: Duration,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl WaitConfig {
    pub fn from_millis(timeout_ms: u64, poll_interval_ms: u64) -> Self {
        Self {
            timeout: Duration::from_millis(timeout_ms),
            poll_interval: Duration::from_millis(poll_interval_ms),
        }
    }
}

/// Run `probe` until it yields `true` or the timeout elapses.
///
/// Returns `Ok(false)` on timeout. A probe still in flight at the deadline is
/// abandoned. Probe errors end the wait immediately.
pub async fn poll_until<F, Fut, E>(config: &WaitConfig, mut probe: F) -> Result<bool, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool, E>>,
{
    let deadline = Instant::now() + config.timeout;

    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        match timeout(remaining, probe()).await {
            Ok(Ok(true)) => return Ok(true),
            Ok(Ok(false)) => {}
            Ok(Err(e)) => return Err(e),
            Err(_) => return Ok(false),
        }

        let now = Instant::now();
        if now >= deadline {
            return Ok(false);
        }
        sleep(config.poll_interval.min(deadline - now)).await;
    }
}
