//! Token bucket gating outbound delete calls.
//!
//! The bucket starts full, gains one unit every `refill_interval` up to
//! `capacity`, and admits at most `max_pending` concurrent acquirers. Callers
//! beyond that bound fail fast instead of queueing without limit.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use relprune_core::{AppError, AppResult};
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Configuration for a rate budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateBudgetConfig {
    /// Maximum units available at once (burst size).
    pub capacity: u32,
    /// Time to regain one unit.
    pub refill_interval: Duration,
    /// Maximum number of callers waiting for a unit.
    pub max_pending: usize,
}

impl RateBudgetConfig {
    /// Creates a validated rate budget configuration.
    pub fn new(capacity: u32, refill_interval: Duration, max_pending: usize) -> AppResult<Self> {
        if capacity == 0 {
            return Err(AppError::Validation(
                "rate budget capacity must be greater than zero".to_owned(),
            ));
        }

        if refill_interval.is_zero() {
            return Err(AppError::Validation(
                "rate budget refill interval must be greater than zero".to_owned(),
            ));
        }

        if max_pending == 0 {
            return Err(AppError::Validation(
                "rate budget max pending must be greater than zero".to_owned(),
            ));
        }

        Ok(Self {
            capacity,
            refill_interval,
            max_pending,
        })
    }
}

impl Default for RateBudgetConfig {
    fn default() -> Self {
        Self {
            capacity: 1,
            refill_interval: Duration::from_millis(250),
            max_pending: 1000,
        }
    }
}

#[derive(Debug)]
struct BucketState {
    tokens: u32,
    last_refill: Instant,
}

impl BucketState {
    fn refill(&mut self, now: Instant, config: &RateBudgetConfig) {
        // A full bucket accrues nothing; the refill clock restarts at the next take.
        if self.tokens >= config.capacity {
            self.last_refill = now;
            return;
        }

        let elapsed = now.saturating_duration_since(self.last_refill);
        let intervals = elapsed.as_nanos() / config.refill_interval.as_nanos().max(1);
        if intervals == 0 {
            return;
        }

        let gained = u32::try_from(intervals).unwrap_or(u32::MAX);
        self.tokens = self.tokens.saturating_add(gained).min(config.capacity);
        if self.tokens == config.capacity {
            self.last_refill = now;
        } else {
            self.last_refill += config.refill_interval.saturating_mul(gained);
        }
    }
}

/// Token bucket owned by one purge run.
#[derive(Debug)]
pub struct RateBudget {
    config: RateBudgetConfig,
    state: Mutex<BucketState>,
    pending: AtomicUsize,
}

impl RateBudget {
    /// Creates a full bucket.
    #[must_use]
    pub fn new(config: RateBudgetConfig) -> Self {
        Self {
            config,
            state: Mutex::new(BucketState {
                tokens: config.capacity,
                last_refill: Instant::now(),
            }),
            pending: AtomicUsize::new(0),
        }
    }

    /// Returns the wait queue bound.
    #[must_use]
    pub fn max_pending(&self) -> usize {
        self.config.max_pending
    }

    /// Takes one unit, waiting for a refill when the bucket is empty.
    ///
    /// Returns `AppError::ResourceExhausted` without waiting when
    /// `max_pending` callers are already inside `acquire`.
    pub async fn acquire(&self) -> AppResult<()> {
        let already_pending = self.pending.fetch_add(1, Ordering::SeqCst);
        let _slot = PendingSlot(&self.pending);
        if already_pending >= self.config.max_pending {
            return Err(AppError::ResourceExhausted(format!(
                "rate budget wait queue is full ({} pending)",
                self.config.max_pending
            )));
        }

        loop {
            let next_refill = {
                let mut state = self.state.lock().await;
                state.refill(Instant::now(), &self.config);
                if state.tokens > 0 {
                    state.tokens -= 1;
                    return Ok(());
                }

                state.last_refill + self.config.refill_interval
            };

            tokio::time::sleep_until(next_refill).await;
        }
    }
}

struct PendingSlot<'a>(&'a AtomicUsize);

impl Drop for PendingSlot<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}
