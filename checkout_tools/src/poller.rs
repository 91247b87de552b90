//! Watches an order until its payment is approved.
//!
//! The poller reads the order status at a fixed cadence: each read starts one interval after the previous one began,
//! however long that read took. Reads never overlap. A read that outlasts the interval delays the next one instead of
//! queueing a burst. A `paid` status stops the poller and fires the completion callback exactly once. `pending` and
//! failed reads keep it polling, with failed reads backing off exponentially. After `max_attempts` reads without
//! seeing `paid`, the poller gives up.
use std::time::Duration;

use anyhow::Result;
use checkout_engine::db_types::{OrderId, OrderStatusType};
use log::*;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Anything that can report the status of an order.
#[allow(async_fn_in_trait)]
pub trait StatusSource {
    async fn fetch_status(&self, order_id: &OrderId) -> Result<OrderStatusType>;
}

impl<T: StatusSource> StatusSource for &T {
    async fn fetch_status(&self, order_id: &OrderId) -> Result<OrderStatusType> {
        (**self).fetch_status(order_id).await
    }
}

#[derive(Debug, Clone)]
pub struct PollerConfig {
    /// Time between reads while the order is pending
    pub interval: Duration,
    /// A read that takes longer than this counts as failed
    pub request_timeout: Duration,
    /// Upper bound for the delay after consecutive failed reads
    pub max_backoff: Duration,
    pub max_attempts: u32,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            request_timeout: Duration::from_secs(10),
            max_backoff: Duration::from_secs(60),
            max_attempts: 120,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    Polling,
    Stopped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    Paid(OrderId),
    GaveUp { attempts: u32 },
}

pub struct StatusPoller<S> {
    source: S,
    config: PollerConfig,
    attempts: u32,
    consecutive_failures: u32,
    outcome: Option<PollOutcome>,
}

impl<S: StatusSource> StatusPoller<S> {
    pub fn new(source: S, config: PollerConfig) -> Self {
        Self { source, config, attempts: 0, consecutive_failures: 0, outcome: None }
    }

    pub fn state(&self) -> PollState {
        match self.outcome {
            Some(_) => PollState::Stopped,
            None => PollState::Polling,
        }
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// The wait before the next read. Doubles with every consecutive failure, up to `max_backoff`.
    pub fn next_delay(&self) -> Duration {
        if self.consecutive_failures == 0 {
            return self.config.interval;
        }
        let factor = 1u32 << self.consecutive_failures.min(16);
        self.config.interval.saturating_mul(factor).min(self.config.max_backoff.max(self.config.interval))
    }

    /// Performs a single, time-limited read. Returns `None` if the read failed.
    pub async fn poll_once(&mut self, order_id: &OrderId) -> Option<OrderStatusType> {
        self.attempts += 1;
        let result = tokio::time::timeout(self.config.request_timeout, self.source.fetch_status(order_id)).await;
        match result {
            Ok(Ok(status)) => {
                trace!("⏳️ Order {order_id} is {status} (read #{})", self.attempts);
                self.consecutive_failures = 0;
                Some(status)
            },
            Ok(Err(e)) => {
                self.consecutive_failures += 1;
                warn!("⏳️ Could not read the status of order {order_id}. {e}");
                None
            },
            Err(_) => {
                self.consecutive_failures += 1;
                warn!("⏳️ Status read for order {order_id} timed out after {:?}", self.config.request_timeout);
                None
            },
        }
    }

    /// Polls until the order is paid or the attempt budget runs out.
    ///
    /// `on_paid` is called once, when `paid` is first observed. Calling `run` again after the poller has stopped
    /// returns the same outcome without reading the status again.
    pub async fn run<F>(&mut self, order_id: &OrderId, on_paid: F) -> PollOutcome
    where F: FnOnce(&OrderId) {
        if let Some(outcome) = &self.outcome {
            return outcome.clone();
        }
        debug!("⏳️ Watching order {order_id}");
        let period = self.config.interval;
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let outcome = loop {
            if self.attempts >= self.config.max_attempts {
                info!("⏳️ Gave up on order {order_id} after {} reads", self.attempts);
                break PollOutcome::GaveUp { attempts: self.attempts };
            }
            if self.consecutive_failures == 0 {
                ticker.tick().await;
            } else {
                tokio::time::sleep(self.next_delay()).await;
                // Back on schedule from this read onwards
                ticker.reset();
            }
            if let Some(OrderStatusType::Paid) = self.poll_once(order_id).await {
                info!("⏳️ Order {order_id} has been paid");
                on_paid(order_id);
                break PollOutcome::Paid(order_id.clone());
            }
        };
        self.outcome = Some(outcome.clone());
        outcome
    }
}
