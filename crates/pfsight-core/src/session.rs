// ── Polling session ──
//
// One tokio task per dashboard session. A fixed-interval timer drives the
// CounterSampler; the poll itself runs as a separate task so ticks that
// fire while it is outstanding are observed and skipped rather than
// queued. Cancellation stops the timer and discards any late result.

use std::time::Duration;

use chrono::Utc;
use futures_util::future::OptionFuture;
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use pfsight_api::endpoints::{INTERFACE_STATUS, interface_endpoint};
use pfsight_api::{ApiResult, FirewallClient, Query};

use crate::rate::RateSample;
use crate::sampler::{CounterSampler, SamplerState, TickOutcome};
use crate::window::DEFAULT_CAPACITY;

// ── SessionConfig ────────────────────────────────────────────────

/// Shortest poll period a session will run with; shorter (or zero)
/// intervals are raised to it.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Tuning for one polling session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Interface whose counters are sampled (e.g. `wan`, `igb0`).
    pub interface: String,
    /// Endpoint template; `{interface}` is substituted.
    pub endpoint: String,
    pub poll_interval: Duration,
    pub window_capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            interface: "wan".into(),
            endpoint: INTERFACE_STATUS.into(),
            poll_interval: Duration::from_millis(10_000),
            window_capacity: DEFAULT_CAPACITY,
        }
    }
}

impl SessionConfig {
    /// The interface-status path with the interface substituted.
    pub fn endpoint_path(&self) -> String {
        interface_endpoint(&self.endpoint, &self.interface)
    }
}

// ── ThroughputSnapshot ───────────────────────────────────────────

/// Immutable view of a session, published after every tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThroughputSnapshot {
    /// Window contents, oldest first.
    pub samples: Vec<RateSample>,
    pub state: SamplerState,
    /// Outcome of the most recently completed poll.
    pub last_outcome: Option<TickOutcome>,
    pub completed_polls: u64,
    pub skipped_ticks: u64,
}

impl ThroughputSnapshot {
    /// Error message of the failing tick, if the last poll failed.
    pub fn last_error(&self) -> Option<&str> {
        match &self.state {
            SamplerState::Error(message) => Some(message),
            _ => None,
        }
    }
}

// ── PollSession ──────────────────────────────────────────────────

/// Handle to a running polling session.
///
/// Dropping the handle cancels the session; [`stop`](Self::stop) also
/// waits for the loop to wind down.
pub struct PollSession {
    cancel: CancellationToken,
    snapshots: watch::Receiver<ThroughputSnapshot>,
    handle: Option<JoinHandle<()>>,
}

impl PollSession {
    /// Spawn the polling loop. Must be called from within a tokio runtime.
    pub fn start(client: FirewallClient, config: SessionConfig) -> Self {
        let (tx, rx) = watch::channel(ThroughputSnapshot::default());
        let cancel = CancellationToken::new();

        info!(
            interface = %config.interface,
            interval = ?config.poll_interval,
            "starting throughput session"
        );

        let handle = tokio::spawn(poll_loop(client, config, tx, cancel.clone()));

        Self {
            cancel,
            snapshots: rx,
            handle: Some(handle),
        }
    }

    /// Subscribe to snapshot updates.
    pub fn subscribe(&self) -> watch::Receiver<ThroughputSnapshot> {
        self.snapshots.clone()
    }

    /// The latest published snapshot.
    pub fn snapshot(&self) -> ThroughputSnapshot {
        self.snapshots.borrow().clone()
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Stop the timer, discard any in-flight poll, and wait for teardown.
    pub async fn stop(mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
        debug!("throughput session stopped");
    }
}

impl Drop for PollSession {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn poll_loop(
    client: FirewallClient,
    config: SessionConfig,
    tx: watch::Sender<ThroughputSnapshot>,
    cancel: CancellationToken,
) {
    let query = Query::get(config.endpoint_path());
    let mut sampler = CounterSampler::new(config.interface.clone(), config.window_capacity);
    let mut interval = tokio::time::interval(config.poll_interval.max(MIN_POLL_INTERVAL));
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut in_flight: Option<JoinHandle<ApiResult>> = None;
    let mut last_outcome = None;
    let mut completed_polls = 0_u64;
    let mut skipped_ticks = 0_u64;

    loop {
        tokio::select! {
            biased;

            () = cancel.cancelled() => break,

            Some(joined) = OptionFuture::from(in_flight.as_mut()), if in_flight.is_some() => {
                in_flight = None;
                if cancel.is_cancelled() {
                    break;
                }
                let result = joined.unwrap_or_else(|e| {
                    ApiResult::failure(None, format!("poll task failed: {e}"))
                });
                let outcome = sampler.complete_poll(&result, Utc::now());
                completed_polls += 1;
                last_outcome = Some(outcome);
            }

            _ = interval.tick() => {
                if sampler.begin_poll() {
                    debug!(interface = sampler.interface(), "poll tick");
                    let client = client.clone();
                    let query = query.clone();
                    in_flight = Some(tokio::spawn(async move { client.execute(&query).await }));
                } else {
                    debug!(interface = sampler.interface(), "previous poll still in flight, skipping tick");
                    skipped_ticks += 1;
                }
            }
        }

        tx.send_replace(ThroughputSnapshot {
            samples: sampler.window().snapshot(),
            state: sampler.state().clone(),
            last_outcome: last_outcome.clone(),
            completed_polls,
            skipped_ticks,
        });
    }

    if let Some(handle) = in_flight.take() {
        handle.abort();
    }
    sampler.reset();
    tx.send_replace(ThroughputSnapshot::default());
}
