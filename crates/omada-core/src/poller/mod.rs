// ── Periodic pollers ──
//
// Each poller owns one cycle function and is driven by `spawn`, which runs
// cycles back-to-back on a fixed interval and publishes the outcome through
// a `watch` channel. A cycle is never started while the previous one is
// still running; a failed cycle keeps the last good snapshot visible.

mod clients;
mod site;
mod traffic;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::CoreError;

pub use clients::{ClientPresencePoller, ClientPresenceSnapshot};
pub use site::{Policy, SiteAggregator, Step, assign_clients, parent_of};
pub use traffic::{AppTrafficPoller, local_midnight};

// ── Poller trait ─────────────────────────────────────────────────────

/// One independently scheduled data source.
pub trait Poller: Send + 'static {
    type Snapshot: Send + Sync + 'static;

    /// Label used in log lines, e.g. `site:Main Office`.
    fn label(&self) -> String;

    /// Run one full cycle and produce a fresh snapshot.
    fn poll_once(&mut self) -> impl Future<Output = Result<Self::Snapshot, CoreError>> + Send;
}

// ── Published state ──────────────────────────────────────────────────

/// What consumers observe after every cycle.
#[derive(Debug)]
pub struct PollState<S> {
    pub last_cycle_succeeded: bool,
    /// Latest successful snapshot; `None` before the first success.
    pub snapshot: Option<Arc<S>>,
    pub last_error: Option<String>,
    pub last_success_at: Option<DateTime<Utc>>,
    /// Completed cycles, successful or not.
    pub cycles: u64,
}

impl<S> Clone for PollState<S> {
    fn clone(&self) -> Self {
        Self {
            last_cycle_succeeded: self.last_cycle_succeeded,
            snapshot: self.snapshot.clone(),
            last_error: self.last_error.clone(),
            last_success_at: self.last_success_at,
            cycles: self.cycles,
        }
    }
}

impl<S> Default for PollState<S> {
    fn default() -> Self {
        Self {
            last_cycle_succeeded: false,
            snapshot: None,
            last_error: None,
            last_success_at: None,
            cycles: 0,
        }
    }
}

impl<S> PollState<S> {
    /// Fold one cycle outcome into the state.
    pub fn record(&mut self, outcome: Result<S, CoreError>, now: DateTime<Utc>) {
        self.cycles += 1;
        match outcome {
            Ok(snapshot) => {
                self.last_cycle_succeeded = true;
                self.snapshot = Some(Arc::new(snapshot));
                self.last_error = None;
                self.last_success_at = Some(now);
            }
            Err(e) => {
                self.last_cycle_succeeded = false;
                self.last_error = Some(e.to_string());
            }
        }
    }
}

// ── Handle ───────────────────────────────────────────────────────────

/// Read side of a running poller.
pub struct PollHandle<S> {
    rx: watch::Receiver<PollState<S>>,
}

impl<S> Clone for PollHandle<S> {
    fn clone(&self) -> Self {
        Self {
            rx: self.rx.clone(),
        }
    }
}

impl<S> PollHandle<S> {
    /// Current state, cloned out of the channel.
    pub fn current(&self) -> PollState<S> {
        self.rx.borrow().clone()
    }

    /// Latest successful snapshot, if any.
    pub fn snapshot(&self) -> Option<Arc<S>> {
        self.rx.borrow().snapshot.clone()
    }

    /// A receiver that wakes after every completed cycle.
    pub fn subscribe(&self) -> watch::Receiver<PollState<S>> {
        self.rx.clone()
    }
}

// ── Runner ───────────────────────────────────────────────────────────

/// Spawn `poller` on a fixed `period`. The first cycle runs immediately.
///
/// A cycle that fails with a credential-chain error raises `auth_failed`.
pub fn spawn<P: Poller>(
    mut poller: P,
    period: Duration,
    cancel: CancellationToken,
    auth_failed: Arc<watch::Sender<bool>>,
) -> (PollHandle<P::Snapshot>, JoinHandle<()>) {
    let (tx, rx) = watch::channel(PollState::default());

    let task = tokio::spawn(async move {
        let label = poller.label();
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                _ = interval.tick() => {}
            }

            let outcome = tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                outcome = poller.poll_once() => outcome,
            };

            match &outcome {
                Ok(_) => {
                    debug!(poller = %label, "cycle published");
                    auth_failed.send_if_modified(|failed| std::mem::replace(failed, false));
                }
                Err(e) => {
                    warn!(poller = %label, error = %e, "cycle failed, keeping last snapshot");
                    if e.requires_operator() {
                        auth_failed.send_replace(true);
                    }
                }
            }

            let now = Utc::now();
            tx.send_modify(|state| state.record(outcome, now));
        }

        debug!(poller = %label, "poller stopped");
    });

    (PollHandle { rx }, task)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::VecDeque;

    use super::*;

    struct Scripted {
        outcomes: VecDeque<Result<u32, CoreError>>,
    }

    impl Poller for Scripted {
        type Snapshot = u32;

        fn label(&self) -> String {
            "scripted".into()
        }

        fn poll_once(&mut self) -> impl Future<Output = Result<u32, CoreError>> + Send {
            let next = self.outcomes.pop_front().unwrap_or(Ok(0));
            async move { next }
        }
    }

    #[test]
    fn failed_cycle_keeps_last_snapshot() {
        let mut state = PollState::default();
        let now = Utc::now();
        state.record(Ok(7_u32), now);
        state.record(Err(CoreError::Timeout), now);

        assert!(!state.last_cycle_succeeded);
        assert_eq!(state.snapshot.as_deref(), Some(&7));
        assert_eq!(state.last_error.as_deref(), Some("Controller request timed out"));
        assert_eq!(state.last_success_at, Some(now));
        assert_eq!(state.cycles, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn runner_publishes_each_cycle_and_flags_auth_failure() {
        let poller = Scripted {
            outcomes: VecDeque::from([
                Ok(1),
                Err(CoreError::Timeout),
                Err(CoreError::AuthenticationFailed {
                    message: "client credentials rejected".into(),
                }),
            ]),
        };
        let cancel = CancellationToken::new();
        let (auth_tx, auth_rx) = watch::channel(false);
        let (handle, task) = spawn(
            poller,
            Duration::from_secs(60),
            cancel.clone(),
            Arc::new(auth_tx),
        );
        let mut rx = handle.subscribe();

        rx.changed().await.unwrap();
        assert!(handle.current().last_cycle_succeeded);
        assert_eq!(handle.snapshot().as_deref(), Some(&1));

        rx.changed().await.unwrap();
        let state = handle.current();
        assert!(!state.last_cycle_succeeded);
        assert_eq!(state.snapshot.as_deref(), Some(&1));
        assert!(!*auth_rx.borrow());

        rx.changed().await.unwrap();
        assert!(*auth_rx.borrow());

        cancel.cancel();
        task.await.unwrap();
    }
}
