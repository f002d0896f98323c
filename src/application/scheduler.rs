use crate::application::aggregator::Aggregator;
use crate::domain::entities::instrument::Instrument;
use crate::domain::entities::snapshot::Snapshot;
use crate::domain::error::DomainError;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

/// What readers see: the last good snapshot plus whether the latest refresh
/// attempt failed outright.
#[derive(Debug, Clone)]
pub struct SnapshotState {
    pub snapshot: Arc<Snapshot>,
    /// True when the most recent refresh produced nothing and `snapshot` is
    /// left over from an earlier cycle.
    pub stale: bool,
    pub last_error: Option<String>,
    pub last_attempt_at: Option<DateTime<Utc>>,
}

impl SnapshotState {
    fn initial() -> Self {
        Self {
            snapshot: Arc::new(Snapshot::empty()),
            stale: false,
            last_error: None,
            last_attempt_at: None,
        }
    }
}

/// Owns the current snapshot and re-runs the aggregator on a timer.
///
/// Publication replaces the whole `SnapshotState` in one `send_replace`, so a
/// reader holds either the previous cycle or the next one, never a mix. Timer
/// and forced refreshes share `refresh_lock`; reads never touch it.
pub struct Scheduler {
    aggregator: Aggregator,
    instruments: Vec<Instrument>,
    interval: Duration,
    state: watch::Sender<SnapshotState>,
    refresh_lock: Mutex<()>,
    cycle: AtomicU64,
}

impl Scheduler {
    pub fn new(aggregator: Aggregator, instruments: Vec<Instrument>, interval: Duration) -> Self {
        let (state, _) = watch::channel(SnapshotState::initial());
        Self {
            aggregator,
            instruments,
            interval,
            state,
            refresh_lock: Mutex::new(()),
            cycle: AtomicU64::new(0),
        }
    }

    /// Non-blocking; always the last published state.
    pub fn current(&self) -> SnapshotState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SnapshotState> {
        self.state.subscribe()
    }

    /// Runs one out-of-band cycle, waiting for any cycle already in flight.
    pub async fn force_refresh(&self) -> Result<Arc<Snapshot>, DomainError> {
        let _guard = self.refresh_lock.lock().await;
        self.run_cycle().await
    }

    async fn run_cycle(&self) -> Result<Arc<Snapshot>, DomainError> {
        let cycle = self.cycle.fetch_add(1, Ordering::SeqCst) + 1;
        let attempted_at = Utc::now();

        match self.aggregator.refresh(&self.instruments, cycle).await {
            Ok(snapshot) => {
                let snapshot = Arc::new(snapshot);
                self.state.send_replace(SnapshotState {
                    snapshot: Arc::clone(&snapshot),
                    stale: false,
                    last_error: None,
                    last_attempt_at: Some(attempted_at),
                });
                Ok(snapshot)
            }
            Err(e) => {
                let previous = self.current();
                warn!(
                    cycle,
                    serving_cycle = previous.snapshot.cycle,
                    error = %e,
                    "refresh failed, keeping previous snapshot"
                );
                self.state.send_replace(SnapshotState {
                    snapshot: previous.snapshot,
                    stale: true,
                    last_error: Some(e.to_string()),
                    last_attempt_at: Some(attempted_at),
                });
                Err(e)
            }
        }
    }

    /// Starts the timer loop. The first tick fires immediately. Abort the
    /// returned handle to stop it.
    pub fn spawn(self: &Arc<Self>) -> JoinHandle<()> {
        let this = Arc::clone(self);
        tokio::spawn(async move {
            info!(interval = ?this.interval, instruments = this.instruments.len(), "scheduler started");
            let mut ticker = tokio::time::interval(this.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                // Failures are already logged and published as stale state.
                let _ = this.force_refresh().await;
            }
        })
    }
}
