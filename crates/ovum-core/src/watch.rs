//! Evaluation status watching.
//!
//! After an evaluation job is triggered, the watcher fetches its status
//! on a fixed 2-second cadence, replacing the snapshot on every
//! response. The loop ends when the job reports a terminal status
//! (`completed` or `failed`), after which dependent data is refreshed
//! exactly once. Watches are tracked jobs: cancellable, queryable, and
//! torn down with their owner so a stale view never keeps polling.
//!
//! A retryable status-fetch failure does not end the watch; the loop
//! keeps its cadence and gives up after three consecutive failures. A
//! failure retrying cannot fix, an expired session for example, ends
//! the watch at once.

use crate::cancel::CancellationToken;
use crate::config::EvaluationConfig;
use crate::error::Result;
use crate::records::evaluation::EvaluationStatus;
use async_trait::async_trait;
use futures::future::BoxFuture;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// Where status snapshots come from. The production implementation hits
/// the status endpoint; tests substitute scripted sources.
#[async_trait]
pub trait StatusSource: Send + Sync {
    async fn fetch_status(&self, batch_id: &str) -> Result<EvaluationStatus>;
}

/// Invoked once after the watched job reaches a terminal status.
pub type RefreshFn = Arc<dyn Fn() -> BoxFuture<'static, ()> + Send + Sync>;

/// Lifecycle of one watch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WatchPhase {
    /// Polling on the fixed cadence.
    Watching,
    /// The job reported a terminal status; the refresh has run.
    Finished,
    /// Cancelled by the owner before the job finished.
    Stopped,
    /// Gave up after consecutive status-fetch failures.
    Error,
}

impl WatchPhase {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, WatchPhase::Watching)
    }
}

/// Snapshot of one watch.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchState {
    pub watch_id: String,
    pub batch_id: String,
    pub phase: WatchPhase,
    /// Status requests issued so far.
    pub polls: u32,
    pub consecutive_failures: u32,
    /// Latest snapshot the backend returned.
    pub last_status: Option<EvaluationStatus>,
    /// Whether the one-time post-terminal refresh has run.
    pub refreshed: bool,
    pub error: Option<String>,
    #[serde(skip)]
    cancel: CancellationToken,
}

type Watches = Arc<RwLock<HashMap<String, WatchState>>>;

/// Tracks evaluation watches.
#[derive(Clone, Default)]
pub struct EvaluationWatcher {
    watches: Watches,
}

impl EvaluationWatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin watching `batch_id` through `source`.
    ///
    /// The first status request goes out one poll interval after the
    /// call. `on_refresh` runs exactly once, after a terminal status.
    pub async fn start_watch(
        &self,
        batch_id: &str,
        source: Arc<dyn StatusSource>,
        on_refresh: Option<RefreshFn>,
    ) -> String {
        let watch_id = uuid::Uuid::new_v4().to_string();
        let state = WatchState {
            watch_id: watch_id.clone(),
            batch_id: batch_id.to_string(),
            phase: WatchPhase::Watching,
            polls: 0,
            consecutive_failures: 0,
            last_status: None,
            refreshed: false,
            error: None,
            cancel: CancellationToken::new(),
        };

        self.watches.write().await.insert(watch_id.clone(), state);

        let watches = self.watches.clone();
        let id = watch_id.clone();
        let batch_id = batch_id.to_string();
        tokio::spawn(async move {
            run_watch(watches, id, batch_id, source, on_refresh).await;
        });

        watch_id
    }

    /// Snapshot of a watch, if it exists.
    pub async fn get_watch(&self, watch_id: &str) -> Option<WatchState> {
        self.watches.read().await.get(watch_id).cloned()
    }

    /// Stop a watch. The teardown path of whatever owns the watch must
    /// call this so a dismissed view stops polling. Returns false for
    /// unknown ids.
    pub async fn cancel_watch(&self, watch_id: &str) -> bool {
        match self.watches.read().await.get(watch_id) {
            Some(state) => {
                state.cancel.cancel();
                true
            }
            None => false,
        }
    }

    /// Drop the record of an ended watch.
    pub async fn remove_finished(&self, watch_id: &str) -> bool {
        let mut watches = self.watches.write().await;
        match watches.get(watch_id) {
            Some(state) if state.phase.is_terminal() => {
                watches.remove(watch_id);
                true
            }
            _ => false,
        }
    }
}

async fn run_watch(
    watches: Watches,
    watch_id: String,
    batch_id: String,
    source: Arc<dyn StatusSource>,
    on_refresh: Option<RefreshFn>,
) {
    let cancel = match watches.read().await.get(&watch_id) {
        Some(state) => state.cancel.clone(),
        None => return,
    };

    loop {
        tokio::time::sleep(EvaluationConfig::POLL_INTERVAL).await;

        if cancel.is_cancelled() {
            debug!("Watch {} stopped for batch {}", watch_id, batch_id);
            update_state(&watches, &watch_id, |state| {
                state.phase = WatchPhase::Stopped;
            })
            .await;
            return;
        }

        match source.fetch_status(&batch_id).await {
            Ok(status) => {
                let terminal = status.is_terminal();
                update_state(&watches, &watch_id, |state| {
                    state.polls += 1;
                    state.consecutive_failures = 0;
                    state.last_status = Some(status);
                })
                .await;

                if terminal {
                    break;
                }
            }
            Err(error) => {
                let failures = {
                    let mut watches_guard = watches.write().await;
                    match watches_guard.get_mut(&watch_id) {
                        Some(state) => {
                            state.polls += 1;
                            state.consecutive_failures += 1;
                            state.consecutive_failures
                        }
                        None => return,
                    }
                };

                let give_up = if !error.is_retryable() {
                    warn!(
                        "Watch {} giving up on batch {}: {}",
                        watch_id, batch_id, error
                    );
                    true
                } else if failures >= EvaluationConfig::MAX_CONSECUTIVE_POLL_FAILURES {
                    warn!(
                        "Watch {} giving up on batch {} after {} consecutive failures: {}",
                        watch_id, batch_id, failures, error
                    );
                    true
                } else {
                    debug!(
                        "Watch {} status fetch failed ({} of {}), keeping cadence: {}",
                        watch_id,
                        failures,
                        EvaluationConfig::MAX_CONSECUTIVE_POLL_FAILURES,
                        error
                    );
                    false
                };

                if give_up {
                    update_state(&watches, &watch_id, |state| {
                        state.phase = WatchPhase::Error;
                        state.error = Some(error.to_string());
                    })
                    .await;
                    return;
                }
            }
        }
    }

    if let Some(refresh) = on_refresh {
        refresh().await;
    }
    update_state(&watches, &watch_id, |state| {
        state.phase = WatchPhase::Finished;
        state.refreshed = true;
    })
    .await;
}

async fn update_state<F>(watches: &Watches, watch_id: &str, apply: F)
where
    F: FnOnce(&mut WatchState),
{
    let mut watches = watches.write().await;
    if let Some(state) = watches.get_mut(watch_id) {
        apply(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OvumError;
    use crate::records::evaluation::EvaluationPhase;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn status(phase: EvaluationPhase) -> EvaluationStatus {
        EvaluationStatus {
            id: "e1".to_string(),
            batch_id: "b1".to_string(),
            initiated_by: None,
            created_at: None,
            updated_at: None,
            status: phase,
            frame_list: None,
            error_log: None,
            report_summary: None,
            total_frames: 4,
            completed_frames: 2,
            failed_frames: 0,
            progress: 0.5,
            batch_status: None,
        }
    }

    /// Replays a fixed response sequence; the last entry repeats.
    struct ScriptedSource {
        sequence: Vec<std::result::Result<EvaluationPhase, ()>>,
        position: AtomicUsize,
    }

    impl ScriptedSource {
        fn new(sequence: Vec<std::result::Result<EvaluationPhase, ()>>) -> Self {
            Self {
                sequence,
                position: AtomicUsize::new(0),
            }
        }

        fn fetches(&self) -> usize {
            self.position.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl StatusSource for ScriptedSource {
        async fn fetch_status(&self, _batch_id: &str) -> Result<EvaluationStatus> {
            let index = self.position.fetch_add(1, Ordering::SeqCst);
            let entry = self
                .sequence
                .get(index)
                .or_else(|| self.sequence.last())
                .copied()
                .unwrap();
            match entry {
                Ok(phase) => Ok(status(phase)),
                Err(()) => Err(OvumError::Network {
                    message: "connection refused".to_string(),
                    cause: None,
                }),
            }
        }
    }

    fn refresh_counter() -> (RefreshFn, Arc<AtomicUsize>) {
        let count = Arc::new(AtomicUsize::new(0));
        let count_clone = count.clone();
        let refresh: RefreshFn = Arc::new(move || {
            let count = count_clone.clone();
            Box::pin(async move {
                count.fetch_add(1, Ordering::SeqCst);
            })
        });
        (refresh, count)
    }

    async fn wait_for_terminal(watcher: &EvaluationWatcher, watch_id: &str) -> WatchState {
        for _ in 0..2000 {
            if let Some(state) = watcher.get_watch(watch_id).await {
                if state.phase.is_terminal() {
                    return state;
                }
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("Watch {} did not end", watch_id);
    }

    #[tokio::test(start_paused = true)]
    async fn test_polls_until_terminal_then_refreshes_once() {
        let watcher = EvaluationWatcher::new();
        let source = Arc::new(ScriptedSource::new(vec![
            Ok(EvaluationPhase::Pending),
            Ok(EvaluationPhase::Pending),
            Ok(EvaluationPhase::Completed),
        ]));
        let (refresh, refresh_count) = refresh_counter();

        let watch_id = watcher
            .start_watch("b1", source.clone(), Some(refresh))
            .await;
        let state = wait_for_terminal(&watcher, &watch_id).await;

        // [pending, pending, completed]: exactly 3 requests, 1 refresh.
        assert_eq!(state.phase, WatchPhase::Finished);
        assert_eq!(state.polls, 3);
        assert_eq!(source.fetches(), 3);
        assert_eq!(refresh_count.load(Ordering::SeqCst), 1);
        assert!(state.refreshed);
        assert_eq!(
            state.last_status.unwrap().status,
            EvaluationPhase::Completed
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_job_status_is_terminal_too() {
        let watcher = EvaluationWatcher::new();
        let source = Arc::new(ScriptedSource::new(vec![Ok(EvaluationPhase::Failed)]));
        let (refresh, refresh_count) = refresh_counter();

        let watch_id = watcher.start_watch("b1", source, Some(refresh)).await;
        let state = wait_for_terminal(&watcher, &watch_id).await;

        assert_eq!(state.phase, WatchPhase::Finished);
        assert_eq!(state.polls, 1);
        assert_eq!(refresh_count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_failures_keep_the_cadence() {
        let watcher = EvaluationWatcher::new();
        let source = Arc::new(ScriptedSource::new(vec![
            Err(()),
            Ok(EvaluationPhase::Processing),
            Err(()),
            Err(()),
            Ok(EvaluationPhase::Completed),
        ]));
        let (refresh, refresh_count) = refresh_counter();

        let watch_id = watcher
            .start_watch("b1", source.clone(), Some(refresh))
            .await;
        let state = wait_for_terminal(&watcher, &watch_id).await;

        // Failures never reach 3 in a row, so the watch survives to the end.
        assert_eq!(state.phase, WatchPhase::Finished);
        assert_eq!(source.fetches(), 5);
        assert_eq!(state.consecutive_failures, 0);
        assert_eq!(refresh_count.load(Ordering::SeqCst), 1);
    }

    struct UnauthorizedSource {
        fetches: AtomicUsize,
    }

    #[async_trait]
    impl StatusSource for UnauthorizedSource {
        async fn fetch_status(&self, _batch_id: &str) -> Result<EvaluationStatus> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            Err(OvumError::Unauthorized { detail: None })
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_auth_failure_ends_the_watch_immediately() {
        let watcher = EvaluationWatcher::new();
        let source = Arc::new(UnauthorizedSource {
            fetches: AtomicUsize::new(0),
        });
        let (refresh, refresh_count) = refresh_counter();

        let watch_id = watcher
            .start_watch("b1", source.clone(), Some(refresh))
            .await;
        let state = wait_for_terminal(&watcher, &watch_id).await;

        assert_eq!(state.phase, WatchPhase::Error);
        assert_eq!(source.fetches.load(Ordering::SeqCst), 1);
        assert_eq!(state.consecutive_failures, 1);
        assert_eq!(refresh_count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_three_consecutive_failures_end_the_watch() {
        let watcher = EvaluationWatcher::new();
        let source = Arc::new(ScriptedSource::new(vec![Err(()), Err(()), Err(())]));
        let (refresh, refresh_count) = refresh_counter();

        let watch_id = watcher
            .start_watch("b1", source.clone(), Some(refresh))
            .await;
        let state = wait_for_terminal(&watcher, &watch_id).await;

        assert_eq!(state.phase, WatchPhase::Error);
        assert_eq!(source.fetches(), 3);
        assert_eq!(state.consecutive_failures, 3);
        assert!(state.error.is_some());
        // No refresh on an abandoned watch.
        assert_eq!(refresh_count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_polling_without_refresh() {
        let watcher = EvaluationWatcher::new();
        let source = Arc::new(ScriptedSource::new(vec![Ok(EvaluationPhase::Pending)]));
        let (refresh, refresh_count) = refresh_counter();

        let watch_id = watcher
            .start_watch("b1", source.clone(), Some(refresh))
            .await;

        // Let at least one poll happen, then cancel.
        for _ in 0..500 {
            if let Some(state) = watcher.get_watch(&watch_id).await {
                if state.polls >= 1 {
                    break;
                }
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(watcher.cancel_watch(&watch_id).await);

        let state = wait_for_terminal(&watcher, &watch_id).await;
        assert_eq!(state.phase, WatchPhase::Stopped);
        assert!(!state.refreshed);
        assert_eq!(refresh_count.load(Ordering::SeqCst), 0);

        assert!(watcher.remove_finished(&watch_id).await);
        assert!(watcher.get_watch(&watch_id).await.is_none());
    }
}
