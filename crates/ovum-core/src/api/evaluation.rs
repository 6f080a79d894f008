//! Evaluation methods on OvumClient: starting runs and watching them to
//! completion.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::error::Result;
use crate::net::ApiTransport;
use crate::records::{Batch, EvaluationStatus, Frame, StartEvaluationResponse};
use crate::session::Surface;
use crate::watch::{RefreshFn, StatusSource, WatchState};
use crate::OvumClient;

/// Status source backed by `GET /evaluation/batch/{id}/status`.
struct TransportStatusSource {
    transport: Arc<ApiTransport>,
}

#[async_trait]
impl StatusSource for TransportStatusSource {
    async fn fetch_status(&self, batch_id: &str) -> Result<EvaluationStatus> {
        let path = format!("/evaluation/batch/{}/status", batch_id);
        self.transport.get_json(Surface::Admin, &path).await
    }
}

/// Refresh step run once after a watch sees a terminal status: refetch
/// the batch so the denormalized summary is current, then drop cached
/// images for every frame the run annotated.
fn refresh_after_run(transport: Arc<ApiTransport>, batch_id: String) -> RefreshFn {
    Arc::new(move || {
        let transport = transport.clone();
        let batch_id = batch_id.clone();
        Box::pin(async move {
            let batch_path = format!("/batches/{}", batch_id);
            if let Err(e) = transport.get_json::<Batch>(Surface::Admin, &batch_path).await {
                warn!("Batch refresh after evaluation failed: {}", e);
            }

            let frames_path = format!("/frames/batch/{}", batch_id);
            match transport
                .get_json::<Vec<Frame>>(Surface::Admin, &frames_path)
                .await
            {
                Ok(frames) => {
                    for frame in &frames {
                        transport.invalidate_frame_image(&frame.id);
                    }
                }
                Err(e) => warn!("Frame refresh after evaluation failed: {}", e),
            }
        })
    })
}

impl OvumClient {
    // ========================================
    // Evaluation
    // ========================================

    /// Kick off evaluation of every frame in a batch (console only).
    pub async fn start_evaluation(&self, batch_id: &str) -> Result<StartEvaluationResponse> {
        let path = format!("/evaluation/batch/{}/start", batch_id);
        self.transport.post_empty(Surface::Admin, &path).await
    }

    /// Clear previous results and evaluate the batch again (console only).
    pub async fn re_evaluate(&self, batch_id: &str) -> Result<StartEvaluationResponse> {
        let path = format!("/evaluation/batch/{}/re-evaluate", batch_id);
        self.transport.post_empty(Surface::Admin, &path).await
    }

    /// One-off progress snapshot of a batch evaluation.
    pub async fn evaluation_status(&self, batch_id: &str) -> Result<EvaluationStatus> {
        let path = format!("/evaluation/batch/{}/status", batch_id);
        self.transport.get_json(Surface::Admin, &path).await
    }

    /// Start an evaluation and watch it to completion (console only).
    ///
    /// The start request goes out first; if the backend refuses it, the
    /// error is returned and no watch begins. Otherwise the watch polls
    /// the status endpoint on a fixed cadence and, once the run settles,
    /// refreshes the batch and its frames exactly once.
    pub async fn watch_evaluation(&self, batch_id: &str, re_run: bool) -> Result<String> {
        let started = if re_run {
            self.re_evaluate(batch_id).await?
        } else {
            self.start_evaluation(batch_id).await?
        };

        let source = Arc::new(TransportStatusSource {
            transport: self.transport.clone(),
        });
        let refresh = refresh_after_run(self.transport.clone(), batch_id.to_string());
        let watch_id = self
            .watcher
            .start_watch(batch_id, source, Some(refresh))
            .await;
        info!(
            "Watching evaluation {} for batch {} as {}",
            started.evaluation_request_id, batch_id, watch_id
        );
        Ok(watch_id)
    }

    /// Progress snapshot of a watch, if it exists.
    pub async fn watch_progress(&self, watch_id: &str) -> Option<WatchState> {
        self.watcher.get_watch(watch_id).await
    }

    /// Stop polling. The backend run itself is not cancelled.
    pub async fn cancel_watch(&self, watch_id: &str) -> bool {
        self.watcher.cancel_watch(watch_id).await
    }

    /// Drop the record of a settled watch.
    pub async fn clear_watch(&self, watch_id: &str) -> bool {
        self.watcher.remove_finished(watch_id).await
    }
}
