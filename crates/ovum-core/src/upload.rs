//! Sequential frame uploads with tracked progress.
//!
//! Files go up strictly one at a time so progress is a deterministic
//! fraction of files completed. A failure on any file halts the run
//! immediately; files after it are never attempted. Each run is a
//! tracked job: callers get an upload id back, poll a snapshot for
//! progress, and may cancel between files.

use crate::cancel::CancellationToken;
use crate::error::{OvumError, Result};
use crate::records::frame::Frame;
use async_trait::async_trait;
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// One file staged for upload.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

impl UploadFile {
    pub fn from_bytes(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let mime_type = mime_for_file_name(&file_name).to_string();
        Self {
            file_name,
            bytes,
            mime_type,
        }
    }

    /// Stage a file from disk, named after its final path component.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| OvumError::Validation {
                field: "file".to_string(),
                message: format!("Path has no usable file name: {}", path.display()),
            })?
            .to_string();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| OvumError::io_with_path(e, path))?;
        Ok(Self::from_bytes(file_name, bytes))
    }
}

/// MIME type from a file extension, for the multipart part.
pub fn mime_for_file_name(file_name: &str) -> &'static str {
    let extension = file_name.rsplit('.').next().unwrap_or("");
    match extension.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        _ => "application/octet-stream",
    }
}

/// Destination for uploaded frames. The production implementation posts
/// to the backend; tests substitute scripted sinks.
#[async_trait]
pub trait FrameSink: Send + Sync {
    async fn upload_frame(&self, batch_id: &str, file: &UploadFile) -> Result<Frame>;
}

/// Lifecycle of one upload run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadStatus {
    Pending,
    Uploading,
    Completed,
    Failed,
    Cancelled,
}

impl UploadStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            UploadStatus::Completed | UploadStatus::Failed | UploadStatus::Cancelled
        )
    }
}

/// Progress snapshot of an upload run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadState {
    pub upload_id: String,
    pub batch_id: String,
    pub status: UploadStatus,
    pub total_files: usize,
    pub completed_files: usize,
    /// Fraction of files finished, 0..=1.
    pub progress: f64,
    /// File currently in flight.
    pub current_file: Option<String>,
    /// Inline message when the run failed, naming the file.
    pub error: Option<String>,
    /// Ids of the frames created so far, in upload order.
    pub uploaded_frame_ids: Vec<String>,
    #[serde(skip)]
    cancel: CancellationToken,
}

type Uploads = Arc<RwLock<HashMap<String, UploadState>>>;

/// Tracks upload runs and drives them to completion.
#[derive(Clone, Default)]
pub struct BatchUploader {
    uploads: Uploads,
}

impl BatchUploader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start uploading `files` to `batch_id` through `sink`.
    ///
    /// Returns the upload id immediately; the run proceeds in the
    /// background.
    pub async fn start_upload(
        &self,
        batch_id: &str,
        files: Vec<UploadFile>,
        sink: Arc<dyn FrameSink>,
    ) -> Result<String> {
        if files.is_empty() {
            return Err(OvumError::Validation {
                field: "files".to_string(),
                message: "No files to upload".to_string(),
            });
        }

        let upload_id = uuid::Uuid::new_v4().to_string();
        let state = UploadState {
            upload_id: upload_id.clone(),
            batch_id: batch_id.to_string(),
            status: UploadStatus::Pending,
            total_files: files.len(),
            completed_files: 0,
            progress: 0.0,
            current_file: None,
            error: None,
            uploaded_frame_ids: Vec::new(),
            cancel: CancellationToken::new(),
        };

        self.uploads
            .write()
            .await
            .insert(upload_id.clone(), state);

        let uploads = self.uploads.clone();
        let id = upload_id.clone();
        let batch_id = batch_id.to_string();
        tokio::spawn(async move {
            run_upload(uploads, id, batch_id, files, sink).await;
        });

        Ok(upload_id)
    }

    /// Snapshot of an upload run, if it exists.
    pub async fn get_upload(&self, upload_id: &str) -> Option<UploadState> {
        self.uploads.read().await.get(upload_id).cloned()
    }

    /// Request cancellation. Takes effect before the next file; the file
    /// in flight is allowed to finish. Returns false for unknown ids.
    pub async fn cancel_upload(&self, upload_id: &str) -> bool {
        match self.uploads.read().await.get(upload_id) {
            Some(state) => {
                state.cancel.cancel();
                true
            }
            None => false,
        }
    }

    /// Drop the record of a finished run. Active runs are left alone.
    pub async fn remove_finished(&self, upload_id: &str) -> bool {
        let mut uploads = self.uploads.write().await;
        match uploads.get(upload_id) {
            Some(state) if state.status.is_terminal() => {
                uploads.remove(upload_id);
                true
            }
            _ => false,
        }
    }
}

async fn run_upload(
    uploads: Uploads,
    upload_id: String,
    batch_id: String,
    files: Vec<UploadFile>,
    sink: Arc<dyn FrameSink>,
) {
    let cancel = match uploads.read().await.get(&upload_id) {
        Some(state) => state.cancel.clone(),
        None => return,
    };
    let total = files.len();

    update_state(&uploads, &upload_id, |state| {
        state.status = UploadStatus::Uploading;
    })
    .await;

    for (index, file) in files.iter().enumerate() {
        if cancel.is_cancelled() {
            debug!("Upload {} cancelled after {} of {} files", upload_id, index, total);
            update_state(&uploads, &upload_id, |state| {
                state.status = UploadStatus::Cancelled;
                state.current_file = None;
            })
            .await;
            return;
        }

        update_state(&uploads, &upload_id, |state| {
            state.current_file = Some(file.file_name.clone());
        })
        .await;

        match sink.upload_frame(&batch_id, file).await {
            Ok(frame) => {
                let completed = index + 1;
                update_state(&uploads, &upload_id, |state| {
                    state.completed_files = completed;
                    state.progress = completed as f64 / total as f64;
                    state.uploaded_frame_ids.push(frame.id.clone());
                })
                .await;
            }
            Err(error) => {
                warn!(
                    "Upload {} halted at {} ({} of {}): {}",
                    upload_id,
                    file.file_name,
                    index + 1,
                    total,
                    error
                );
                let message = OvumError::UploadFailed {
                    file_name: file.file_name.clone(),
                    cause: Some(error.to_string()),
                }
                .to_string();
                update_state(&uploads, &upload_id, |state| {
                    state.status = UploadStatus::Failed;
                    state.current_file = None;
                    state.error = Some(message);
                })
                .await;
                return;
            }
        }
    }

    update_state(&uploads, &upload_id, |state| {
        state.status = UploadStatus::Completed;
        state.current_file = None;
    })
    .await;
}

async fn update_state<F>(uploads: &Uploads, upload_id: &str, apply: F)
where
    F: FnOnce(&mut UploadState),
{
    let mut uploads = uploads.write().await;
    if let Some(state) = uploads.get_mut(upload_id) {
        apply(state);
    }
}
