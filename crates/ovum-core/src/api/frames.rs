//! Frame methods on OvumClient: listing, editing, image bytes, and the
//! batch uploader.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::Result;
use crate::net::ApiTransport;
use crate::records::{Frame, FrameUpdate, StatusResponse};
use crate::session::Surface;
use crate::upload::{FrameSink, UploadFile, UploadState};
use crate::OvumClient;

/// Sink that posts one file per request to `POST /frames/{batchId}` as
/// multipart form data under the `file` field.
struct TransportFrameSink {
    transport: Arc<ApiTransport>,
    surface: Surface,
}

#[async_trait]
impl FrameSink for TransportFrameSink {
    async fn upload_frame(&self, batch_id: &str, file: &UploadFile) -> Result<Frame> {
        let path = format!("/frames/{}", batch_id);
        self.transport
            .post_multipart_file(
                self.surface,
                &path,
                &file.file_name,
                file.bytes.clone(),
                &file.mime_type,
            )
            .await
    }
}

impl OvumClient {
    // ========================================
    // Frames
    // ========================================

    /// All frames of a batch, in upload order.
    pub async fn batch_frames(&self, surface: Surface, batch_id: &str) -> Result<Vec<Frame>> {
        let path = format!("/frames/batch/{}", batch_id);
        self.transport.get_json(surface, &path).await
    }

    /// Apply a partial update to one frame (console only).
    pub async fn update_frame(
        &self,
        frame_id: &str,
        update: &FrameUpdate,
    ) -> Result<StatusResponse> {
        let path = format!("/frames/{}", frame_id);
        let response = self
            .transport
            .patch_json(Surface::Admin, &path, update)
            .await?;
        self.transport.invalidate_frame_image(frame_id);
        Ok(response)
    }

    /// Delete one frame (console only).
    pub async fn delete_frame(&self, frame_id: &str) -> Result<StatusResponse> {
        let path = format!("/frames/{}", frame_id);
        let response = self.transport.delete_json(Surface::Admin, &path).await?;
        self.transport.invalidate_frame_image(frame_id);
        Ok(response)
    }

    /// Image bytes for a frame, served through the authenticated view
    /// endpoint and cached in memory.
    pub async fn frame_image(&self, surface: Surface, frame_id: &str) -> Result<Bytes> {
        self.transport.fetch_frame_image(surface, frame_id).await
    }

    // ========================================
    // Frame uploads
    // ========================================

    /// Start uploading files to a batch, one request at a time, in the
    /// order given (console only).
    ///
    /// Returns the upload id; progress is polled with
    /// [`OvumClient::upload_progress`]. The run stops at the first file
    /// the backend rejects.
    pub async fn upload_frames(&self, batch_id: &str, files: Vec<UploadFile>) -> Result<String> {
        let sink = Arc::new(TransportFrameSink {
            transport: self.transport.clone(),
            surface: Surface::Admin,
        });
        self.uploader.start_upload(batch_id, files, sink).await
    }

    /// Progress snapshot of an upload run, if it exists.
    pub async fn upload_progress(&self, upload_id: &str) -> Option<UploadState> {
        self.uploader.get_upload(upload_id).await
    }

    /// Request cancellation of an upload run. Takes effect between files.
    pub async fn cancel_upload(&self, upload_id: &str) -> bool {
        self.uploader.cancel_upload(upload_id).await
    }

    /// Drop the record of a finished upload run.
    pub async fn clear_upload(&self, upload_id: &str) -> bool {
        self.uploader.remove_finished(upload_id).await
    }
}
