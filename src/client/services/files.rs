//! File API Client

use std::sync::Arc;

use crate::client::error::ApiError;
use crate::client::http::{ApiClient, ApiRequest};
use crate::client::transfer::{DownloadedFile, UploadFile};
use crate::shared::models::{Dashboard, FileRecord, GlobalDashboard};

/// Multipart field the upload endpoint reads
pub const UPLOAD_FIELD: &str = "file";

/// File API client
#[derive(Debug, Clone)]
pub struct FileService {
    client: Arc<ApiClient>,
}

impl FileService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Files of the signed-in user, newest first
    pub async fn list(&self) -> Result<Vec<FileRecord>, ApiError> {
        self.client.send_json(ApiRequest::get("/files/list/")).await
    }

    /// Upload one file as a multipart request
    pub async fn upload(&self, file: UploadFile) -> Result<FileRecord, ApiError> {
        tracing::debug!(
            "[Files] Uploading {} ({} bytes)",
            file.file_name,
            file.bytes.len()
        );
        let request = ApiRequest::post("/files/upload/").multipart(UPLOAD_FIELD, file);
        self.client.send_json(request).await
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.client
            .send(ApiRequest::delete(format!("/files/delete/{}/", id)))
            .await?;
        Ok(())
    }

    /// Fetch a file's contents along with its resolved filename
    pub async fn download(&self, id: i64) -> Result<DownloadedFile, ApiError> {
        let response = self
            .client
            .send(ApiRequest::get(format!("/files/download/{}/", id)))
            .await?;
        let headers = response.headers().clone();
        let bytes = response.bytes().await?;
        Ok(DownloadedFile::from_parts(&headers, bytes))
    }

    pub async fn dashboard(&self) -> Result<Dashboard, ApiError> {
        self.client.send_json(ApiRequest::get("/files/dashboard/")).await
    }

    /// System-wide summary; administrators only
    pub async fn global_dashboard(&self) -> Result<GlobalDashboard, ApiError> {
        self.client
            .send_json(ApiRequest::get("/files/global-dashboard/"))
            .await
    }
}
