//! The render backend boundary and its HTTP implementation.

use std::future::Future;
use std::time::Duration;

use cutdeck_timeline::{Asset, ExportPayload};
use reqwest::multipart::{Form, Part};
use tracing::{debug, info};

use crate::error::BackendError;
use crate::wire::{AssetListResponse, ExportReceipt};

/// Operations the editor needs from the remote asset library and renderer.
pub trait EditorBackend: Send + Sync {
    /// Current asset listing.
    fn list_assets(&self) -> impl Future<Output = Result<Vec<Asset>, BackendError>> + Send;

    /// Upload one file; returns the stored asset record.
    fn upload_asset(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> impl Future<Output = Result<Asset, BackendError>> + Send;

    /// Raw bytes of an asset (used for waveform decoding).
    fn asset_bytes(
        &self,
        asset_id: &str,
    ) -> impl Future<Output = Result<Vec<u8>, BackendError>> + Send;

    /// Submit a timeline for rendering.
    fn submit_export(
        &self,
        payload: &ExportPayload,
    ) -> impl Future<Output = Result<ExportReceipt, BackendError>> + Send;

    /// Rendered video bytes.
    fn export_bytes(
        &self,
        export_id: &str,
    ) -> impl Future<Output = Result<Vec<u8>, BackendError>> + Send;
}

/// `EditorBackend` over the backend's JSON/HTTP API.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, BackendError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(BackendError::from_response(status.as_u16(), &body))
    }

    async fn get_bytes(&self, path: &str) -> Result<Vec<u8>, BackendError> {
        let response = self.client.get(self.url(path)).send().await?;
        let bytes = Self::check(response).await?.bytes().await?;
        debug!(path, len = bytes.len(), "Downloaded bytes");
        Ok(bytes.to_vec())
    }
}

impl EditorBackend for HttpBackend {
    async fn list_assets(&self) -> Result<Vec<Asset>, BackendError> {
        let response = self.client.get(self.url("/editor/assets")).send().await?;
        let list: AssetListResponse = Self::check(response).await?.json().await?;
        debug!(count = list.assets.len(), "Listed assets");
        Ok(list.assets)
    }

    async fn upload_asset(&self, file_name: &str, bytes: Vec<u8>) -> Result<Asset, BackendError> {
        let size = bytes.len();
        let part = Part::bytes(bytes).file_name(file_name.to_string());
        let form = Form::new().part("file", part);
        let response = self
            .client
            .post(self.url("/editor/assets/upload"))
            .multipart(form)
            .send()
            .await?;
        let asset: Asset = Self::check(response).await?.json().await?;
        info!(file = file_name, size, asset = %asset.id, "Uploaded asset");
        Ok(asset)
    }

    async fn asset_bytes(&self, asset_id: &str) -> Result<Vec<u8>, BackendError> {
        self.get_bytes(&format!("/editor/assets/{asset_id}/download")).await
    }

    async fn submit_export(&self, payload: &ExportPayload) -> Result<ExportReceipt, BackendError> {
        let response = self
            .client
            .post(self.url("/editor/export"))
            .json(payload)
            .send()
            .await?;
        let receipt: ExportReceipt = Self::check(response).await?.json().await?;
        info!(export = %receipt.export_id, duration = receipt.duration, "Export rendered");
        Ok(receipt)
    }

    async fn export_bytes(&self, export_id: &str) -> Result<Vec<u8>, BackendError> {
        self.get_bytes(&format!("/editor/exports/{export_id}/download")).await
    }
}
