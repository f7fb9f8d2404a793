//! Export submission and batch upload on top of an [`EditorBackend`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use cutdeck_timeline::{EditError, ExportPayload, ExportSettings, Project};
use thiserror::Error;
use tracing::{info, warn};

use crate::backend::EditorBackend;
use crate::error::BackendError;
use crate::wire::{ExportReceipt, UploadOutcome};

/// Why an export did not produce a receipt.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExportError {
    /// Refused locally; no request was made.
    #[error(transparent)]
    Rejected(#[from] EditError),

    #[error("An export is already in progress")]
    InFlight,

    #[error("Export failed: {0}")]
    Backend(#[from] BackendError),
}

/// Single-flight flag for the export control.
///
/// Cloned handles share the flag. While a [`ExportTicket`] is alive, further
/// `try_acquire` calls fail.
#[derive(Debug, Clone, Default)]
pub struct ExportGuard(Arc<AtomicBool>);

impl ExportGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_acquire(&self) -> Option<ExportTicket> {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| ExportTicket(Arc::clone(&self.0)))
    }

    /// True while an export is running; the export button is disabled.
    pub fn is_busy(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Releases the guard when dropped, on success or failure alike.
#[derive(Debug)]
pub struct ExportTicket(Arc<AtomicBool>);

impl Drop for ExportTicket {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Validate the project and claim the export slot.
///
/// Runs on the editing thread; the returned payload and ticket are then
/// handed to [`submit_export`] on the transport runtime.
pub fn prepare_export(
    guard: &ExportGuard,
    project: &Project,
    settings: &ExportSettings,
) -> Result<(ExportPayload, ExportTicket), ExportError> {
    let payload = project.export_payload(settings)?;
    let ticket = guard.try_acquire().ok_or(ExportError::InFlight)?;
    Ok((payload, ticket))
}

/// Submit a prepared payload. The ticket is released when this returns.
pub async fn submit_export<B: EditorBackend>(
    backend: &B,
    payload: &ExportPayload,
    ticket: ExportTicket,
) -> Result<ExportReceipt, ExportError> {
    let result = backend.submit_export(payload).await;
    drop(ticket);
    match result {
        Ok(receipt) => Ok(receipt),
        Err(e) => {
            warn!(error = %e, "Export request failed");
            Err(ExportError::Backend(e))
        }
    }
}

/// Upload files one at a time, collecting a per-file outcome.
pub async fn upload_files<B: EditorBackend>(
    backend: &B,
    files: Vec<(String, Vec<u8>)>,
) -> Vec<UploadOutcome> {
    let mut outcomes = Vec::with_capacity(files.len());
    for (file_name, bytes) in files {
        let result = backend
            .upload_asset(&file_name, bytes)
            .await
            .map_err(|e| e.to_string());
        if let Err(e) = &result {
            warn!(file = %file_name, error = %e, "Upload failed");
        }
        outcomes.push(UploadOutcome { file_name, result });
    }
    info!(
        total = outcomes.len(),
        ok = outcomes.iter().filter(|o| o.is_ok()).count(),
        "Upload batch finished"
    );
    outcomes
}
