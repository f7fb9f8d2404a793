//! Cutdeck Media - the render backend boundary
//!
//! This crate handles:
//! - Asset listing, upload and raw-byte download
//! - Export submission and rendered-video download
//! - Error detail extraction from backend responses
//! - Single-flight export control and batch uploads

pub mod backend;
pub mod controller;
pub mod error;
pub mod memory;
pub mod wire;

pub use backend::{EditorBackend, HttpBackend};
pub use controller::{
    prepare_export, submit_export, upload_files, ExportError, ExportGuard, ExportTicket,
};
pub use error::BackendError;
pub use memory::InMemoryBackend;
pub use wire::{summarize_uploads, AssetListResponse, ExportReceipt, UploadOutcome};
