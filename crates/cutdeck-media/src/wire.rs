//! Response bodies of the backend's editor endpoints.

use cutdeck_timeline::Asset;
use serde::{Deserialize, Serialize};

/// `GET /editor/assets`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetListResponse {
    #[serde(default)]
    pub assets: Vec<Asset>,
}

/// `POST /editor/export` success body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportReceipt {
    pub export_id: String,
    /// Rendered length in seconds.
    #[serde(default)]
    pub duration: f64,
    #[serde(default)]
    pub download_url: String,
}

/// Result of uploading one file from a multi-file selection.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadOutcome {
    pub file_name: String,
    pub result: Result<Asset, String>,
}

impl UploadOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// One-line summary such as `"Uploaded 2 of 3 files"`.
pub fn summarize_uploads(outcomes: &[UploadOutcome]) -> String {
    let ok = outcomes.iter().filter(|o| o.is_ok()).count();
    match outcomes.iter().find_map(|o| o.result.as_ref().err().map(|e| (&o.file_name, e))) {
        None => format!("Uploaded {ok} file{}", if ok == 1 { "" } else { "s" }),
        Some((name, err)) => format!("Uploaded {ok} of {} files ({name}: {err})", outcomes.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_list_parses() {
        let body = r#"{"assets": [
            {"asset_id": "a", "original_name": "voice.wav", "kind": "audio",
             "duration": 4.2, "has_video": false, "has_audio": true, "size_bytes": 10}
        ]}"#;
        let list: AssetListResponse = serde_json::from_str(body).unwrap();
        assert_eq!(list.assets.len(), 1);
        assert_eq!(list.assets[0].name, "voice.wav");
    }

    #[test]
    fn test_receipt_parses() {
        let body = r#"{"export_id": "e1", "duration": 9.5,
                       "download_url": "/editor/exports/e1/download"}"#;
        let receipt: ExportReceipt = serde_json::from_str(body).unwrap();
        assert_eq!(receipt.export_id, "e1");
        assert_eq!(receipt.duration, 9.5);
    }

    #[test]
    fn test_upload_summary() {
        let asset: Asset = serde_json::from_str(r#"{"asset_id": "a", "kind": "video"}"#).unwrap();
        let ok = UploadOutcome {
            file_name: "a.mp4".into(),
            result: Ok(asset),
        };
        assert_eq!(summarize_uploads(std::slice::from_ref(&ok)), "Uploaded 1 file");
        let failed = UploadOutcome {
            file_name: "b.txt".into(),
            result: Err("Unsupported media".into()),
        };
        assert_eq!(
            summarize_uploads(&[ok, failed]),
            "Uploaded 1 of 2 files (b.txt: Unsupported media)"
        );
    }
}
