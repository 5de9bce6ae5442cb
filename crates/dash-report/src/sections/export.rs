//! Export section: the filtered CSV embedded for download.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

/// Filtered CSV payload offered as a download link.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportSection {
    /// Suggested download filename.
    pub filename: String,
    /// MIME type of the payload.
    pub mime_type: String,
    /// Data rows in the payload (header excluded).
    pub rows: usize,
    /// Payload size in bytes before encoding.
    pub size_bytes: usize,
    /// Base64-encoded CSV bytes.
    pub payload_base64: String,
}

impl ExportSection {
    /// Build the section from raw CSV bytes.
    pub fn from_csv(
        filename: impl Into<String>,
        mime_type: impl Into<String>,
        rows: usize,
        csv: &[u8],
    ) -> Self {
        Self {
            filename: filename.into(),
            mime_type: mime_type.into(),
            rows,
            size_bytes: csv.len(),
            payload_base64: STANDARD.encode(csv),
        }
    }

    /// `data:` URI usable as an anchor href.
    pub fn data_uri(&self) -> String {
        format!(
            "data:{};charset=utf-8;base64,{}",
            self.mime_type, self.payload_base64
        )
    }

    /// Decode the payload back to CSV bytes.
    pub fn decode(&self) -> Result<Vec<u8>, base64::DecodeError> {
        STANDARD.decode(&self.payload_base64)
    }

    /// Get formatted payload size.
    pub fn size_formatted(&self) -> String {
        let bytes = self.size_bytes;
        if bytes >= 1_048_576 {
            format!("{:.1} MB", bytes as f64 / 1_048_576.0)
        } else if bytes >= 1024 {
            format!("{:.1} KB", bytes as f64 / 1024.0)
        } else {
            format!("{} B", bytes)
        }
    }
}
