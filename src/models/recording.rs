use std::path::Path;

use serde::{Deserialize, Serialize};

use super::config::RecorderConfig;

/// Metadata describing a finished recording.
///
/// Returned by the dispatch layer once a recording has been finalized.
/// Serializable for JSON export to callers outside the crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordingInfo {
    pub id: String,
    pub file_path: String,
    pub sample_rate: u32,
    pub channels: u16,
    pub bits_per_sample: u16,
    /// Raw PCM bytes written after the header.
    pub payload_bytes: u32,
    /// Audio duration derived from payload size and byte rate.
    pub duration_ms: u64,
    pub created_at: String,
}

impl RecordingInfo {
    pub fn new(file_path: &Path, config: &RecorderConfig, payload_bytes: u32) -> Self {
        let byte_rate = u64::from(config.byte_rate());
        let duration_ms = if byte_rate == 0 {
            0
        } else {
            u64::from(payload_bytes) * 1000 / byte_rate
        };

        Self {
            id: uuid::Uuid::new_v4().to_string(),
            file_path: file_path.to_string_lossy().into_owned(),
            sample_rate: config.sample_rate,
            channels: config.channels(),
            bits_per_sample: config.bits_per_sample(),
            payload_bytes,
            duration_ms,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}
