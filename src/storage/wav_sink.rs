use std::fs::{self, File};
use std::io::{Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::models::error::RecorderError;
use crate::processing::wav_format::{self, DATA_SIZE_OFFSET, RIFF_SIZE_OFFSET};

/// Streaming WAV file writer.
///
/// Opens with a provisional 44-byte header whose size fields are zero,
/// appends raw PCM bytes exactly as delivered, and patches the two size
/// fields in place on finalize:
///
/// ```text
/// [44-byte WAV header, sizes 0 until finalize]
/// [raw little-endian PCM frames...]
/// ```
///
/// `abort` closes without patching and deletes the file instead.
pub struct WavSink {
    file_path: PathBuf,
    file: Option<File>,
    channels: u16,
    sample_rate: u32,
    bits_per_sample: u16,
    payload_bytes: u64,
}

impl WavSink {
    /// Create or truncate the file at `path` and write the provisional
    /// header. While the sink is open the file always holds a
    /// syntactically valid WAV header.
    pub fn open(
        path: &Path,
        channels: u16,
        sample_rate: u32,
        bits_per_sample: u16,
    ) -> Result<Self, RecorderError> {
        // Ensure output directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| RecorderError::Io(format!("failed to create directory: {}", e)))?;
        }

        let mut file = File::create(path)
            .map_err(|e| RecorderError::Io(format!("failed to create file: {}", e)))?;

        // Both size fields are zero placeholders, patched on finalize.
        let header = wav_format::provisional_wav_header(sample_rate, bits_per_sample, channels);
        file.write_all(&header)
            .map_err(|e| RecorderError::Io(format!("header write failed: {}", e)))?;

        Ok(Self {
            file_path: path.to_path_buf(),
            file: Some(file),
            channels,
            sample_rate,
            bits_per_sample,
            payload_bytes: 0,
        })
    }

    /// Append raw PCM bytes at the current position.
    ///
    /// Byte order and frame alignment are preserved exactly as delivered.
    pub fn append(&mut self, data: &[u8]) -> Result<(), RecorderError> {
        let file = self
            .file
            .as_mut()
            .ok_or_else(|| RecorderError::ResourceState("sink is not open".into()))?;
        file.write_all(data)
            .map_err(|e| RecorderError::Io(format!("write failed: {}", e)))?;
        self.payload_bytes += data.len() as u64;
        Ok(())
    }

    /// Patch the RIFF chunk size (offset 4) and data chunk size (offset 40)
    /// with the true payload size, then close the handle.
    pub fn finalize(mut self, payload_bytes: u32) -> Result<(), RecorderError> {
        let mut file = self
            .file
            .take()
            .ok_or_else(|| RecorderError::ResourceState("sink is not open".into()))?;

        file.seek(SeekFrom::Start(RIFF_SIZE_OFFSET))
            .map_err(|e| RecorderError::Io(e.to_string()))?;
        file.write_all(&wav_format::riff_chunk_size(payload_bytes).to_le_bytes())
            .map_err(|e| RecorderError::Io(e.to_string()))?;

        file.seek(SeekFrom::Start(DATA_SIZE_OFFSET))
            .map_err(|e| RecorderError::Io(e.to_string()))?;
        file.write_all(&payload_bytes.to_le_bytes())
            .map_err(|e| RecorderError::Io(e.to_string()))?;

        file.flush().map_err(|e| RecorderError::Io(e.to_string()))?;
        Ok(())
    }

    /// Close the handle without patching and delete the underlying file.
    ///
    /// Used when a prepared-but-never-started recording is released; a
    /// zero-payload file must not be left on disk.
    pub fn abort(mut self) {
        self.file.take();
        if let Err(e) = fs::remove_file(&self.file_path) {
            log::warn!("failed to delete aborted recording {:?}: {}", self.file_path, e);
        }
    }

    /// Raw PCM bytes appended so far, excluding the header.
    pub fn payload_bytes(&self) -> u64 {
        self.payload_bytes
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn bits_per_sample(&self) -> u16 {
        self.bits_per_sample
    }
}
