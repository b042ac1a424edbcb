use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::models::config::{AudioSource, ChannelConfig, RecorderConfig, SampleFormat};
use crate::models::error::RecorderError;
use crate::models::recording::RecordingInfo;
use crate::models::state::RecorderState;
use crate::session::capture::CaptureSession;
use crate::traits::device::DeviceBackend;

/// Sample rates probed in order when selecting a device rate. The first
/// rate for which the backend reports a positive minimum buffer size wins.
pub const SAMPLE_RATE_CANDIDATES: [u32; 5] = [44100, 22050, 16000, 11025, 8000];

/// Command adapter over `CaptureSession`.
///
/// Maps external invocations — record for a duration, start, stop — onto
/// the session API, and translates the session's post-operation error
/// state into returned `RecorderError`s. Recordings land in the configured
/// output directory, named `recording_<uuid>.wav` unless a name is given.
pub struct RecorderController {
    backend: Arc<dyn DeviceBackend>,
    output_dir: PathBuf,
    session: Option<CaptureSession>,
    output_path: Option<PathBuf>,
}

impl RecorderController {
    pub fn new(backend: Arc<dyn DeviceBackend>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            backend,
            output_dir: output_dir.into(),
            session: None,
            output_path: None,
        }
    }

    /// Pick the device sample rate by falling through the candidate list.
    pub fn pick_sample_rate(&self) -> Result<u32, RecorderError> {
        for &rate in &SAMPLE_RATE_CANDIDATES {
            let supported = self
                .backend
                .min_buffer_size(rate, ChannelConfig::Mono, SampleFormat::Pcm16)
                .is_some_and(|min| min > 0);
            if supported {
                return Ok(rate);
            }
        }
        Err(RecorderError::DeviceInit(
            "no supported sample rate among candidates".into(),
        ))
    }

    /// Record for `duration_ms`, then release and return the recording.
    ///
    /// Blocks the calling thread for the duration; periodic deliveries
    /// arrive on the capture subsystem's own thread meanwhile.
    pub fn record(
        &mut self,
        file_name: Option<&str>,
        duration_ms: u64,
    ) -> Result<RecordingInfo, RecorderError> {
        self.init_record(file_name)?;
        let session = self.active_session()?;
        session.start();
        ensure_state(session, RecorderState::Recording)?;

        thread::sleep(Duration::from_millis(duration_ms));

        session.release();
        ensure_state(session, RecorderState::Stopped)?;
        self.finished_info()
    }

    /// Begin an open-ended recording; returns the resulting state.
    pub fn start_record(&mut self, file_name: Option<&str>) -> Result<RecorderState, RecorderError> {
        self.init_record(file_name)?;
        let session = self.active_session()?;
        session.start();
        ensure_state(session, RecorderState::Recording)?;
        Ok(RecorderState::Recording)
    }

    /// Stop the recording started by `start_record` and return it.
    pub fn stop_record(&mut self) -> Result<RecordingInfo, RecorderError> {
        let session = self.active_session()?;
        session.stop();
        ensure_state(session, RecorderState::Stopped)?;
        self.finished_info()
    }

    /// Path of the most recently initialized recording, if any.
    pub fn output_path(&self) -> Option<&PathBuf> {
        self.output_path.as_ref()
    }

    /// Construct and prepare a fresh session for one recording.
    fn init_record(&mut self, file_name: Option<&str>) -> Result<(), RecorderError> {
        let name = match file_name {
            Some(name) => name.to_owned(),
            None => format!("recording_{}", uuid::Uuid::new_v4()),
        };
        let path = self.output_dir.join(format!("{}.wav", name));

        let sample_rate = self.pick_sample_rate()?;
        let config = RecorderConfig {
            source: AudioSource::Mic,
            sample_rate,
            channel_config: ChannelConfig::Mono,
            format: SampleFormat::Pcm16,
        };

        let session = CaptureSession::new(Arc::clone(&self.backend), config);
        session.set_output_file(&path);
        session.prepare();
        ensure_state(&session, RecorderState::Ready)?;

        log::debug!("prepared recording at {:?} ({} Hz)", path, sample_rate);
        self.output_path = Some(path);
        self.session = Some(session);
        Ok(())
    }

    fn active_session(&self) -> Result<&CaptureSession, RecorderError> {
        self.session
            .as_ref()
            .ok_or_else(|| RecorderError::ResourceState("no recording in progress".into()))
    }

    fn finished_info(&self) -> Result<RecordingInfo, RecorderError> {
        let session = self.active_session()?;
        let path = self
            .output_path
            .as_ref()
            .ok_or_else(|| RecorderError::ResourceState("no output path".into()))?;
        Ok(RecordingInfo::new(
            path,
            &session.config(),
            session.payload_bytes(),
        ))
    }
}

/// Translate a post-operation session state into a caller-visible result.
fn ensure_state(session: &CaptureSession, expected: RecorderState) -> Result<(), RecorderError> {
    let state = session.state();
    if state == expected {
        return Ok(());
    }
    Err(session.last_error().unwrap_or_else(|| {
        RecorderError::ResourceState(format!("recorder in unexpected state {}", state))
    }))
}
