use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::models::config::RecorderConfig;
use crate::models::error::RecorderError;
use crate::models::state::RecorderState;
use crate::storage::wav_sink::WavSink;
use crate::traits::device::{CaptureDevice, DeliveryCallback, DeviceBackend};

/// Interval in milliseconds at which captured samples are drained to the
/// file. Frame period and buffer size are both derived from it.
pub const TIMER_INTERVAL_MS: u32 = 120;

/// Internal mutable session state, protected by `parking_lot::Mutex`.
///
/// The same lock serializes application-driven transitions
/// (start/stop/reset/release) against periodic deliveries arriving on the
/// device's thread, so no append can race a finalize.
struct Inner {
    state: RecorderState,
    config: RecorderConfig,
    backend: Arc<dyn DeviceBackend>,
    device: Option<Box<dyn CaptureDevice>>,

    // Frames per delivery and bytes per delivery; always recomputed
    // together, frame_period * bytes_per_frame == buffer_size.
    frame_period: usize,
    buffer_size: usize,

    // Drained into on each delivery, sized to one frame period of audio.
    delivery_buf: Vec<u8>,

    file_path: Option<PathBuf>,
    sink: Option<WavSink>,

    // Raw PCM bytes written since the last start().
    payload_bytes: u32,

    last_error: Option<RecorderError>,
}

impl Inner {
    /// Collapse into the absorbing error state, recording the cause.
    fn fail(&mut self, err: RecorderError) {
        log::error!("recorder entering error state: {}", err);
        self.last_error = Some(err);
        self.state = RecorderState::Error;
    }

    /// Halt capture and finalize the sink. Caller holds the lock.
    fn stop_locked(&mut self) {
        if let Some(device) = self.device.as_mut() {
            if let Err(err) = device.stop_capture() {
                log::warn!("device stop reported failure: {}", err);
            }
        }
        match self.sink.take() {
            Some(sink) => match sink.finalize(self.payload_bytes) {
                Ok(()) => self.state = RecorderState::Stopped,
                Err(err) => self.fail(err),
            },
            None => self.fail(RecorderError::ResourceState("no open sink to finalize".into())),
        }
    }

    /// Release capture and file resources. Idempotent; caller holds the
    /// lock.
    fn release_locked(&mut self) {
        match self.state {
            RecorderState::Recording => self.stop_locked(),
            RecorderState::Ready => {
                // Never started: no payload was captured, so the file with
                // its provisional header must not survive on disk.
                if let Some(sink) = self.sink.take() {
                    sink.abort();
                }
            }
            _ => {}
        }
        if let Some(mut device) = self.device.take() {
            device.release();
        }
    }
}

/// Derive the delivery frame period and device buffer size for a config.
///
/// Targets one timer interval of audio; if the device's minimum buffer
/// size exceeds the target, the buffer is raised to the smallest whole
/// number of frames covering the minimum and the frame period recomputed
/// from it. The device floor always wins.
fn derive_buffer_sizing(config: &RecorderConfig, backend: &dyn DeviceBackend) -> (usize, usize) {
    let bytes_per_frame = config.bytes_per_frame();
    let mut frame_period = config.sample_rate as usize * TIMER_INTERVAL_MS as usize / 1000;
    let mut buffer_size = frame_period * bytes_per_frame;

    let min =
        backend.min_buffer_size(config.sample_rate, config.channel_config, config.format);
    if let Some(min) = min {
        if min > buffer_size {
            frame_period = min.div_ceil(bytes_per_frame);
            buffer_size = frame_period * bytes_per_frame;
        }
    }

    (frame_period, buffer_size)
}

/// Streaming PCM-to-WAV capture session.
///
/// Owns the capture device handle and the output sink, and enforces the
/// `RecorderState` machine: resources are only touched from states in
/// which they are valid, and every abnormal condition collapses into the
/// absorbing `Error` state requiring an explicit `reset()`.
///
/// Failures are observed by querying `state()` / `last_error()` after an
/// operation; no public operation panics or returns an error directly.
pub struct CaptureSession {
    inner: Arc<Mutex<Inner>>,
}

impl CaptureSession {
    /// Construct a session in `Initializing`, opening the capture device
    /// and arming periodic delivery at the derived frame period.
    ///
    /// On any failure (invalid config, device open failure, device not
    /// reaching its initialized state) the session is returned in `Error`.
    pub fn new(backend: Arc<dyn DeviceBackend>, config: RecorderConfig) -> Self {
        let (frame_period, buffer_size) = derive_buffer_sizing(&config, backend.as_ref());

        let session = Self {
            inner: Arc::new(Mutex::new(Inner {
                state: RecorderState::Initializing,
                config,
                backend,
                device: None,
                frame_period,
                buffer_size,
                delivery_buf: Vec::new(),
                file_path: None,
                sink: None,
                payload_bytes: 0,
                last_error: None,
            })),
        };

        {
            let mut inner = session.inner.lock();
            let opened = inner
                .config
                .validate()
                .map_err(RecorderError::DeviceInit)
                .and_then(|()| Self::open_device(&session.inner, &mut inner));
            if let Err(err) = opened {
                inner.fail(err);
            }
        }

        session
    }

    pub fn state(&self) -> RecorderState {
        self.inner.lock().state
    }

    pub fn last_error(&self) -> Option<RecorderError> {
        self.inner.lock().last_error.clone()
    }

    pub fn config(&self) -> RecorderConfig {
        self.inner.lock().config
    }

    pub fn output_file(&self) -> Option<PathBuf> {
        self.inner.lock().file_path.clone()
    }

    /// Frames delivered per periodic callback.
    pub fn frame_period(&self) -> usize {
        self.inner.lock().frame_period
    }

    /// Bytes drained per periodic callback.
    pub fn buffer_size(&self) -> usize {
        self.inner.lock().buffer_size
    }

    /// Raw PCM bytes written since the last `start()`.
    pub fn payload_bytes(&self) -> u32 {
        self.inner.lock().payload_bytes
    }

    /// Set the output file path. Only effective in `Initializing`;
    /// silently ignored from any other state.
    pub fn set_output_file(&self, path: impl Into<PathBuf>) {
        let mut inner = self.inner.lock();
        if inner.state == RecorderState::Initializing {
            inner.file_path = Some(path.into());
        }
    }

    /// Open the sink at the output path, write the provisional header and
    /// allocate the delivery buffer. `Initializing` → `Ready`.
    ///
    /// Requires an initialized device and a set output path. From any
    /// other state the session releases its resources and is forced into
    /// `Error`: prepare must not be used to redo an already-prepared
    /// session.
    pub fn prepare(&self) {
        let mut inner = self.inner.lock();
        if inner.state != RecorderState::Initializing {
            let from = inner.state;
            inner.release_locked();
            inner.fail(RecorderError::InvalidTransition { op: "prepare", from });
            return;
        }

        let initialized = inner.device.as_ref().is_some_and(|d| d.is_initialized());
        if !initialized {
            inner.fail(RecorderError::ResourceState(
                "capture device not initialized".into(),
            ));
            return;
        }
        let Some(path) = inner.file_path.clone() else {
            inner.fail(RecorderError::ResourceState("output file not set".into()));
            return;
        };

        let sink = WavSink::open(
            &path,
            inner.config.channels(),
            inner.config.sample_rate,
            inner.config.bits_per_sample(),
        );
        match sink {
            Ok(sink) => {
                inner.sink = Some(sink);
                inner.delivery_buf = vec![0u8; inner.buffer_size];
                inner.state = RecorderState::Ready;
            }
            Err(err) => inner.fail(err),
        }
    }

    /// Arm the device and begin capturing. `Ready` → `Recording`.
    ///
    /// Resets the payload counter and performs one synchronous priming
    /// read so the device buffer is in a known state before periodic
    /// deliveries begin.
    pub fn start(&self) {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;
        if inner.state != RecorderState::Ready {
            let from = inner.state;
            inner.fail(RecorderError::InvalidTransition { op: "start", from });
            return;
        }

        inner.payload_bytes = 0;
        let started = match inner.device.as_mut() {
            Some(device) => device
                .start_capture()
                .and_then(|()| device.read_into(&mut inner.delivery_buf).map(|_| ())),
            None => Err(RecorderError::ResourceState("capture device released".into())),
        };
        match started {
            Ok(()) => inner.state = RecorderState::Recording,
            Err(err) => inner.fail(err),
        }
    }

    /// Halt capture and finalize the file. `Recording` → `Stopped`
    /// (or `Error` if the header patch or close fails).
    pub fn stop(&self) {
        let mut inner = self.inner.lock();
        if inner.state != RecorderState::Recording {
            let from = inner.state;
            inner.fail(RecorderError::InvalidTransition { op: "stop", from });
            return;
        }
        inner.stop_locked();
    }

    /// Release device and file resources.
    ///
    /// A recording session is stopped and finalized first; a prepared but
    /// never-started session has its empty output file deleted. Safe to
    /// call multiple times.
    pub fn release(&self) {
        self.inner.lock().release_locked();
    }

    /// Return the session to `Initializing` as if freshly constructed:
    /// release resources, clear the output path and reconstruct the
    /// device from the original parameters. No-op from `Error`.
    pub fn reset(&self) {
        let mut inner = self.inner.lock();
        if inner.state == RecorderState::Error {
            return;
        }

        inner.release_locked();
        if inner.state == RecorderState::Error {
            // Release collapses to the error state if the finalize patch
            // fails; the error is absorbing and its cause stays recorded.
            return;
        }
        inner.file_path = None;
        inner.payload_bytes = 0;
        inner.last_error = None;

        match Self::open_device(&self.inner, &mut inner) {
            Ok(()) => inner.state = RecorderState::Initializing,
            Err(err) => inner.fail(err),
        }
    }

    /// Open the device from the backend and arm periodic delivery.
    ///
    /// The callback only holds a weak reference to the session interior,
    /// so a device outliving its session degrades deliveries to no-ops
    /// instead of keeping the session alive.
    fn open_device(
        inner_arc: &Arc<Mutex<Inner>>,
        inner: &mut Inner,
    ) -> Result<(), RecorderError> {
        let mut device = inner.backend.open(&inner.config, inner.buffer_size)?;
        if !device.is_initialized() {
            return Err(RecorderError::DeviceInit(
                "device failed to reach initialized state".into(),
            ));
        }

        let weak = Arc::downgrade(inner_arc);
        let callback: DeliveryCallback = Arc::new(move || {
            if let Some(strong) = weak.upgrade() {
                CaptureSession::on_periodic_delivery(&strong);
            }
        });
        device.arm_periodic_delivery(inner.frame_period, callback);

        inner.device = Some(device);
        Ok(())
    }

    /// Handle one periodic delivery from the device's thread.
    ///
    /// Reads exactly one buffer's worth of frames and appends it to the
    /// sink. Deliveries arriving in any state other than `Recording`
    /// (e.g. racing a stop that already began finalizing) are ignored. An
    /// append failure triggers an immediate in-place stop so the payload
    /// captured so far is finalized rather than lost.
    fn on_periodic_delivery(inner_arc: &Arc<Mutex<Inner>>) {
        let mut guard = inner_arc.lock();
        let inner = &mut *guard;
        if inner.state != RecorderState::Recording {
            log::debug!("ignoring periodic delivery in state {}", inner.state);
            return;
        }

        let (Some(device), Some(sink)) = (inner.device.as_mut(), inner.sink.as_mut()) else {
            return;
        };
        let appended = device
            .read_into(&mut inner.delivery_buf)
            .and_then(|_| sink.append(&inner.delivery_buf));
        match appended {
            Ok(()) => {
                inner.payload_bytes = inner.payload_bytes.saturating_add(inner.buffer_size as u32);
            }
            Err(err) => {
                log::error!("delivery failed mid-recording, finalizing: {}", err);
                inner.stop_locked();
            }
        }
    }
}

impl Drop for CaptureSession {
    fn drop(&mut self) {
        self.inner.lock().release_locked();
    }
}
