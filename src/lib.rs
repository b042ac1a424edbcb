//! # audio-recorder-core
//!
//! Platform-agnostic PCM-to-WAV recorder core.
//!
//! Accepts periodically delivered raw sample buffers from a capture device,
//! streams them into a growing WAV file, and finalizes the file with a
//! correct RIFF header once recording stops. Platform-specific capture
//! backends implement the `DeviceBackend`/`CaptureDevice` traits and plug
//! into the generic `CaptureSession`.
//!
//! ## Architecture
//!
//! ```text
//! audio-recorder-core (this crate)
//! ├── traits/       ← DeviceBackend, CaptureDevice, DeliveryCallback
//! ├── models/       ← RecorderError, RecorderState, RecorderConfig, RecordingInfo
//! ├── processing/   ← WAV header generation
//! ├── session/      ← CaptureSession (state machine + lifecycle owner)
//! ├── storage/      ← WavSink (provisional header, append, finalize)
//! └── dispatch/     ← RecorderController (record/startRecord/stopRecord)
//! ```

pub mod dispatch;
pub mod models;
pub mod processing;
pub mod session;
pub mod storage;
pub mod traits;

// Re-export key types at crate root for convenience.
pub use dispatch::controller::{RecorderController, SAMPLE_RATE_CANDIDATES};
pub use models::config::{AudioSource, ChannelConfig, RecorderConfig, SampleFormat};
pub use models::error::RecorderError;
pub use models::recording::RecordingInfo;
pub use models::state::RecorderState;
pub use session::capture::{CaptureSession, TIMER_INTERVAL_MS};
pub use storage::wav_sink::WavSink;
pub use traits::device::{CaptureDevice, DeliveryCallback, DeviceBackend};
