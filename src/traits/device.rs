use std::sync::Arc;

use crate::models::config::{ChannelConfig, RecorderConfig, SampleFormat};
use crate::models::error::RecorderError;

/// Callback invoked once per frame period when a buffer is ready to drain.
///
/// Fires on a thread owned by the capture subsystem — the handler must not
/// block beyond one buffer period.
pub type DeliveryCallback = Arc<dyn Fn() + Send + Sync + 'static>;

/// Factory for platform capture devices.
///
/// Implemented by platform backends; consumed by `CaptureSession` (device
/// construction and reconstruction on reset) and by the dispatch layer
/// (sample-rate fallback probing).
pub trait DeviceBackend: Send + Sync {
    /// Minimum device buffer size in bytes for the given parameters, or
    /// `None` if the device does not support this combination.
    fn min_buffer_size(
        &self,
        sample_rate: u32,
        channel_config: ChannelConfig,
        format: SampleFormat,
    ) -> Option<usize>;

    /// Open a capture device with the given parameters and internal buffer
    /// size. The returned handle may still report uninitialized; callers
    /// must check `CaptureDevice::is_initialized`.
    fn open(
        &self,
        config: &RecorderConfig,
        buffer_size: usize,
    ) -> Result<Box<dyn CaptureDevice>, RecorderError>;
}

/// An open platform capture device.
///
/// Exclusively owned by one `CaptureSession`; released exactly once.
pub trait CaptureDevice: Send {
    /// Whether the device reached its initialized state after opening.
    fn is_initialized(&self) -> bool;

    /// Register `callback` to fire every `frame_period` captured frames.
    fn arm_periodic_delivery(&mut self, frame_period: usize, callback: DeliveryCallback);

    /// Begin capturing; periodic deliveries start after this returns.
    fn start_capture(&mut self) -> Result<(), RecorderError>;

    /// Halt capturing; no further deliveries after this returns.
    fn stop_capture(&mut self) -> Result<(), RecorderError>;

    /// Read up to `buf.len()` captured bytes into `buf`, returning the
    /// number of bytes read.
    fn read_into(&mut self, buf: &mut [u8]) -> Result<usize, RecorderError>;

    /// Release the device. Safe to call once; the owner guarantees it is
    /// not called twice.
    fn release(&mut self);
}
