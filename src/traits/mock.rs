//! In-crate mock capture backend for session and dispatch tests.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::models::config::{ChannelConfig, RecorderConfig, SampleFormat};
use crate::models::error::RecorderError;
use crate::traits::device::{CaptureDevice, DeliveryCallback, DeviceBackend};

#[derive(Default)]
pub struct MockShared {
    // Behavior knobs
    pub min_buffer_size: usize,
    pub supported_rates: Option<Vec<u32>>,
    pub fail_open: bool,
    pub uninitialized: bool,
    pub fail_read: bool,
    pub fill_byte: u8,

    // Observed interactions
    pub callback: Option<DeliveryCallback>,
    pub frame_period: usize,
    pub opened: u32,
    pub started: bool,
    pub released: u32,
    pub reads: u32,
    pub last_open_config: Option<RecorderConfig>,
    pub last_buffer_size: Option<usize>,
}

/// Scriptable stand-in for a platform capture backend.
///
/// All opened devices share one `MockShared`, so tests can trigger periodic
/// deliveries and inspect device interactions while the session owns the
/// device handle.
pub struct MockBackend {
    shared: Arc<Mutex<MockShared>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Mutex::new(MockShared {
                min_buffer_size: 256,
                fill_byte: 0x42,
                ..Default::default()
            })),
        }
    }

    pub fn with_min_buffer_size(min: usize) -> Self {
        let backend = Self::new();
        backend.shared.lock().min_buffer_size = min;
        backend
    }

    pub fn set_supported_rates(&self, rates: &[u32]) {
        self.shared.lock().supported_rates = Some(rates.to_vec());
    }

    pub fn set_fail_open(&self, fail: bool) {
        self.shared.lock().fail_open = fail;
    }

    pub fn set_uninitialized(&self, uninitialized: bool) {
        self.shared.lock().uninitialized = uninitialized;
    }

    pub fn set_fail_read(&self, fail: bool) {
        self.shared.lock().fail_read = fail;
    }

    /// Simulate one periodic delivery from the device's own thread.
    ///
    /// Clones the armed callback out before invoking it so the mock lock is
    /// not held while the session lock is taken.
    pub fn deliver(&self) {
        let callback = self.shared.lock().callback.clone();
        if let Some(callback) = callback {
            callback();
        }
    }

    pub fn armed(&self) -> bool {
        self.shared.lock().callback.is_some()
    }

    pub fn frame_period(&self) -> usize {
        self.shared.lock().frame_period
    }

    pub fn opened(&self) -> u32 {
        self.shared.lock().opened
    }

    pub fn started(&self) -> bool {
        self.shared.lock().started
    }

    pub fn released(&self) -> u32 {
        self.shared.lock().released
    }

    pub fn reads(&self) -> u32 {
        self.shared.lock().reads
    }

    pub fn last_open_config(&self) -> Option<RecorderConfig> {
        self.shared.lock().last_open_config
    }

    pub fn last_buffer_size(&self) -> Option<usize> {
        self.shared.lock().last_buffer_size
    }
}

impl DeviceBackend for MockBackend {
    fn min_buffer_size(
        &self,
        sample_rate: u32,
        _channel_config: ChannelConfig,
        _format: SampleFormat,
    ) -> Option<usize> {
        let shared = self.shared.lock();
        match &shared.supported_rates {
            Some(rates) if !rates.contains(&sample_rate) => None,
            _ => Some(shared.min_buffer_size),
        }
    }

    fn open(
        &self,
        config: &RecorderConfig,
        buffer_size: usize,
    ) -> Result<Box<dyn CaptureDevice>, RecorderError> {
        let mut shared = self.shared.lock();
        if shared.fail_open {
            return Err(RecorderError::DeviceInit("mock open failure".into()));
        }
        shared.opened += 1;
        shared.last_open_config = Some(*config);
        shared.last_buffer_size = Some(buffer_size);
        Ok(Box::new(MockDevice {
            shared: Arc::clone(&self.shared),
        }))
    }
}

struct MockDevice {
    shared: Arc<Mutex<MockShared>>,
}

impl CaptureDevice for MockDevice {
    fn is_initialized(&self) -> bool {
        !self.shared.lock().uninitialized
    }

    fn arm_periodic_delivery(&mut self, frame_period: usize, callback: DeliveryCallback) {
        let mut shared = self.shared.lock();
        shared.frame_period = frame_period;
        shared.callback = Some(callback);
    }

    fn start_capture(&mut self) -> Result<(), RecorderError> {
        self.shared.lock().started = true;
        Ok(())
    }

    fn stop_capture(&mut self) -> Result<(), RecorderError> {
        self.shared.lock().started = false;
        Ok(())
    }

    fn read_into(&mut self, buf: &mut [u8]) -> Result<usize, RecorderError> {
        let mut shared = self.shared.lock();
        if shared.fail_read {
            return Err(RecorderError::Io("mock read failure".into()));
        }
        shared.reads += 1;
        buf.fill(shared.fill_byte);
        Ok(buf.len())
    }

    fn release(&mut self) {
        self.shared.lock().released += 1;
    }
}
