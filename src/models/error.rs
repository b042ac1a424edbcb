use thiserror::Error;

use super::state::RecorderState;

/// Errors that can occur during recorder operations.
///
/// The session itself is the error boundary: public session operations do
/// not return these directly but collapse into `RecorderState::Error` and
/// record the cause, to be queried via `CaptureSession::last_error`. The
/// dispatch layer translates a post-operation error state into a returned
/// `RecorderError`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecorderError {
    #[error("device initialization failed: {0}")]
    DeviceInit(String),

    #[error("invalid transition: {op} called from {from}")]
    InvalidTransition {
        op: &'static str,
        from: RecorderState,
    },

    #[error("i/o failure: {0}")]
    Io(String),

    #[error("resource not ready: {0}")]
    ResourceState(String),
}
