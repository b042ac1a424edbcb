use std::fmt;

/// Recorder session state machine.
///
/// State transitions:
/// ```text
/// initializing → ready → recording → stopped
///       ↑ ┌────────┴─────────┘
///       reset        any invalid operation or I/O failure → error
/// ```
///
/// `Error` is absorbing: every operation invoked from an incompatible state
/// re-enters it, and only `reset()` (from a non-error state) or discarding
/// the session leads back to `Initializing`. `Stopped` is terminal for the
/// output file, which has been finalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderState {
    Initializing,
    Ready,
    Recording,
    Error,
    Stopped,
}

impl RecorderState {
    pub fn is_recording(self) -> bool {
        matches!(self, Self::Recording)
    }

    pub fn is_error(self) -> bool {
        matches!(self, Self::Error)
    }

    /// Upper-case state name, as reported to command-layer callers.
    pub fn name(self) -> &'static str {
        match self {
            Self::Initializing => "INITIALIZING",
            Self::Ready => "READY",
            Self::Recording => "RECORDING",
            Self::Error => "ERROR",
            Self::Stopped => "STOPPED",
        }
    }
}

impl fmt::Display for RecorderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_match_command_layer_strings() {
        assert_eq!(RecorderState::Initializing.to_string(), "INITIALIZING");
        assert_eq!(RecorderState::Recording.to_string(), "RECORDING");
        assert_eq!(RecorderState::Stopped.name(), "STOPPED");
    }

    #[test]
    fn predicates() {
        assert!(RecorderState::Recording.is_recording());
        assert!(RecorderState::Error.is_error());
        assert!(!RecorderState::Ready.is_recording());
    }
}
