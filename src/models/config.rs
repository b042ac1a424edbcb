use serde::{Deserialize, Serialize};

/// Capture source selector, forwarded verbatim to the device backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioSource {
    Default,
    Mic,
}

/// Channel configuration constant requested from the device.
///
/// Stored verbatim so device reconstruction on `reset()` reuses the exact
/// constant the session was created with, not a derived channel count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelConfig {
    Mono,
    Stereo,
}

impl ChannelConfig {
    /// Interleaved channel count: 1 for mono, 2 for stereo.
    pub fn channels(self) -> u16 {
        match self {
            Self::Mono => 1,
            Self::Stereo => 2,
        }
    }
}

/// PCM sample encoding requested from the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SampleFormat {
    Pcm8,
    Pcm16,
}

impl SampleFormat {
    pub fn bits_per_sample(self) -> u16 {
        match self {
            Self::Pcm8 => 8,
            Self::Pcm16 => 16,
        }
    }
}

/// Configuration for a capture session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecorderConfig {
    /// Capture source (default: Mic).
    pub source: AudioSource,

    /// Target sample rate in Hz. Must be positive.
    pub sample_rate: u32,

    /// Requested channel configuration.
    pub channel_config: ChannelConfig,

    /// Requested PCM sample encoding.
    pub format: SampleFormat,
}

impl RecorderConfig {
    pub fn channels(&self) -> u16 {
        self.channel_config.channels()
    }

    pub fn bits_per_sample(&self) -> u16 {
        self.format.bits_per_sample()
    }

    /// Bytes in one sample-frame (one sample per channel).
    pub fn bytes_per_frame(&self) -> usize {
        self.channels() as usize * self.bits_per_sample() as usize / 8
    }

    /// PCM bytes per second of audio.
    pub fn byte_rate(&self) -> u32 {
        self.sample_rate * self.channels() as u32 * self.bits_per_sample() as u32 / 8
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.sample_rate == 0 {
            return Err("sample rate must be positive".into());
        }
        Ok(())
    }
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            source: AudioSource::Mic,
            sample_rate: 44100,
            channel_config: ChannelConfig::Mono,
            format: SampleFormat::Pcm16,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_fields_mono_16bit() {
        let config = RecorderConfig::default();
        assert_eq!(config.channels(), 1);
        assert_eq!(config.bits_per_sample(), 16);
        assert_eq!(config.bytes_per_frame(), 2);
        assert_eq!(config.byte_rate(), 88200);
    }

    #[test]
    fn derived_fields_stereo_8bit() {
        let config = RecorderConfig {
            sample_rate: 8000,
            channel_config: ChannelConfig::Stereo,
            format: SampleFormat::Pcm8,
            ..Default::default()
        };
        assert_eq!(config.channels(), 2);
        assert_eq!(config.bits_per_sample(), 8);
        assert_eq!(config.bytes_per_frame(), 2);
        assert_eq!(config.byte_rate(), 16000);
    }

    #[test]
    fn rejects_zero_sample_rate() {
        let config = RecorderConfig {
            sample_rate: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
        assert!(RecorderConfig::default().validate().is_ok());
    }
}
