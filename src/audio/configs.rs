use crate::utils::constants::{DEFAULT_MONO, DEFAULT_SAMPLE_RATE};
use crate::utils::errors::AudioIoError;

/// Output format of an [crate::audio::reader::Audio] reader.
/// Can be serialized (using serde or otherwise) to persist settings.
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AudioConfigs {
    /// The target sample rate (in Hz). All reads are resampled to this rate.
    sample_rate: u32,
    /// Whether to average multi-channel audio down to a single channel.
    mono: bool,
}

impl AudioConfigs {
    pub fn new(sample_rate: u32, mono: bool) -> Self {
        Self { sample_rate, mono }
    }

    pub fn with_sample_rate(self, sample_rate: u32) -> Self {
        Self {
            sample_rate,
            ..self
        }
    }

    pub fn with_mono(self, mono: bool) -> Self {
        Self { mono, ..self }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn mono(&self) -> bool {
        self.mono
    }

    /// Ensures the target sample rate is positive.
    pub fn validate(&self) -> Result<(), AudioIoError> {
        if self.sample_rate == 0 {
            return Err(AudioIoError::ParameterError(
                "Target sample rate must be positive.".to_owned(),
            ));
        }
        Ok(())
    }
}

impl Default for AudioConfigs {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            mono: DEFAULT_MONO,
        }
    }
}
