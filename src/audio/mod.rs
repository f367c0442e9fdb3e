pub mod buffer;
pub mod configs;
pub mod descriptor;
pub mod loading;
pub mod normalize;
pub mod range;
pub mod reader;
pub mod remix;
pub mod resampler;
pub mod traits;

/// Native properties of an audio source, before any resampling.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct AudioSourceInfo {
    pub native_sample_rate: u32,
    pub native_total_samples: usize,
}

impl AudioSourceInfo {
    pub fn new(native_sample_rate: u32, native_total_samples: usize) -> Self {
        Self {
            native_sample_rate,
            native_total_samples,
        }
    }

    pub fn duration_secs(&self) -> f64 {
        self.native_total_samples as f64 / self.native_sample_rate as f64
    }
}
