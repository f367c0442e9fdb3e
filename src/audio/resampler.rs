#[cfg(feature = "resampler")]
use rubato::{
    Resampler as RubatoResampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType,
    WindowFunction,
};

use crate::audio::traits::Resample;
#[cfg(feature = "resampler")]
use crate::utils::constants::{
    MIN_CHUNK_FILTERS, SINC_F_CUTOFF, SINC_LEN, SINC_OVERSAMPLING_FACTOR,
};
use crate::utils::errors::AudioIoError;

/// The resampler used by [crate::audio::reader::Audio] unless one is supplied.
#[cfg(feature = "resampler")]
pub type DefaultResampler = SincResampler;
#[cfg(not(feature = "resampler"))]
pub type DefaultResampler = LinearResampler;

/// Number of output samples for `input_len` samples converted from `from_rate` to `to_rate`.
#[inline]
pub fn resampled_len(input_len: usize, from_rate: u32, to_rate: u32) -> usize {
    (input_len as f64 * to_rate as f64 / from_rate as f64).round_ties_even() as usize
}

fn check_rates(from_rate: u32, to_rate: u32) -> Result<(), AudioIoError> {
    if from_rate == 0 || to_rate == 0 {
        return Err(AudioIoError::ParameterError(format!(
            "Cannot resample from {}Hz to {}Hz",
            from_rate, to_rate
        )));
    }
    Ok(())
}

/// Band-limited sinc resampler backed by rubato.
///
/// A fresh rubato resampler is built for every call, sized to the whole input, so this type
/// carries no state and can be shared between threads. The filter delay is flushed and trimmed
/// so that output sample `i` lines up with input time `i / to_rate`.
#[cfg(feature = "resampler")]
#[derive(Debug, Clone)]
pub struct SincResampler {
    sinc_len: usize,
    f_cutoff: f32,
    oversampling_factor: usize,
}

#[cfg(feature = "resampler")]
impl SincResampler {
    pub fn new() -> Self {
        Self {
            sinc_len: SINC_LEN,
            f_cutoff: SINC_F_CUTOFF,
            oversampling_factor: SINC_OVERSAMPLING_FACTOR,
        }
    }

    /// Length of the windowed sinc, in samples. Longer is sharper and slower.
    pub fn with_sinc_len(self, sinc_len: usize) -> Self {
        Self { sinc_len, ..self }
    }

    /// Relative cutoff frequency of the anti-aliasing filter, in (0, 1).
    pub fn with_f_cutoff(self, f_cutoff: f32) -> Self {
        Self { f_cutoff, ..self }
    }

    pub fn with_oversampling_factor(self, oversampling_factor: usize) -> Self {
        Self {
            oversampling_factor,
            ..self
        }
    }

    fn parameters(&self) -> SincInterpolationParameters {
        SincInterpolationParameters {
            sinc_len: self.sinc_len,
            f_cutoff: self.f_cutoff,
            interpolation: SincInterpolationType::Linear,
            oversampling_factor: self.oversampling_factor,
            window: WindowFunction::BlackmanHarris2,
        }
    }
}

#[cfg(feature = "resampler")]
impl Default for SincResampler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "resampler")]
impl Resample for SincResampler {
    fn resample(
        &self,
        samples: &[f32],
        from_rate: u32,
        to_rate: u32,
    ) -> Result<Vec<f32>, AudioIoError> {
        check_rates(from_rate, to_rate)?;
        let expected = resampled_len(samples.len(), from_rate, to_rate);
        if samples.is_empty() || expected == 0 {
            return Ok(vec![]);
        }

        // rubato emits nothing for chunks shorter than the filter, so short inputs are padded
        // with trailing silence up to a whole number of filter lengths.
        let chunk_size = samples.len().max(MIN_CHUNK_FILTERS * self.sinc_len);
        let mut resampler = SincFixedIn::<f32>::new(
            to_rate as f64 / from_rate as f64,
            1.0,
            self.parameters(),
            chunk_size,
            1,
        )?;
        let delay = resampler.output_delay();

        let mut output = if samples.len() < chunk_size {
            let mut padded = samples.to_vec();
            padded.resize(chunk_size, 0.0);
            resampler.process(&[padded], None)?.swap_remove(0)
        } else {
            resampler.process(&[samples], None)?.swap_remove(0)
        };

        // Flush the filter tail with silence until the delayed signal has been fully emitted.
        while output.len() < delay + expected {
            let tail = resampler
                .process_partial(None::<&[&[f32]]>, None)?
                .swap_remove(0);
            if tail.is_empty() {
                break;
            }
            output.extend_from_slice(&tail);
        }

        if output.len() < delay + expected {
            return Err(AudioIoError::ResampleLengthError {
                expected,
                actual: output.len().saturating_sub(delay),
            });
        }
        output.truncate(delay + expected);
        Ok(output.split_off(delay))
    }
}

/// Linear-interpolation resampler.
///
/// Cheap and deterministic, but not band-limited: downsampling will alias.
#[derive(Debug, Copy, Clone, Default)]
pub struct LinearResampler;

impl LinearResampler {
    pub fn new() -> Self {
        Self
    }
}

impl Resample for LinearResampler {
    fn resample(
        &self,
        samples: &[f32],
        from_rate: u32,
        to_rate: u32,
    ) -> Result<Vec<f32>, AudioIoError> {
        check_rates(from_rate, to_rate)?;
        if samples.is_empty() {
            return Ok(vec![]);
        }
        let out_len = resampled_len(samples.len(), from_rate, to_rate);
        let step = from_rate as f64 / to_rate as f64;
        Ok((0..out_len)
            .map(|i| lerp_sample(samples, i as f64 * step))
            .collect())
    }
}

fn lerp_sample(samples: &[f32], pos: f64) -> f32 {
    let last = samples.len() - 1;
    let idx0 = (pos.floor().max(0.0) as usize).min(last);
    let idx1 = (idx0 + 1).min(last);
    let frac = (pos - idx0 as f64).clamp(0.0, 1.0) as f32;
    let a = samples[idx0];
    a + (samples[idx1] - a) * frac
}
