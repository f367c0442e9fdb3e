use std::path::Path;

use crate::audio::AudioSourceInfo;
use crate::audio::buffer::ChannelBuffer;
use crate::utils::errors::AudioIoError;

/// Probes and decodes audio files.
///
/// Implementations must be re-entrant: an [crate::audio::reader::Audio] may call into the same
/// backend from several threads at once.
pub trait AudioBackend {
    /// Returns the native sample rate and total number of frames of the file at `path`.
    /// Failures should be reported as [AudioIoError::ProbeError].
    fn probe(&self, path: &Path) -> Result<AudioSourceInfo, AudioIoError>;

    /// Decodes exactly `length` frames, starting at frame `offset`, at the file's native rate.
    ///
    /// The returned buffer is (native_channels, length). Failures, including running out of
    /// frames before `length` is reached, should be reported as [AudioIoError::DecodeError].
    fn decode(&self, path: &Path, offset: usize, length: usize)
    -> Result<ChannelBuffer, AudioIoError>;
}

/// Converts a single channel from one sample rate to another.
///
/// Implementations must be deterministic, and should produce
/// `round(samples.len() * to_rate / from_rate)` output samples.
pub trait Resample {
    fn resample(&self, samples: &[f32], from_rate: u32, to_rate: u32)
    -> Result<Vec<f32>, AudioIoError>;
}

impl<T: AudioBackend + ?Sized> AudioBackend for &T {
    fn probe(&self, path: &Path) -> Result<AudioSourceInfo, AudioIoError> {
        (**self).probe(path)
    }

    fn decode(
        &self,
        path: &Path,
        offset: usize,
        length: usize,
    ) -> Result<ChannelBuffer, AudioIoError> {
        (**self).decode(path, offset, length)
    }
}

impl<T: Resample + ?Sized> Resample for &T {
    fn resample(
        &self,
        samples: &[f32],
        from_rate: u32,
        to_rate: u32,
    ) -> Result<Vec<f32>, AudioIoError> {
        (**self).resample(samples, from_rate, to_rate)
    }
}
