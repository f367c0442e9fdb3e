use log::debug;

use crate::audio::AudioSourceInfo;
use crate::audio::buffer::ChannelBuffer;
use crate::audio::configs::AudioConfigs;
use crate::audio::descriptor::{AudioDescriptor, Source};
use crate::audio::loading::SymphoniaBackend;
use crate::audio::normalize;
use crate::audio::range::{self, NativeRange};
use crate::audio::remix::downmix_and_resample;
use crate::audio::resampler::DefaultResampler;
use crate::audio::traits::{AudioBackend, Resample};
use crate::utils::errors::AudioIoError;

/// Audio IO with on-the-fly resampling.
///
/// Every read returns a (channel, time) buffer at the configured sample rate, downmixed to a
/// single channel if `mono` is set, regardless of the source's native rate and layout.
///
/// An `Audio` holds no per-call state and can be shared between threads (so long as its backend
/// and resampler can). To read at a different rate, build another one.
///
/// ```no_run
/// use audio_io::audio::buffer::ChannelBuffer;
/// use audio_io::audio::descriptor::AudioDescriptor;
/// use audio_io::audio::reader::Audio;
///
/// let audio = Audio::new(16000, true)?;
/// let samples = audio.read_all(&AudioDescriptor::from("/path/to/audio.wav"))?;
///
/// // On-the-fly resampling of in-memory samples.
/// let two_seconds_stereo = ChannelBuffer::new(vec![vec![0.0; 2 * 44100]; 2]);
/// let samples = audio.read_all(&AudioDescriptor::in_memory(two_seconds_stereo, 44100))?;
/// assert_eq!(samples.num_frames(), 2 * 16000);
/// # Ok::<(), audio_io::utils::errors::AudioIoError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Audio<B = SymphoniaBackend, R = DefaultResampler> {
    configs: AudioConfigs,
    backend: B,
    resampler: R,
}

impl Audio {
    /// Builds a reader with the default symphonia backend and resampler.
    /// # Returns:
    /// * Ok(Audio) on success, Err(AudioIoError::ParameterError) if `sample_rate` is 0
    pub fn new(sample_rate: u32, mono: bool) -> Result<Self, AudioIoError> {
        AudioBuilder::new()
            .with_sample_rate(sample_rate)
            .with_mono(mono)
            .build()
    }

    /// Checks that a descriptor can be read. See [AudioDescriptor::is_valid].
    pub fn is_valid(descriptor: &AudioDescriptor) -> Result<bool, AudioIoError> {
        descriptor.is_valid()
    }

    /// Power-normalizes (channel, time) samples. See [normalize::rms_normalize].
    pub fn rms_normalize(samples: &ChannelBuffer) -> ChannelBuffer {
        normalize::rms_normalize(samples)
    }
}

impl<B: AudioBackend, R: Resample> Audio<B, R> {
    pub fn configs(&self) -> AudioConfigs {
        self.configs
    }

    pub fn sample_rate(&self) -> u32 {
        self.configs.sample_rate()
    }

    pub fn mono(&self) -> bool {
        self.configs.mono()
    }

    /// Native sample rate and length of the source. Files are probed on every call.
    pub fn info(&self, descriptor: &AudioDescriptor) -> Result<AudioSourceInfo, AudioIoError> {
        let resolved = descriptor.resolve()?;
        self.source_info(resolved.source)
    }

    /// Number of samples the source spans at the target sample rate.
    ///
    /// NOTE: this is not rounded and may be fractional; reads round their offsets and lengths
    /// instead, so the length of a full read can differ from this by a sample.
    pub fn get_num_samples(&self, descriptor: &AudioDescriptor) -> Result<f64, AudioIoError> {
        let info = self.info(descriptor)?;
        Ok(range::project_length(
            info.native_total_samples,
            info.native_sample_rate,
            self.sample_rate(),
        ))
    }

    /// Reads `num_samples` samples (at the target rate) starting from `sample_offset`,
    /// or up to the end of the source if `num_samples` is None.
    ///
    /// The requested window is translated to the native rate and must fit inside the source;
    /// it is never clamped.
    /// # Returns:
    /// * Ok(ChannelBuffer) of shape (channels, time) at the target sample rate,
    /// * Err(AudioIoError) on invalid descriptors, out-of-range windows or channels, or any
    ///   probe/decode/resample failure.
    pub fn read(
        &self,
        descriptor: &AudioDescriptor,
        sample_offset: usize,
        num_samples: Option<usize>,
    ) -> Result<ChannelBuffer, AudioIoError> {
        let resolved = descriptor.resolve()?;
        let info = self.source_info(resolved.source)?;
        let window = range::translate(&info, self.sample_rate(), sample_offset, num_samples)?;

        let native = self.read_native(resolved.source, window)?;
        let native = select_channel(native, resolved.channel)?;

        downmix_and_resample(
            native,
            info.native_sample_rate,
            self.sample_rate(),
            self.mono(),
            &self.resampler,
        )
    }

    /// Reads the whole source.
    pub fn read_all(&self, descriptor: &AudioDescriptor) -> Result<ChannelBuffer, AudioIoError> {
        self.read(descriptor, 0, None)
    }

    fn source_info(&self, source: Source<'_>) -> Result<AudioSourceInfo, AudioIoError> {
        match source {
            Source::File(path) => self.backend.probe(path),
            Source::Memory {
                samples,
                sample_rate,
            } => Ok(AudioSourceInfo::new(sample_rate, samples.num_frames())),
        }
    }

    fn read_native(
        &self,
        source: Source<'_>,
        window: NativeRange,
    ) -> Result<ChannelBuffer, AudioIoError> {
        match source {
            Source::File(path) => {
                let decoded = self.backend.decode(path, window.offset, window.length)?;
                // Short reads must never reach the caller as a truncated buffer.
                match decoded.shape() {
                    Some((_, frames)) if frames == window.length => Ok(decoded),
                    shape => Err(AudioIoError::DecodeError(
                        format!(
                            "Expected {} frames from {}, got shape {:?}",
                            window.length,
                            path.display(),
                            shape
                        )
                        .into(),
                    )),
                }
            }
            Source::Memory { samples, .. } => Ok(samples.slice_frames(window.offset..window.end())),
        }
    }
}

/// Reduces `samples` to the requested 1-based channel, if any.
fn select_channel(
    samples: ChannelBuffer,
    channel: Option<usize>,
) -> Result<ChannelBuffer, AudioIoError> {
    let Some(channel) = channel else {
        return Ok(samples);
    };
    let num_channels = samples.num_channels();
    if channel == 0 || channel > num_channels {
        return Err(AudioIoError::ChannelIndexError {
            channel,
            num_channels,
        });
    }
    debug!("Selecting channel {} of {}", channel, num_channels);
    Ok(samples.into_single_channel(channel - 1))
}

/// Builder for [Audio].
/// Backends and resamplers default to [SymphoniaBackend] and [DefaultResampler].
#[derive(Clone, Debug)]
pub struct AudioBuilder<B = SymphoniaBackend, R = DefaultResampler> {
    configs: AudioConfigs,
    backend: B,
    resampler: R,
}

impl AudioBuilder {
    pub fn new() -> Self {
        Self {
            configs: AudioConfigs::default(),
            backend: SymphoniaBackend::new(),
            resampler: DefaultResampler::default(),
        }
    }
}

impl Default for AudioBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: AudioBackend, R: Resample> AudioBuilder<B, R> {
    /// Sets the target sample rate (in Hz).
    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.configs = self.configs.with_sample_rate(sample_rate);
        self
    }

    /// Sets whether multi-channel audio is averaged down to mono.
    pub fn with_mono(mut self, mono: bool) -> Self {
        self.configs = self.configs.with_mono(mono);
        self
    }

    /// Replaces both the sample rate and the mono flag.
    pub fn with_configs(mut self, configs: AudioConfigs) -> Self {
        self.configs = configs;
        self
    }

    /// Sets the probe/decode backend used for path-backed descriptors.
    pub fn with_backend<B2: AudioBackend>(self, backend: B2) -> AudioBuilder<B2, R> {
        AudioBuilder {
            configs: self.configs,
            backend,
            resampler: self.resampler,
        }
    }

    /// Sets the resampler used when the native and target rates differ.
    pub fn with_resampler<R2: Resample>(self, resampler: R2) -> AudioBuilder<B, R2> {
        AudioBuilder {
            configs: self.configs,
            backend: self.backend,
            resampler,
        }
    }

    /// Builds an Audio<B, R> according to the given parameters
    /// # Returns:
    /// * Ok(Audio<B, R>) on successful build
    /// * Err(AudioIoError::ParameterError) if the target sample rate is 0
    pub fn build(self) -> Result<Audio<B, R>, AudioIoError> {
        self.configs.validate()?;
        Ok(Audio {
            configs: self.configs,
            backend: self.backend,
            resampler: self.resampler,
        })
    }
}
