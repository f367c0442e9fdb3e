use log::debug;

use crate::audio::buffer::ChannelBuffer;
use crate::audio::traits::Resample;
use crate::utils::errors::AudioIoError;

/// Averages a multi-channel buffer down to a single channel.
/// Single-channel buffers are returned as-is.
pub fn downmix(samples: ChannelBuffer) -> ChannelBuffer {
    if samples.num_channels() > 1 {
        ChannelBuffer::mono(samples.mean_channel())
    } else {
        samples
    }
}

/// Downmixes (if `mono`) and then resamples a native-rate (channel, time) buffer to
/// `target_rate`.
///
/// Downmixing always happens first, so a mono read only resamples one channel. When the rates
/// are identical the buffer is returned untouched. Otherwise each channel is handed to the
/// resampler as a flat sequence and reassembled afterwards.
pub fn downmix_and_resample<R: Resample + ?Sized>(
    samples: ChannelBuffer,
    native_rate: u32,
    target_rate: u32,
    mono: bool,
    resampler: &R,
) -> Result<ChannelBuffer, AudioIoError> {
    let samples = if mono { downmix(samples) } else { samples };

    if native_rate == target_rate {
        return Ok(samples);
    }

    debug!(
        "Resampling {} channel(s) x {} frames from {}Hz to {}Hz",
        samples.num_channels(),
        samples.num_frames(),
        native_rate,
        target_rate
    );

    let channels = samples
        .channels()
        .iter()
        .map(|channel| resampler.resample(channel, native_rate, target_rate))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ChannelBuffer::new(channels))
}
