use crate::audio::buffer::ChannelBuffer;
use crate::utils::constants::RMS_EPSILON;

/// Root-mean-square power of a single channel. Empty channels have zero power.
pub fn rms(channel: &[f32]) -> f32 {
    if channel.is_empty() {
        return 0.0;
    }
    let power = channel.iter().map(|s| s * s).sum::<f32>() / channel.len() as f32;
    power.sqrt()
}

/// Power-normalizes each channel of a (channel, time) buffer independently, scaling it by
/// `1 / (rms + 1e-8)`.
pub fn rms_normalize(samples: &ChannelBuffer) -> ChannelBuffer {
    ChannelBuffer::new(
        samples
            .channels()
            .iter()
            .map(|channel| {
                let scale = 1.0 / (rms(channel) + RMS_EPSILON);
                channel.iter().map(|s| s * scale).collect()
            })
            .collect(),
    )
}
