use std::ops::Range;

/// A planar (channel, time) buffer of f32 samples.
///
/// The first axis is the channel, the second is time. This is the only layout produced by
/// this crate; interleaved audio must be converted with [ChannelBuffer::from_interleaved].
///
/// Construction does not enforce a rectangular shape, so that caller-supplied buffers can be
/// checked and rejected with a descriptive error (see [ChannelBuffer::shape]).
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ChannelBuffer {
    channels: Vec<Vec<f32>>,
}

impl ChannelBuffer {
    pub fn new(channels: Vec<Vec<f32>>) -> Self {
        Self { channels }
    }

    /// A buffer of `num_channels` empty channels.
    pub fn empty(num_channels: usize) -> Self {
        Self {
            channels: vec![vec![]; num_channels],
        }
    }

    /// A single-channel buffer.
    pub fn mono(samples: Vec<f32>) -> Self {
        Self {
            channels: vec![samples],
        }
    }

    /// De-interleaves `[L, R, L, R, ...]` into `[[L, L, ...], [R, R, ...]]`.
    /// Trailing samples that do not fill a whole frame are dropped.
    pub fn from_interleaved(samples: &[f32], num_channels: usize) -> Self {
        if num_channels == 0 {
            return Self::default();
        }
        let num_frames = samples.len() / num_channels;
        let mut channels = vec![Vec::with_capacity(num_frames); num_channels];
        for frame in samples.chunks_exact(num_channels) {
            for (channel, sample) in channels.iter_mut().zip(frame) {
                channel.push(*sample);
            }
        }
        Self { channels }
    }

    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    /// Time length of the buffer, taken from the first channel.
    pub fn num_frames(&self) -> usize {
        self.channels.first().map_or(0, |c| c.len())
    }

    /// Returns (channels, frames) if every channel has the same length and there is at least
    /// one channel; None otherwise.
    pub fn shape(&self) -> Option<(usize, usize)> {
        let frames = self.channels.first()?.len();
        self.channels
            .iter()
            .all(|c| c.len() == frames)
            .then_some((self.channels.len(), frames))
    }

    pub fn channel(&self, index: usize) -> Option<&[f32]> {
        self.channels.get(index).map(|c| c.as_slice())
    }

    pub fn channels(&self) -> &[Vec<f32>] {
        &self.channels
    }

    pub fn into_channels(self) -> Vec<Vec<f32>> {
        self.channels
    }

    pub fn is_empty(&self) -> bool {
        self.num_frames() == 0
    }

    /// Copies the given time range out of every channel.
    /// The caller is responsible for keeping the range within bounds.
    pub(crate) fn slice_frames(&self, range: Range<usize>) -> Self {
        Self {
            channels: self
                .channels
                .iter()
                .map(|c| c[range.clone()].to_vec())
                .collect(),
        }
    }

    /// Keeps a single channel (0-based).
    pub(crate) fn into_single_channel(mut self, index: usize) -> Self {
        let channel = self.channels.swap_remove(index);
        Self::mono(channel)
    }

    /// Per-frame arithmetic mean across all channels.
    pub fn mean_channel(&self) -> Vec<f32> {
        let num_channels = self.channels.len();
        if num_channels == 0 {
            return vec![];
        }
        let mut mean = vec![0f32; self.num_frames()];
        for channel in &self.channels {
            for (acc, sample) in mean.iter_mut().zip(channel) {
                *acc += *sample;
            }
        }
        let scale = num_channels as f32;
        mean.iter_mut().for_each(|s| *s /= scale);
        mean
    }
}

impl From<Vec<Vec<f32>>> for ChannelBuffer {
    fn from(channels: Vec<Vec<f32>>) -> Self {
        Self::new(channels)
    }
}
