use std::path::{Path, PathBuf};

use crate::audio::buffer::ChannelBuffer;
use crate::utils::errors::AudioIoError;

/// Identifies an audio source to read from.
///
/// Channels are 1-based: `channel: Some(1)` selects the first channel.
#[derive(Debug, Clone, PartialEq)]
pub enum AudioDescriptor {
    /// A file on disk; all channels are read.
    Path { path: PathBuf },
    /// A file on disk, optionally restricted to a single channel.
    PathWithChannel {
        path: PathBuf,
        channel: Option<usize>,
    },
    /// Already-decoded (channel, time) samples at the given sample rate.
    InMemory {
        samples: ChannelBuffer,
        sample_rate: Option<u32>,
        channel: Option<usize>,
    },
}

impl AudioDescriptor {
    pub fn path<P: Into<PathBuf>>(path: P) -> Self {
        Self::Path { path: path.into() }
    }

    pub fn path_with_channel<P: Into<PathBuf>>(path: P, channel: Option<usize>) -> Self {
        Self::PathWithChannel {
            path: path.into(),
            channel,
        }
    }

    pub fn in_memory(samples: ChannelBuffer, sample_rate: u32) -> Self {
        Self::InMemory {
            samples,
            sample_rate: Some(sample_rate),
            channel: None,
        }
    }

    /// Restricts the descriptor to a single 1-based channel.
    /// A plain [AudioDescriptor::Path] becomes a [AudioDescriptor::PathWithChannel].
    pub fn with_channel(self, channel: Option<usize>) -> Self {
        match self {
            Self::Path { path } | Self::PathWithChannel { path, .. } => {
                Self::PathWithChannel { path, channel }
            }
            Self::InMemory {
                samples,
                sample_rate,
                ..
            } => Self::InMemory {
                samples,
                sample_rate,
                channel,
            },
        }
    }

    pub fn channel(&self) -> Option<usize> {
        match self {
            Self::Path { .. } => None,
            Self::PathWithChannel { channel, .. } | Self::InMemory { channel, .. } => *channel,
        }
    }

    /// The backing file, if any.
    pub fn file_path(&self) -> Option<&Path> {
        match self {
            Self::Path { path } | Self::PathWithChannel { path, .. } => Some(path),
            Self::InMemory { .. } => None,
        }
    }

    /// Checks that the descriptor can be read.
    ///
    /// Path-backed descriptors are always valid here; their rate and length are only known
    /// once probed. In-memory samples must be rectangular (channel, time) with no more channels
    /// than frames, and must carry a positive sample rate.
    ///
    /// This never touches the file system.
    pub fn is_valid(&self) -> Result<bool, AudioIoError> {
        let Self::InMemory {
            samples,
            sample_rate,
            ..
        } = self
        else {
            return Ok(true);
        };

        let (num_channels, num_frames) = samples.shape().ok_or_else(|| {
            AudioIoError::ShapeError("samples must be (channel, time)".to_owned())
        })?;

        // Transposed (time, channel) buffers almost always have more rows than columns.
        if num_channels > num_frames {
            return Err(AudioIoError::ShapeError(format!(
                "samples must be (channel, time), got {} channels for {} frames",
                num_channels, num_frames
            )));
        }

        match sample_rate {
            None => Err(AudioIoError::MissingRateError),
            Some(0) => Err(AudioIoError::InvalidSampleRate(0)),
            Some(_) => Ok(true),
        }
    }
}

/// Where the samples of a validated descriptor come from.
#[derive(Debug, Copy, Clone)]
pub(crate) enum Source<'a> {
    File(&'a Path),
    Memory {
        samples: &'a ChannelBuffer,
        sample_rate: u32,
    },
}

/// A validated descriptor, reduced to its source and 1-based channel selection.
#[derive(Debug, Copy, Clone)]
pub(crate) struct ResolvedSource<'a> {
    pub source: Source<'a>,
    pub channel: Option<usize>,
}

impl AudioDescriptor {
    /// Validates the descriptor and resolves it into its canonical form.
    pub(crate) fn resolve(&self) -> Result<ResolvedSource<'_>, AudioIoError> {
        self.is_valid()?;
        let source = match self {
            Self::Path { path } | Self::PathWithChannel { path, .. } => Source::File(path),
            Self::InMemory {
                samples,
                sample_rate,
                ..
            } => Source::Memory {
                samples,
                sample_rate: sample_rate.ok_or(AudioIoError::MissingRateError)?,
            },
        };
        Ok(ResolvedSource {
            source,
            channel: self.channel(),
        })
    }
}

impl From<&str> for AudioDescriptor {
    fn from(path: &str) -> Self {
        Self::path(path)
    }
}

impl From<String> for AudioDescriptor {
    fn from(path: String) -> Self {
        Self::path(path)
    }
}

impl From<&Path> for AudioDescriptor {
    fn from(path: &Path) -> Self {
        Self::path(path)
    }
}

impl From<PathBuf> for AudioDescriptor {
    fn from(path: PathBuf) -> Self {
        Self::path(path)
    }
}

/// Loosely-typed descriptor fields, as they arrive from a key/value source
/// (e.g. a deserialized manifest entry).
///
/// Converting into an [AudioDescriptor] picks the shape: `samples` wins over `audio`,
/// and a descriptor carrying neither is rejected.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DescriptorParts {
    pub audio: Option<PathBuf>,
    pub samples: Option<ChannelBuffer>,
    pub sample_rate: Option<u32>,
    pub channel: Option<usize>,
}

impl DescriptorParts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_audio<P: Into<PathBuf>>(self, audio: P) -> Self {
        Self {
            audio: Some(audio.into()),
            ..self
        }
    }

    pub fn with_samples(self, samples: ChannelBuffer) -> Self {
        Self {
            samples: Some(samples),
            ..self
        }
    }

    pub fn with_sample_rate(self, sample_rate: u32) -> Self {
        Self {
            sample_rate: Some(sample_rate),
            ..self
        }
    }

    pub fn with_channel(self, channel: usize) -> Self {
        Self {
            channel: Some(channel),
            ..self
        }
    }
}

impl TryFrom<DescriptorParts> for AudioDescriptor {
    type Error = AudioIoError;

    fn try_from(parts: DescriptorParts) -> Result<Self, Self::Error> {
        let DescriptorParts {
            audio,
            samples,
            sample_rate,
            channel,
        } = parts;

        match (samples, audio) {
            (Some(samples), _) => Ok(Self::InMemory {
                samples,
                sample_rate,
                channel,
            }),
            (None, Some(path)) => Ok(Self::PathWithChannel { path, channel }),
            (None, None) => Err(AudioIoError::AmbiguousSourceError),
        }
    }
}
