use thiserror::Error;

/// Boxed error returned by probe/decode collaborators. Kept opaque so that any backend
/// can report its own failures verbatim.
pub type BackendError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum AudioIoError {
    #[error("Shape Error: {0}")]
    ShapeError(String),
    #[error("Missing Rate Error: 'samples' must be provided with their sample rate")]
    MissingRateError,
    #[error("Invalid sample rate: {0}")]
    InvalidSampleRate(u32),
    #[error("Ambiguous Source Error: either an audio path or samples must be provided")]
    AmbiguousSourceError,
    #[error(
        "Range Overflow Error: offset {offset} + length {length} exceeds {total} available samples"
    )]
    RangeOverflowError {
        offset: usize,
        length: usize,
        total: usize,
    },
    // Channel is reported 1-based, the same way it was requested.
    #[error("Channel Index Error: channel {channel} requested, source has {num_channels}")]
    ChannelIndexError { channel: usize, num_channels: usize },
    #[error("Probe error: {0}")]
    ProbeError(BackendError),
    #[error("Decode error: {0}")]
    DecodeError(BackendError),
    #[error("Parameter Error {0}")]
    ParameterError(String),
    #[cfg(feature = "resampler")]
    #[error("Resample Length Error: expected {expected} samples, got {actual}")]
    ResampleLengthError { expected: usize, actual: usize },
    #[cfg(feature = "resampler")]
    #[error("ResampleError: {0}")]
    ResampleError(#[from] rubato::ResampleError),
    #[cfg(feature = "resampler")]
    #[error("ResamplerConstructionError: {0}")]
    ResamplerConstructionError(#[from] rubato::ResamplerConstructionError),
}
