// Added to the RMS before dividing, so silent channels stay finite.
pub const RMS_EPSILON: f32 = 1e-8;

pub const DEFAULT_SAMPLE_RATE: u32 = 16000;
pub const DEFAULT_MONO: bool = true;

// Sinc interpolation parameters for the band-limited resampler.
pub const SINC_LEN: usize = 256;
pub const SINC_F_CUTOFF: f32 = 0.95;
pub const SINC_OVERSAMPLING_FACTOR: usize = 256;
// Minimum rubato chunk, in sinc lengths. Shorter inputs are zero-padded up to it.
pub const MIN_CHUNK_FILTERS: usize = 4;
