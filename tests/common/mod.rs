use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use hound::{SampleFormat, WavSpec, WavWriter};

use audio_io::audio::AudioSourceInfo;
use audio_io::audio::buffer::ChannelBuffer;
use audio_io::audio::traits::{AudioBackend, Resample};
use audio_io::utils::errors::AudioIoError;

// NOTE: this is not actually dead code; each test binary only uses part of this module.

/// Stand-in for a file backend: every path resolves to the same in-memory source.
/// Counts calls and records the windows requested from decode.
#[allow(dead_code)]
pub struct StubBackend {
    pub samples: ChannelBuffer,
    pub sample_rate: u32,
    pub fail_probe: bool,
    pub probes: AtomicUsize,
    pub decodes: AtomicUsize,
    pub windows: Mutex<Vec<(usize, usize)>>,
}

#[allow(dead_code)]
impl StubBackend {
    pub fn new(samples: ChannelBuffer, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
            fail_probe: false,
            probes: AtomicUsize::new(0),
            decodes: AtomicUsize::new(0),
            windows: Mutex::new(vec![]),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_probe: true,
            ..Self::new(ChannelBuffer::mono(vec![]), 16000)
        }
    }

    pub fn probe_count(&self) -> usize {
        self.probes.load(Ordering::SeqCst)
    }

    pub fn decode_count(&self) -> usize {
        self.decodes.load(Ordering::SeqCst)
    }
}

impl AudioBackend for StubBackend {
    fn probe(&self, path: &Path) -> Result<AudioSourceInfo, AudioIoError> {
        self.probes.fetch_add(1, Ordering::SeqCst);
        if self.fail_probe {
            return Err(AudioIoError::ProbeError(Box::new(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} not found", path.display()),
            ))));
        }
        Ok(AudioSourceInfo::new(
            self.sample_rate,
            self.samples.num_frames(),
        ))
    }

    fn decode(
        &self,
        _path: &Path,
        offset: usize,
        length: usize,
    ) -> Result<ChannelBuffer, AudioIoError> {
        self.decodes.fetch_add(1, Ordering::SeqCst);
        self.windows
            .lock()
            .expect("Windows mutex expected not to be poisoned")
            .push((offset, length));
        Ok(ChannelBuffer::new(
            self.samples
                .channels()
                .iter()
                .map(|c| c[offset..offset + length].to_vec())
                .collect(),
        ))
    }
}

/// Resampler that counts calls and delegates to a linear resampler.
#[allow(dead_code)]
#[derive(Default)]
pub struct CountingResampler {
    pub calls: AtomicUsize,
}

impl Resample for CountingResampler {
    fn resample(
        &self,
        samples: &[f32],
        from_rate: u32,
        to_rate: u32,
    ) -> Result<Vec<f32>, AudioIoError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        audio_io::audio::resampler::LinearResampler.resample(samples, from_rate, to_rate)
    }
}

/// A (channel, time) buffer where each channel is a sine of a different frequency.
#[allow(dead_code)]
pub fn sines(num_channels: usize, num_frames: usize, sample_rate: u32) -> ChannelBuffer {
    ChannelBuffer::new(
        (0..num_channels)
            .map(|c| {
                let freq = 220.0 * (c + 1) as f32;
                (0..num_frames)
                    .map(|t| {
                        0.5 * (2.0 * std::f32::consts::PI * freq * t as f32 / sample_rate as f32)
                            .sin()
                    })
                    .collect()
            })
            .collect(),
    )
}

/// A unique path in the system temp directory.
#[allow(dead_code)]
pub fn temp_wav_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("audio_io_{}_{}.wav", std::process::id(), name))
}

/// Writes a (channel, time) buffer to a 32-bit float wav file.
#[allow(dead_code)]
pub fn write_wav(path: &Path, samples: &ChannelBuffer, sample_rate: u32) {
    let spec = WavSpec {
        channels: samples.num_channels() as u16,
        sample_rate,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };
    let mut writer = WavWriter::create(path, spec).expect("Failed to create wav writer");
    for t in 0..samples.num_frames() {
        for channel in samples.channels() {
            writer
                .write_sample(channel[t])
                .expect("Failed to write sample");
        }
    }
    writer.finalize().expect("Failed to finalize write");
}
