use std::fs::File;
use std::path::Path;

use log::{debug, trace};
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{CODEC_TYPE_NULL, Decoder, DecoderOptions};
use symphonia::core::errors::Error;
use symphonia::core::formats::{FormatOptions, FormatReader, SeekMode, SeekTo, Track};
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::{Hint, ProbeResult};

use crate::audio::AudioSourceInfo;
use crate::audio::buffer::ChannelBuffer;
use crate::audio::traits::AudioBackend;
use crate::utils::errors::AudioIoError;

/// [AudioBackend] over the file formats supported by symphonia's default registry.
///
/// Holds no state: every call opens, probes and drops its own file handle. Files whose headers
/// carry no frame count are measured by scanning their packets, which reads the whole file.
#[derive(Debug, Copy, Clone, Default)]
pub struct SymphoniaBackend;

impl SymphoniaBackend {
    pub fn new() -> Self {
        Self
    }
}

fn get_audio_probe<P: AsRef<Path>>(path: P) -> Result<ProbeResult, Error> {
    let path = path.as_ref();
    let file = Box::new(File::open(path)?);
    let mss = MediaSourceStream::new(file, Default::default());
    let mut hint = Hint::new();
    if let Some(extension) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(extension);
    }
    let format_opts = FormatOptions::default();
    let metadata_opts = MetadataOptions::default();
    symphonia::default::get_probe().format(&hint, mss, &format_opts, &metadata_opts)
}

fn default_audio_track(format: &dyn FormatReader) -> Option<&Track> {
    format.default_track().or_else(|| {
        format
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
    })
}

// Streams without a frame count in their headers (e.g. MP3 without a Xing/Info frame) are
// measured by walking every packet of the track.
fn count_frames(track_id: u32, format: &mut dyn FormatReader) -> Result<usize, AudioIoError> {
    let mut frames = 0u64;
    loop {
        match format.next_packet() {
            Ok(packet) if packet.track_id() == track_id => frames += packet.dur(),
            Ok(_) => {}
            Err(Error::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => break,
            Err(e) => return Err(AudioIoError::ProbeError(Box::new(e))),
        }
    }
    debug!("Counted {} frames by scanning packets", frames);
    Ok(frames as usize)
}

fn probe_error(message: &str) -> AudioIoError {
    AudioIoError::ProbeError(message.into())
}

fn decode_error<E: Into<Box<dyn std::error::Error + Send + Sync>>>(e: E) -> AudioIoError {
    AudioIoError::DecodeError(e.into())
}

impl AudioBackend for SymphoniaBackend {
    fn probe(&self, path: &Path) -> Result<AudioSourceInfo, AudioIoError> {
        let probed = get_audio_probe(path).map_err(|e| AudioIoError::ProbeError(Box::new(e)))?;
        let mut format = probed.format;
        let track = default_audio_track(&*format)
            .ok_or_else(|| probe_error("Failed to get default audio track"))?;

        let track_id = track.id;
        let codec_params = &track.codec_params;
        let native_sample_rate = codec_params
            .sample_rate
            .ok_or_else(|| probe_error("Failed to get the sample rate"))?;
        let n_frames = codec_params.n_frames;
        let native_total_samples = match n_frames {
            Some(n_frames) => n_frames as usize,
            None => count_frames(track_id, &mut *format)?,
        };

        debug!(
            "Probed {}: {} frames @ {}Hz",
            path.display(),
            native_total_samples,
            native_sample_rate
        );
        Ok(AudioSourceInfo::new(native_sample_rate, native_total_samples))
    }

    fn decode(
        &self,
        path: &Path,
        offset: usize,
        length: usize,
    ) -> Result<ChannelBuffer, AudioIoError> {
        let probed = get_audio_probe(path).map_err(decode_error)?;
        let mut format = probed.format;
        let track = default_audio_track(&*format)
            .ok_or_else(|| decode_error("Failed to get default audio track"))?;
        let track_id = track.id;
        let num_channels = track.codec_params.channels.map_or(1, |c| c.count());

        if length == 0 {
            return Ok(ChannelBuffer::empty(num_channels));
        }

        let mut decoder = symphonia::default::get_codecs()
            .make(&track.codec_params, &DecoderOptions::default())
            .map_err(decode_error)?;

        if offset > 0 {
            let seeked = format
                .seek(
                    SeekMode::Accurate,
                    SeekTo::TimeStamp {
                        ts: offset as u64,
                        track_id,
                    },
                )
                .map_err(decode_error)?;
            trace!(
                "Seeked to {} (requested {})",
                seeked.actual_ts, seeked.required_ts
            );
            decoder.reset();
        }

        decode_window(track_id, decoder, format, offset, length)
    }
}

// Collects frames [offset, offset + length) into planar channels.
// Packet timestamps are assumed to be in frames, which holds for symphonia's audio codecs.
fn decode_window(
    track_id: u32,
    mut decoder: Box<dyn Decoder>,
    mut reader: Box<dyn FormatReader>,
    offset: usize,
    length: usize,
) -> Result<ChannelBuffer, AudioIoError> {
    let mut channels: Vec<Vec<f32>> = vec![];
    let mut sample_buf: Option<SampleBuffer<f32>> = None;
    let mut collected = 0usize;

    while collected < length {
        let packet = match reader.next_packet() {
            Ok(packet) => packet,
            Err(Error::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => break,
            Err(e) => return Err(decode_error(e)),
        };

        // Consume metadata; it has no bearing on the samples.
        while !reader.metadata().is_latest() {
            reader.metadata().pop();
        }

        if packet.track_id() != track_id {
            continue;
        }

        let packet_start = packet.ts() as usize;
        let position = offset + collected;
        let audio_buffer = decoder.decode(&packet).map_err(decode_error)?;
        let frames = audio_buffer.frames();
        if frames == 0 || packet_start + frames <= position {
            continue;
        }
        if packet_start > position {
            return Err(decode_error(format!(
                "Gap in decoded stream: expected frame {}, packet starts at {}",
                position, packet_start
            )));
        }

        let spec = *audio_buffer.spec();
        let packet_channels = spec.channels.count();
        if channels.is_empty() {
            channels = vec![Vec::with_capacity(length); packet_channels];
        } else if channels.len() != packet_channels {
            return Err(decode_error(format!(
                "Channel count changed mid-stream: {} -> {}",
                channels.len(),
                packet_channels
            )));
        }

        let capacity = audio_buffer.capacity();
        if sample_buf
            .as_ref()
            .is_none_or(|b| b.capacity() < capacity * packet_channels)
        {
            sample_buf = Some(SampleBuffer::<f32>::new(capacity as u64, spec));
        }
        let Some(buf) = sample_buf.as_mut() else {
            continue;
        };
        buf.copy_planar_ref(audio_buffer);
        let samples = buf.samples();

        let skip = position - packet_start;
        let take = (frames - skip).min(length - collected);
        for (c, channel) in channels.iter_mut().enumerate() {
            let start = c * frames + skip;
            channel.extend_from_slice(&samples[start..start + take]);
        }
        collected += take;
        trace!("Decoded packet @ {}: kept {} of {} frames", packet_start, take, frames);
    }

    if collected < length {
        return Err(decode_error(format!(
            "Expected {} frames from offset {}, decoded {}",
            length, offset, collected
        )));
    }
    Ok(ChannelBuffer::new(channels))
}
