mod common;
#[cfg(test)]
mod reader_tests {
    use std::sync::atomic::Ordering;

    use rayon::prelude::*;

    use crate::common::{CountingResampler, StubBackend, sines};
    use audio_io::audio::buffer::ChannelBuffer;
    use audio_io::audio::descriptor::{AudioDescriptor, DescriptorParts};
    use audio_io::audio::range::project_length;
    use audio_io::audio::reader::{Audio, AudioBuilder};
    use audio_io::audio::resampler::LinearResampler;
    use audio_io::utils::errors::AudioIoError;

    fn reader<'a>(
        backend: &'a StubBackend,
        resampler: &'a CountingResampler,
        sample_rate: u32,
        mono: bool,
    ) -> Audio<&'a StubBackend, &'a CountingResampler> {
        AudioBuilder::new()
            .with_sample_rate(sample_rate)
            .with_mono(mono)
            .with_backend(backend)
            .with_resampler(resampler)
            .build()
            .expect("Audio expected to build with a positive sample rate.")
    }

    // Malformed in-memory descriptors must fail before any collaborator is touched.
    #[test]
    fn test_validation_precedes_io() {
        let backend = StubBackend::new(sines(2, 1000, 1000), 1000);
        let resampler = CountingResampler::default();
        let audio = reader(&backend, &resampler, 500, true);

        let transposed =
            AudioDescriptor::in_memory(ChannelBuffer::new(vec![vec![0.0; 2]; 10]), 1000);
        let missing_rate = AudioDescriptor::InMemory {
            samples: sines(2, 1000, 1000),
            sample_rate: None,
            channel: None,
        };

        assert!(matches!(
            audio.read_all(&transposed),
            Err(AudioIoError::ShapeError(_))
        ));
        assert!(matches!(
            audio.get_num_samples(&missing_rate),
            Err(AudioIoError::MissingRateError)
        ));
        assert!(matches!(
            audio.read(&missing_rate, 0, Some(10)),
            Err(AudioIoError::MissingRateError)
        ));

        assert_eq!(backend.probe_count(), 0);
        assert_eq!(backend.decode_count(), 0);
        assert_eq!(resampler.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_ambiguous_parts() {
        let result = AudioDescriptor::try_from(DescriptorParts::new().with_channel(1));
        assert!(matches!(result, Err(AudioIoError::AmbiguousSourceError)));
    }

    #[test]
    fn test_path_read_decodes_translated_window() {
        let backend = StubBackend::new(sines(2, 44100, 44100), 44100);
        let resampler = CountingResampler::default();
        let audio = reader(&backend, &resampler, 16000, true);

        let samples = audio
            .read(&AudioDescriptor::from("clip.wav"), 1600, Some(3200))
            .expect("Read expected to succeed inside the source.");

        // 1600 @ 16kHz = 4410 @ 44.1kHz; 3200 @ 16kHz = 8820 @ 44.1kHz
        assert_eq!(*backend.windows.lock().unwrap(), vec![(4410, 8820)]);
        assert_eq!(backend.probe_count(), 1);
        assert_eq!(samples.shape(), Some((1, 3200)));
        // Downmixed first: only one channel goes through the resampler.
        assert_eq!(resampler.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_overflow_never_decodes() {
        let backend = StubBackend::new(sines(1, 1000, 1000), 1000);
        let resampler = CountingResampler::default();
        let audio = reader(&backend, &resampler, 1000, true);

        let result = audio.read(&AudioDescriptor::from("clip.wav"), 900, Some(101));
        assert!(matches!(
            result,
            Err(AudioIoError::RangeOverflowError {
                offset: 900,
                length: 101,
                total: 1000
            })
        ));
        assert_eq!(backend.decode_count(), 0);
    }

    #[test]
    fn test_probe_error_propagates() {
        let backend = StubBackend::failing();
        let resampler = CountingResampler::default();
        let audio = reader(&backend, &resampler, 16000, true);

        let err = audio
            .get_num_samples(&AudioDescriptor::from("missing.wav"))
            .unwrap_err();
        assert!(matches!(err, AudioIoError::ProbeError(_)));
        assert_eq!(err.to_string(), "Probe error: missing.wav not found");
        assert_eq!(backend.decode_count(), 0);
    }

    #[test]
    fn test_path_channel_selection() {
        let source = sines(3, 500, 1000);
        let backend = StubBackend::new(source.clone(), 1000);
        let resampler = CountingResampler::default();
        let audio = reader(&backend, &resampler, 1000, false);

        let descriptor = AudioDescriptor::path_with_channel("clip.wav", Some(2));
        let samples = audio.read(&descriptor, 100, Some(50)).unwrap();
        assert_eq!(samples.shape(), Some((1, 50)));
        assert_eq!(samples.channels()[0], source.channels()[1][100..150].to_vec());
        // Same rate: resampling skipped.
        assert_eq!(resampler.calls.load(Ordering::SeqCst), 0);

        let descriptor = AudioDescriptor::path_with_channel("clip.wav", Some(4));
        assert!(matches!(
            audio.read_all(&descriptor),
            Err(AudioIoError::ChannelIndexError {
                channel: 4,
                num_channels: 3
            })
        ));
    }

    #[test]
    fn test_stereo_is_kept_when_not_mono() {
        let backend = StubBackend::new(sines(2, 1000, 1000), 1000);
        let resampler = CountingResampler::default();
        let audio = reader(&backend, &resampler, 500, false);

        let samples = audio.read_all(&AudioDescriptor::from("clip.wav")).unwrap();
        assert_eq!(samples.shape(), Some((2, 500)));
        assert_eq!(resampler.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_downmix_matches_mean() {
        let a: Vec<f32> = (0..64).map(|t| t as f32).collect();
        let b: Vec<f32> = (0..64).map(|t| -2.0 * t as f32 + 1.0).collect();
        let audio = Audio::new(8000, true).unwrap();
        let samples = audio
            .read_all(&AudioDescriptor::in_memory(
                ChannelBuffer::new(vec![a.clone(), b.clone()]),
                8000,
            ))
            .unwrap();
        let expected: Vec<f32> = a.iter().zip(&b).map(|(x, y)| (x + y) / 2.0).collect();
        assert_eq!(samples.channels(), &[expected]);
    }

    // Output length tracks the rounded native window, and stays within a sample of the
    // unrounded projection.
    #[test]
    fn test_offset_length_invariant() {
        let native_rate = 44100;
        let total = 44100;
        let source = sines(1, total, native_rate);
        for target_rate in [8000u32, 16000, 22050, 48000] {
            let audio = AudioBuilder::new()
                .with_sample_rate(target_rate)
                .with_resampler(LinearResampler)
                .build()
                .unwrap();
            let descriptor = AudioDescriptor::in_memory(source.clone(), native_rate);
            let target_total = project_length(total, native_rate, target_rate).floor() as usize;

            for (offset, length) in [(0, 1), (3, 97), (101, 1000), (0, target_total / 2)] {
                let samples = audio.read(&descriptor, offset, Some(length)).unwrap();
                let frames = samples.num_frames() as f64;
                let projected = project_length(
                    (length as f64 * native_rate as f64 / target_rate as f64).round() as usize,
                    native_rate,
                    target_rate,
                );
                assert!(
                    (frames - projected).abs() <= 1.0,
                    "{}Hz: ({}, {}) gave {} frames, projected {}",
                    target_rate,
                    offset,
                    length,
                    frames,
                    projected
                );
                assert!((frames - length as f64).abs() <= 1.0);
            }
        }
    }

    #[test]
    fn test_shared_reader_across_threads() {
        let backend = StubBackend::new(sines(2, 8000, 8000), 8000);
        let audio = AudioBuilder::new()
            .with_sample_rate(16000)
            .with_backend(&backend)
            .with_resampler(LinearResampler)
            .build()
            .unwrap();
        let expected = audio.read(&AudioDescriptor::from("clip.wav"), 0, Some(1600)).unwrap();

        let results: Vec<ChannelBuffer> = (0..16)
            .into_par_iter()
            .map(|_| {
                audio
                    .read(&AudioDescriptor::from("clip.wav"), 0, Some(1600))
                    .expect("Concurrent reads expected to succeed.")
            })
            .collect();

        assert!(results.iter().all(|r| *r == expected));
        assert_eq!(backend.probe_count(), 17);
        assert_eq!(backend.decode_count(), 17);
    }

    #[test]
    fn test_in_memory_read_is_a_copy() {
        let audio = Audio::new(1000, false).unwrap();
        let mut descriptor = AudioDescriptor::in_memory(ChannelBuffer::mono(vec![1.0; 10]), 1000);
        let samples = audio.read_all(&descriptor).unwrap();
        if let AudioDescriptor::InMemory { samples: source, .. } = &mut descriptor {
            *source = ChannelBuffer::mono(vec![0.0; 10]);
        }
        assert_eq!(samples, ChannelBuffer::mono(vec![1.0; 10]));
    }

    #[test]
    fn test_huge_offset_is_an_overflow() {
        let audio = Audio::new(1000, true).unwrap();
        let descriptor = AudioDescriptor::in_memory(ChannelBuffer::mono(vec![0.5; 10]), 1000);
        assert!(matches!(
            audio.read(&descriptor, usize::MAX, Some(1)),
            Err(AudioIoError::RangeOverflowError { total: 10, .. })
        ));
    }
}
