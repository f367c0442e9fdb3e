//! Translation between target-rate sample windows and native-rate sample windows.
//!
//! Offsets and lengths are rounded (half-to-even) independently of one another, so the end of
//! a translated window can drift by one native sample from the rounded end of the requested
//! window. Length projection for whole sources is deliberately left unrounded.

use log::debug;

use crate::audio::AudioSourceInfo;
use crate::utils::errors::AudioIoError;

/// A window of samples at the source's native rate.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct NativeRange {
    pub offset: usize,
    pub length: usize,
}

impl NativeRange {
    /// One past the last sample. Ranges built by [translate] always fit in `usize`.
    pub fn end(&self) -> usize {
        self.offset.saturating_add(self.length)
    }
}

/// Number of samples a source of `native_total_samples` spans at `target_rate`.
/// The result is not rounded and may be fractional.
#[inline]
pub fn project_length(native_total_samples: usize, native_rate: u32, target_rate: u32) -> f64 {
    native_total_samples as f64 * target_rate as f64 / native_rate as f64
}

#[inline]
fn rescale(samples: usize, native_rate: u32, target_rate: u32) -> usize {
    (samples as f64 * native_rate as f64 / target_rate as f64).round_ties_even() as usize
}

/// Converts a target-rate offset into the nearest native-rate offset.
#[inline]
pub fn to_native_offset(target_offset: usize, native_rate: u32, target_rate: u32) -> usize {
    rescale(target_offset, native_rate, target_rate)
}

/// Converts a target-rate length into the nearest native-rate length.
#[inline]
pub fn to_native_length(target_length: usize, native_rate: u32, target_rate: u32) -> usize {
    rescale(target_length, native_rate, target_rate)
}

/// Translates a target-rate request into the native-rate window to read.
///
/// With no `target_length`, the window extends to the end of the source.
/// Fails with [AudioIoError::RangeOverflowError] if the window does not fit inside the source;
/// the window is never clamped.
pub fn translate(
    info: &AudioSourceInfo,
    target_rate: u32,
    target_offset: usize,
    target_length: Option<usize>,
) -> Result<NativeRange, AudioIoError> {
    let native_rate = info.native_sample_rate;
    let total = info.native_total_samples;

    let offset = to_native_offset(target_offset, native_rate, target_rate);
    let length = match target_length {
        Some(target_length) => to_native_length(target_length, native_rate, target_rate),
        None => total.checked_sub(offset).ok_or(AudioIoError::RangeOverflowError {
            offset,
            length: 0,
            total,
        })?,
    };

    if offset.checked_add(length).is_none_or(|end| end > total) {
        return Err(AudioIoError::RangeOverflowError {
            offset,
            length,
            total,
        });
    }

    debug!(
        "Translated target window ({}, {:?}) @ {}Hz to native window ({}, {}) @ {}Hz",
        target_offset, target_length, target_rate, offset, length, native_rate
    );
    Ok(NativeRange { offset, length })
}
