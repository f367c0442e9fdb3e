//! Uniform audio loading with on-the-fly resampling and channel reduction.
//!
//! Sources are described by an [audio::descriptor::AudioDescriptor] (a path, a path with a
//! channel selector, or in-memory samples) and read through an [audio::reader::Audio], which
//! always returns (channel, time) samples at its configured sample rate.

pub mod audio;
pub mod utils;
