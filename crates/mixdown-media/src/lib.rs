//! Mixdown Media - Audio file loading
//!
//! This crate turns an audio file on disk into the one shape the engine
//! mixes: interleaved stereo f32 at the master sample rate. Decoding goes
//! through Symphonia, sample-rate conversion through rubato.

pub mod loader;
pub mod resample;

pub use loader::load_waveform;
pub use resample::resample_stereo;
