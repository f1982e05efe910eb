//! Musical time and sample-index conversion.
//!
//! All positions inside the engine are indices into an interleaved stereo
//! f32 stream. Every conversion from beats or seconds floors to a whole
//! sample and then forces the index even, so reads and writes always land
//! on a left-channel sample (frame alignment).

use serde::{Deserialize, Serialize};

use crate::error::{MixdownError, Result};

/// Number of interleaved output channels. The engine is stereo throughout;
/// mono sources are duplicated at load time.
pub const CHANNELS: usize = 2;

/// Tempo and meter of an arrangement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tempo {
    /// Beats per minute.
    pub bpm: f64,
    /// Subdivisions per bar. Besides its musical meaning this value scales
    /// the beats→samples conversion (see [`SampleMap::beats_to_index`]).
    pub beats_per_bar: i32,
}

impl Tempo {
    /// Create a validated tempo. Rejects non-finite or non-positive values
    /// so the mixer never divides by zero.
    pub fn new(bpm: f64, beats_per_bar: i32) -> Result<Self> {
        if !bpm.is_finite() || bpm <= 0.0 {
            return Err(MixdownError::Config(format!("invalid bpm: {bpm}")));
        }
        if beats_per_bar <= 0 {
            return Err(MixdownError::Config(format!(
                "invalid beats per bar: {beats_per_bar}"
            )));
        }
        Ok(Self { bpm, beats_per_bar })
    }

    /// Duration of one beat in seconds.
    #[inline]
    pub fn seconds_per_beat(&self) -> f64 {
        60.0 / self.bpm
    }
}

/// Sample-rate-bound conversions between musical time and interleaved
/// sample indices.
///
/// The beats→samples direction multiplies by `beats_per_bar` and the
/// playhead direction divides elapsed seconds by it again before the
/// seconds→beats step. That scaling reproduces the engine's observed
/// time mapping; treat it as a parameter to validate against intended
/// musical semantics, not a conversion to extend.
#[derive(Debug, Clone, Copy)]
pub struct SampleMap {
    tempo: Tempo,
    sample_rate: u32,
}

impl SampleMap {
    /// Create a map for the given tempo at the given master sample rate.
    pub fn new(tempo: Tempo, sample_rate: u32) -> Self {
        Self { tempo, sample_rate }
    }

    /// The master sample rate this map was built for.
    #[inline]
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    #[inline]
    pub fn tempo(&self) -> Tempo {
        self.tempo
    }

    /// Interleaved samples in one second of output.
    #[inline]
    pub fn samples_per_second(&self) -> usize {
        self.sample_rate as usize * CHANNELS
    }

    /// Force an interleaved index onto a frame boundary.
    #[inline]
    pub fn align(index: usize) -> usize {
        index - index % CHANNELS
    }

    /// Convert a beat position (or beat count) to an interleaved sample
    /// index (or span). Floors to whole samples, scales by `beats_per_bar`
    /// and channel count, and frame-aligns the result.
    pub fn beats_to_index(&self, beats: f64) -> usize {
        let seconds = beats / self.tempo.bpm * 60.0;
        let samples = (seconds * self.sample_rate as f64).floor().max(0.0) as usize;
        Self::align(samples * self.tempo.beats_per_bar as usize * CHANNELS)
    }

    /// Convert a source offset in seconds to an interleaved sample index.
    /// No `beats_per_bar` factor here: the offset addresses the source
    /// waveform, not the timeline.
    pub fn seconds_to_index(&self, seconds: f64) -> usize {
        let samples = (seconds * self.sample_rate as f64).floor().max(0.0) as usize;
        Self::align(samples * CHANNELS)
    }

    /// Convert a cumulative frames-played counter to a beat position for
    /// the playhead.
    pub fn frames_to_beats(&self, frames: u64) -> f64 {
        let seconds =
            frames as f64 / self.sample_rate as f64 / self.tempo.beats_per_bar as f64;
        seconds / self.tempo.seconds_per_beat()
    }
}
