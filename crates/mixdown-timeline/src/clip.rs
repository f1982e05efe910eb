//! Audio clip type.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Shortest clip the editor will produce.
pub const MIN_DURATION_BEATS: f64 = 0.1;

/// A time-positioned audio clip on a track.
///
/// `waveform`, when present, holds the source decoded to interleaved stereo
/// f32 at the engine's current master sample rate. The engine populates it
/// lazily and clears it whenever the master rate changes; a populated slot
/// is only valid for the rate it was built at. The `Arc` lets mix snapshots
/// share the data without copying it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Clip {
    /// Unique clip ID
    pub id: Uuid,
    /// Clip name (displayed in UI)
    pub name: String,
    /// Path to the source audio file
    pub path: String,
    /// Timeline position in beats
    pub start_beat: f64,
    /// Length in beats
    pub duration_beats: f64,
    /// Offset into the source, in seconds
    pub source_offset_secs: f64,
    /// Decoded waveform cache. Not project state; never persisted.
    #[serde(skip)]
    pub waveform: Option<Arc<Vec<f32>>>,
}

impl Clip {
    /// Create a new clip at the given beat position.
    pub fn new(
        name: impl Into<String>,
        path: impl Into<String>,
        start_beat: f64,
        duration_beats: f64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            path: path.into(),
            start_beat,
            duration_beats: duration_beats.max(MIN_DURATION_BEATS),
            source_offset_secs: 0.0,
            waveform: None,
        }
    }

    /// End of the clip on the timeline, in beats.
    #[inline]
    pub fn end_beat(&self) -> f64 {
        self.start_beat + self.duration_beats
    }

    /// Set the clip length, clamped to the editor minimum.
    pub fn set_duration_beats(&mut self, beats: f64) {
        self.duration_beats = beats.max(MIN_DURATION_BEATS);
    }

    /// Whether the decoded waveform cache is populated.
    #[inline]
    pub fn is_cached(&self) -> bool {
        self.waveform.as_ref().is_some_and(|w| !w.is_empty())
    }
}
