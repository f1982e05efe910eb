//! Arrangement type.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::clip::Clip;
use crate::track::Track;

/// An arrangement: tempo, meter and ordered tracks.
///
/// This is the repository the mixing engine reads. During a mix pass the
/// engine works from an immutable snapshot, so the host may keep editing
/// the arrangement while playback runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Arrangement {
    /// Unique arrangement ID
    pub id: Uuid,
    /// Arrangement name
    pub name: String,
    /// Tempo in beats per minute
    pub bpm: f64,
    /// Subdivisions per bar
    pub beats_per_bar: i32,
    /// Tracks, in mixer order
    pub tracks: Vec<Track>,
}

impl Arrangement {
    /// Create a new empty arrangement at the default 120 bpm, 4/4.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            bpm: 120.0,
            beats_per_bar: 4,
            tracks: Vec::new(),
        }
    }

    /// Add a track and return a mutable reference to it.
    pub fn add_track(&mut self, name: impl Into<String>) -> &mut Track {
        self.tracks.push(Track::new(name));
        self.tracks.last_mut().expect("just pushed")
    }

    /// End of the latest clip across all tracks, in beats.
    pub fn latest_clip_end_beats(&self) -> f64 {
        self.tracks.iter().map(Track::end_beat).fold(0.0, f64::max)
    }

    /// Iterate every clip in every track.
    pub fn clips(&self) -> impl Iterator<Item = &Clip> {
        self.tracks.iter().flat_map(|t| t.clips.iter())
    }

    /// Iterate every clip mutably.
    pub fn clips_mut(&mut self) -> impl Iterator<Item = &mut Clip> {
        self.tracks.iter_mut().flat_map(|t| t.clips.iter_mut())
    }

    /// Total number of clips.
    pub fn clip_count(&self) -> usize {
        self.tracks.iter().map(|t| t.clips.len()).sum()
    }
}

impl Default for Arrangement {
    fn default() -> Self {
        Self::new("Untitled")
    }
}
