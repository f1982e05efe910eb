//! Track type.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::clip::Clip;

/// A track holding an ordered list of audio clips.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    /// Unique track ID
    pub id: Uuid,
    /// Track name
    pub name: String,
    /// Muted tracks contribute silence to the mix
    pub muted: bool,
    /// Clips in this track, in timeline order
    pub clips: Vec<Clip>,
}

impl Track {
    /// Create a new empty track.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            muted: false,
            clips: Vec::new(),
        }
    }

    /// Add a clip, keeping the list ordered by start beat.
    pub fn add_clip(&mut self, clip: Clip) {
        let at = self
            .clips
            .partition_point(|c| c.start_beat <= clip.start_beat);
        self.clips.insert(at, clip);
    }

    /// Find a clip by ID. Returns (index, &Clip).
    pub fn find_clip(&self, id: Uuid) -> Option<(usize, &Clip)> {
        self.clips.iter().enumerate().find(|(_, c)| c.id == id)
    }

    /// Find a clip mutably by ID.
    pub fn find_clip_mut(&mut self, id: Uuid) -> Option<&mut Clip> {
        self.clips.iter_mut().find(|c| c.id == id)
    }

    /// Remove a clip by ID. Returns the removed clip.
    pub fn remove_clip(&mut self, id: Uuid) -> Option<Clip> {
        let index = self.clips.iter().position(|c| c.id == id)?;
        Some(self.clips.remove(index))
    }

    /// End of the last clip on this track, in beats.
    pub fn end_beat(&self) -> f64 {
        self.clips.iter().map(Clip::end_beat).fold(0.0, f64::max)
    }
}
