//! Shared playback position clock.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Cumulative frames-played counter plus playing state, advanced by the
/// output callback and polled by the playhead tracker.
#[derive(Debug, Default)]
pub struct PlaybackClock {
    frames: AtomicU64,
    playing: AtomicBool,
}

impl PlaybackClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `frames` more frames delivered to the hardware.
    #[inline]
    pub fn advance(&self, frames: u64) {
        self.frames.fetch_add(frames, Ordering::Relaxed);
    }

    /// Cumulative frames played since the stream started.
    #[inline]
    pub fn frames_played(&self) -> u64 {
        self.frames.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn set_playing(&self, playing: bool) {
        self.playing.store(playing, Ordering::Release);
    }

    #[inline]
    pub fn is_playing(&self) -> bool {
        self.playing.load(Ordering::Acquire)
    }
}
