//! Clip waveform cache driver.
//!
//! Populates each clip's lazy waveform slot from disk and clears the lot
//! when the master sample rate changes. A clip that fails to load is left
//! empty and plays as silence; one bad file never stops playback.

use std::path::Path;
use std::sync::Arc;

use mixdown_timeline::{Arrangement, Clip};
use rayon::prelude::*;
use tracing::{debug, warn};

/// Ensure every clip with a source path has a waveform cached at
/// `sample_rate`. Tracks are processed in parallel; already-cached clips
/// are left alone.
pub fn ensure_all(arrangement: &mut Arrangement, sample_rate: u32) {
    arrangement.tracks.par_iter_mut().for_each(|track| {
        for clip in &mut track.clips {
            ensure_clip(clip, sample_rate);
        }
    });
}

/// Populate one clip's cache if needed.
pub fn ensure_clip(clip: &mut Clip, sample_rate: u32) {
    if clip.is_cached() || clip.path.is_empty() {
        return;
    }

    match mixdown_media::load_waveform(Path::new(&clip.path), sample_rate) {
        Ok(waveform) => {
            debug!(
                "cached {} ({} samples at {} Hz)",
                clip.path,
                waveform.len(),
                sample_rate
            );
            clip.waveform = Some(Arc::new(waveform));
        }
        Err(e) => {
            warn!("failed to load {}: {e}; clip will play as silence", clip.path);
            clip.waveform = None;
        }
    }
}

/// Drop every clip's cache. Called when the detected hardware sample rate
/// differs from the rate the caches were built at.
pub fn clear_all(arrangement: &mut Arrangement) {
    for clip in arrangement.clips_mut() {
        clip.waveform = None;
    }
}
