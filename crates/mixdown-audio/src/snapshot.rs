//! Immutable mix snapshot.
//!
//! The producer thread never reads the arrangement directly: the host may
//! edit tracks and clips while a mix is in flight. Instead the transport
//! captures an immutable snapshot (cheap — waveforms are shared via `Arc`)
//! and the producer picks up the current one each iteration.

use std::sync::Arc;

use mixdown_core::{Result, SampleMap, Tempo};
use mixdown_timeline::Arrangement;

/// One playable clip, with its timeline extent and source read offset
/// precomputed as interleaved sample indices.
#[derive(Debug, Clone)]
pub struct MixVoice {
    /// Global interleaved index where the clip starts.
    pub start_index: usize,
    /// Global interleaved index just past the clip's end.
    pub end_index: usize,
    /// Interleaved read offset into the source waveform.
    pub source_offset_index: usize,
    /// Decoded stereo waveform, shared with the clip's cache slot.
    pub waveform: Arc<Vec<f32>>,
}

/// An immutable, index-resolved view of an arrangement at one sample rate.
#[derive(Debug, Clone)]
pub struct MixSnapshot {
    map: SampleMap,
    voices: Vec<MixVoice>,
}

impl MixSnapshot {
    /// Capture the playable state of an arrangement.
    ///
    /// Validates the tempo configuration, then resolves every cached clip
    /// on every unmuted track into a [`MixVoice`]. Clips without a cache
    /// are skipped — they contribute silence.
    pub fn capture(arrangement: &Arrangement, sample_rate: u32) -> Result<Self> {
        let tempo = Tempo::new(arrangement.bpm, arrangement.beats_per_bar)?;
        let map = SampleMap::new(tempo, sample_rate);

        let mut voices = Vec::new();
        for track in &arrangement.tracks {
            if track.muted {
                continue;
            }
            for clip in &track.clips {
                let waveform = match &clip.waveform {
                    Some(w) if !w.is_empty() => Arc::clone(w),
                    _ => continue,
                };
                let start_index = map.beats_to_index(clip.start_beat);
                let length = map.beats_to_index(clip.duration_beats);
                voices.push(MixVoice {
                    start_index,
                    end_index: start_index + length,
                    source_offset_index: map.seconds_to_index(clip.source_offset_secs),
                    waveform,
                });
            }
        }

        Ok(Self { map, voices })
    }

    /// The sample map the snapshot was resolved with.
    #[inline]
    pub fn map(&self) -> &SampleMap {
        &self.map
    }

    /// The resolved voices.
    #[inline]
    pub fn voices(&self) -> &[MixVoice] {
        &self.voices
    }

    /// Total session length: the latest clip end plus one second of
    /// trailing silence. Computed once per session start.
    pub fn total_length_samples(&self) -> usize {
        let latest_end = self.voices.iter().map(|v| v.end_index).max().unwrap_or(0);
        latest_end + self.map.samples_per_second()
    }
}
