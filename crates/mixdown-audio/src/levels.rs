//! Per-channel level metering and UI notification channels.

use crossbeam_channel::{bounded, Receiver, Sender};
use mixdown_core::CHANNELS;

/// Meter floor in dB. Published levels never go below this.
pub const SILENCE_DB: f32 = -160.0;

/// How many pending UI updates each channel holds before new ones are
/// dropped. The UI polls faster than blocks arrive in practice; this is
/// slack, not a queue to drain reliably.
const METER_CHANNEL_DEPTH: usize = 8;

/// Per-channel levels measured over one output block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockLevels {
    /// RMS level per channel, in dB.
    pub rms: [f32; 2],
    /// Peak amplitude per channel, in dB.
    pub peak: [f32; 2],
}

impl BlockLevels {
    /// Both meters at the silence floor.
    pub const SILENCE: Self = Self {
        rms: [SILENCE_DB, SILENCE_DB],
        peak: [SILENCE_DB, SILENCE_DB],
    };
}

/// Convert a linear amplitude to dB with the engine's floor.
#[inline]
fn to_db(value: f64) -> f32 {
    let db = 20.0 * (value + 1e-9).log10();
    (db as f32).max(SILENCE_DB)
}

/// Measure RMS and peak per channel over an interleaved stereo block.
///
/// Assumes strictly alternating L/R samples; a trailing odd sample is
/// ignored.
pub fn measure_block(block: &[f32]) -> BlockLevels {
    let frames = block.len() / CHANNELS;
    if frames == 0 {
        return BlockLevels::SILENCE;
    }

    let mut sum_sq = [0.0f64; 2];
    let mut peak = [0.0f64; 2];
    for frame in block.chunks_exact(CHANNELS) {
        for ch in 0..CHANNELS {
            let s = frame[ch] as f64;
            sum_sq[ch] += s * s;
            peak[ch] = peak[ch].max(s.abs());
        }
    }

    BlockLevels {
        rms: [
            to_db((sum_sq[0] / frames as f64).sqrt()),
            to_db((sum_sq[1] / frames as f64).sqrt()),
        ],
        peak: [to_db(peak[0]), to_db(peak[1])],
    }
}

/// Sender half of the UI notification sink. Cloned into the audio-side
/// threads; every emit is `try_send` and never blocks, so a slow UI only
/// loses updates.
#[derive(Clone)]
pub struct MeterBus {
    rms_tx: Sender<[f32; 2]>,
    peak_tx: Sender<[f32; 2]>,
    playhead_tx: Sender<f64>,
}

impl MeterBus {
    /// Publish the levels of one output block.
    pub fn publish_levels(&self, levels: BlockLevels) {
        let _ = self.rms_tx.try_send(levels.rms);
        let _ = self.peak_tx.try_send(levels.peak);
    }

    /// Publish the current playhead position in beats.
    pub fn publish_playhead(&self, beats: f64) {
        let _ = self.playhead_tx.try_send(beats);
    }

    /// Reset the published meters to the silence floor.
    pub fn publish_silence(&self) {
        self.publish_levels(BlockLevels::SILENCE);
    }
}

/// Receiver half of the UI notification sink.
#[derive(Clone)]
pub struct MeterReceivers {
    /// Per-channel RMS updates, `[left_db, right_db]`.
    pub rms: Receiver<[f32; 2]>,
    /// Per-channel peak updates, `[left_db, right_db]`.
    pub peak: Receiver<[f32; 2]>,
    /// Playhead position updates, in beats.
    pub playhead: Receiver<f64>,
}

/// Create the engine↔UI notification channels.
pub fn meter_channels() -> (MeterBus, MeterReceivers) {
    let (rms_tx, rms_rx) = bounded(METER_CHANNEL_DEPTH);
    let (peak_tx, peak_rx) = bounded(METER_CHANNEL_DEPTH);
    let (playhead_tx, playhead_rx) = bounded(METER_CHANNEL_DEPTH);
    (
        MeterBus {
            rms_tx,
            peak_tx,
            playhead_tx,
        },
        MeterReceivers {
            rms: rms_rx,
            peak: peak_rx,
            playhead: playhead_rx,
        },
    )
}
