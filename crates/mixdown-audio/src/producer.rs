//! Mixing producer loop.
//!
//! A dedicated background thread keeps the ring buffer filled ahead of real
//! time. Each iteration renders one fixed-size chunk of unclamped linear
//! superposition — sources may sum past ±1.0; the meters report whatever
//! amplitude results, and no limiter is applied.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use parking_lot::RwLock;
use tracing::{debug, trace};

use crate::ring_buffer::RingBuffer;
use crate::snapshot::MixSnapshot;

/// Interleaved samples rendered per loop iteration.
pub const CHUNK_SAMPLES: usize = 1024;

/// Sleep while the ring buffer is full.
const BACKPRESSURE_IDLE: Duration = Duration::from_millis(1);

/// Sleep once the mix position has passed the end of the arrangement.
const END_IDLE: Duration = Duration::from_millis(10);

/// Render one chunk of the mix at `mix_position` into `chunk`.
///
/// The chunk is zeroed, then every voice whose extent overlaps
/// `[mix_position, mix_position + chunk.len())` is added in. Reads past the
/// end of a voice's waveform are silently truncated — a cache shorter than
/// the clip's timeline extent just goes quiet early.
pub fn render_chunk(snapshot: &MixSnapshot, mix_position: usize, chunk: &mut [f32]) {
    chunk.fill(0.0);

    let chunk_start = mix_position;
    let chunk_end = mix_position + chunk.len();

    for voice in snapshot.voices() {
        if voice.end_index <= chunk_start || voice.start_index >= chunk_end {
            continue;
        }

        let overlap_start = voice.start_index.max(chunk_start);
        let overlap_end = voice.end_index.min(chunk_end);

        for index in overlap_start..overlap_end {
            let source_index = voice.source_offset_index + (index - voice.start_index);
            if source_index >= voice.waveform.len() {
                break;
            }
            chunk[index - chunk_start] += voice.waveform[source_index];
        }
    }
}

/// Spawn the producer thread.
///
/// The loop re-reads the shared snapshot every iteration so arrangement
/// edits swapped in by the transport take effect at the next chunk. It runs
/// until `cancel` is set: past the end of the arrangement it keeps feeding
/// silence so the hardware stream is never starved.
pub fn spawn(
    ring: Arc<RingBuffer>,
    snapshot: Arc<RwLock<Arc<MixSnapshot>>>,
    total_length_samples: usize,
    cancel: Arc<AtomicBool>,
) -> std::io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("mixdown-producer".into())
        .spawn(move || {
            let mut chunk = [0.0f32; CHUNK_SAMPLES];
            let mut mix_position = 0usize;

            debug!("producer started, total length {total_length_samples} samples");

            while !cancel.load(Ordering::Relaxed) {
                if ring.free_len() == 0 {
                    thread::sleep(BACKPRESSURE_IDLE);
                    continue;
                }

                if mix_position >= total_length_samples {
                    // Past the end: keep the stream alive with silence.
                    let _ = ring.push_slice(&[0.0]);
                    thread::sleep(END_IDLE);
                    continue;
                }

                let current = snapshot.read().clone();
                render_chunk(&current, mix_position, &mut chunk);

                let pushed = ring.push_slice(&chunk);
                if pushed < chunk.len() {
                    // Buffer filled mid-chunk; the tail is dropped and the
                    // next iteration continues from the advanced position.
                    trace!("chunk truncated: {pushed}/{} samples", chunk.len());
                }
                mix_position += chunk.len();
            }

            debug!("producer cancelled at position {mix_position}");
        })
}
