//! End-to-end mixing pipeline tests: arrangement -> snapshot -> producer
//! thread -> ring buffer -> metering consumer.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use mixdown_audio::{
    meter_channels, producer, MixSnapshot, RingBuffer, SampleFeed, CHUNK_SAMPLES,
};
use mixdown_timeline::{Arrangement, Clip};
use parking_lot::RwLock;

/// 120 bpm with a neutral meter so one beat is exactly half a second.
fn neutral_arrangement() -> Arrangement {
    let mut arr = Arrangement::new("test");
    arr.bpm = 120.0;
    arr.beats_per_bar = 1;
    arr
}

fn add_cached_clip(arr: &mut Arrangement, track: &str, value: f32, samples: usize) {
    let t = arr.add_track(track);
    let mut clip = Clip::new("clip", "clip.wav", 0.0, 4.0);
    clip.waveform = Some(Arc::new(vec![value; samples]));
    t.add_clip(clip);
}

fn wait_for(mut condition: impl FnMut() -> bool, timeout: Duration) -> bool {
    let start = std::time::Instant::now();
    while start.elapsed() < timeout {
        if condition() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(1));
    }
    condition()
}

#[test]
fn single_clip_streams_through_the_whole_pipeline() {
    let mut arr = neutral_arrangement();
    add_cached_clip(&mut arr, "A", 0.5, 88_200);

    let snapshot = Arc::new(MixSnapshot::capture(&arr, 44100).unwrap());
    let total = snapshot.total_length_samples();
    let ring = Arc::new(RingBuffer::with_capacity(16_384));
    let shared = Arc::new(RwLock::new(snapshot));
    let cancel = Arc::new(AtomicBool::new(false));

    let handle =
        producer::spawn(Arc::clone(&ring), shared, total, Arc::clone(&cancel)).unwrap();

    assert!(wait_for(|| ring.len() >= CHUNK_SAMPLES, Duration::from_secs(2)));

    let (bus, rx) = meter_channels();
    let feed = SampleFeed::new(Arc::clone(&ring), bus);

    let mut block = vec![0.0f32; CHUNK_SAMPLES];
    feed.fill(&mut block);
    assert!(block.iter().all(|&s| s == 0.5));

    // The block was metered: constant 0.5 on both channels ≈ -6.02 dB.
    let rms = rx.rms.try_recv().unwrap();
    assert!((rms[0] - (-6.0206)).abs() < 0.01);
    assert!((rms[1] - (-6.0206)).abs() < 0.01);

    cancel.store(true, Ordering::Relaxed);
    handle.join().unwrap();
}

#[test]
fn two_clips_superpose_linearly_through_the_pipeline() {
    let mut arr = neutral_arrangement();
    add_cached_clip(&mut arr, "A", 0.3, 88_200);
    add_cached_clip(&mut arr, "B", 0.4, 88_200);

    let snapshot = Arc::new(MixSnapshot::capture(&arr, 44100).unwrap());
    let total = snapshot.total_length_samples();
    let ring = Arc::new(RingBuffer::with_capacity(16_384));
    let shared = Arc::new(RwLock::new(snapshot));
    let cancel = Arc::new(AtomicBool::new(false));

    let handle =
        producer::spawn(Arc::clone(&ring), shared, total, Arc::clone(&cancel)).unwrap();
    assert!(wait_for(|| ring.len() >= 2048, Duration::from_secs(2)));

    let mut out = vec![0.0f32; 2048];
    assert_eq!(ring.pop_slice(&mut out), 2048);
    assert!(out.iter().all(|&s| (s - 0.7).abs() < 1e-6));

    cancel.store(true, Ordering::Relaxed);
    handle.join().unwrap();
}

#[test]
fn muted_track_contributes_silence() {
    let mut arr = neutral_arrangement();
    add_cached_clip(&mut arr, "A", 0.3, 88_200);
    add_cached_clip(&mut arr, "B", 0.4, 88_200);
    arr.tracks[1].muted = true;

    let snapshot = MixSnapshot::capture(&arr, 44100).unwrap();
    let mut chunk = vec![0.0f32; CHUNK_SAMPLES];
    mixdown_audio::render_chunk(&snapshot, 0, &mut chunk);
    assert!(chunk.iter().all(|&s| (s - 0.3).abs() < 1e-6));
}

#[test]
fn snapshot_swap_takes_effect_mid_stream() {
    let mut arr = neutral_arrangement();
    add_cached_clip(&mut arr, "A", 0.25, 882_000);

    let snapshot = Arc::new(MixSnapshot::capture(&arr, 44100).unwrap());
    let total = snapshot.total_length_samples();
    let ring = Arc::new(RingBuffer::with_capacity(4096));
    let shared = Arc::new(RwLock::new(snapshot));
    let cancel = Arc::new(AtomicBool::new(false));

    let handle = producer::spawn(
        Arc::clone(&ring),
        Arc::clone(&shared),
        total,
        Arc::clone(&cancel),
    )
    .unwrap();
    assert!(wait_for(|| ring.len() >= 1024, Duration::from_secs(2)));

    // Swap in an arrangement with a second, overlapping clip.
    add_cached_clip(&mut arr, "B", 0.5, 882_000);
    *shared.write() = Arc::new(MixSnapshot::capture(&arr, 44100).unwrap());

    // Drain until the mixed value changes over; later chunks must carry
    // both clips.
    let mut out = vec![0.0f32; 1024];
    let mut saw_combined = false;
    for _ in 0..200 {
        let read = ring.pop_slice(&mut out);
        if out[..read].iter().any(|&s| (s - 0.75).abs() < 1e-6) {
            saw_combined = true;
            break;
        }
        std::thread::sleep(Duration::from_millis(2));
    }
    assert!(saw_combined, "swapped snapshot never reached the stream");

    cancel.store(true, Ordering::Relaxed);
    handle.join().unwrap();
}

#[test]
fn past_the_end_the_stream_stays_alive_with_silence() {
    let arr = neutral_arrangement();
    // Empty arrangement: total length is the one-second tail only.
    let snapshot = Arc::new(MixSnapshot::capture(&arr, 44100).unwrap());
    let ring = Arc::new(RingBuffer::with_capacity(4096));
    let shared = Arc::new(RwLock::new(snapshot));
    let cancel = Arc::new(AtomicBool::new(false));

    // Start already past the end.
    let handle = producer::spawn(Arc::clone(&ring), shared, 0, Arc::clone(&cancel)).unwrap();

    assert!(wait_for(|| ring.len() >= 2, Duration::from_secs(2)));
    let mut out = vec![0.5f32; 2];
    ring.pop_slice(&mut out);
    assert_eq!(out, vec![0.0, 0.0]);
    assert!(!handle.is_finished());

    cancel.store(true, Ordering::Relaxed);
    handle.join().unwrap();
}
