//! Transport and cache lifecycle integration tests.
//!
//! `AudioEngine::play` needs real output hardware, so these tests exercise
//! the device-free pieces it is built from: configuration rejection, cache
//! invalidation and the session-length computation.

use std::sync::Arc;

use mixdown_audio::{cache, AudioEngine, MixSnapshot, RING_CAPACITY};
use mixdown_core::MixdownError;
use mixdown_timeline::{Arrangement, Clip};

fn arrangement_with_cached_clips() -> Arrangement {
    let mut arr = Arrangement::new("session");
    for (name, start) in [("A", 0.0), ("B", 2.0)] {
        let track = arr.add_track(name);
        let mut clip = Clip::new(name, format!("{name}.wav"), start, 2.0);
        clip.waveform = Some(Arc::new(vec![0.1; 4096]));
        track.add_clip(clip);
    }
    arr
}

#[test]
fn ring_capacity_is_one_second_of_stereo() {
    assert_eq!(RING_CAPACITY, 176_400);
    assert_eq!(RING_CAPACITY, 44_100 * 2 * 2);
}

#[test]
fn rate_change_invalidates_every_cache() {
    let mut arr = arrangement_with_cached_clips();
    assert!(arr.clips().all(|c| c.is_cached()));

    // What the transport does when the detected rate differs from the
    // cached one.
    cache::clear_all(&mut arr);
    assert!(arr.clips().all(|c| !c.is_cached()));

    // Re-population goes back through the loader; the bogus paths fail
    // and are contained per clip.
    cache::ensure_all(&mut arr, 48000);
    assert!(arr.clips().all(|c| !c.is_cached()));
}

#[test]
fn session_length_is_fixed_by_the_starting_snapshot() {
    let mut arr = arrangement_with_cached_clips();
    arr.bpm = 120.0;
    arr.beats_per_bar = 1;

    let snapshot = MixSnapshot::capture(&arr, 44100).unwrap();
    let total = snapshot.total_length_samples();
    // Latest clip ends at beat 4 = 2 s = 176400 samples, plus the 1 s tail.
    assert_eq!(total, 176_400 + 88_200);

    // Editing the arrangement afterwards does not move the captured total.
    arr.tracks[0].clips[0].duration_beats = 100.0;
    assert_eq!(snapshot.total_length_samples(), total);
}

#[test]
fn invalid_config_is_rejected_without_a_session() {
    let mut engine = AudioEngine::new();
    let mut arr = arrangement_with_cached_clips();
    arr.beats_per_bar = 0;

    let err = engine.play(&mut arr).unwrap_err();
    assert!(matches!(err, MixdownError::Config(_)));
    assert!(!engine.is_playing());

    // The bad config never got far enough to disturb the caches.
    assert!(arr.clips().all(|c| c.is_cached()));
}

#[test]
fn stop_and_update_are_safe_when_idle() {
    let mut engine = AudioEngine::new();
    engine.stop();
    engine.stop();

    let mut arr = arrangement_with_cached_clips();
    assert!(engine.update_arrangement(&mut arr).is_ok());
    assert!(!engine.is_playing());
}

#[test]
fn meter_receivers_are_clonable_and_independent() {
    let engine = AudioEngine::new();
    let rx1 = engine.receivers();
    let rx2 = engine.receivers();
    // Both handles see the same (currently empty) streams.
    assert!(rx1.rms.try_recv().is_err());
    assert!(rx2.rms.try_recv().is_err());
}
