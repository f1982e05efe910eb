//! Metering and playhead integration tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use mixdown_audio::{
    meter_channels, playhead, PlaybackClock, RingBuffer, SampleFeed, SILENCE_DB,
};
use mixdown_core::{SampleMap, Tempo};

#[test]
fn underrun_yields_exact_count_of_silence_and_floored_meters() {
    let ring = Arc::new(RingBuffer::with_capacity(1024));
    let (bus, rx) = meter_channels();
    let feed = SampleFeed::new(ring, bus);

    let mut out = vec![1.0f32; 480];
    feed.fill(&mut out);

    assert_eq!(out.len(), 480);
    assert!(out.iter().all(|&s| s == 0.0));
    assert_eq!(rx.rms.try_recv().unwrap(), [SILENCE_DB, SILENCE_DB]);
    assert_eq!(rx.peak.try_recv().unwrap(), [SILENCE_DB, SILENCE_DB]);
}

#[test]
fn asymmetric_stereo_content_meters_per_channel() {
    let ring = Arc::new(RingBuffer::with_capacity(1024));
    // Left at full scale, right at half.
    let block: Vec<f32> = (0..512)
        .map(|i| if i % 2 == 0 { 1.0 } else { 0.5 })
        .collect();
    ring.push_slice(&block);

    let (bus, rx) = meter_channels();
    let feed = SampleFeed::new(ring, bus);
    let mut out = vec![0.0f32; 512];
    feed.fill(&mut out);

    let peak = rx.peak.try_recv().unwrap();
    assert!(peak[0].abs() < 0.01);
    assert!((peak[1] - (-6.0206)).abs() < 0.01);

    let rms = rx.rms.try_recv().unwrap();
    assert!(rms[0] > rms[1]);
}

#[test]
fn playhead_reports_beats_from_frames_played() {
    let clock = Arc::new(PlaybackClock::new());
    clock.set_playing(true);
    // Two beats at 120 bpm / 44.1 kHz with a neutral meter.
    clock.advance(44_100);

    let map = SampleMap::new(Tempo::new(120.0, 1).unwrap(), 44100);
    let (bus, rx) = meter_channels();
    let cancel = Arc::new(AtomicBool::new(false));
    let handle = playhead::spawn(Arc::clone(&clock), map, bus, Arc::clone(&cancel)).unwrap();

    let beats = rx
        .playhead
        .recv_timeout(Duration::from_secs(1))
        .expect("no playhead update");
    assert!((beats - 2.0).abs() < 1e-9);

    cancel.store(true, Ordering::Relaxed);
    handle.join().unwrap();
}

#[test]
fn playhead_beats_shrink_with_beats_per_bar() {
    // The tracker divides elapsed seconds by beats_per_bar before the
    // beat conversion, mirroring the mixer's index scaling.
    let clock = Arc::new(PlaybackClock::new());
    clock.set_playing(false);
    clock.advance(44_100);

    let neutral = SampleMap::new(Tempo::new(120.0, 1).unwrap(), 44100);
    let four = SampleMap::new(Tempo::new(120.0, 4).unwrap(), 44100);
    let frames = clock.frames_played();
    assert!((neutral.frames_to_beats(frames) - four.frames_to_beats(frames) * 4.0).abs() < 1e-9);
}

#[test]
fn playhead_exit_floors_the_meters() {
    let clock = Arc::new(PlaybackClock::new());
    clock.set_playing(false); // never enters the loop

    let map = SampleMap::new(Tempo::new(120.0, 1).unwrap(), 44100);
    let (bus, rx) = meter_channels();
    let handle = playhead::spawn(clock, map, bus, Arc::new(AtomicBool::new(false))).unwrap();
    handle.join().unwrap();

    assert_eq!(rx.rms.try_recv().unwrap(), [SILENCE_DB, SILENCE_DB]);
    assert_eq!(rx.peak.try_recv().unwrap(), [SILENCE_DB, SILENCE_DB]);
}
