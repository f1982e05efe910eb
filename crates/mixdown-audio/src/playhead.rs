//! Playhead tracker.
//!
//! Independent polling loop: converts the hardware's cumulative
//! frames-played counter to a beat position and forwards it to the UI bus.
//! Runs only while the sink reports a playing stream and cancellation has
//! not been requested; on exit it drops the published meters back to the
//! silence floor.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use mixdown_core::SampleMap;
use tracing::debug;

use crate::clock::PlaybackClock;
use crate::levels::MeterBus;

/// Poll cadence — roughly one update per UI frame.
const POLL_INTERVAL: Duration = Duration::from_millis(16);

/// Spawn the playhead tracking thread.
pub fn spawn(
    clock: Arc<PlaybackClock>,
    map: SampleMap,
    bus: MeterBus,
    cancel: Arc<AtomicBool>,
) -> std::io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("mixdown-playhead".into())
        .spawn(move || {
            while !cancel.load(Ordering::Relaxed) && clock.is_playing() {
                let beats = map.frames_to_beats(clock.frames_played());
                bus.publish_playhead(beats);
                thread::sleep(POLL_INTERVAL);
            }

            debug!("playhead tracker stopped");
            bus.publish_silence();
        })
}
