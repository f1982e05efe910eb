//! Transport controller.
//!
//! Owns the playback session lifecycle: sample-rate detection and cache
//! invalidation, total-length computation, pre-buffering, thread and stream
//! startup, and cooperative teardown. Exactly one session is active at a
//! time; starting playback tears down any previous session first.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use mixdown_core::{Result, SampleMap, Tempo};
use mixdown_timeline::Arrangement;
use parking_lot::RwLock;
use tracing::{info, warn};

use crate::cache;
use crate::feed::SampleFeed;
use crate::levels::{meter_channels, MeterBus, MeterReceivers};
use crate::output::{self, OutputSink};
use crate::playhead;
use crate::producer;
use crate::ring_buffer::RingBuffer;
use crate::snapshot::MixSnapshot;

/// Ring buffer capacity in samples — about one second of stereo at
/// 44.1 kHz, the engine's latency headroom.
pub const RING_CAPACITY: usize = 176_400;

/// Pre-buffer gate: poll every 10 ms, give up after 100 attempts (~1 s)
/// and start degraded rather than fail.
const PREBUFFER_POLL: Duration = Duration::from_millis(10);
const PREBUFFER_ATTEMPTS: usize = 100;

/// Grace period for the background loops to observe cancellation.
const STOP_GRACE: Duration = Duration::from_millis(50);

/// A live playback session.
struct Session {
    ring: Arc<RingBuffer>,
    snapshot: Arc<RwLock<Arc<MixSnapshot>>>,
    cancel: Arc<AtomicBool>,
    producer: JoinHandle<()>,
    playhead: JoinHandle<()>,
    sink: OutputSink,
    sample_rate: u32,
}

/// The mixing/playback engine.
///
/// Create one per application; drive it with [`play`](Self::play) and
/// [`stop`](Self::stop). Level and playhead updates arrive on the
/// receivers returned by [`receivers`](Self::receivers).
pub struct AudioEngine {
    cached_sample_rate: u32,
    bus: MeterBus,
    receivers: MeterReceivers,
    session: Option<Session>,
}

impl AudioEngine {
    pub fn new() -> Self {
        let (bus, receivers) = meter_channels();
        Self {
            cached_sample_rate: 44100,
            bus,
            receivers,
            session: None,
        }
    }

    /// Start playing the arrangement from the beginning.
    ///
    /// Detects the hardware sample rate, rebuilds stale clip caches, tears
    /// down any running session, pre-buffers, and starts the mix thread,
    /// the output stream and the playhead tracker. The total session
    /// length is fixed here and not recomputed mid-session.
    pub fn play(&mut self, arrangement: &mut Arrangement) -> Result<()> {
        // Reject bad configuration before touching the device or spawning
        // anything.
        let tempo = Tempo::new(arrangement.bpm, arrangement.beats_per_bar)?;

        let sample_rate = output::detect_sample_rate()?;
        if sample_rate != self.cached_sample_rate {
            info!(
                "sample rate changed {} -> {} Hz, clearing clip caches",
                self.cached_sample_rate, sample_rate
            );
            cache::clear_all(arrangement);
            self.cached_sample_rate = sample_rate;
        }
        cache::ensure_all(arrangement, sample_rate);

        self.stop();

        let snapshot = Arc::new(MixSnapshot::capture(arrangement, sample_rate)?);
        let total_length_samples = snapshot.total_length_samples();
        let ring = Arc::new(RingBuffer::with_capacity(RING_CAPACITY));
        let shared = Arc::new(RwLock::new(Arc::clone(&snapshot)));
        let cancel = Arc::new(AtomicBool::new(false));

        info!(
            "starting session: {} voices, {} samples total, {} Hz",
            snapshot.voices().len(),
            total_length_samples,
            sample_rate
        );

        let producer = producer::spawn(
            Arc::clone(&ring),
            Arc::clone(&shared),
            total_length_samples,
            Arc::clone(&cancel),
        )
        .map_err(|e| mixdown_core::MixdownError::Audio(format!("failed to spawn mix thread: {e}")))?;

        if !wait_until_half_full(&ring, PREBUFFER_ATTEMPTS, PREBUFFER_POLL) {
            warn!("pre-buffer budget exhausted, starting degraded");
        }

        let feed = SampleFeed::new(Arc::clone(&ring), self.bus.clone());
        let sink = match OutputSink::start(feed, sample_rate) {
            Ok(sink) => sink,
            Err(e) => {
                cancel.store(true, Ordering::Relaxed);
                let _ = producer.join();
                return Err(e);
            }
        };

        let map = SampleMap::new(tempo, sample_rate);
        let playhead = match playhead::spawn(
            sink.clock(),
            map,
            self.bus.clone(),
            Arc::clone(&cancel),
        ) {
            Ok(handle) => handle,
            Err(e) => {
                cancel.store(true, Ordering::Relaxed);
                sink.stop();
                let _ = producer.join();
                return Err(mixdown_core::MixdownError::Audio(format!(
                    "failed to spawn playhead thread: {e}"
                )));
            }
        };

        self.session = Some(Session {
            ring,
            snapshot: shared,
            cancel,
            producer,
            playhead,
            sink,
            sample_rate,
        });
        Ok(())
    }

    /// Stop playback and release the session. No-op when stopped.
    pub fn stop(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };

        session.cancel.store(true, Ordering::Relaxed);
        thread::sleep(STOP_GRACE);

        session.sink.stop();
        let _ = session.producer.join();
        let _ = session.playhead.join();
        drop(session.ring);

        self.bus.publish_silence();
        info!("session stopped");
    }

    /// Whether a session is active. Remains true while the engine feeds
    /// trailing silence past the end of the arrangement.
    pub fn is_playing(&self) -> bool {
        self.session.is_some()
    }

    /// Swap the playing session's mix content for the arrangement's
    /// current state. Newly added clips are cached first; the session's
    /// total length and position are unchanged. No-op when stopped.
    pub fn update_arrangement(&self, arrangement: &mut Arrangement) -> Result<()> {
        let Some(session) = &self.session else {
            return Ok(());
        };
        cache::ensure_all(arrangement, session.sample_rate);
        let snapshot = MixSnapshot::capture(arrangement, session.sample_rate)?;
        *session.snapshot.write() = Arc::new(snapshot);
        Ok(())
    }

    /// UI-side receivers for level and playhead updates.
    pub fn receivers(&self) -> MeterReceivers {
        self.receivers.clone()
    }

    /// The sample rate the clip caches are currently built for.
    pub fn cached_sample_rate(&self) -> u32 {
        self.cached_sample_rate
    }
}

impl Default for AudioEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for AudioEngine {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Block until the ring buffer is at least half full, up to
/// `attempts * poll`. Returns whether the target fill was reached.
fn wait_until_half_full(ring: &RingBuffer, attempts: usize, poll: Duration) -> bool {
    let target = ring.capacity() / 2;
    for _ in 0..attempts {
        if ring.len() >= target {
            return true;
        }
        thread::sleep(poll);
    }
    ring.len() >= target
}
