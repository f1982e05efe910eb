//! Play audio files back-to-back on one track.
//!
//! Usage: `cargo run --example play -- a.wav b.mp3 ...`

use anyhow::Result;
use mixdown_audio::AudioEngine;
use mixdown_timeline::{Arrangement, Clip};
use std::time::Duration;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::DEBUG)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let paths: Vec<String> = std::env::args().skip(1).collect();
    if paths.is_empty() {
        eprintln!("usage: play <audio files...>");
        std::process::exit(1);
    }

    let mut arrangement = Arrangement::new("demo");
    arrangement.beats_per_bar = 1;
    let track = arrangement.add_track("Demo");
    for (i, path) in paths.iter().enumerate() {
        track.add_clip(Clip::new(
            format!("clip {i}"),
            path.clone(),
            i as f64 * 4.0,
            4.0,
        ));
    }

    let mut engine = AudioEngine::new();
    let receivers = engine.receivers();
    engine.play(&mut arrangement)?;

    let deadline = std::time::Instant::now() + Duration::from_secs(15);
    while std::time::Instant::now() < deadline {
        if let Ok(beats) = receivers.playhead.recv_timeout(Duration::from_millis(200)) {
            let rms = receivers.rms.try_iter().last();
            info!("playhead {beats:.2} beats, rms {rms:?}");
        }
    }

    engine.stop();
    Ok(())
}
