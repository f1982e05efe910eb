//! Hardware output sink.
//!
//! Thin cpal layer: a stereo f32 output stream at the device's default
//! sample rate, whose callback drains the [`SampleFeed`] and advances the
//! shared [`PlaybackClock`]. Everything above this module is device-free
//! and testable without audio hardware.

use std::sync::Arc;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use mixdown_core::{MixdownError, Result, CHANNELS};
use tracing::{error, info};

use crate::clock::PlaybackClock;
use crate::feed::SampleFeed;

/// Sample rate the default output device mixes at.
pub fn detect_sample_rate() -> Result<u32> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| MixdownError::Audio("no output device found".into()))?;
    let config = device
        .default_output_config()
        .map_err(|e| MixdownError::Audio(format!("no default output config: {e}")))?;
    Ok(config.sample_rate().0)
}

/// A running hardware output stream bound to a [`SampleFeed`].
pub struct OutputSink {
    stream: cpal::Stream,
    clock: Arc<PlaybackClock>,
    sample_rate: u32,
}

impl OutputSink {
    /// Open the default output device and start pulling from `feed`.
    pub fn start(feed: SampleFeed, sample_rate: u32) -> Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| MixdownError::Audio("no output device found".into()))?;

        let default_config = device
            .default_output_config()
            .map_err(|e| MixdownError::Audio(format!("no default output config: {e}")))?;
        match default_config.sample_format() {
            cpal::SampleFormat::F32 => {}
            other => {
                return Err(MixdownError::Audio(format!(
                    "unsupported sample format '{other}'"
                )))
            }
        }

        let config = cpal::StreamConfig {
            channels: CHANNELS as u16,
            sample_rate: cpal::SampleRate(sample_rate),
            buffer_size: cpal::BufferSize::Default,
        };

        let clock = Arc::new(PlaybackClock::new());
        let callback_clock = Arc::clone(&clock);

        let stream = device
            .build_output_stream(
                &config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    feed.fill(data);
                    callback_clock.advance((data.len() / CHANNELS) as u64);
                },
                |err| error!("output stream error: {err}"),
                None,
            )
            .map_err(|e| MixdownError::Audio(format!("failed to build output stream: {e}")))?;

        stream
            .play()
            .map_err(|e| MixdownError::Audio(format!("failed to start output stream: {e}")))?;
        clock.set_playing(true);

        info!("output stream started at {sample_rate} Hz");

        Ok(Self {
            stream,
            clock,
            sample_rate,
        })
    }

    /// The shared position clock the callback advances.
    pub fn clock(&self) -> Arc<PlaybackClock> {
        Arc::clone(&self.clock)
    }

    #[inline]
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Stop and release the stream.
    pub fn stop(self) {
        self.clock.set_playing(false);
        drop(self.stream);
        info!("output stream stopped");
    }
}
