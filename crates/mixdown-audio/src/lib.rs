//! Mixdown Audio - Real-time mixing and playback engine
//!
//! Continuously renders an arrangement of time-positioned clips into an
//! interleaved stereo stream for live hardware playback.
//!
//! Architecture:
//! - `RingBuffer`: Lock-free SPSC buffer between the mix thread and the
//!   audio callback
//! - `MixSnapshot` + `producer`: Background loop summing overlapping clip
//!   waveforms into fixed-size chunks ahead of real time
//! - `SampleFeed`: Hardware-facing consumer — drains the ring, pads
//!   underruns with silence, meters every block
//! - `playhead`: Polling tracker converting frames played to beats
//! - `AudioEngine`: Transport controller owning the session lifecycle

pub mod cache;
pub mod clock;
pub mod feed;
pub mod levels;
pub mod output;
pub mod playhead;
pub mod producer;
pub mod ring_buffer;
pub mod snapshot;
pub mod transport;

pub use clock::PlaybackClock;
pub use feed::SampleFeed;
pub use levels::{meter_channels, BlockLevels, MeterBus, MeterReceivers, SILENCE_DB};
pub use producer::{render_chunk, CHUNK_SAMPLES};
pub use ring_buffer::RingBuffer;
pub use snapshot::MixSnapshot;
pub use transport::{AudioEngine, RING_CAPACITY};
