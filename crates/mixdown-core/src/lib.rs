//! Mixdown Core - Foundation types for the audio engine
//!
//! This crate provides the fundamental types used throughout Mixdown:
//! - Error taxonomy and `Result` alias
//! - Musical time (tempo, beats) and sample-index conversion

pub mod error;
pub mod time;

pub use error::{MixdownError, Result};
pub use time::{SampleMap, Tempo, CHANNELS};
