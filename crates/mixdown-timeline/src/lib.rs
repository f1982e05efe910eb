//! Mixdown Timeline - Track/clip data model
//!
//! Implements the arrangement structure the mixing engine reads:
//! - Arrangements holding tempo, meter and ordered tracks
//! - Tracks holding ordered, time-positioned audio clips
//! - Versioned JSON persistence
//!
//! The engine treats this model as read-only input during a mix pass; the
//! only slot it writes is each clip's lazily populated waveform cache.

pub mod arrangement;
pub mod clip;
pub mod serialization;
pub mod track;

pub use arrangement::Arrangement;
pub use clip::Clip;
pub use serialization::ArrangementFile;
pub use track::Track;
