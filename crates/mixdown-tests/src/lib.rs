//! Integration test crate for Mixdown.
//!
//! This crate exists solely to hold cross-crate integration tests.
//! It depends on the engine crates to verify they work together.

#[cfg(test)]
mod metering;

#[cfg(test)]
mod mixing;

#[cfg(test)]
mod transport;
