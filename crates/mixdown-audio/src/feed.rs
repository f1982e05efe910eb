//! Hardware-facing sample provider with level metering.

use std::sync::Arc;

use crate::levels::{measure_block, MeterBus};
use crate::ring_buffer::RingBuffer;

/// Pull-based provider the output callback drains.
///
/// `fill` always produces a full block: whatever the ring buffer cannot
/// supply is padded with silence, so an underrun degrades to a dropout
/// instead of breaking the stream. Every block is metered per channel and
/// the levels published on the UI bus.
pub struct SampleFeed {
    ring: Arc<RingBuffer>,
    bus: MeterBus,
}

impl SampleFeed {
    pub fn new(ring: Arc<RingBuffer>, bus: MeterBus) -> Self {
        Self { ring, bus }
    }

    /// Fill `out` completely. Never blocks and never fails.
    pub fn fill(&self, out: &mut [f32]) {
        let got = self.ring.pop_slice(out);
        out[got..].fill(0.0);

        self.bus.publish_levels(measure_block(out));
    }
}
