//! Lock-free single-producer single-consumer ring buffer for real-time audio.
//!
//! Sits between the mix thread (producer) and the hardware callback
//! (consumer). No mutexes — atomic cursors only, so neither side can block
//! the other. Writes and reads are bulk slice transfers; a write into a
//! nearly full buffer or a read from a nearly empty one transfers what fits
//! and reports the count, which is how the producer abandons the rest of a
//! chunk under back-pressure and the consumer detects underrun.

use std::sync::atomic::{AtomicUsize, Ordering};

/// A bounded SPSC ring buffer of f32 samples.
///
/// Samples come out in exactly the order they went in. Capacity is fixed at
/// construction; one session allocates one buffer and never resizes it.
pub struct RingBuffer {
    /// One slot larger than the usable capacity to distinguish full from
    /// empty without a separate counter.
    buffer: Box<[f32]>,
    read_pos: AtomicUsize,
    write_pos: AtomicUsize,
}

// SAFETY: SPSC use only. Cursors are atomics, and the slice regions touched
// by the writer (free region) and the reader (readable region) never
// overlap — each side only moves its own cursor after copying.
unsafe impl Send for RingBuffer {}
unsafe impl Sync for RingBuffer {}

impl RingBuffer {
    /// Create a ring buffer able to hold `capacity` samples.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: vec![0.0f32; capacity + 1].into_boxed_slice(),
            read_pos: AtomicUsize::new(0),
            write_pos: AtomicUsize::new(0),
        }
    }

    /// Usable capacity in samples.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buffer.len() - 1
    }

    /// Number of buffered-but-unread samples.
    pub fn len(&self) -> usize {
        let w = self.write_pos.load(Ordering::Acquire);
        let r = self.read_pos.load(Ordering::Acquire);
        if w >= r {
            w - r
        } else {
            self.buffer.len() - r + w
        }
    }

    /// Whether no samples are buffered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of samples that can currently be written.
    #[inline]
    pub fn free_len(&self) -> usize {
        self.capacity() - self.len()
    }

    /// Append samples. Returns how many were actually written; the
    /// remainder is dropped when the buffer fills mid-write.
    pub fn push_slice(&self, data: &[f32]) -> usize {
        let count = data.len().min(self.free_len());
        if count == 0 {
            return 0;
        }

        let slots = self.buffer.len();
        let w = self.write_pos.load(Ordering::Relaxed);

        // Copy in up to two segments around the wrap point.
        let first = (slots - w).min(count);
        let second = count - first;

        // SAFETY: only the producer writes, only into the free region
        // [write_pos, read_pos), which `count` was clamped to.
        let buf_ptr = self.buffer.as_ptr() as *mut f32;
        unsafe {
            std::ptr::copy_nonoverlapping(data.as_ptr(), buf_ptr.add(w), first);
            if second > 0 {
                std::ptr::copy_nonoverlapping(data[first..].as_ptr(), buf_ptr, second);
            }
        }

        self.write_pos.store((w + count) % slots, Ordering::Release);
        count
    }

    /// Remove samples into `out`. Returns how many were actually read; the
    /// rest of `out` is untouched.
    pub fn pop_slice(&self, out: &mut [f32]) -> usize {
        let count = out.len().min(self.len());
        if count == 0 {
            return 0;
        }

        let slots = self.buffer.len();
        let r = self.read_pos.load(Ordering::Relaxed);

        let first = (slots - r).min(count);
        let second = count - first;

        // SAFETY: only the consumer reads, only from the readable region
        // [read_pos, write_pos), which `count` was clamped to.
        unsafe {
            let buf_ptr = self.buffer.as_ptr();
            std::ptr::copy_nonoverlapping(buf_ptr.add(r), out.as_mut_ptr(), first);
            if second > 0 {
                std::ptr::copy_nonoverlapping(buf_ptr, out[first..].as_mut_ptr(), second);
            }
        }

        self.read_pos.store((r + count) % slots, Ordering::Release);
        count
    }

    /// Discard everything buffered.
    pub fn clear(&self) {
        self.read_pos
            .store(self.write_pos.load(Ordering::Acquire), Ordering::Release);
    }
}
