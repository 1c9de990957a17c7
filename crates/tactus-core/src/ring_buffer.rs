//! Sample accumulation and overlapping frame extraction.
//!
//! Audio backends deliver blocks of whatever size the hardware prefers. The
//! [`SampleRingBuffer`] decouples that block size from the analysis geometry:
//! it collects samples and hands out fixed-size [`Frame`]s whose starts are
//! exactly `hop_size` samples apart, independent of where block boundaries
//! fell.
//!
//! ```text
//!  pushed:  |--block--|---block---|-b-|------block------|
//!  frames:  [======frame 0======]
//!              [======frame 1======]
//!                 [======frame 2======]
//!           <-hop->
//! ```

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use core::ops::Deref;

/// One analysis frame: exactly `frame_size` consecutive samples.
///
/// Borrowed from the [`SampleRingBuffer`] that produced it, so it is
/// immutable and valid until the next mutation of the buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame<'a> {
    samples: &'a [f32],
}

impl<'a> Frame<'a> {
    /// Wrap a slice as a frame.
    pub fn new(samples: &'a [f32]) -> Self {
        Self { samples }
    }

    /// The frame's samples.
    pub fn as_slice(&self) -> &'a [f32] {
        self.samples
    }
}

impl Deref for Frame<'_> {
    type Target = [f32];

    fn deref(&self) -> &[f32] {
        self.samples
    }
}

impl AsRef<[f32]> for Frame<'_> {
    fn as_ref(&self) -> &[f32] {
        self.samples
    }
}

/// Accumulates incoming samples and yields overlapping fixed-size frames.
///
/// Each successful [`try_extract_frame`](Self::try_extract_frame) returns the
/// `frame_size` samples at the logical front of the buffer and then advances
/// the front by `hop_size` (not `frame_size`), which is what produces the
/// `frame_size - hop_size` overlap between consecutive frames.
///
/// Storage is linear with a moving read position. Consumed samples are
/// compacted away on [`push`](Self::push) only once at least a full frame of
/// them has piled up, or when the new block would not fit otherwise, so each
/// sample is moved a bounded number of times however small the blocks are.
/// Capacity stops growing once it covers a frame plus the largest block.
///
/// # Example
///
/// ```rust
/// use tactus_core::SampleRingBuffer;
///
/// let mut ring = SampleRingBuffer::new(8, 2);
/// ring.push(&[0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]);
///
/// let mut starts = Vec::new();
/// while let Some(frame) = ring.try_extract_frame() {
///     starts.push(frame[0]);
/// }
/// assert_eq!(starts, vec![0.0, 2.0]);
/// assert_eq!(ring.len(), 6); // samples 4..10 wait for more input
/// ```
#[derive(Debug, Clone)]
pub struct SampleRingBuffer {
    /// Backing storage; `buffer[start..]` is the unconsumed region
    buffer: Vec<f32>,
    /// Logical front of the buffer
    start: usize,
    frame_size: usize,
    hop_size: usize,
}

impl SampleRingBuffer {
    /// Create an empty buffer for the given frame geometry.
    ///
    /// `hop_size` must be in `1..=frame_size`; this is checked by
    /// [`OnsetConfig::validate`](crate::OnsetConfig::validate) and only
    /// debug-asserted here.
    pub fn new(frame_size: usize, hop_size: usize) -> Self {
        debug_assert!(hop_size > 0 && hop_size <= frame_size);
        Self {
            buffer: Vec::with_capacity(frame_size * 2),
            start: 0,
            frame_size,
            hop_size,
        }
    }

    /// Frame length in samples.
    pub fn frame_size(&self) -> usize {
        self.frame_size
    }

    /// Advance between frames in samples.
    pub fn hop_size(&self) -> usize {
        self.hop_size
    }

    /// Append a block of samples.
    pub fn push(&mut self, samples: &[f32]) {
        let overflow = self.buffer.len() + samples.len() > self.buffer.capacity();
        if self.start >= self.frame_size || (overflow && self.start > 0) {
            self.compact();
        }
        self.buffer.extend_from_slice(samples);
    }

    /// Take the next frame if at least `frame_size` samples are buffered.
    ///
    /// Call in a loop until it returns `None`: one block can complete zero,
    /// one, or many frames.
    pub fn try_extract_frame(&mut self) -> Option<Frame<'_>> {
        if self.len() < self.frame_size {
            return None;
        }
        let begin = self.start;
        self.start += self.hop_size;
        Some(Frame::new(&self.buffer[begin..begin + self.frame_size]))
    }

    /// Number of buffered samples not yet advanced past.
    pub fn len(&self) -> usize {
        self.buffer.len() - self.start
    }

    /// Whether no unconsumed samples are buffered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of frames that could be extracted right now.
    pub fn frames_available(&self) -> usize {
        crate::math::hop_count(self.len(), self.frame_size, self.hop_size)
    }

    /// Drop all buffered samples.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.start = 0;
    }

    /// Move the unconsumed region to the front of the storage.
    fn compact(&mut self) {
        let remaining = self.len();
        self.buffer.copy_within(self.start.., 0);
        self.buffer.truncate(remaining);
        self.start = 0;
    }
}
