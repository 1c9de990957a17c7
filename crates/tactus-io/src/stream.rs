//! Consumer-facing onset stream.
//!
//! The pipeline runs on the audio thread; whoever displays or analyses the
//! onset-strength signal usually does not. [`onset_channel`] splits the
//! hand-off into a producer half ([`ChannelSink`], given to the pipeline) and
//! a consumer half ([`OnsetStream`], owned by the reader). The channel is
//! unbounded, so the producer never waits on the consumer, and FIFO, so
//! samples arrive in hop order.
//!
//! Session boundaries travel through the same channel as
//! [`OnsetEvent::SessionReset`], which clears the consumer's history. A reset
//! can therefore never overtake samples emitted before it.

use std::time::Duration;

use crossbeam_channel::{Receiver, Sender, unbounded};
use tactus_core::{OnsetSample, OnsetSink};

/// Message from the pipeline to the consumer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OnsetEvent {
    /// One completed hop.
    Sample(OnsetSample),
    /// The session ended; earlier samples belong to a finished session.
    SessionReset,
}

/// Producer half: an [`OnsetSink`] that sends into the channel.
///
/// Sending never blocks. If the consumer has been dropped, samples are
/// discarded.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: Sender<OnsetEvent>,
}

impl OnsetSink for ChannelSink {
    fn emit(&mut self, sample: OnsetSample) {
        let _ = self.tx.send(OnsetEvent::Sample(sample));
    }

    fn session_reset(&mut self) {
        let _ = self.tx.send(OnsetEvent::SessionReset);
    }
}

/// Consumer half: the append-only onset-strength sequence of the current
/// session.
///
/// Call [`poll`](Self::poll) (or [`poll_timeout`](Self::poll_timeout)) to
/// pull pending events from the channel; the accessors read the local copy
/// and never touch the producer.
#[derive(Debug)]
pub struct OnsetStream {
    rx: Receiver<OnsetEvent>,
    samples: Vec<OnsetSample>,
    resets: u64,
}

/// Create a connected producer/consumer pair.
///
/// # Example
///
/// ```rust
/// use tactus_core::{OnsetSample, OnsetSink};
/// use tactus_io::onset_channel;
///
/// let (mut sink, mut stream) = onset_channel();
/// sink.emit(OnsetSample { hop: 0, flux: 0.0, strength: 0.0 });
/// sink.emit(OnsetSample { hop: 1, flux: 3.0, strength: 5.0 });
///
/// assert_eq!(stream.poll(), 2);
/// assert_eq!(stream.latest().map(|s| s.strength), Some(5.0));
///
/// sink.session_reset();
/// stream.poll();
/// assert!(stream.is_empty());
/// ```
pub fn onset_channel() -> (ChannelSink, OnsetStream) {
    let (tx, rx) = unbounded();
    (
        ChannelSink { tx },
        OnsetStream {
            rx,
            samples: Vec::new(),
            resets: 0,
        },
    )
}

impl OnsetStream {
    /// Drain all pending events without waiting.
    ///
    /// Returns the number of samples added to the current session (samples
    /// cleared by a reset in the same batch are not counted).
    pub fn poll(&mut self) -> usize {
        let mut added = 0;
        while let Ok(event) = self.rx.try_recv() {
            added = self.apply(event, added);
        }
        added
    }

    /// Wait up to `timeout` for the next event, then drain the rest.
    pub fn poll_timeout(&mut self, timeout: Duration) -> usize {
        match self.rx.recv_timeout(timeout) {
            Ok(event) => {
                let added = self.apply(event, 0);
                added + self.poll()
            }
            Err(_) => 0,
        }
    }

    fn apply(&mut self, event: OnsetEvent, added: usize) -> usize {
        match event {
            OnsetEvent::Sample(sample) => {
                self.samples.push(sample);
                added + 1
            }
            OnsetEvent::SessionReset => {
                self.samples.clear();
                self.resets += 1;
                0
            }
        }
    }

    /// Number of samples in the current session.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the current session has produced no samples yet.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Most recent sample.
    pub fn latest(&self) -> Option<&OnsetSample> {
        self.samples.last()
    }

    /// All samples of the current session, in hop order.
    pub fn samples(&self) -> &[OnsetSample] {
        &self.samples
    }

    /// Number of session resets seen so far.
    pub fn resets(&self) -> u64 {
        self.resets
    }

    /// Whether every producer handle has been dropped and nothing is pending.
    pub fn is_closed(&self) -> bool {
        self.rx.is_empty() && self.rx.sender_count() == 0
    }
}
