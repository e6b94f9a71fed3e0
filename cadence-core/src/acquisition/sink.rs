//! Streaming sample delivery
//!
//! Multi-sample and free-running acquisitions hand each finished sample to
//! a [`SampleSink`] from interrupt context. [`SampleQueue`] provides a
//! lock-free single-producer/single-consumer buffer for this: the producer
//! half is passed to the dispatch routine and the consumer half stays with
//! the caller.

use heapless::spsc::{Consumer, Producer, Queue};
use portable_atomic::{AtomicU32, Ordering};

use cadence_hal::ChannelId;

/// One finished sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Sample {
    /// Channel the sample was taken on
    pub channel: ChannelId,
    /// Raw or smoothed conversion result
    pub value: u16,
}

/// Destination for streamed samples
///
/// Called from interrupt context; implementations must not block.
pub trait SampleSink {
    /// Accept one sample
    fn push(&mut self, channel: ChannelId, value: u16);

    /// Check whether this sink consumes samples at all
    fn is_streaming(&self) -> bool {
        true
    }
}

/// Sink that discards everything
///
/// Use when only `read_latest` is needed.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl SampleSink for NullSink {
    fn push(&mut self, _channel: ChannelId, _value: u16) {}

    fn is_streaming(&self) -> bool {
        false
    }
}

/// Bounded sample buffer
///
/// Holds at most `N - 1` samples. Samples arriving while full are dropped
/// and counted.
pub struct SampleQueue<const N: usize> {
    queue: Queue<Sample, N>,
    dropped: AtomicU32,
}

impl<const N: usize> Default for SampleQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> SampleQueue<N> {
    /// Create an empty buffer
    pub const fn new() -> Self {
        Self {
            queue: Queue::new(),
            dropped: AtomicU32::new(0),
        }
    }

    /// Split into the interrupt-side sink and the caller-side reader
    pub fn split(&mut self) -> (QueueSink<'_, N>, SampleReader<'_, N>) {
        let Self { queue, dropped } = self;
        let dropped: &AtomicU32 = dropped;
        let (producer, consumer) = queue.split();

        (
            QueueSink { producer, dropped },
            SampleReader { consumer, dropped },
        )
    }
}

/// Producer half of a [`SampleQueue`]
pub struct QueueSink<'a, const N: usize> {
    producer: Producer<'a, Sample, N>,
    dropped: &'a AtomicU32,
}

impl<const N: usize> SampleSink for QueueSink<'_, N> {
    fn push(&mut self, channel: ChannelId, value: u16) {
        if self.producer.enqueue(Sample { channel, value }).is_err() {
            self.dropped.fetch_add(1, Ordering::Relaxed);
        }
    }
}

/// Consumer half of a [`SampleQueue`]
pub struct SampleReader<'a, const N: usize> {
    consumer: Consumer<'a, Sample, N>,
    dropped: &'a AtomicU32,
}

impl<const N: usize> SampleReader<'_, N> {
    /// Take the oldest buffered sample
    pub fn read(&mut self) -> Option<Sample> {
        self.consumer.dequeue()
    }

    /// Number of buffered samples
    pub fn len(&self) -> usize {
        self.consumer.len()
    }

    /// Check whether no samples are buffered
    pub fn is_empty(&self) -> bool {
        self.consumer.len() == 0
    }

    /// Samples lost to a full buffer
    pub fn dropped(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }
}
