//! Per-channel acquisition state
//!
//! # Field ownership
//!
//! | Field | Writer |
//! |-------|--------|
//! | `requested_samples`, `free_running` | caller, at start (channel inactive) |
//! | `samples_captured`, `latest_value` | interrupt while active; caller resets at start |
//! | `value_fresh` | interrupt sets, caller consumes |
//! | `op_pending` | caller (start/stop) and interrupt (auto-stop) |
//!
//! `op_pending` is the only field both contexts write. It uses sequentially
//! consistent ordering so a stop is observed before any later rebuild scan.

use portable_atomic::{AtomicBool, AtomicU16, AtomicU32, Ordering};

use cadence_hal::ChannelId;

use super::smoothing::SmoothingFilter;

/// Acquisition state for one analog input
#[derive(Debug)]
pub struct ChannelState {
    id: ChannelId,
    requested_samples: AtomicU32,
    samples_captured: AtomicU32,
    free_running: AtomicBool,
    op_pending: AtomicBool,
    latest_value: AtomicU16,
    value_fresh: AtomicBool,
    stream_smoothed: AtomicBool,
    filter: SmoothingFilter,
}

/// Plain copy of a channel's state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelSnapshot {
    /// Channel id
    pub id: ChannelId,
    /// Sample target for the current request
    pub requested_samples: u32,
    /// Finished samples since the last start
    pub samples_captured: u32,
    /// Smoothing window (0 = off)
    pub smoothing_window_len: u8,
    /// Smoothing window has filled
    pub smoothing_ready: bool,
    /// Most recent finished sample
    pub latest_value: u16,
    /// `latest_value` not yet consumed
    pub value_fresh: bool,
    /// Channel ignores its sample target
    pub free_running: bool,
    /// Channel is part of the active set
    pub op_pending: bool,
}

impl ChannelState {
    /// Create an idle, unsmoothed channel
    pub fn new(id: ChannelId) -> Self {
        Self {
            id,
            requested_samples: AtomicU32::new(0),
            samples_captured: AtomicU32::new(0),
            free_running: AtomicBool::new(false),
            op_pending: AtomicBool::new(false),
            latest_value: AtomicU16::new(0),
            value_fresh: AtomicBool::new(false),
            stream_smoothed: AtomicBool::new(false),
            filter: SmoothingFilter::new(),
        }
    }

    /// Channel id
    pub fn id(&self) -> ChannelId {
        self.id
    }

    /// Check whether the channel is part of the active set
    pub fn is_pending(&self) -> bool {
        self.op_pending.load(Ordering::SeqCst)
    }

    /// Sample target for the current request
    pub fn requested_samples(&self) -> u32 {
        self.requested_samples.load(Ordering::Relaxed)
    }

    /// Finished samples since the last start
    pub fn samples_captured(&self) -> u32 {
        self.samples_captured.load(Ordering::Relaxed)
    }

    /// Check whether the channel ignores its sample target
    pub fn is_free_running(&self) -> bool {
        self.free_running.load(Ordering::Relaxed)
    }

    /// Check whether the latest value is unconsumed
    pub fn is_fresh(&self) -> bool {
        self.value_fresh.load(Ordering::Acquire)
    }

    /// Check whether smoothed samples are also streamed
    pub fn streams_smoothed(&self) -> bool {
        self.stream_smoothed.load(Ordering::Relaxed)
    }

    /// The channel's smoothing filter
    pub fn filter(&self) -> &SmoothingFilter {
        &self.filter
    }

    /// Check whether a sink should receive this channel's samples
    ///
    /// Single-sample requests are read back through `read_latest` instead.
    pub fn expects_stream(&self) -> bool {
        self.is_free_running() || self.requested_samples() > 1
    }

    /// Check whether `captured` samples satisfy a bounded request
    pub fn target_reached(&self, captured: u32) -> bool {
        !self.is_free_running() && captured >= self.requested_samples()
    }

    /// Check whether a bounded request has finished
    pub fn is_done(&self) -> bool {
        !self.is_pending() && self.target_reached(self.samples_captured())
    }

    /// Load request parameters for a new acquisition
    ///
    /// Only valid while the channel is inactive. A zero sample count means
    /// free-running.
    pub(crate) fn arm(&self, sample_count: u32, free_running: bool) {
        self.requested_samples.store(sample_count, Ordering::Relaxed);
        self.free_running
            .store(free_running || sample_count == 0, Ordering::Relaxed);
        self.samples_captured.store(0, Ordering::Relaxed);
        self.filter.reset();
    }

    pub(crate) fn set_pending(&self, pending: bool) {
        self.op_pending.store(pending, Ordering::SeqCst);
    }

    pub(crate) fn set_stream_smoothed(&self, stream: bool) {
        self.stream_smoothed.store(stream, Ordering::Relaxed);
    }

    /// Store a finished value and mark it fresh
    pub(crate) fn publish(&self, value: u16) {
        self.latest_value.store(value, Ordering::Relaxed);
        self.value_fresh.store(true, Ordering::Release);
    }

    pub(crate) fn clear_fresh(&self) {
        self.value_fresh.store(false, Ordering::Release);
    }

    /// Take the latest value, clearing its freshness
    pub(crate) fn consume(&self) -> (u16, bool) {
        let fresh = self.value_fresh.swap(false, Ordering::AcqRel);
        (self.latest_value.load(Ordering::Relaxed), fresh)
    }

    /// Count one finished sample, returning the new total
    pub(crate) fn record_capture(&self) -> u32 {
        let captured = self.samples_captured().saturating_add(1);
        self.samples_captured.store(captured, Ordering::Relaxed);
        captured
    }

    /// Copy out every field
    pub fn snapshot(&self) -> ChannelSnapshot {
        ChannelSnapshot {
            id: self.id,
            requested_samples: self.requested_samples(),
            samples_captured: self.samples_captured(),
            smoothing_window_len: self.filter.window_len(),
            smoothing_ready: self.filter.is_ready(),
            latest_value: self.latest_value.load(Ordering::Relaxed),
            value_fresh: self.is_fresh(),
            free_running: self.is_free_running(),
            op_pending: self.is_pending(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_channel_idle() {
        let ch = ChannelState::new(5);
        let snap = ch.snapshot();
        assert_eq!(snap.id, 5);
        assert!(!snap.op_pending);
        assert!(!snap.value_fresh);
        assert_eq!(snap.samples_captured, 0);
        assert_eq!(snap.smoothing_window_len, 0);
    }

    #[test]
    fn test_zero_count_is_free_running() {
        let ch = ChannelState::new(0);
        ch.arm(0, false);
        assert!(ch.is_free_running());
        assert!(ch.expects_stream());
        assert!(!ch.target_reached(1_000_000));
    }

    #[test]
    fn test_bounded_target() {
        let ch = ChannelState::new(0);
        ch.arm(3, false);
        assert!(!ch.target_reached(2));
        assert!(ch.target_reached(3));
        assert!(ch.expects_stream());
    }

    #[test]
    fn test_single_sample_not_streamed() {
        let ch = ChannelState::new(0);
        ch.arm(1, false);
        assert!(!ch.expects_stream());
    }

    #[test]
    fn test_consume_clears_fresh() {
        let ch = ChannelState::new(0);
        ch.publish(321);
        assert_eq!(ch.consume(), (321, true));
        assert_eq!(ch.consume(), (321, false));
    }

    #[test]
    fn test_arm_resets_progress() {
        let ch = ChannelState::new(0);
        ch.filter().configure(2);
        ch.arm(4, false);
        ch.record_capture();
        ch.filter().feed(1);
        ch.filter().feed(1);
        assert!(ch.filter().is_ready());

        ch.arm(4, false);
        assert_eq!(ch.samples_captured(), 0);
        assert!(!ch.filter().is_ready());
        assert_eq!(ch.filter().window_len(), 2);
    }

    #[test]
    fn test_is_done() {
        let ch = ChannelState::new(0);
        ch.arm(1, false);
        ch.set_pending(true);
        ch.record_capture();
        assert!(!ch.is_done());

        ch.set_pending(false);
        assert!(ch.is_done());
    }
}
