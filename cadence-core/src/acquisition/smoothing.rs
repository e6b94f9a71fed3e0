//! Moving-average smoothing
//!
//! A ring buffer of the last `len` raw samples and their running sum.
//! `len` is a power of two, so the average is `sum >> log2(len)` and the
//! ring index wraps with a mask. The filter reports ready once the ring
//! has been filled exactly once.

use portable_atomic::{AtomicBool, AtomicU16, AtomicU32, AtomicU8, Ordering};

use crate::config::{is_valid_smoothing_len, MAX_SMOOTHING_LEN};

const HISTORY_LEN: usize = MAX_SMOOTHING_LEN as usize;

/// Per-channel smoothing filter
///
/// Fed only from interrupt context while the channel is active, and
/// reconfigured only from caller context while it is not. Every field is
/// atomic so both contexts can hold `&self`.
#[derive(Debug)]
pub struct SmoothingFilter {
    history: [AtomicU16; HISTORY_LEN],
    sum: AtomicU32,
    index: AtomicU8,
    len: AtomicU8,
    ready: AtomicBool,
}

impl Default for SmoothingFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl SmoothingFilter {
    /// Create a disabled filter
    pub fn new() -> Self {
        Self {
            history: core::array::from_fn(|_| AtomicU16::new(0)),
            sum: AtomicU32::new(0),
            index: AtomicU8::new(0),
            len: AtomicU8::new(0),
            ready: AtomicBool::new(false),
        }
    }

    /// Set the window length and clear history
    ///
    /// Returns false (leaving the filter unchanged) if `len` is not a
    /// valid smoothing length.
    pub fn configure(&self, len: u8) -> bool {
        if !is_valid_smoothing_len(len) {
            return false;
        }
        self.len.store(len, Ordering::Relaxed);
        self.reset();
        true
    }

    /// Clear history and readiness, keeping the window length
    pub fn reset(&self) {
        for slot in &self.history {
            slot.store(0, Ordering::Relaxed);
        }
        self.sum.store(0, Ordering::Relaxed);
        self.index.store(0, Ordering::Relaxed);
        self.ready.store(false, Ordering::Release);
    }

    /// Window length (0 = disabled)
    pub fn window_len(&self) -> u8 {
        self.len.load(Ordering::Relaxed)
    }

    /// Check whether smoothing is configured
    pub fn is_enabled(&self) -> bool {
        self.window_len() > 0
    }

    /// Check whether a full window has been collected
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    /// Current average, if ready
    pub fn output(&self) -> Option<u16> {
        let len = self.window_len();
        if len == 0 || !self.is_ready() {
            return None;
        }
        Some((self.sum.load(Ordering::Relaxed) >> len.trailing_zeros()) as u16)
    }

    /// Fold one raw sample into the window
    ///
    /// Returns the new average once the window is full, `None` while it is
    /// still filling. A disabled filter passes the sample through.
    pub fn feed(&self, raw: u16) -> Option<u16> {
        let len = self.window_len();
        if len == 0 {
            return Some(raw);
        }

        let idx = self.index.load(Ordering::Relaxed) as usize;
        let oldest = self.history[idx].load(Ordering::Relaxed);
        self.history[idx].store(raw, Ordering::Relaxed);
        let sum = self
            .sum
            .load(Ordering::Relaxed)
            .wrapping_sub(oldest as u32)
            .wrapping_add(raw as u32);
        self.sum.store(sum, Ordering::Relaxed);

        let next = (idx + 1) & (len as usize - 1);
        self.index.store(next as u8, Ordering::Relaxed);

        if next == 0 && !self.is_ready() {
            self.ready.store(true, Ordering::Release);
        }

        self.output()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_disabled_passes_through() {
        let filter = SmoothingFilter::new();
        assert!(!filter.is_enabled());
        assert_eq!(filter.feed(1234), Some(1234));
        assert!(!filter.is_ready());
    }

    #[test]
    fn test_ready_after_window() {
        let filter = SmoothingFilter::new();
        assert!(filter.configure(4));

        assert_eq!(filter.feed(100), None);
        assert_eq!(filter.feed(200), None);
        assert_eq!(filter.feed(300), None);
        assert!(!filter.is_ready());

        // (100 + 200 + 300 + 400) / 4
        assert_eq!(filter.feed(400), Some(250));
        assert!(filter.is_ready());
    }

    #[test]
    fn test_window_slides() {
        let filter = SmoothingFilter::new();
        filter.configure(2);
        filter.feed(10);
        assert_eq!(filter.feed(20), Some(15));
        // 10 drops out
        assert_eq!(filter.feed(40), Some(30));
        assert_eq!(filter.feed(40), Some(40));
        assert!(filter.is_ready());
    }

    #[test]
    fn test_window_of_one() {
        let filter = SmoothingFilter::new();
        filter.configure(1);
        assert_eq!(filter.feed(77), Some(77));
        assert!(filter.is_ready());
        assert_eq!(filter.feed(5), Some(5));
    }

    #[test]
    fn test_average_truncates() {
        let filter = SmoothingFilter::new();
        filter.configure(2);
        filter.feed(1);
        assert_eq!(filter.feed(2), Some(1));
    }

    #[test]
    fn test_full_scale_no_overflow() {
        let filter = SmoothingFilter::new();
        filter.configure(MAX_SMOOTHING_LEN);
        let mut out = None;
        for _ in 0..MAX_SMOOTHING_LEN {
            out = filter.feed(u16::MAX);
        }
        assert_eq!(out, Some(u16::MAX));
    }

    #[test]
    fn test_invalid_len_rejected() {
        let filter = SmoothingFilter::new();
        filter.configure(8);
        assert!(!filter.configure(12));
        assert_eq!(filter.window_len(), 8);
    }

    #[test]
    fn test_reset_clears_readiness() {
        let filter = SmoothingFilter::new();
        filter.configure(2);
        filter.feed(8);
        filter.feed(8);
        assert!(filter.is_ready());

        filter.reset();
        assert!(!filter.is_ready());
        assert_eq!(filter.output(), None);
        assert_eq!(filter.feed(4), None);
        assert_eq!(filter.feed(4), Some(4));
    }

    proptest! {
        #[test]
        fn ready_exactly_at_window(log2 in 0u32..=6, samples in prop::collection::vec(any::<u16>(), 1..200)) {
            let len = 1u8 << log2;
            let filter = SmoothingFilter::new();
            filter.configure(len);

            for (i, &s) in samples.iter().enumerate() {
                let out = filter.feed(s);
                let fed = i + 1;
                if fed < len as usize {
                    prop_assert!(out.is_none());
                    prop_assert!(!filter.is_ready());
                } else {
                    // Mean of the last `len` samples, truncated
                    let window = &samples[fed - len as usize..fed];
                    let sum: u32 = window.iter().map(|&v| v as u32).sum();
                    prop_assert_eq!(out, Some((sum >> log2) as u16));
                    prop_assert!(filter.is_ready());
                }
            }
        }
    }
}
