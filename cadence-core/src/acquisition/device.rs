//! Converter-wide sequencing state
//!
//! The active-channel list is a pre-sized array of slots plus a length.
//! It is only ever rewritten whole by the sequencer: slots first, then the
//! length, so a reader that loads the length sees a complete list.

use heapless::Vec;
use portable_atomic::{AtomicBool, AtomicU8, Ordering};

use cadence_hal::ChannelId;

use crate::config::ClockMode;

/// Sequencing state for one converter
#[derive(Debug)]
pub struct DeviceState<const N: usize> {
    active: [AtomicU8; N],
    active_len: AtomicU8,
    cursor: AtomicU8,
    running: AtomicBool,
    hardware_clocked: AtomicBool,
    dirty: AtomicBool,
}

/// Plain copy of the device state
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceSnapshot<const N: usize> {
    /// Channels in the current pass, in scan order
    pub active_channels: Vec<ChannelId, N>,
    /// Position of the dispatch routine within the pass
    pub sequence_cursor: u8,
    /// A pass is in flight
    pub running: bool,
    /// How passes are triggered
    pub clock_mode: ClockMode,
    /// Membership changed since the last rebuild
    pub dirty: bool,
}

impl<const N: usize> DeviceState<N> {
    /// Create an idle device
    pub fn new(clock_mode: ClockMode) -> Self {
        Self {
            active: core::array::from_fn(|_| AtomicU8::new(0)),
            active_len: AtomicU8::new(0),
            cursor: AtomicU8::new(0),
            running: AtomicBool::new(false),
            hardware_clocked: AtomicBool::new(clock_mode == ClockMode::Hardware),
            dirty: AtomicBool::new(false),
        }
    }

    /// Number of channels in the current pass
    pub fn active_len(&self) -> usize {
        self.active_len.load(Ordering::Acquire) as usize
    }

    /// Channel id at `index` in the current pass
    pub fn active_at(&self, index: usize) -> ChannelId {
        self.active[index].load(Ordering::Relaxed)
    }

    /// Check whether `channel` is in the current pass
    pub fn contains(&self, channel: ChannelId) -> bool {
        (0..self.active_len()).any(|i| self.active_at(i) == channel)
    }

    /// Replace the active list
    ///
    /// Ids beyond the slot count are dropped.
    pub(crate) fn set_active(&self, channels: &[ChannelId]) {
        let len = channels.len().min(N);
        for (slot, &id) in self.active.iter().zip(&channels[..len]) {
            slot.store(id, Ordering::Relaxed);
        }
        self.active_len.store(len as u8, Ordering::Release);
    }

    /// Empty the active list
    pub(crate) fn clear_active(&self) {
        self.active_len.store(0, Ordering::Release);
    }

    /// Dispatch position within the pass
    pub fn cursor(&self) -> u8 {
        self.cursor.load(Ordering::Relaxed)
    }

    pub(crate) fn set_cursor(&self, cursor: u8) {
        self.cursor.store(cursor, Ordering::Relaxed);
    }

    /// Check whether a pass is in flight
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub(crate) fn set_running(&self, running: bool) {
        self.running.store(running, Ordering::SeqCst);
    }

    /// Current clock mode
    pub fn clock_mode(&self) -> ClockMode {
        if self.hardware_clocked.load(Ordering::Relaxed) {
            ClockMode::Hardware
        } else {
            ClockMode::Software
        }
    }

    pub(crate) fn set_clock_mode(&self, mode: ClockMode) {
        self.hardware_clocked
            .store(mode == ClockMode::Hardware, Ordering::Relaxed);
    }

    /// Check whether membership changed since the last rebuild
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    pub(crate) fn mark_dirty(&self) {
        self.dirty.store(true, Ordering::SeqCst);
    }

    pub(crate) fn clear_dirty(&self) {
        self.dirty.store(false, Ordering::SeqCst);
    }

    /// Copy out every field
    pub fn snapshot(&self) -> DeviceSnapshot<N> {
        let mut active_channels = Vec::new();
        for i in 0..self.active_len() {
            let _ = active_channels.push(self.active_at(i));
        }

        DeviceSnapshot {
            active_channels,
            sequence_cursor: self.cursor(),
            running: self.is_running(),
            clock_mode: self.clock_mode(),
            dirty: self.is_dirty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_device_idle() {
        let dev = DeviceState::<4>::new(ClockMode::Software);
        let snap = dev.snapshot();
        assert!(snap.active_channels.is_empty());
        assert_eq!(snap.sequence_cursor, 0);
        assert!(!snap.running);
        assert!(!snap.dirty);
        assert_eq!(snap.clock_mode, ClockMode::Software);
    }

    #[test]
    fn test_set_active_replaces_list() {
        let dev = DeviceState::<4>::new(ClockMode::Software);
        dev.set_active(&[0, 2, 3]);
        assert_eq!(dev.active_len(), 3);
        assert!(dev.contains(2));

        dev.set_active(&[1]);
        assert_eq!(dev.active_len(), 1);
        assert_eq!(dev.active_at(0), 1);
        assert!(!dev.contains(2));
    }

    #[test]
    fn test_set_active_truncates() {
        let dev = DeviceState::<2>::new(ClockMode::Software);
        dev.set_active(&[0, 1, 2]);
        assert_eq!(dev.active_len(), 2);
    }

    #[test]
    fn test_clock_mode_switch() {
        let dev = DeviceState::<2>::new(ClockMode::Hardware);
        assert_eq!(dev.clock_mode(), ClockMode::Hardware);
        dev.set_clock_mode(ClockMode::Software);
        assert_eq!(dev.clock_mode(), ClockMode::Software);
    }

    #[test]
    fn test_clear_active() {
        let dev = DeviceState::<4>::new(ClockMode::Software);
        dev.set_active(&[0, 1]);
        dev.clear_active();
        assert_eq!(dev.active_len(), 0);
        assert!(!dev.contains(0));
    }
}
