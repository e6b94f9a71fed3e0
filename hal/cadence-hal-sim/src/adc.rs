//! Simulated converter
//!
//! Models a converter with one result register and one end-of-conversion
//! flag per channel, plus a shared last-converted-data register.

use cadence_hal::{AnalogPins, ChannelId, Converter};

/// Simulated multi-channel converter
///
/// `N` must not exceed 32; the enabled-channel set is a `u32` bitmask.
///
/// Conversions are latched with [`complete`](Self::complete); the engine
/// then observes them through the [`Converter`] trait exactly as it would
/// on hardware. Channel and pin enables are counted for assertions.
#[derive(Debug, Clone)]
pub struct SimAdc<const N: usize> {
    /// Result register per channel
    results: [u16; N],
    /// End-of-conversion flag per channel
    eoc: [bool; N],
    /// Channels enabled since the last reset (bit per channel)
    enabled: u32,
    /// Pin function enables per channel
    pin_enables: [u32; N],
    /// Last-converted-data register
    last_converted: u16,
    /// Number of software resets
    resets: u32,
    /// Number of `enable_channel` calls
    channel_enables: u32,
    /// Number of start triggers
    starts: u32,
    /// Number of last-converted-data reads
    drains: u32,
}

impl<const N: usize> Default for SimAdc<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> SimAdc<N> {
    /// Create an idle converter with every channel disabled
    pub const fn new() -> Self {
        Self {
            results: [0; N],
            eoc: [false; N],
            enabled: 0,
            pin_enables: [0; N],
            last_converted: 0,
            resets: 0,
            channel_enables: 0,
            starts: 0,
            drains: 0,
        }
    }

    /// Latch a finished conversion on `channel`
    ///
    /// Sets the result register and end-of-conversion flag regardless of
    /// whether the channel is enabled, so tests can also model stale data
    /// on a channel that was just dropped from the pass.
    pub fn complete(&mut self, channel: ChannelId, value: u16) {
        let idx = channel as usize;
        if idx < N {
            self.results[idx] = value;
            self.eoc[idx] = true;
            self.last_converted = value;
        }
    }

    /// Latch one conversion for every enabled channel
    ///
    /// `value_for` maps a channel id to the value it converts to.
    pub fn complete_pass(&mut self, mut value_for: impl FnMut(ChannelId) -> u16) {
        for idx in 0..N {
            let channel = idx as ChannelId;
            if self.is_channel_enabled(channel) {
                self.complete(channel, value_for(channel));
            }
        }
    }

    /// Check whether `channel` is part of the programmed pass
    pub fn is_channel_enabled(&self, channel: ChannelId) -> bool {
        (channel as usize) < N && self.enabled & (1 << channel) != 0
    }

    /// Bitmask of channels enabled since the last reset
    pub fn enabled_mask(&self) -> u32 {
        self.enabled
    }

    /// Number of times `channel`'s pin was switched to analog
    pub fn pin_enable_count(&self, channel: ChannelId) -> u32 {
        self.pin_enables.get(channel as usize).copied().unwrap_or(0)
    }

    /// Value held in the last-converted-data register
    pub fn last_converted(&self) -> u16 {
        self.last_converted
    }

    /// Number of software resets issued
    pub fn reset_count(&self) -> u32 {
        self.resets
    }

    /// Number of `enable_channel` calls since creation
    pub fn channel_enable_count(&self) -> u32 {
        self.channel_enables
    }

    /// Number of start triggers issued
    pub fn start_count(&self) -> u32 {
        self.starts
    }

    /// Number of last-converted-data register reads
    pub fn drain_count(&self) -> u32 {
        self.drains
    }

    /// Check whether any end-of-conversion flag is still set
    pub fn has_pending(&self) -> bool {
        self.eoc.iter().any(|&f| f)
    }
}

impl<const N: usize> Converter for SimAdc<N> {
    fn reset(&mut self) {
        self.resets += 1;
        self.enabled = 0;
        self.eoc = [false; N];
        self.results = [0; N];
    }

    fn enable_channel(&mut self, channel: ChannelId) {
        if (channel as usize) < N {
            self.enabled |= 1 << channel;
            self.channel_enables += 1;
        }
    }

    fn conversion_complete(&self, channel: ChannelId) -> bool {
        self.eoc.get(channel as usize).copied().unwrap_or(false)
    }

    fn read_value(&mut self, channel: ChannelId) -> u16 {
        let idx = channel as usize;
        if idx >= N {
            return 0;
        }
        self.eoc[idx] = false;
        self.results[idx]
    }

    fn drain_ready(&mut self) {
        self.drains += 1;
    }

    fn start_conversion(&mut self) {
        self.starts += 1;
    }
}

impl<const N: usize> AnalogPins for SimAdc<N> {
    fn enable_analog_input(&mut self, channel: ChannelId) {
        if let Some(count) = self.pin_enables.get_mut(channel as usize) {
            *count += 1;
        }
    }
}
