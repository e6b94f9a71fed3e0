//! Acquisition configuration types
//!
//! These types describe how many analog channels a converter exposes,
//! how conversions are clocked and how each channel is smoothed.

use heapless::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum analog channels per converter
pub const MAX_CHANNELS: usize = 16;

/// Maximum smoothing window (samples)
pub const MAX_SMOOTHING_LEN: u8 = 64;

/// Current configuration layout version
pub const CONFIG_VERSION: u8 = 1;

/// Check a smoothing window length
///
/// Zero disables smoothing; otherwise the window must be a power of two
/// no larger than [`MAX_SMOOTHING_LEN`] so the average is a shift.
pub const fn is_valid_smoothing_len(len: u8) -> bool {
    len == 0 || (len.is_power_of_two() && len <= MAX_SMOOTHING_LEN)
}

/// How conversion passes are started
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ClockMode {
    /// Software trigger; the engine restarts the converter after every pass
    #[default]
    Software,
    /// A hardware timer triggers passes; the engine never restarts them
    Hardware,
}

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Channel count is zero or above [`MAX_CHANNELS`]
    InvalidChannelCount,
    /// Per-channel list length does not match the channel count
    ChannelListMismatch,
    /// Smoothing window for the given channel is invalid
    InvalidSmoothingLength(u8),
    /// Serialization failed
    Serialize,
    /// Deserialization failed
    Deserialize,
    /// Config version mismatch
    VersionMismatch,
}

/// Per-channel configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ChannelConfig {
    /// Moving-average window (0 = no smoothing)
    pub smoothing_window_len: u8,
    /// Forward smoothed samples to the streaming sink as well
    pub stream_smoothed: bool,
}

impl ChannelConfig {
    /// Create an unsmoothed channel config
    pub const fn new() -> Self {
        Self {
            smoothing_window_len: 0,
            stream_smoothed: false,
        }
    }

    /// Create a channel config averaging over `len` samples
    pub const fn smoothed(len: u8) -> Self {
        Self {
            smoothing_window_len: len,
            stream_smoothed: false,
        }
    }

    /// Also forward smoothed samples to the streaming sink
    pub const fn with_streaming(mut self, stream: bool) -> Self {
        self.stream_smoothed = stream;
        self
    }
}

/// Converter acquisition configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AdcConfig {
    /// Layout version (for persisted configs)
    pub version: u8,
    /// Number of analog inputs wired on this board
    pub channel_count: u8,
    /// Initial conversion clock mode
    pub clock_mode: ClockMode,
    /// Per-channel settings, indexed by channel id
    pub channels: Vec<ChannelConfig, MAX_CHANNELS>,
}

impl Default for AdcConfig {
    fn default() -> Self {
        Self::new(8)
    }
}

impl AdcConfig {
    /// Create a config for `channel_count` unsmoothed channels
    ///
    /// Counts above [`MAX_CHANNELS`] are truncated to the limit.
    pub fn new(channel_count: u8) -> Self {
        let count = (channel_count as usize).min(MAX_CHANNELS);
        let mut channels = Vec::new();
        for _ in 0..count {
            let _ = channels.push(ChannelConfig::new());
        }

        Self {
            version: CONFIG_VERSION,
            channel_count: count as u8,
            clock_mode: ClockMode::Software,
            channels,
        }
    }

    /// Set the initial clock mode
    pub fn with_clock_mode(mut self, mode: ClockMode) -> Self {
        self.clock_mode = mode;
        self
    }

    /// Replace one channel's settings
    ///
    /// Ids outside the channel count are ignored.
    pub fn with_channel(mut self, channel: u8, config: ChannelConfig) -> Self {
        if let Some(slot) = self.channels.get_mut(channel as usize) {
            *slot = config;
        }
        self
    }

    /// Look up one channel's settings
    pub fn channel(&self, channel: u8) -> Option<&ChannelConfig> {
        self.channels.get(channel as usize)
    }

    /// Check the config for consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version != CONFIG_VERSION {
            return Err(ConfigError::VersionMismatch);
        }

        if self.channel_count == 0 || self.channel_count as usize > MAX_CHANNELS {
            return Err(ConfigError::InvalidChannelCount);
        }

        if self.channels.len() != self.channel_count as usize {
            return Err(ConfigError::ChannelListMismatch);
        }

        for (id, ch) in self.channels.iter().enumerate() {
            if !is_valid_smoothing_len(ch.smoothing_window_len) {
                return Err(ConfigError::InvalidSmoothingLength(id as u8));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        let config = AdcConfig::default();
        assert_eq!(config.channel_count, 8);
        assert_eq!(config.channels.len(), 8);
        assert_eq!(config.clock_mode, ClockMode::Software);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_channel_count_truncated() {
        let config = AdcConfig::new(40);
        assert_eq!(config.channel_count as usize, MAX_CHANNELS);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_channels_rejected() {
        let config = AdcConfig::new(0);
        assert_eq!(config.validate(), Err(ConfigError::InvalidChannelCount));
    }

    #[test]
    fn test_smoothing_len_rules() {
        assert!(is_valid_smoothing_len(0));
        assert!(is_valid_smoothing_len(1));
        assert!(is_valid_smoothing_len(8));
        assert!(is_valid_smoothing_len(64));
        assert!(!is_valid_smoothing_len(3));
        assert!(!is_valid_smoothing_len(128));
    }

    #[test]
    fn test_bad_smoothing_reports_channel() {
        let config = AdcConfig::new(4).with_channel(2, ChannelConfig::smoothed(6));
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidSmoothingLength(2))
        );
    }

    #[test]
    fn test_with_channel_out_of_range_ignored() {
        let config = AdcConfig::new(2).with_channel(5, ChannelConfig::smoothed(4));
        assert_eq!(config.channels.len(), 2);
        assert!(config.channel(5).is_none());
    }

    #[test]
    fn test_list_mismatch() {
        let mut config = AdcConfig::new(4);
        config.channels.pop();
        assert_eq!(config.validate(), Err(ConfigError::ChannelListMismatch));
    }

    #[test]
    fn test_builder() {
        let config = AdcConfig::new(4)
            .with_clock_mode(ClockMode::Hardware)
            .with_channel(1, ChannelConfig::smoothed(16).with_streaming(true));

        assert_eq!(config.clock_mode, ClockMode::Hardware);
        let ch = config.channel(1).unwrap();
        assert_eq!(ch.smoothing_window_len, 16);
        assert!(ch.stream_smoothed);
    }
}
