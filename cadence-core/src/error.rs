//! Engine error types
//!
//! Errors only ever surface from caller-context operations. The
//! capture/dispatch routine has no failure path.

use cadence_hal::IrqError;

use crate::config::ConfigError;

/// Errors from acquisition control operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AdcError {
    /// Channel id is outside the configured channel range
    InvalidChannel,
    /// Smoothing length is not zero or a power of two within range
    InvalidSmoothingLength,
    /// Operation needs the channel (or device) to be idle
    Busy,
    /// Timer id does not exist on this board
    InvalidTimer,
    /// Timer cannot clock the converter
    TimerUnsupported,
    /// Configuration names more channels than the engine was built for
    TooManyChannels,
    /// Configuration rejected
    Config(ConfigError),
    /// Interrupt registration failed
    Irq(IrqError),
}

impl From<ConfigError> for AdcError {
    fn from(e: ConfigError) -> Self {
        AdcError::Config(e)
    }
}

impl From<IrqError> for AdcError {
    fn from(e: IrqError) -> Self {
        AdcError::Irq(e)
    }
}
