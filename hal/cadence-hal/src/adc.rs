//! Analog-to-digital converter abstractions
//!
//! These traits model the register-level operations of a multi-channel
//! successive-approximation converter with per-channel end-of-conversion
//! flags, such as the AVR32 UC3 or SAM7 ADC blocks.

/// Analog channel identifier (index into the board's analog pin table)
pub type ChannelId = u8;

/// Converter register access
///
/// Every method maps to one or two register accesses and must not block:
/// the acquisition engine calls these from interrupt context.
pub trait Converter {
    /// Software-reset the converter and re-apply the global configuration
    ///
    /// Leaves every channel disabled, every end-of-conversion flag clear
    /// and the end-of-conversion interrupt enabled. Results latched before
    /// the reset must not be reported afterwards. Called before the
    /// channel list is reprogrammed.
    fn reset(&mut self);

    /// Include a channel in the next conversion pass
    fn enable_channel(&mut self, channel: ChannelId);

    /// Check the channel's end-of-conversion flag
    fn conversion_complete(&self, channel: ChannelId) -> bool;

    /// Read the channel's result register
    ///
    /// Reading clears the channel's end-of-conversion flag.
    fn read_value(&mut self, channel: ChannelId) -> u16;

    /// Read the last-converted-data register to acknowledge the capture
    ///
    /// The data-ready interrupt stays asserted until this register is read.
    fn drain_ready(&mut self);

    /// Trigger one conversion pass over every enabled channel
    fn start_conversion(&mut self);
}

/// Analog input path control
pub trait AnalogPins {
    /// Switch the channel's pin to its analog peripheral function
    ///
    /// Must be idempotent.
    fn enable_analog_input(&mut self, channel: ChannelId);
}

/// Complete converter interface
///
/// The engine needs both the converter and the pin multiplexer whenever it
/// reprograms the channel list.
pub trait AdcHardware: Converter + AnalogPins {}

// Blanket implementation
impl<T: Converter + AnalogPins> AdcHardware for T {}
