//! Conversion trigger timer
//!
//! Some converters can be started by a hardware timer instead of a
//! software trigger. In that mode the engine never restarts a pass itself.

/// Timer identifier
pub type TimerId = u8;

/// Hardware timer able to clock conversions
pub trait TriggerTimer {
    /// Check whether `timer` exists and can be routed to the converter
    fn is_valid_timer(&self, timer: TimerId) -> bool;

    /// Program `timer` to trigger conversions at `frequency_hz`
    ///
    /// Returns the frequency actually achieved, or 0 if the timer cannot
    /// clock the converter.
    fn configure(&mut self, timer: TimerId, frequency_hz: u32) -> u32;
}
