//! Interrupt registration
//!
//! The acquisition engine only needs "run this routine when the converter
//! raises its completion interrupt". How the vector is installed is left
//! to the platform.

/// Interrupt service routine
pub type InterruptHandler = fn();

/// Interrupt priority level
///
/// Four levels, matching the INT0..INT3 groups of the AVR32 INTC.
/// Higher levels preempt lower ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InterruptPriority {
    #[default]
    Level0,
    Level1,
    Level2,
    Level3,
}

/// Errors from interrupt registration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IrqError {
    /// A handler is already bound to this line
    AlreadyRegistered,
    /// The controller does not support the requested priority
    UnsupportedPriority,
}

/// Interrupt controller binding for one peripheral interrupt line
pub trait InterruptController {
    /// Bind `handler` to the line and enable it
    fn register(
        &mut self,
        handler: InterruptHandler,
        priority: InterruptPriority,
    ) -> Result<(), IrqError>;
}
