//! Simulated interrupt line

use cadence_hal::{InterruptController, InterruptHandler, InterruptPriority, IrqError};

/// Simulated interrupt line with at most one bound handler
#[derive(Debug, Clone, Copy, Default)]
pub struct SimInterrupts {
    handler: Option<InterruptHandler>,
    priority: InterruptPriority,
}

impl SimInterrupts {
    /// Create an unbound line
    pub const fn new() -> Self {
        Self {
            handler: None,
            priority: InterruptPriority::Level0,
        }
    }

    /// Check whether a handler has been registered
    pub fn is_registered(&self) -> bool {
        self.handler.is_some()
    }

    /// Priority the handler was registered at
    pub fn priority(&self) -> InterruptPriority {
        self.priority
    }

    /// Raise the interrupt, running the bound handler
    ///
    /// Returns false if nothing is registered.
    pub fn fire(&self) -> bool {
        match self.handler {
            Some(handler) => {
                handler();
                true
            }
            None => false,
        }
    }
}

impl InterruptController for SimInterrupts {
    fn register(
        &mut self,
        handler: InterruptHandler,
        priority: InterruptPriority,
    ) -> Result<(), IrqError> {
        if self.handler.is_some() {
            return Err(IrqError::AlreadyRegistered);
        }
        self.handler = Some(handler);
        self.priority = priority;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::sync::atomic::{AtomicU32, Ordering};

    static FIRED: AtomicU32 = AtomicU32::new(0);

    fn on_irq() {
        FIRED.fetch_add(1, Ordering::SeqCst);
    }

    #[test]
    fn test_register_and_fire() {
        let mut irq = SimInterrupts::new();
        assert!(!irq.fire());

        irq.register(on_irq, InterruptPriority::Level2).unwrap();
        assert!(irq.is_registered());
        assert_eq!(irq.priority(), InterruptPriority::Level2);

        assert!(irq.fire());
        assert_eq!(FIRED.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_double_registration_rejected() {
        let mut irq = SimInterrupts::new();
        irq.register(on_irq, InterruptPriority::Level0).unwrap();
        assert_eq!(
            irq.register(on_irq, InterruptPriority::Level1),
            Err(IrqError::AlreadyRegistered)
        );
    }
}
