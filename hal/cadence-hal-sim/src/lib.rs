//! Simulated HAL for the Cadence acquisition engine
//!
//! This crate implements the `cadence-hal` traits in memory so the engine
//! can be exercised on the host without a board. Every register access is
//! recorded so tests can assert on the exact hardware traffic:
//!
//! - [`SimAdc`] - Result registers, end-of-conversion flags, channel and pin enables
//! - [`SimTimer`] - Trigger timers with a frequency ceiling
//! - [`SimInterrupts`] - A single interrupt line that can be fired on demand
//!
//! # Usage
//!
//! ```
//! use cadence_hal::Converter;
//! use cadence_hal_sim::SimAdc;
//!
//! let mut adc = SimAdc::<8>::new();
//! adc.reset();
//! adc.enable_channel(3);
//! adc.complete(3, 512);
//!
//! assert!(adc.conversion_complete(3));
//! assert_eq!(adc.read_value(3), 512);
//! assert!(!adc.conversion_complete(3));
//! ```

#![no_std]
#![deny(unsafe_code)]

pub mod adc;
pub mod irq;
pub mod timer;

pub use adc::SimAdc;
pub use irq::SimInterrupts;
pub use timer::SimTimer;
