//! Cadence Hardware Abstraction Layer
//!
//! This crate defines the hardware collaborators the acquisition engine
//! needs. Chip-specific HALs implement them on top of their register
//! blocks; `cadence-hal-sim` implements them in memory for host testing.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  cadence-core (acquisition engine)      │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  cadence-hal (this crate - traits)      │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │  chip HAL     │       │ cadence-hal-  │
//! │  (registers)  │       │     sim       │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`adc::Converter`], [`adc::AnalogPins`] - Conversion engine and input path
//! - [`timer::TriggerTimer`] - Hardware conversion clock
//! - [`irq::InterruptController`] - Completion interrupt registration

#![no_std]
#![deny(unsafe_code)]

pub mod adc;
pub mod irq;
pub mod timer;

// Re-export key traits at crate root for convenience
pub use adc::{AdcHardware, AnalogPins, ChannelId, Converter};
pub use irq::{InterruptController, InterruptHandler, InterruptPriority, IrqError};
pub use timer::{TimerId, TriggerTimer};
