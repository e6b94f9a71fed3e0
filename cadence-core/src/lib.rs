//! Board-agnostic analog acquisition for the Cadence peripheral layer
//!
//! This crate contains the interrupt-driven sampling engine that sits
//! between a higher-level runtime and the converter registers:
//!
//! - Per-channel request, smoothing and result state
//! - Active-channel sequencer and hardware (re)programming
//! - Capture/dispatch routine run from the completion interrupt
//! - Power-of-two moving-average smoothing
//! - Non-blocking sample sinks for streaming consumers
//! - Configuration types and persistence
//!
//! All state shared between normal execution and the interrupt is held
//! in atomics and the engine API takes `&self`, so one engine can live in
//! a `static` and be driven from both contexts without locks.
//!
//! # Example
//!
//! ```
//! use cadence_core::{AcquisitionEngine, AdcConfig, NullSink};
//! use cadence_hal_sim::SimAdc;
//!
//! let engine = AcquisitionEngine::<8>::new(&AdcConfig::new(8)).unwrap();
//! let mut adc = SimAdc::<8>::new();
//!
//! // One sample from channel 3
//! engine.start(&mut adc, 3, 1, false).unwrap();
//!
//! // Hardware finishes the conversion and raises the interrupt
//! adc.complete(3, 2048);
//! engine.on_batch_ready(&mut adc, &mut NullSink);
//!
//! assert_eq!(engine.read_latest(3).unwrap(), (2048, true));
//! assert!(engine.is_done(3).unwrap());
//! ```

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

// This must go first so the logging macros are visible to every module
mod fmt;

pub mod acquisition;
pub mod config;
pub mod error;

pub use acquisition::{
    AcquisitionEngine, ChannelSnapshot, ChannelState, DeviceSnapshot, NullSink, QueueSink,
    Sample, SampleQueue, SampleReader, SampleSink, SmoothingFilter,
};
pub use config::{AdcConfig, ChannelConfig, ClockMode, ConfigError};
pub use error::AdcError;
