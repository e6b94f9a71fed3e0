//! Interrupt-driven analog acquisition
//!
//! The engine is split along the two execution contexts that touch it:
//!
//! - `engine`: construction and caller-context control (start, stop, reads)
//! - `sequencer`: rebuilds the active-channel list and programs the converter
//! - `dispatch`: the completion-interrupt routine
//!
//! Shared state lives in [`ChannelState`] and [`DeviceState`], both made of
//! atomics with a single designated writer per field in steady state.

pub mod channel;
pub mod device;
mod dispatch;
pub mod engine;
mod sequencer;
pub mod sink;
pub mod smoothing;

pub use channel::{ChannelSnapshot, ChannelState};
pub use device::{DeviceSnapshot, DeviceState};
pub use engine::AcquisitionEngine;
pub use sink::{NullSink, QueueSink, Sample, SampleQueue, SampleReader, SampleSink};
pub use smoothing::SmoothingFilter;
