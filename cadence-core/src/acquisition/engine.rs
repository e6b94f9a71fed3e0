//! Acquisition engine and caller-context control
//!
//! The engine owns every channel's state and the converter's sequencing
//! state. Hardware handles are passed into each operation rather than
//! stored, so the same engine can be driven by a real converter in
//! firmware and by the simulator in tests.
//!
//! # Start/stop races
//!
//! `start` and `stop` run in normal execution and can be preempted by
//! [`on_batch_ready`](AcquisitionEngine::on_batch_ready) at any point:
//!
//! - A channel started while a pass is in flight joins at the next rebuild.
//! - A channel stopped while its conversion is in flight may still have
//!   that one result read by the interrupt. It is discarded, not counted.
//!   A result still latched when the last channel stops is dropped by the
//!   converter reset of the next start.
//! - In hardware clock mode a pass can finish while `start` is still
//!   rebuilding. `running` is raised before the rebuild so an auto-stop
//!   from that pass leaves the device idle rather than running and empty.

use cadence_hal::{
    AdcHardware, ChannelId, InterruptController, InterruptHandler, InterruptPriority, TimerId,
    TriggerTimer,
};

use crate::config::{is_valid_smoothing_len, AdcConfig, ClockMode};
use crate::error::AdcError;

use super::channel::{ChannelSnapshot, ChannelState};
use super::device::{DeviceSnapshot, DeviceState};

/// Interrupt-driven acquisition engine for one converter
///
/// `N` is the number of channel slots compiled in; the configured channel
/// count may be lower.
#[derive(Debug)]
pub struct AcquisitionEngine<const N: usize> {
    pub(super) channels: [ChannelState; N],
    pub(super) channel_count: u8,
    pub(super) device: DeviceState<N>,
}

impl<const N: usize> AcquisitionEngine<N> {
    /// Build an idle engine from a configuration
    pub fn new(config: &AdcConfig) -> Result<Self, AdcError> {
        config.validate()?;

        if config.channel_count as usize > N {
            return Err(AdcError::TooManyChannels);
        }

        let engine = Self {
            channels: core::array::from_fn(|i| ChannelState::new(i as ChannelId)),
            channel_count: config.channel_count,
            device: DeviceState::new(config.clock_mode),
        };

        for (channel, settings) in engine.channels.iter().zip(config.channels.iter()) {
            channel.filter().configure(settings.smoothing_window_len);
            channel.set_stream_smoothed(settings.stream_smoothed);
        }

        debug!(
            "acquisition engine ready: {} channels",
            config.channel_count
        );

        Ok(engine)
    }

    /// Reset the converter and bind the completion interrupt
    ///
    /// `handler` must end up calling [`on_batch_ready`](Self::on_batch_ready)
    /// on this engine. Call once at system init.
    pub fn init<H, I>(
        &self,
        hw: &mut H,
        irq: &mut I,
        handler: InterruptHandler,
        priority: InterruptPriority,
    ) -> Result<(), AdcError>
    where
        H: AdcHardware,
        I: InterruptController,
    {
        hw.reset();
        irq.register(handler, priority)?;
        debug!("completion interrupt bound");
        Ok(())
    }

    /// Number of configured channels
    pub fn channel_count(&self) -> u8 {
        self.channel_count
    }

    /// Look up a configured channel
    pub fn channel(&self, id: ChannelId) -> Result<&ChannelState, AdcError> {
        self.configured()
            .get(id as usize)
            .ok_or(AdcError::InvalidChannel)
    }

    pub(super) fn configured(&self) -> &[ChannelState] {
        &self.channels[..self.channel_count as usize]
    }

    /// Begin acquiring on a channel
    ///
    /// A `sample_count` of zero or `free_running` set keeps the channel
    /// sampling until stopped. Starting an active channel does nothing.
    pub fn start<H: AdcHardware>(
        &self,
        hw: &mut H,
        id: ChannelId,
        sample_count: u32,
        free_running: bool,
    ) -> Result<(), AdcError> {
        let channel = self.channel(id)?;

        if channel.is_pending() {
            trace!("channel {} already active", id);
            return Ok(());
        }

        channel.arm(sample_count, free_running);
        channel.set_pending(true);
        self.device.mark_dirty();

        if !self.device.is_running() {
            // Before the rebuild, so an auto-stop from the first pass sticks
            self.device.set_running(true);
            self.rebuild_active_set(hw);
            if self.device.clock_mode() == ClockMode::Software {
                hw.start_conversion();
            }
        }

        debug!("channel {} started: {} samples", id, sample_count);
        Ok(())
    }

    /// Stop acquiring on a channel
    ///
    /// Discards any unread value. Stopping an inactive channel does nothing.
    pub fn stop(&self, id: ChannelId) -> Result<(), AdcError> {
        let channel = self.channel(id)?;

        if !channel.is_pending() {
            return Ok(());
        }

        self.halt(channel, true);
        debug!("channel {} stopped", id);
        Ok(())
    }

    /// Remove a channel from the active set
    ///
    /// Shared by explicit stop and auto-stop. The auto-stop keeps the final
    /// value readable.
    pub(super) fn halt(&self, channel: &ChannelState, discard_value: bool) {
        channel.set_pending(false);
        if discard_value {
            channel.clear_fresh();
        }
        self.device.mark_dirty();

        if !self.configured().iter().any(ChannelState::is_pending) {
            self.device.set_running(false);
            self.device.clear_active();
        }
    }

    /// Take a channel's latest value and whether it was unread
    pub fn read_latest(&self, id: ChannelId) -> Result<(u16, bool), AdcError> {
        Ok(self.channel(id)?.consume())
    }

    /// Check whether a channel is part of the active set
    pub fn is_active(&self, id: ChannelId) -> Result<bool, AdcError> {
        Ok(self.channel(id)?.is_pending())
    }

    /// Check whether a bounded acquisition has finished
    pub fn is_done(&self, id: ChannelId) -> Result<bool, AdcError> {
        Ok(self.channel(id)?.is_done())
    }

    /// Finished samples since the channel was last started
    pub fn samples_captured(&self, id: ChannelId) -> Result<u32, AdcError> {
        Ok(self.channel(id)?.samples_captured())
    }

    /// Set a channel's smoothing window
    ///
    /// `len` must be 0 (off) or a power of two up to 64. The channel must
    /// be inactive.
    pub fn set_smoothing(&self, id: ChannelId, len: u8) -> Result<(), AdcError> {
        let channel = self.channel(id)?;

        if channel.is_pending() {
            return Err(AdcError::Busy);
        }

        if !is_valid_smoothing_len(len) {
            return Err(AdcError::InvalidSmoothingLength);
        }

        channel.filter().configure(len);
        Ok(())
    }

    /// Choose whether smoothed samples are also streamed to the sink
    pub fn set_smoothed_streaming(&self, id: ChannelId, stream: bool) -> Result<(), AdcError> {
        self.channel(id)?.set_stream_smoothed(stream);
        Ok(())
    }

    /// Clear a channel's smoothing history
    pub fn flush_smoothing(&self, id: ChannelId) -> Result<(), AdcError> {
        let channel = self.channel(id)?;

        if channel.is_pending() {
            return Err(AdcError::Busy);
        }

        channel.filter().reset();
        Ok(())
    }

    /// Select how conversion passes are triggered
    ///
    /// A frequency of 0 selects software triggering. Otherwise `timer_id`
    /// is programmed to clock the converter and the achieved frequency is
    /// returned. Only allowed while no pass is running.
    pub fn set_clock<T: TriggerTimer>(
        &self,
        timer: &mut T,
        timer_id: TimerId,
        frequency_hz: u32,
    ) -> Result<u32, AdcError> {
        if self.device.is_running() {
            return Err(AdcError::Busy);
        }

        if frequency_hz == 0 {
            self.device.set_clock_mode(ClockMode::Software);
            debug!("software-triggered conversions");
            return Ok(0);
        }

        if !timer.is_valid_timer(timer_id) {
            return Err(AdcError::InvalidTimer);
        }

        let achieved = timer.configure(timer_id, frequency_hz);
        if achieved == 0 {
            warn!("timer {} cannot clock the converter", timer_id);
            self.device.set_clock_mode(ClockMode::Software);
            return Err(AdcError::TimerUnsupported);
        }

        self.device.set_clock_mode(ClockMode::Hardware);
        debug!("timer {} clocking conversions at {} Hz", timer_id, achieved);
        Ok(achieved)
    }

    /// Current conversion clock mode
    pub fn clock_mode(&self) -> ClockMode {
        self.device.clock_mode()
    }

    /// Check whether a pass is in flight
    pub fn is_running(&self) -> bool {
        self.device.is_running()
    }

    /// Copy out one channel's state
    pub fn channel_snapshot(&self, id: ChannelId) -> Result<ChannelSnapshot, AdcError> {
        Ok(self.channel(id)?.snapshot())
    }

    /// Copy out the sequencing state
    pub fn device_snapshot(&self) -> DeviceSnapshot<N> {
        self.device.snapshot()
    }
}
