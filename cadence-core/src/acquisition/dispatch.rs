//! Capture/dispatch routine
//!
//! Runs once per converter "batch ready" interrupt. Every entry of the
//! active list is checked exactly once, starting from index 0, so a
//! channel whose result was late on the previous pass is picked up now.

use cadence_hal::AdcHardware;

use crate::config::ClockMode;

use super::channel::ChannelState;
use super::engine::AcquisitionEngine;
use super::sink::SampleSink;

impl<const N: usize> AcquisitionEngine<N> {
    /// Service a completed conversion pass
    ///
    /// Call from the converter's completion interrupt. Finished samples go
    /// to the channel's latest value and, for multi-sample requests, to
    /// `sink`. Bounded channels stop themselves once their target is met.
    /// If any channel is still active the next pass is prepared and, in
    /// software clock mode, triggered.
    pub fn on_batch_ready<H, S>(&self, hw: &mut H, sink: &mut S)
    where
        H: AdcHardware,
        S: SampleSink + ?Sized,
    {
        let len = self.device.active_len();

        for index in 0..len {
            self.device.set_cursor(index as u8);
            let id = self.device.active_at(index);

            if !hw.conversion_complete(id) {
                continue;
            }

            let raw = hw.read_value(id);
            hw.drain_ready();

            let Some(channel) = self.configured().get(id as usize) else {
                continue;
            };

            // Stopped between the conversion and this read
            if !channel.is_pending() {
                trace!("channel {} stale sample discarded", id);
                continue;
            }

            self.capture(channel, raw, sink);
        }

        self.device.set_cursor(0);

        if !self.device.is_running() {
            return;
        }

        if self.device.is_dirty() && self.rebuild_active_set(hw) == 0 {
            self.device.set_running(false);
            return;
        }

        if self.device.clock_mode() == ClockMode::Software {
            hw.start_conversion();
        }
    }

    fn capture<S: SampleSink + ?Sized>(&self, channel: &ChannelState, raw: u16, sink: &mut S) {
        channel.publish(raw);

        let filter = channel.filter();
        let smoothed = filter.is_enabled();
        let value = match filter.feed(raw) {
            Some(value) => value,
            // Window still filling
            None => return,
        };

        if smoothed {
            channel.publish(value);
        }

        if (!smoothed || channel.streams_smoothed())
            && sink.is_streaming()
            && channel.expects_stream()
        {
            sink.push(channel.id(), value);
            channel.clear_fresh();
        }

        let captured = channel.record_capture();
        if channel.target_reached(captured) {
            self.halt(channel, false);
            trace!("channel {} finished: {} samples", channel.id(), captured);
        }
    }
}
