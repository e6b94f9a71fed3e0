//! Active-set rebuild
//!
//! The active list is always rebuilt whole from the channels' `op_pending`
//! flags, never patched in place. Membership is therefore decided in one
//! place and a half-edited list is never visible to the interrupt.

use heapless::Vec;

use cadence_hal::{AdcHardware, ChannelId};

use super::engine::AcquisitionEngine;

impl<const N: usize> AcquisitionEngine<N> {
    /// Recollect pending channels and program the converter with them
    ///
    /// Channels are scanned in ascending id order, which is also the
    /// converter's physical scan order. Returns the new active count.
    pub(super) fn rebuild_active_set<H: AdcHardware>(&self, hw: &mut H) -> usize {
        // Clear first so a stop landing mid-scan forces another rebuild
        self.device.clear_dirty();
        hw.reset();

        let mut active: Vec<ChannelId, N> = Vec::new();
        for channel in self.configured().iter().filter(|ch| ch.is_pending()) {
            let id = channel.id();
            hw.enable_channel(id);
            hw.enable_analog_input(id);
            let _ = active.push(id);
        }

        self.device.set_active(&active);
        self.device.set_cursor(0);

        trace!("active set rebuilt: {} channels", active.len());
        active.len()
    }
}
