//! State shared between the control-loop activities.

use core::sync::atomic::{AtomicU32, Ordering};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

use crate::drivers::setpoint::{Setpoint, SetpointError};

/// `f32` cell stored as its bit pattern in an `AtomicU32`.
///
/// Meant for one writer and one reader: a load always sees a whole value
/// written by some store, never a mix of two.
pub struct SharedF32(AtomicU32);

impl SharedF32 {
    pub const fn new(value: f32) -> Self {
        Self(AtomicU32::new(value.to_bits()))
    }

    pub fn load(&self) -> f32 {
        f32::from_bits(self.0.load(Ordering::Acquire))
    }

    pub fn store(&self, value: f32) {
        self.0.store(value.to_bits(), Ordering::Release);
    }
}

/// Single-slot setpoint mailbox.
///
/// A send while the slot still holds an unconsumed value fails and hands the
/// new value back inside the error; the pending one stays.
pub struct SetpointChannel {
    slot: Channel<CriticalSectionRawMutex, Setpoint, 1>,
}

impl SetpointChannel {
    pub const fn new() -> Self {
        Self { slot: Channel::new() }
    }

    pub fn try_send(&self, setpoint: Setpoint) -> Result<(), SetpointError> {
        self.slot
            .try_send(setpoint)
            .map_err(|_| SetpointError::ChannelFull(setpoint))
    }

    /// Waits for the next setpoint and empties the slot.
    pub async fn receive(&self) -> Setpoint {
        self.slot.receive().await
    }

    pub fn try_receive(&self) -> Option<Setpoint> {
        self.slot.try_receive().ok()
    }

    pub fn is_pending(&self) -> bool {
        self.slot.is_full()
    }
}

impl Default for SetpointChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_futures::block_on;

    #[test]
    fn cell_round_trips_special_values() {
        let cell = SharedF32::new(4.0);
        assert_eq!(cell.load(), 4.0);
        cell.store(-0.0);
        assert!(cell.load().is_sign_negative());
        cell.store(f32::NAN);
        assert!(cell.load().is_nan());
    }

    #[test]
    fn send_then_receive() {
        let ch = SetpointChannel::new();
        let sp = Setpoint::new(6.0).unwrap();
        assert!(ch.try_send(sp).is_ok());
        assert!(ch.is_pending());
        assert_eq!(block_on(ch.receive()).hz(), 6.0);
        assert!(!ch.is_pending());
    }

    #[test]
    fn full_slot_rejects_newer_value() {
        let ch = SetpointChannel::new();
        let first = Setpoint::new(6.0).unwrap();
        let second = Setpoint::new(8.0).unwrap();
        ch.try_send(first).unwrap();
        assert_eq!(ch.try_send(second), Err(SetpointError::ChannelFull(second)));
        assert_eq!(ch.try_receive(), Some(first));
        assert_eq!(ch.try_receive(), None);
        // slot is free again
        assert!(ch.try_send(second).is_ok());
        assert_eq!(block_on(ch.receive()), second);
    }
}
