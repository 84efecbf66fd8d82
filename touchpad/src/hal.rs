//! Capability interface to the capacitive touch peripheral.
//!
//! The controller never touches registers itself. A board support crate implements
//! [`TouchHardware`] for its peripheral driver and routes the peripheral's "measurement done"
//! interrupt to [`PadController::service_interrupt`](crate::PadController::service_interrupt),
//! usually through [`SharedPads::on_interrupt`](crate::SharedPads::on_interrupt).
//!
//! Everything called from the interrupt pass (`read_raw`, `set_threshold`, `interrupt_status`,
//! `clear_interrupt_status`, `now`) must be non-blocking and safe to call from an ISR.

use core::fmt::Debug;

use crate::PAD_COUNT;

/// Which side of the threshold raises the touch interrupt
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TriggerMode {
    /// Interrupt when a reading is below the threshold. Touching a pad lowers its reading, so this
    /// is the mode the controller programs.
    Below,
    /// Interrupt when a reading is above the threshold
    Above,
}

/// Fixed hardware binding of one pad index
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Pad<C, P> {
    /// Channel selector understood by the peripheral
    pub channel: C,
    /// Pin routed to the channel, released when the pad is disabled
    pub pin: P,
}

impl<C, P> Pad<C, P> {
    pub const fn new(channel: C, pin: P) -> Self {
        Self { channel, pin }
    }
}

/// Pad binding of the ESP32 touch sensor, as (touch channel, gpio number)
pub const ESP32_PADS: [Pad<u8, u8>; PAD_COUNT] = [
    Pad::new(0, 4),
    Pad::new(1, 0),
    Pad::new(2, 2),
    Pad::new(3, 15),
    Pad::new(4, 13),
    Pad::new(5, 12),
    Pad::new(6, 14),
    Pad::new(7, 27),
    Pad::new(8, 33),
    Pad::new(9, 32),
];

pub trait TouchHardware {
    /// Error reported by the peripheral driver
    type Error: Debug;
    /// Proof that the peripheral was acquired, returned to `release`
    type Handle;
    type Channel: Copy;
    type Pin: Copy;

    /// Power up and take ownership of the touch peripheral
    fn acquire(&mut self) -> Result<Self::Handle, Self::Error>;
    fn release(&mut self, handle: Self::Handle);

    /// Route the peripheral interrupt to the controller's interrupt pass
    fn attach_interrupt(&mut self, handle: &Self::Handle) -> Result<(), Self::Error>;
    fn detach_interrupt(&mut self, handle: &Self::Handle);
    fn enable_interrupt(&mut self, handle: &Self::Handle) -> Result<(), Self::Error>;
    fn disable_interrupt(&mut self, handle: &Self::Handle);

    fn set_trigger_mode(&mut self, mode: TriggerMode) -> Result<(), Self::Error>;

    /// Enable measurement on a channel with an initial threshold
    fn configure_channel(
        &mut self,
        channel: Self::Channel,
        threshold: u16,
    ) -> Result<(), Self::Error>;
    /// Give the pin back so it can be used for something other than touch sensing
    fn release_pin(&mut self, pin: Self::Pin) -> Result<(), Self::Error>;

    /// Latest measurement of a channel
    fn read_raw(&mut self, channel: Self::Channel) -> u16;
    fn threshold(&mut self, channel: Self::Channel) -> Result<u16, Self::Error>;
    fn set_threshold(&mut self, channel: Self::Channel, threshold: u16) -> Result<(), Self::Error>;

    /// Bitmap of pads with a new measurement. Bit `i` is pad index `i`.
    fn interrupt_status(&mut self) -> u32;
    /// Clear every bit of the status bitmap in one operation
    fn clear_interrupt_status(&mut self);

    /// Monotonic tick counter. Wraps at `u32::MAX`.
    fn now(&self) -> u32;
}
