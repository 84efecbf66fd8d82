#![cfg_attr(not(test), no_std)]

pub mod controller;
pub mod error;
pub mod hal;
pub mod pad;
pub mod queue;
pub mod shared;

#[cfg(test)]
mod mock;

pub use controller::PadController;
pub use error::Error;
pub use hal::{Pad, TouchHardware, TriggerMode, ESP32_PADS};
pub use pad::{PadState, Transition};
pub use queue::{EventConsumer, EventProducer, EventQueue};
pub use shared::SharedPads;

/// Number of touch pads on this hardware generation
pub const PAD_COUNT: usize = 10;

/// Largest value the threshold register can hold.
///
/// A held pad is programmed with this threshold so every measurement keeps interrupting until the
/// reading rises above the pad's `released` threshold.
pub const THRESHOLD_MAX: u16 = u16::MAX;

/// Kind of classified touch event
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TouchType {
    /// A touch was confirmed
    Touch,
    /// The pad is still held and another repeat interval elapsed
    Repeat,
    /// A confirmed touch ended
    Release,
}

/// A classified event, handed to the registered callback from interrupt context
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TouchEvent {
    /// Pad index, 0..PAD_COUNT
    pub pad: u8,
    pub kind: TouchType,
    /// Tick count shared by every pad serviced in the same interrupt
    pub timestamp: u64,
}

/// Configuration for a single touch pad
///
/// All times are in ticks of the hardware counter returned by [`TouchHardware::now`].
///
/// The controller does not reject configurations failing [`PadConfig::is_valid`]; keeping
/// `released` above `touched` on enabled pads is up to the caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PadConfig {
    /// Ticks the pad must stay touched before a touch is reported. 0 reports on the first touched
    /// reading.
    pub delay: u32,
    /// Ticks between repeat events while the pad is held. 0 disables repeat.
    pub repeat: u32,
    /// Hardware threshold. The peripheral interrupts when a reading falls below it. A value of 0
    /// disables the pad.
    pub touched: u16,
    /// Once touched, readings must rise above this value to release. Must be greater than
    /// `touched`; the gap between the two is the hysteresis band.
    pub released: u16,
}

impl PadConfig {
    pub const fn new(delay: u32, repeat: u32, touched: u16, released: u16) -> Self {
        Self {
            delay,
            repeat,
            touched,
            released,
        }
    }

    /// Configuration of a pad that is not used for detection
    pub const fn disabled() -> Self {
        Self::new(0, 0, 0, 0)
    }

    pub const fn is_enabled(&self) -> bool {
        self.touched > 0
    }

    /// An enabled pad needs a hysteresis band above its touch threshold
    pub const fn is_valid(&self) -> bool {
        !self.is_enabled() || self.released > self.touched
    }
}

impl Default for PadConfig {
    fn default() -> Self {
        DEFAULT_PAD_CONFIG
    }
}

pub const DEFAULT_PAD_CONFIG: PadConfig = PadConfig::disabled();
