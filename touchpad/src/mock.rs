//! Recording fake of the touch peripheral for unit tests

use std::cell::Cell;
use std::rc::Rc;

use crate::hal::{Pad, TouchHardware, TriggerMode};
use crate::PAD_COUNT;

/// Pad binding used by the tests: channel `i` on pad `i`, pins are gpio numbers
pub const PADS: [Pad<u8, u8>; PAD_COUNT] = crate::ESP32_PADS;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Op {
    Acquire,
    Release,
    AttachInterrupt,
    DetachInterrupt,
    EnableInterrupt,
    DisableInterrupt,
    SetTriggerMode,
    ConfigureChannel,
    ReleasePin,
    ReadRaw,
    Threshold,
    SetThreshold,
    InterruptStatus,
    ClearInterruptStatus,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FakeError(pub Op);

pub struct FakeHardware {
    /// Every call, in order
    pub log: Vec<Op>,
    pub thresholds: [u16; PAD_COUNT],
    pub raw: [u16; PAD_COUNT],
    pub status: u32,
    pub time: u32,
    pub trigger_mode: Option<TriggerMode>,
    pub released_pins: Vec<u8>,
    pub acquired: bool,
    /// Number of `release` calls, readable after the fake was moved into a controller
    pub releases: Rc<Cell<usize>>,
    pub attached: bool,
    pub interrupts_enabled: bool,
    /// Operation to fail
    pub fail: Option<Op>,
    /// Only fail `fail` for this channel
    pub fail_channel: Option<u8>,
}

impl FakeHardware {
    pub fn new() -> Self {
        Self {
            log: Vec::new(),
            thresholds: [0; PAD_COUNT],
            raw: [u16::MAX; PAD_COUNT],
            status: 0,
            time: 0,
            trigger_mode: None,
            released_pins: Vec::new(),
            acquired: false,
            releases: Rc::new(Cell::new(0)),
            attached: false,
            interrupts_enabled: false,
            fail: None,
            fail_channel: None,
        }
    }

    pub fn failing(op: Op) -> Self {
        Self {
            fail: Some(op),
            ..Self::new()
        }
    }

    pub fn count(&self, op: Op) -> usize {
        self.log.iter().filter(|x| **x == op).count()
    }

    /// Present a measurement for one pad at the next interrupt
    pub fn measure(&mut self, pad: usize, raw: u16) {
        self.raw[pad] = raw;
        self.status |= 1 << pad;
    }

    fn call(&mut self, op: Op, channel: Option<u8>) -> Result<(), FakeError> {
        self.log.push(op);
        let channel_matches = match (self.fail_channel, channel) {
            (Some(fail), Some(channel)) => fail == channel,
            (Some(_), None) => false,
            (None, _) => true,
        };
        if self.fail == Some(op) && channel_matches {
            Err(FakeError(op))
        } else {
            Ok(())
        }
    }
}

impl TouchHardware for FakeHardware {
    type Error = FakeError;
    type Handle = ();
    type Channel = u8;
    type Pin = u8;

    fn acquire(&mut self) -> Result<(), FakeError> {
        self.call(Op::Acquire, None)?;
        self.acquired = true;
        Ok(())
    }

    fn release(&mut self, _handle: ()) {
        self.log.push(Op::Release);
        self.releases.set(self.releases.get() + 1);
        self.acquired = false;
    }

    fn attach_interrupt(&mut self, _handle: &()) -> Result<(), FakeError> {
        self.call(Op::AttachInterrupt, None)?;
        self.attached = true;
        Ok(())
    }

    fn detach_interrupt(&mut self, _handle: &()) {
        self.log.push(Op::DetachInterrupt);
        self.attached = false;
    }

    fn enable_interrupt(&mut self, _handle: &()) -> Result<(), FakeError> {
        self.call(Op::EnableInterrupt, None)?;
        self.interrupts_enabled = true;
        Ok(())
    }

    fn disable_interrupt(&mut self, _handle: &()) {
        self.log.push(Op::DisableInterrupt);
        self.interrupts_enabled = false;
    }

    fn set_trigger_mode(&mut self, mode: TriggerMode) -> Result<(), FakeError> {
        self.call(Op::SetTriggerMode, None)?;
        self.trigger_mode = Some(mode);
        Ok(())
    }

    fn configure_channel(&mut self, channel: u8, threshold: u16) -> Result<(), FakeError> {
        self.call(Op::ConfigureChannel, Some(channel))?;
        self.thresholds[channel as usize] = threshold;
        Ok(())
    }

    fn release_pin(&mut self, pin: u8) -> Result<(), FakeError> {
        self.call(Op::ReleasePin, None)?;
        self.released_pins.push(pin);
        Ok(())
    }

    fn read_raw(&mut self, channel: u8) -> u16 {
        self.log.push(Op::ReadRaw);
        self.raw[channel as usize]
    }

    fn threshold(&mut self, channel: u8) -> Result<u16, FakeError> {
        self.call(Op::Threshold, Some(channel))?;
        Ok(self.thresholds[channel as usize])
    }

    fn set_threshold(&mut self, channel: u8, threshold: u16) -> Result<(), FakeError> {
        self.call(Op::SetThreshold, Some(channel))?;
        self.thresholds[channel as usize] = threshold;
        Ok(())
    }

    fn interrupt_status(&mut self) -> u32 {
        self.log.push(Op::InterruptStatus);
        self.status
    }

    fn clear_interrupt_status(&mut self) {
        self.log.push(Op::ClearInterruptStatus);
        self.status = 0;
    }

    fn now(&self) -> u32 {
        self.time
    }
}
