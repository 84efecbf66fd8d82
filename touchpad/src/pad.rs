//! Per-pad debounce state
//!
//! A pad moves between three states:
//!
//! - Idle: not touched, no touch candidate.
//! - Pending: touched for less than `delay` ticks. `first_touched` holds the start of the touch.
//! - Triggered: touch confirmed and reported. `triggered` holds the time of the last report,
//!   and repeats are measured from it.
//!
//! A reading above `released` always returns the pad to Idle. The caller restores the hardware
//! threshold and then calls [`PadState::reset`] and [`PadState::release`].

use crate::{PadConfig, TouchType};

/// What the interrupt pass must do after a pad processed a reading
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Transition {
    /// Reading is above the release threshold. Restore the touch threshold, reset the pad and
    /// report a release if it was triggered.
    Released,
    /// Touch path taken. Raise the hardware threshold to `THRESHOLD_MAX` and report the event, if
    /// any.
    Held(Option<TouchType>),
    /// Pad is triggered and does not repeat. Nothing to do.
    Unchanged,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PadState {
    /// Start of the current touch candidate
    pub first_touched: Option<u32>,
    /// Time of the last reading processed for this pad
    pub last_seen: Option<u32>,
    /// Time of the last touch or repeat report. `Some` while the touch is confirmed.
    pub triggered: Option<u32>,
}

impl PadState {
    pub const fn new() -> Self {
        Self {
            first_touched: None,
            last_seen: None,
            triggered: None,
        }
    }

    pub fn is_triggered(&self) -> bool {
        self.triggered.is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.triggered.is_none() && self.first_touched.is_some()
    }

    /// Forget the current touch candidate. A confirmed touch stays confirmed until
    /// [`PadState::release`].
    pub fn reset(&mut self) {
        self.first_touched = None;
        self.last_seen = None;
    }

    /// End a confirmed touch. Returns the release event if there was one to end.
    pub fn release(&mut self) -> Option<TouchType> {
        self.triggered.take().map(|_| TouchType::Release)
    }

    /// Back to Idle, forgetting any confirmed touch without reporting it
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    /// Process a new reading taken at `now`
    ///
    /// Elapsed times are computed with wrapping arithmetic, so delays and repeats stay correct
    /// across one wrap of the tick counter.
    pub fn update(&mut self, config: &PadConfig, raw: u16, now: u32) -> Transition {
        self.last_seen = Some(now);

        if raw > config.released {
            return Transition::Released;
        }

        let event = match (self.triggered, self.first_touched) {
            (Some(_), _) if config.repeat == 0 => return Transition::Unchanged,
            (Some(last), _) => {
                if now.wrapping_sub(last) >= config.repeat {
                    self.triggered = Some(now);
                    Some(TouchType::Repeat)
                } else {
                    None
                }
            }
            (None, _) if config.delay == 0 => {
                self.triggered = Some(now);
                Some(TouchType::Touch)
            }
            (None, None) => {
                self.first_touched = Some(now);
                None
            }
            (None, Some(first)) => {
                if now.wrapping_sub(first) >= config.delay {
                    self.triggered = Some(now);
                    Some(TouchType::Touch)
                } else {
                    None
                }
            }
        };

        Transition::Held(event)
    }
}
