//! A pad controller shared between its interrupt handler and the rest of the application
//!
//! The interrupt pass and the configuration calls both write the threshold registers. Keeping the
//! controller in a [`SharedPads`] puts every access behind the same critical section, so a
//! configuration change can never interleave with an interrupt pass.
//!
//! ```ignore
//! static PADS: SharedPads<Esp32Touch, fn(TouchEvent)> = SharedPads::new();
//!
//! #[interrupt]
//! fn TOUCH() {
//!     PADS.on_interrupt();
//! }
//! ```

use core::cell::RefCell;

use critical_section::Mutex;

use crate::controller::PadController;
use crate::hal::TouchHardware;
use crate::TouchEvent;

pub struct SharedPads<H: TouchHardware, C> {
    inner: Mutex<RefCell<Option<PadController<H, C>>>>,
}

impl<H, C> SharedPads<H, C>
where
    H: TouchHardware,
    C: FnMut(TouchEvent),
{
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(None)),
        }
    }

    /// Hand the controller over. Returns the previously installed one, if any.
    pub fn install(&self, pads: PadController<H, C>) -> Option<PadController<H, C>> {
        critical_section::with(|cs| self.inner.borrow(cs).replace(Some(pads)))
    }

    /// Take the controller back
    pub fn remove(&self) -> Option<PadController<H, C>> {
        critical_section::with(|cs| self.inner.borrow(cs).take())
    }

    /// Run `f` on the controller with interrupts held off. Returns `None` if nothing is
    /// installed.
    pub fn lock<R>(&self, f: impl FnOnce(&mut PadController<H, C>) -> R) -> Option<R> {
        critical_section::with(|cs| self.inner.borrow(cs).borrow_mut().as_mut().map(f))
    }

    /// Entry point for the touch peripheral interrupt handler
    pub fn on_interrupt(&self) {
        self.lock(|pads| {
            if let Err(_err) = pads.service_interrupt() {
                #[cfg(feature = "defmt")]
                defmt::warn!("touch interrupt aborted: {}", defmt::Debug2Format(&_err));
            }
        });
    }
}

impl<H, C> Default for SharedPads<H, C>
where
    H: TouchHardware,
    C: FnMut(TouchEvent),
{
    fn default() -> Self {
        Self::new()
    }
}
