//! Touch pad controller
//!
//! [`PadController`] owns the configuration and debounce state of every pad, programs the
//! peripheral thresholds and turns raw measurements into [`TouchEvent`]s.
//!
//! ## Threshold handling
//!
//! The peripheral interrupts while a reading is below a pad's hardware threshold. Idle pads are
//! programmed with their `touched` threshold. As soon as a pad takes the touch path, its threshold
//! is raised to [`THRESHOLD_MAX`] so the peripheral keeps reporting it while held, and the release
//! is detected in software against `released`. The release restores `touched`.
//!
//! ## Concurrency
//!
//! [`PadController::service_interrupt`] runs in interrupt context. Configuration methods that
//! write thresholds (`configure`, `set_pad`, `set_touched`) race with it unless the caller
//! serializes them, either by going through [`SharedPads`](crate::SharedPads) or by only
//! reconfiguring while the interrupt is masked.

use crate::hal::{Pad, TouchHardware, TriggerMode};
use crate::pad::{PadState, Transition};
use crate::{Error, PadConfig, TouchEvent, DEFAULT_PAD_CONFIG, PAD_COUNT, THRESHOLD_MAX};

pub struct PadController<H: TouchHardware, C> {
    hardware: H,
    pads: [Pad<H::Channel, H::Pin>; PAD_COUNT],
    config: [PadConfig; PAD_COUNT],
    state: [PadState; PAD_COUNT],
    handle: Option<H::Handle>,
    enabled: bool,
    callback: Option<C>,
}

impl<H: TouchHardware, C> PadController<H, C> {
    /// Create a controller for the given pad binding. Nothing is done to the hardware until
    /// [`PadController::initialize`].
    pub fn new(hardware: H, pads: [Pad<H::Channel, H::Pin>; PAD_COUNT]) -> Self {
        Self {
            hardware,
            pads,
            config: [DEFAULT_PAD_CONFIG; PAD_COUNT],
            state: [PadState::new(); PAD_COUNT],
            handle: None,
            enabled: true,
            callback: None,
        }
    }

    pub fn hardware(&self) -> &H {
        &self.hardware
    }

    pub fn hardware_mut(&mut self) -> &mut H {
        &mut self.hardware
    }

    pub fn is_initialized(&self) -> bool {
        self.handle.is_some()
    }

    /// Stop using the peripheral. Does nothing if not initialized.
    pub fn deinitialize(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.hardware.disable_interrupt(&handle);
            self.hardware.detach_interrupt(&handle);
            self.hardware.release(handle);
            self.callback = None;

            #[cfg(feature = "defmt")]
            defmt::info!("touch pads deinitialized");
        }
    }

    /// Resume event delivery
    pub fn enable(&mut self) {
        self.enabled = true;
    }

    /// Stop delivering events. Measurements are still processed so delays and repeats keep
    /// running while disabled.
    pub fn disable(&mut self) {
        self.enabled = false;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Apply a configuration to every pad
    ///
    /// Enabled pads get their touch threshold programmed and their state reset. Disabled pads
    /// (`touched == 0`) have their pin released. Stops at the first failure; pads before it
    /// stay configured.
    pub fn configure(&mut self, config: &[PadConfig; PAD_COUNT]) -> Result<(), Error<H::Error>> {
        for (index, pad_config) in config.iter().enumerate() {
            let result = if pad_config.is_enabled() {
                self.set_pad(index as u8, *pad_config)
            } else {
                self.hardware
                    .release_pin(self.pads[index].pin)
                    .map(|()| {
                        self.config[index] = *pad_config;
                        self.state[index].clear();
                    })
                    .map_err(Error::from)
            };

            if let Err(err) = result {
                #[cfg(feature = "defmt")]
                defmt::warn!(
                    "failed to configure touch pad {}: {}",
                    index,
                    defmt::Debug2Format(&err)
                );
                return Err(err);
            }
        }

        Ok(())
    }

    /// Current configuration of a pad
    pub fn config(&self, pad: u8) -> Option<PadConfig> {
        self.config.get(pad as usize).copied()
    }

    /// Debounce state of a pad
    pub fn state(&self, pad: u8) -> Option<&PadState> {
        self.state.get(pad as usize)
    }

    /// Returns true if the pad has a confirmed touch
    pub fn is_triggered(&self, pad: u8) -> bool {
        self.state(pad).map_or(false, PadState::is_triggered)
    }

    /// Replace the whole configuration of a pad, program its touch threshold and reset it
    ///
    /// The configuration is applied as given. On an enabled pad without a hysteresis band (see
    /// [`PadConfig::is_valid`]), readings between `released` and `touched` interrupt but count
    /// as released.
    pub fn set_pad(&mut self, pad: u8, config: PadConfig) -> Result<(), Error<H::Error>> {
        let index = Self::index(pad)?;

        #[cfg(feature = "defmt")]
        if !config.is_valid() {
            defmt::warn!("touch pad {}: released threshold not above touched", pad);
        }

        self.config[index] = config;
        self.reset_pad(index)
    }

    /// Set the touch delay. Takes effect on the next measurement.
    pub fn set_delay(&mut self, pad: u8, delay: u32) -> Result<(), Error<H::Error>> {
        let index = Self::index(pad)?;
        self.config[index].delay = delay;
        Ok(())
    }

    /// Set the repeat interval. Takes effect on the next measurement.
    pub fn set_repeat(&mut self, pad: u8, repeat: u32) -> Result<(), Error<H::Error>> {
        let index = Self::index(pad)?;
        self.config[index].repeat = repeat;
        Ok(())
    }

    /// Set the touch threshold
    ///
    /// The hardware threshold is only written when it still holds the old touch threshold. While
    /// the pad is held the hardware keeps `THRESHOLD_MAX`, and the new value is programmed by the
    /// next release.
    pub fn set_touched(&mut self, pad: u8, touched: u16) -> Result<(), Error<H::Error>> {
        let index = Self::index(pad)?;
        let channel = self.pads[index].channel;

        let current = self.hardware.threshold(channel)?;
        if current == self.config[index].touched {
            self.hardware.set_threshold(channel, touched)?;
        }
        self.config[index].touched = touched;

        Ok(())
    }

    /// Set the release threshold. Only the configuration changes, after checking the channel
    /// answers.
    pub fn set_released(&mut self, pad: u8, released: u16) -> Result<(), Error<H::Error>> {
        let index = Self::index(pad)?;

        self.hardware.threshold(self.pads[index].channel)?;
        self.config[index].released = released;

        Ok(())
    }

    fn index(pad: u8) -> Result<usize, Error<H::Error>> {
        if (pad as usize) < PAD_COUNT {
            Ok(pad as usize)
        } else {
            Err(Error::InvalidPad(pad))
        }
    }

    /// Program the touch threshold and forget any touch candidate. The state is reset even if
    /// the hardware write fails.
    fn reset_pad(&mut self, index: usize) -> Result<(), Error<H::Error>> {
        let result = self
            .hardware
            .set_threshold(self.pads[index].channel, self.config[index].touched);
        self.state[index].reset();
        result.map_err(Error::from)
    }

    /// Clear every pad and give it the disabled configuration
    fn reset_all(&mut self) -> Result<(), Error<H::Error>> {
        self.hardware.set_trigger_mode(TriggerMode::Below)?;

        for index in 0..PAD_COUNT {
            self.state[index].clear();
            self.hardware.configure_channel(self.pads[index].channel, 0)?;
            self.set_pad(index as u8, DEFAULT_PAD_CONFIG)?;
        }

        Ok(())
    }

    /// Enable the interrupt and reset the pads, masking the interrupt again on failure
    fn arm(&mut self, handle: &H::Handle) -> Result<(), Error<H::Error>> {
        self.hardware.enable_interrupt(handle)?;

        if let Err(err) = self.reset_all() {
            self.hardware.disable_interrupt(handle);
            return Err(err);
        }

        Ok(())
    }
}

impl<H, C> PadController<H, C>
where
    H: TouchHardware,
    C: FnMut(TouchEvent),
{
    /// Take the peripheral and start detection
    ///
    /// `callback` is called from interrupt context for every event and must not block. On
    /// failure everything acquired so far is released again.
    pub fn initialize(&mut self, callback: C) -> Result<(), Error<H::Error>> {
        if self.is_initialized() {
            return Err(Error::AlreadyInitialized);
        }

        let result = self.start();

        #[cfg(feature = "defmt")]
        match &result {
            Ok(()) => defmt::info!("touch pads initialized"),
            Err(err) => defmt::error!(
                "touch pad initialization failed: {}",
                defmt::Debug2Format(err)
            ),
        }

        let handle = result?;
        self.handle = Some(handle);
        self.callback = Some(callback);

        Ok(())
    }

    fn start(&mut self) -> Result<H::Handle, Error<H::Error>> {
        let handle = self.hardware.acquire()?;

        if let Err(err) = self.hardware.attach_interrupt(&handle) {
            self.hardware.release(handle);
            return Err(err.into());
        }

        if let Err(err) = self.arm(&handle) {
            self.hardware.detach_interrupt(&handle);
            self.hardware.release(handle);
            return Err(err);
        }

        Ok(handle)
    }

    /// Interrupt pass. Call once per peripheral interrupt.
    ///
    /// Every pad flagged in the status bitmap is sampled, the status is cleared, and the samples
    /// are classified against a single timestamp. A hardware error while writing a threshold ends
    /// the pass; the remaining pads are picked up by the next interrupt.
    pub fn service_interrupt(&mut self) -> Result<(), Error<H::Error>> {
        if !self.is_initialized() {
            return Ok(());
        }

        let status = self.hardware.interrupt_status();
        let mut samples = [None; PAD_COUNT];
        for (index, sample) in samples.iter_mut().enumerate() {
            if status & (1 << index) != 0 {
                *sample = Some(self.hardware.read_raw(self.pads[index].channel));
            }
        }
        self.hardware.clear_interrupt_status();

        let now = self.hardware.now();

        for (index, sample) in samples.iter().enumerate() {
            let raw = match sample {
                Some(raw) => *raw,
                None => continue,
            };

            let config = self.config[index];
            // Disabled pads never report, except the release of a touch held while disabling
            if !config.is_enabled() && !(self.state[index].is_triggered() && raw > config.released)
            {
                continue;
            }

            #[cfg(feature = "defmt")]
            defmt::trace!(
                "pad {}: raw {} at {}, state {}",
                index,
                raw,
                now,
                self.state[index]
            );

            let event = match self.state[index].update(&config, raw, now) {
                Transition::Released => {
                    self.reset_pad(index)?;
                    self.state[index].release()
                }
                Transition::Held(event) => {
                    self.hardware
                        .set_threshold(self.pads[index].channel, THRESHOLD_MAX)?;
                    event
                }
                Transition::Unchanged => None,
            };

            if let Some(kind) = event {
                if self.enabled {
                    if let Some(callback) = self.callback.as_mut() {
                        callback(TouchEvent {
                            pad: index as u8,
                            kind,
                            timestamp: now as u64,
                        });
                    }
                }
            }
        }

        Ok(())
    }
}

impl<H: TouchHardware, C> Drop for PadController<H, C> {
    fn drop(&mut self) {
        self.deinitialize();
    }
}
