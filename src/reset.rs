//! Hardware reset line.
//!
//! The TCA6424A `RESET` input is active low. Boards that wire it to a GPIO
//! wrap the pin in a [`ResetLine`]; boards that tie it high skip this module
//! entirely.

use embedded_hal::digital::OutputPin;
use embedded_hal_async::delay::DelayNs;

use crate::config::ExpanderConfig;

/// Active-low reset pin of one or more expanders.
pub struct ResetLine<P> {
    pin: P,
}

impl<P> ResetLine<P>
where
    P: OutputPin,
{
    /// Wrap the GPIO driving the `RESET` input. The pin is not touched.
    pub fn new(pin: P) -> Self {
        Self { pin }
    }

    /// Drive the line high so the chip runs.
    ///
    /// # Errors
    /// The pin's own error if it cannot be driven.
    pub fn release(&mut self) -> Result<(), P::Error> {
        self.pin.set_high()
    }

    /// Reset the chip and wait until it accepts I2C traffic again.
    ///
    /// Holds the line low for `config.reset_pulse`, releases it, then waits
    /// `config.boot_time`. Register contents return to power-on defaults,
    /// so [`configure_all_outputs`](crate::Tca6424a::configure_all_outputs)
    /// has to run again afterwards.
    ///
    /// # Errors
    /// The pin's own error; no further edge or wait follows it.
    pub async fn pulse<D>(
        &mut self,
        delay: &mut D,
        config: &ExpanderConfig,
    ) -> Result<(), P::Error>
    where
        D: DelayNs,
    {
        self.pin.set_low()?;
        delay.delay_us(micros(config.reset_pulse)).await;
        self.pin.set_high()?;
        delay.delay_us(micros(config.boot_time)).await;

        #[cfg(feature = "defmt")]
        defmt::debug!("TCA6424A reset complete");

        Ok(())
    }

    /// Give the pin back.
    pub fn into_inner(self) -> P {
        self.pin
    }
}

fn micros(duration: embassy_time::Duration) -> u32 {
    u32::try_from(duration.as_micros()).unwrap_or(u32::MAX)
}
