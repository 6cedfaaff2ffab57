//! Expander configuration.

use core::fmt;

use embassy_time::Duration;
use heapless::Vec;

use crate::registers::{ALTERNATE_ADDRESS, DEFAULT_ADDRESS};

/// Maximum number of chips driven with the same output.
pub const MAX_DEVICES: usize = 2;

/// Highest 7-bit I2C address.
const MAX_ADDRESS: u8 = 0x7F;

/// Why a device address list was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AddressError {
    /// Address does not fit in 7 bits.
    OutOfRange(u8),
    /// The same address was given for both chips.
    Duplicate(u8),
}

impl fmt::Display for AddressError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AddressError::OutOfRange(address) => {
                write!(f, "0x{:02X} is not a 7-bit address", address)
            }
            AddressError::Duplicate(address) => {
                write!(f, "0x{:02X} given for both chips", address)
            }
        }
    }
}

// ── ExpanderConfig ───────────────────────────────────────────────────────

/// Configuration for one expander, or two stacked expanders sharing a bus.
///
/// Every output write is fanned out to each address in order, so two chips
/// always show the same pattern. [`ExpanderConfig::default()`] describes a
/// single PMOD board at `0x22`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpanderConfig {
    /// Distinct 7-bit device addresses, one or two entries.
    pub(crate) addresses: Vec<u8, MAX_DEVICES>,
    /// How long the reset line is held low by a reset pulse. Default: 50 ms.
    pub reset_pulse: Duration,
    /// Time the chip needs after reset before it accepts I2C traffic.
    /// Default: 2 ms.
    pub boot_time: Duration,
}

impl Default for ExpanderConfig {
    fn default() -> Self {
        Self::from_addresses([DEFAULT_ADDRESS].into_iter().collect())
    }
}

impl ExpanderConfig {
    /// One chip at `address`.
    ///
    /// # Errors
    /// [`AddressError::OutOfRange`] if `address` is above `0x7F`.
    pub fn single(address: u8) -> Result<Self, AddressError> {
        check_range(address)?;
        Ok(Self::from_addresses([address].into_iter().collect()))
    }

    /// Two chips at `first` and `second`, written in that order.
    ///
    /// # Errors
    /// * [`AddressError::OutOfRange`] for the first address above `0x7F`
    /// * [`AddressError::Duplicate`] if both addresses are the same
    pub fn dual(first: u8, second: u8) -> Result<Self, AddressError> {
        check_range(first)?;
        check_range(second)?;
        if first == second {
            return Err(AddressError::Duplicate(first));
        }
        Ok(Self::from_addresses([first, second].into_iter().collect()))
    }

    /// Both address options of the PMOD board (`0x22`, `0x23`).
    pub fn stacked() -> Self {
        Self::from_addresses([DEFAULT_ADDRESS, ALTERNATE_ADDRESS].into_iter().collect())
    }

    fn from_addresses(addresses: Vec<u8, MAX_DEVICES>) -> Self {
        Self {
            addresses,
            reset_pulse: Duration::from_millis(50),
            boot_time: Duration::from_millis(2),
        }
    }

    /// Override the reset pulse width.
    pub fn with_reset_pulse(mut self, pulse: Duration) -> Self {
        self.reset_pulse = pulse;
        self
    }

    /// Override the post-reset boot time.
    pub fn with_boot_time(mut self, boot_time: Duration) -> Self {
        self.boot_time = boot_time;
        self
    }

    /// Configured device addresses in write order.
    pub fn addresses(&self) -> &[u8] {
        &self.addresses
    }
}

fn check_range(address: u8) -> Result<(), AddressError> {
    if address > MAX_ADDRESS {
        return Err(AddressError::OutOfRange(address));
    }
    Ok(())
}
