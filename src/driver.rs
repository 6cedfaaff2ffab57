//! Low-level register transport.
//!
//! [`ExpanderBus`] owns the I2C peripheral and the list of chip addresses.
//! Every register write is replayed on each configured chip in order, so a
//! pair of stacked expanders behaves like a single 24-pin device.
//!
//! This module is crate-private — consumers interact with
//! [`Tca6424a`](crate::Tca6424a) in `expander.rs` instead.

use embedded_hal_async::i2c::{Error, ErrorKind, I2c, NoAcknowledgeSource};
use heapless::Vec;

use crate::config::MAX_DEVICES;
use crate::error::ExpanderError;
use crate::registers::{CONFIG_PORT0_AI, PORT_COUNT};
#[cfg(feature = "defmt")]
use crate::registers::register_name;

/// Register transport with single- or dual-chip fan-out.
pub(crate) struct ExpanderBus<I2C> {
    i2c: I2C,
    addresses: Vec<u8, MAX_DEVICES>,
}

impl<I2C> ExpanderBus<I2C>
where
    I2C: I2c,
{
    /// Create a new transport.
    ///
    /// # Arguments
    /// * `i2c` — I2C peripheral (takes ownership for exclusive access)
    /// * `addresses` — one or two 7-bit device addresses, written in order
    pub fn new(i2c: I2C, addresses: Vec<u8, MAX_DEVICES>) -> Self {
        Self { i2c, addresses }
    }

    /// Configured device addresses in write order.
    pub fn addresses(&self) -> &[u8] {
        &self.addresses
    }

    /// Give the I2C peripheral back.
    pub fn release(self) -> I2C {
        self.i2c
    }

    // -----------------------------------------------------------------------
    // Core protocol primitives
    // -----------------------------------------------------------------------

    /// Send one `[register, data…]` frame to every configured chip.
    ///
    /// Exactly one I2C write per chip. The first failing chip aborts the
    /// call; chips later in the list are not written and chips earlier in
    /// the list keep the new value.
    async fn write_frame(&mut self, frame: &[u8]) -> Result<(), ExpanderError<I2C::Error>> {
        for &address in self.addresses.iter() {
            #[cfg(feature = "defmt")]
            if let Some((&register, data)) = frame.split_first() {
                defmt::trace!(
                    "i2c {=u8:#x} <- {=str} {=[u8]:#x}",
                    address,
                    register_name(register).unwrap_or("?"),
                    data
                );
            }

            self.i2c
                .write(address, frame)
                .await
                .map_err(|e| classify(address, e))?;
        }

        Ok(())
    }

    // -----------------------------------------------------------------------
    // Typed read/write helpers
    // -----------------------------------------------------------------------

    /// Write a single byte to a register on every chip.
    pub async fn write_u8(
        &mut self,
        register: u8,
        value: u8,
    ) -> Result<(), ExpanderError<I2C::Error>> {
        self.write_frame(&[register, value]).await
    }

    /// Write one byte per port starting at an auto-increment register.
    pub async fn write_ports(
        &mut self,
        register: u8,
        ports: [u8; PORT_COUNT],
    ) -> Result<(), ExpanderError<I2C::Error>> {
        let mut buf = [0u8; 1 + PORT_COUNT];
        buf[0] = register;
        buf[1..].copy_from_slice(&ports);

        self.write_frame(&buf).await
    }

    /// Read one byte per port from a single chip, starting at an
    /// auto-increment register.
    pub async fn read_ports(
        &mut self,
        address: u8,
        register: u8,
    ) -> Result<[u8; PORT_COUNT], ExpanderError<I2C::Error>> {
        let mut buf = [0u8; PORT_COUNT];
        self.i2c
            .write_read(address, &[register], &mut buf)
            .await
            .map_err(|e| classify(address, e))?;

        Ok(buf)
    }

    // -----------------------------------------------------------------------
    // Configuration
    // -----------------------------------------------------------------------

    /// Switch all 24 pins of every chip to output mode.
    ///
    /// The configuration registers power up as `0xFF` (all inputs); writing
    /// `0x00` to the three of them in one auto-increment burst makes every
    /// pin an output. Repeating the call rewrites the same values.
    pub async fn configure_all_outputs(&mut self) -> Result<(), ExpanderError<I2C::Error>> {
        self.write_ports(CONFIG_PORT0_AI, [0x00; PORT_COUNT]).await?;

        #[cfg(feature = "defmt")]
        defmt::debug!("All ports configured as output");

        Ok(())
    }
}

/// Map a bus error to the driver error, singling out an unanswered address.
fn classify<E>(address: u8, error: E) -> ExpanderError<E>
where
    E: Error,
{
    match error.kind() {
        ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address) => {
            ExpanderError::DeviceNotFound(address)
        }
        _ => ExpanderError::I2c(error),
    }
}
