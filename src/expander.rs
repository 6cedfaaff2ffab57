//! High-level interface for the TCA6424A 24-bit I/O expander.
//!
//! [`Tca6424a`] wraps the low-level register transport with port validation,
//! output-register addressing and the bulk operations used by the pattern
//! engine and the command-line style output requests.

use core::fmt;

use embedded_hal_async::i2c::I2c;
use heapless::Vec;

use crate::config::{ExpanderConfig, MAX_DEVICES};
use crate::driver::ExpanderBus;
use crate::error::ExpanderError;
use crate::pins::{parse_pins, Level, OutputRequest};
use crate::registers::{
    register_address, Access, Bank, Port, CONFIG_PORT0_AI, INPUT_PORT0_AI, OUTPUT_PORT0_AI,
    POLARITY_PORT0_AI, PORT_COUNT,
};

/// Snapshot of the four register banks of one chip.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RegisterDump {
    /// Device address the registers were read from.
    pub address: u8,
    /// Input port registers (`0x00..=0x02`).
    pub input: [u8; PORT_COUNT],
    /// Output port registers (`0x04..=0x06`).
    pub output: [u8; PORT_COUNT],
    /// Polarity inversion registers (`0x08..=0x0a`).
    pub polarity: [u8; PORT_COUNT],
    /// Configuration registers (`0x0c..=0x0e`).
    pub config: [u8; PORT_COUNT],
}

impl RegisterDump {
    /// Column header matching the [`Display`](fmt::Display) layout.
    pub const HEADER: &'static str = " reg    0  1  2  3  4  5  6  7  8  9  A  B  C  D  E  F";

    /// Bytes of one bank.
    pub fn bank(&self, bank: Bank) -> [u8; PORT_COUNT] {
        match bank {
            Bank::Input => self.input,
            Bank::Output => self.output,
            Bank::Polarity => self.polarity,
            Bank::Config => self.config,
        }
    }
}

/// One line covering register slots `0x00..=0x0f`; unimplemented slots
/// print as `--`.
impl fmt::Display for RegisterDump {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[0x00]")?;
        for bank in Bank::ALL {
            for byte in self.bank(bank) {
                write!(f, " {:02X}", byte)?;
            }
            write!(f, " --")?;
        }
        Ok(())
    }
}

/// High-level interface for one TCA6424A, or two driven in lockstep.
///
/// Provides validated async methods for configuring the pins as outputs
/// and writing the three output ports over I2C. With a dual-chip
/// [`ExpanderConfig`] every write goes to both chips, first address first.
///
/// # Example
///
/// ```no_run
/// use tca6424a::{ExpanderConfig, Level, Tca6424a};
///
/// # async fn example(i2c: impl embedded_hal_async::i2c::I2c) {
/// let mut expander = Tca6424a::new(i2c, &ExpanderConfig::default());
///
/// // Pins power up as inputs
/// expander.configure_all_outputs().await.unwrap();
///
/// expander.set_all(Level::High).await.unwrap();
/// expander.write_port(1, 0b0000_1111).await.unwrap();
/// expander.set_individual_pins("111111110000000011111111").await.unwrap();
/// # }
/// ```
pub struct Tca6424a<I2C> {
    bus: ExpanderBus<I2C>,
}

impl<I2C> Tca6424a<I2C>
where
    I2C: I2c,
{
    /// Create a new expander interface.
    ///
    /// No I2C traffic is generated.
    ///
    /// # Arguments
    /// * `i2c` — I2C peripheral (takes ownership for exclusive access)
    /// * `config` — device addresses (one or two chips)
    pub fn new(i2c: I2C, config: &ExpanderConfig) -> Self {
        Self {
            bus: ExpanderBus::new(i2c, config.addresses.clone()),
        }
    }

    /// Configured device addresses in write order.
    pub fn addresses(&self) -> &[u8] {
        self.bus.addresses()
    }

    /// Give the I2C peripheral back.
    pub fn release(self) -> I2C {
        self.bus.release()
    }

    // -----------------------------------------------------------------------
    // Configuration
    // -----------------------------------------------------------------------

    /// Make all 24 pins of every chip outputs.
    ///
    /// Must be called once before driving outputs; the pins power up as
    /// inputs. Calling it again is harmless.
    pub async fn configure_all_outputs(&mut self) -> Result<(), ExpanderError<I2C::Error>> {
        self.bus.configure_all_outputs().await
    }

    /// Check that every configured address answers.
    ///
    /// # Errors
    /// * [`ExpanderError::DeviceNotFound`] for the first silent address
    /// * [`ExpanderError::I2c`] on any other bus failure
    pub async fn probe(&mut self) -> Result<(), ExpanderError<I2C::Error>> {
        let addresses = self.bus.addresses().iter().copied().collect::<Vec<u8, MAX_DEVICES>>();
        for address in addresses {
            self.bus.read_ports(address, INPUT_PORT0_AI).await?;

            #[cfg(feature = "defmt")]
            defmt::debug!("TCA6424A found at {=u8:#x}", address);
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Single-port writes
    // -----------------------------------------------------------------------

    /// Write one byte to an output port.
    ///
    /// Uses the non-auto-increment output register of the port, so exactly
    /// one register changes per chip. No retry on failure.
    ///
    /// # Arguments
    /// * `port` — Port index (0–2)
    /// * `value` — One bit per pin, bit 0 = pin Px0
    ///
    /// # Errors
    /// * [`ExpanderError::InvalidPort`] if `port >= 3`
    /// * [`ExpanderError::I2c`] / [`ExpanderError::DeviceNotFound`] on
    ///   communication failure
    pub async fn write_port(
        &mut self,
        port: u8,
        value: u8,
    ) -> Result<(), ExpanderError<I2C::Error>> {
        let port = Port::try_from(port)?;
        self.write_output(port, value).await
    }

    /// Typed variant of [`write_port`](Self::write_port).
    pub async fn write_output(
        &mut self,
        port: Port,
        value: u8,
    ) -> Result<(), ExpanderError<I2C::Error>> {
        let register = register_address(port, Bank::Output, Access::Single);
        self.bus.write_u8(register, value).await
    }

    /// Write the same byte to ports 0, 1 and 2 with three single-port
    /// writes.
    pub async fn write_all_ports(&mut self, value: u8) -> Result<(), ExpanderError<I2C::Error>> {
        for port in Port::ALL {
            self.write_output(port, value).await?;
        }
        Ok(())
    }

    /// Drive every pin low (`0x00`) or high (`0xFF`).
    pub async fn set_all(&mut self, level: Level) -> Result<(), ExpanderError<I2C::Error>> {
        self.write_all_ports(level.byte()).await
    }

    // -----------------------------------------------------------------------
    // Burst writes
    // -----------------------------------------------------------------------

    /// Write all three output ports in one auto-increment transfer.
    pub async fn set_pins(
        &mut self,
        ports: [u8; PORT_COUNT],
    ) -> Result<(), ExpanderError<I2C::Error>> {
        self.bus.write_ports(OUTPUT_PORT0_AI, ports).await
    }

    /// Set individual pins from a 24-character `'0'`/`'1'` string.
    ///
    /// Characters 0–7 go to port 0, 8–15 to port 1, 16–23 to port 2, most
    /// significant bit first. The string is validated before any bus
    /// traffic.
    ///
    /// # Errors
    /// * [`ExpanderError::InvalidPins`] for a malformed string
    /// * [`ExpanderError::I2c`] / [`ExpanderError::DeviceNotFound`] on
    ///   communication failure
    ///
    /// # Example
    /// ```ignore
    /// // Ports 0 and 2 high, port 1 low
    /// expander.set_individual_pins("111111110000000011111111").await?;
    /// ```
    pub async fn set_individual_pins(
        &mut self,
        pins: &str,
    ) -> Result<(), ExpanderError<I2C::Error>> {
        let ports = parse_pins(pins)?;

        #[cfg(feature = "defmt")]
        for (port, byte) in ports.iter().enumerate() {
            defmt::debug!("port{} data {=u8:#x}", port, *byte);
        }

        self.set_pins(ports).await
    }

    /// Execute a parsed output request.
    pub async fn apply(&mut self, request: OutputRequest) -> Result<(), ExpanderError<I2C::Error>> {
        self.set_pins(request.ports()).await
    }

    /// Parse and execute an output request (`all=0`, `all=1` or a pin
    /// string).
    ///
    /// # Errors
    /// * [`ExpanderError::InvalidRequest`] for unrecognised text
    /// * [`ExpanderError::InvalidPins`] for a malformed pin string
    pub async fn apply_request(&mut self, request: &str) -> Result<(), ExpanderError<I2C::Error>> {
        let request = OutputRequest::parse(request).ok_or(ExpanderError::InvalidRequest)??;
        self.apply(request).await
    }

    // -----------------------------------------------------------------------
    // Diagnostics
    // -----------------------------------------------------------------------

    /// Read back all register banks of one chip.
    pub async fn read_dump(
        &mut self,
        address: u8,
    ) -> Result<RegisterDump, ExpanderError<I2C::Error>> {
        Ok(RegisterDump {
            address,
            input: self.bus.read_ports(address, INPUT_PORT0_AI).await?,
            output: self.bus.read_ports(address, OUTPUT_PORT0_AI).await?,
            polarity: self.bus.read_ports(address, POLARITY_PORT0_AI).await?,
            config: self.bus.read_ports(address, CONFIG_PORT0_AI).await?,
        })
    }

    /// Read back all register banks of every configured chip.
    ///
    /// Read-only; returns one [`RegisterDump`] per address in write order.
    pub async fn dump_registers(
        &mut self,
    ) -> Result<Vec<RegisterDump, MAX_DEVICES>, ExpanderError<I2C::Error>> {
        let mut dumps: Vec<RegisterDump, MAX_DEVICES> = self
            .bus
            .addresses()
            .iter()
            .map(|&address| RegisterDump {
                address,
                ..RegisterDump::default()
            })
            .collect();
        for dump in dumps.iter_mut() {
            *dump = self.read_dump(dump.address).await?;
        }
        Ok(dumps)
    }
}

// ── Unit Tests ───────────────────────────────────────────────────────
