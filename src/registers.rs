//! TCA6424A register map.
//!
//! The chip exposes four register banks (input, output, polarity inversion,
//! configuration), each three bytes wide, one byte per 8-pin port. Every
//! register has two addresses:
//!
//! - **single** (`0x00..=0x0e`): the pointer stays on the addressed register,
//!   used for one-port writes;
//! - **auto-increment** (bit 7 set, `0x80..=0x8e`): the pointer advances
//!   after each byte, used to move all three ports of a bank in one transfer.
//!
//! Within each bank the port index is added to the bank base:
//! `address = bank_base + port (+ 0x80 for auto-increment)`.

use core::fmt;

// ---------------------------------------------------------------------------
// Register addresses
// ---------------------------------------------------------------------------

macro_rules! tca_registers {
    ($($name:ident : $val:literal),* $(,)?) => {
        $(
            #[allow(missing_docs)]
            pub const $name: u8 = $val;
        )*

        /// Datasheet name of a register address, or `None` for addresses
        /// the chip does not implement.
        pub fn register_name(register: u8) -> Option<&'static str> {
            match register {
                $(
                    $val => Some(stringify!($name)),
                )*
                _ => None,
            }
        }
    }
}

tca_registers! {
    INPUT_PORT0: 0x00,
    INPUT_PORT1: 0x01,
    INPUT_PORT2: 0x02,
    OUTPUT_PORT0: 0x04,
    OUTPUT_PORT1: 0x05,
    OUTPUT_PORT2: 0x06,
    POLARITY_PORT0: 0x08,
    POLARITY_PORT1: 0x09,
    POLARITY_PORT2: 0x0a,
    CONFIG_PORT0: 0x0c,
    CONFIG_PORT1: 0x0d,
    CONFIG_PORT2: 0x0e,
    INPUT_PORT0_AI: 0x80,
    INPUT_PORT1_AI: 0x81,
    INPUT_PORT2_AI: 0x82,
    OUTPUT_PORT0_AI: 0x84,
    OUTPUT_PORT1_AI: 0x85,
    OUTPUT_PORT2_AI: 0x86,
    POLARITY_PORT0_AI: 0x88,
    POLARITY_PORT1_AI: 0x89,
    POLARITY_PORT2_AI: 0x8a,
    CONFIG_PORT0_AI: 0x8c,
    CONFIG_PORT1_AI: 0x8d,
    CONFIG_PORT2_AI: 0x8e,
}

/// Flag that turns a register address into its auto-increment alias.
pub const AUTO_INCREMENT: u8 = 0x80;

// ---------------------------------------------------------------------------
// Device constants
// ---------------------------------------------------------------------------

/// Default I2C address (ADDR pin low).
pub const DEFAULT_ADDRESS: u8 = 0x22;

/// Alternate I2C address (ADDR pin high).
pub const ALTERNATE_ADDRESS: u8 = 0x23;

/// Number of 8-bit ports on the chip.
pub const PORT_COUNT: usize = 3;

/// Number of I/O pins on the chip.
pub const PIN_COUNT: usize = PORT_COUNT * 8;

// ---------------------------------------------------------------------------
// Typed addressing
// ---------------------------------------------------------------------------

/// One of the three 8-pin ports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Port {
    /// Pins P00–P07.
    P0,
    /// Pins P10–P17.
    P1,
    /// Pins P20–P27.
    P2,
}

impl Port {
    /// All ports in register order.
    pub const ALL: [Port; PORT_COUNT] = [Port::P0, Port::P1, Port::P2];

    /// Zero-based port index.
    pub const fn index(self) -> u8 {
        self as u8
    }
}

/// Port index outside `0..=2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InvalidPort(pub u8);

impl TryFrom<u8> for Port {
    type Error = InvalidPort;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        match index {
            0 => Ok(Port::P0),
            1 => Ok(Port::P1),
            2 => Ok(Port::P2),
            other => Err(InvalidPort(other)),
        }
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "P{}", self.index())
    }
}

/// Register bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Bank {
    /// Pin input levels (read-only, writes are ignored by the chip).
    Input,
    /// Output latch.
    Output,
    /// Input polarity inversion.
    Polarity,
    /// Pin direction: 1 = input (power-on default), 0 = output.
    Config,
}

impl Bank {
    /// All banks in register order.
    pub const ALL: [Bank; 4] = [Bank::Input, Bank::Output, Bank::Polarity, Bank::Config];

    /// Address of port 0 of this bank in single-register mode.
    pub const fn base(self) -> u8 {
        match self {
            Bank::Input => INPUT_PORT0,
            Bank::Output => OUTPUT_PORT0,
            Bank::Polarity => POLARITY_PORT0,
            Bank::Config => CONFIG_PORT0,
        }
    }
}

/// Register pointer behaviour for a transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Access {
    /// Pointer stays put; one byte per transfer.
    Single,
    /// Pointer advances after every byte.
    AutoIncrement,
}

/// Resolve the register address for a port within a bank.
pub const fn register_address(port: Port, bank: Bank, access: Access) -> u8 {
    let address = bank.base() + port.index();
    match access {
        Access::Single => address,
        Access::AutoIncrement => address | AUTO_INCREMENT,
    }
}

// ── Unit Tests ───────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn all_addresses() -> impl Iterator<Item = (Port, Bank, Access, u8)> {
        Port::ALL.into_iter().flat_map(|port| {
            Bank::ALL.into_iter().flat_map(move |bank| {
                [Access::Single, Access::AutoIncrement]
                    .into_iter()
                    .map(move |access| (port, bank, access, register_address(port, bank, access)))
            })
        })
    }

    #[test]
    fn output_registers_match_datasheet() {
        assert_eq!(register_address(Port::P0, Bank::Output, Access::Single), 0x04);
        assert_eq!(register_address(Port::P1, Bank::Output, Access::Single), 0x05);
        assert_eq!(register_address(Port::P2, Bank::Output, Access::Single), 0x06);
        assert_eq!(register_address(Port::P0, Bank::Output, Access::AutoIncrement), 0x84);
        assert_eq!(register_address(Port::P2, Bank::Output, Access::AutoIncrement), 0x86);
    }

    #[test]
    fn config_registers_match_datasheet() {
        assert_eq!(register_address(Port::P0, Bank::Config, Access::Single), 0x0c);
        assert_eq!(register_address(Port::P2, Bank::Config, Access::Single), 0x0e);
        assert_eq!(register_address(Port::P0, Bank::Config, Access::AutoIncrement), 0x8c);
    }

    #[test]
    fn input_and_polarity_bases() {
        assert_eq!(register_address(Port::P1, Bank::Input, Access::Single), 0x01);
        assert_eq!(register_address(Port::P0, Bank::Input, Access::AutoIncrement), 0x80);
        assert_eq!(register_address(Port::P2, Bank::Polarity, Access::Single), 0x0a);
        assert_eq!(register_address(Port::P0, Bank::Polarity, Access::AutoIncrement), 0x88);
    }

    #[test]
    fn addresses_never_collide() {
        let addresses: std::vec::Vec<_> = all_addresses().collect();
        assert_eq!(addresses.len(), 24);

        for (i, a) in addresses.iter().enumerate() {
            for b in &addresses[i + 1..] {
                assert_ne!(a.3, b.3, "{:?} and {:?} share an address", a, b);
            }
        }
    }

    #[test]
    fn every_address_has_a_name() {
        for (_, _, _, address) in all_addresses() {
            assert!(register_name(address).is_some(), "0x{:02x} unnamed", address);
        }
        assert_eq!(register_name(0x84), Some("OUTPUT_PORT0_AI"));
        assert_eq!(register_name(0x0e), Some("CONFIG_PORT2"));
        assert_eq!(register_name(0x03), None);
        assert_eq!(register_name(0x8f), None);
    }

    #[test]
    fn port_from_index() {
        assert_eq!(Port::try_from(0), Ok(Port::P0));
        assert_eq!(Port::try_from(2), Ok(Port::P2));
        assert_eq!(Port::try_from(3), Err(InvalidPort(3)));
        assert_eq!(Port::try_from(255), Err(InvalidPort(255)));
    }
}
