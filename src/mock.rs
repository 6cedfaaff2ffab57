//! Test doubles for the bus and the delay provider.
//!
//! [`FakeBus`] simulates one or more TCA6424A chips: it keeps a register
//! file per address, honours the auto-increment pointer, records every
//! attempted transfer and can be told to fail the next write to a chip.

use std::vec::Vec;

use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::{self, ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation};

// ── Bus ──────────────────────────────────────────────────────────────────

/// Error produced by [`FakeBus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FakeError {
    /// Address not acknowledged.
    Nack,
    /// Injected bus failure.
    Bus,
}

impl i2c::Error for FakeError {
    fn kind(&self) -> ErrorKind {
        match self {
            FakeError::Nack => ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address),
            FakeError::Bus => ErrorKind::Bus,
        }
    }
}

/// One attempted bus transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Transfer {
    /// Plain write: register pointer followed by data.
    Write { address: u8, bytes: Vec<u8> },
    /// Pointer write followed by a read of `len` bytes.
    Read { address: u8, register: u8, len: usize },
}

impl Transfer {
    pub fn write(address: u8, bytes: &[u8]) -> Self {
        Transfer::Write {
            address,
            bytes: bytes.to_vec(),
        }
    }

    pub fn read(address: u8, register: u8, len: usize) -> Self {
        Transfer::Read {
            address,
            register,
            len,
        }
    }
}

struct Chip {
    address: u8,
    registers: [u8; 16],
    pointer: u8,
}

impl Chip {
    fn new(address: u8) -> Self {
        let mut registers = [0u8; 16];
        // Power-on defaults: outputs high, no inversion, all pins inputs.
        registers[0x04..=0x06].fill(0xFF);
        registers[0x0c..=0x0e].fill(0xFF);
        Self {
            address,
            registers,
            pointer: 0,
        }
    }

    fn set_pointer(&mut self, command: u8) {
        self.pointer = command;
    }

    fn advance(&mut self) {
        if self.pointer & 0x80 != 0 {
            let register = self.pointer & 0x0f;
            let bank = register & 0x0c;
            let port = ((register & 0x03) + 1) % 3;
            self.pointer = 0x80 | bank | port;
        }
    }

    fn store(&mut self, value: u8) {
        let register = (self.pointer & 0x0f) as usize;
        // Input registers ignore writes.
        if register >= 0x04 {
            self.registers[register] = value;
        }
        self.advance();
    }

    fn load(&mut self) -> u8 {
        let register = (self.pointer & 0x0f) as usize;
        let value = if register < 0x04 {
            // Output pins read back their latch, input pins read low.
            let port = register;
            self.registers[0x04 + port] & !self.registers[0x0c + port]
        } else {
            self.registers[register]
        };
        self.advance();
        value
    }
}

/// Simulated I2C bus with TCA6424A chips attached.
pub(crate) struct FakeBus {
    chips: Vec<Chip>,
    transfers: Vec<Transfer>,
    failures: Vec<(u8, usize)>,
}

impl FakeBus {
    /// Bus with one chip per address.
    pub fn with_chips(addresses: &[u8]) -> Self {
        Self {
            chips: addresses.iter().map(|&a| Chip::new(a)).collect(),
            transfers: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// Make the next transfer to `address` fail with [`FakeError::Bus`].
    pub fn fail_next_write_to(&mut self, address: u8) {
        self.fail_write_to_after(address, 0);
    }

    /// Let `skip` transfers to `address` through, then fail the next one.
    pub fn fail_write_to_after(&mut self, address: u8, skip: usize) {
        self.failures.push((address, skip));
    }

    /// Every attempted transfer, including failed ones.
    pub fn transfers(&self) -> &[Transfer] {
        &self.transfers
    }

    /// Data bytes of every write to `address` whose pointer byte is
    /// `register`.
    pub fn writes_to(&self, address: u8, register: u8) -> Vec<Vec<u8>> {
        self.transfers
            .iter()
            .filter_map(|t| match t {
                Transfer::Write { address: a, bytes } if *a == address && bytes[0] == register => {
                    Some(bytes[1..].to_vec())
                }
                _ => None,
            })
            .collect()
    }

    /// Current register file of a chip (16 bytes, index = register & 0x0f).
    pub fn registers(&self, address: u8) -> [u8; 16] {
        self.chip(address).map(|c| c.registers).unwrap_or([0; 16])
    }

    /// Current output latches of a chip.
    pub fn outputs(&self, address: u8) -> [u8; 3] {
        let registers = self.registers(address);
        [registers[0x04], registers[0x05], registers[0x06]]
    }

    fn chip(&self, address: u8) -> Option<&Chip> {
        self.chips.iter().find(|c| c.address == address)
    }
}

impl ErrorType for FakeBus {
    type Error = FakeError;
}

impl I2c for FakeBus {
    async fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        // Record first so failed attempts are visible to tests.
        match &*operations {
            [Operation::Write(bytes)] => self.transfers.push(Transfer::write(address, bytes)),
            [Operation::Write(bytes), Operation::Read(buf)] => {
                self.transfers.push(Transfer::read(address, bytes[0], buf.len()))
            }
            _ => panic!("unexpected transaction shape"),
        }

        let mut fail = false;
        self.failures.retain_mut(|(a, skip)| {
            if *a != address {
                true
            } else if *skip == 0 {
                fail = true;
                false
            } else {
                *skip -= 1;
                true
            }
        });
        if fail {
            return Err(FakeError::Bus);
        }

        let chip = self
            .chips
            .iter_mut()
            .find(|c| c.address == address)
            .ok_or(FakeError::Nack)?;

        for operation in operations.iter_mut() {
            match operation {
                Operation::Write(bytes) => {
                    if let Some((&command, data)) = bytes.split_first() {
                        chip.set_pointer(command);
                        for &value in data {
                            chip.store(value);
                        }
                    }
                }
                Operation::Read(buf) => {
                    for byte in buf.iter_mut() {
                        *byte = chip.load();
                    }
                }
            }
        }

        Ok(())
    }
}

// ── Delay ────────────────────────────────────────────────────────────────

/// Delay provider that returns immediately and records each request in
/// nanoseconds.
#[derive(Default)]
pub(crate) struct FakeDelay {
    pub calls: Vec<u64>,
}

impl DelayNs for FakeDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.calls.push(ns as u64);
    }

    async fn delay_us(&mut self, us: u32) {
        self.calls.push(us as u64 * 1_000);
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.calls.push(ms as u64 * 1_000_000);
    }
}
