//! Async driver and LED pattern engine for the TI TCA6424A 24-bit I2C I/O
//! expander.
//!
//! The TCA6424A exposes three 8-pin ports behind four register banks. This
//! crate drives all 24 pins as outputs, on one chip or on two chips that
//! mirror each other (for example a PMOD board at `0x22` plus a second one
//! strapped to `0x23`).
//!
//! # Architecture
//!
//! - **`driver`** (crate-private) — register transport; replays every write
//!   on each configured chip and classifies bus errors.
//! - **[`Tca6424a`]** (public) — validated port writes, bulk output,
//!   pin-string requests and register dumps.
//! - **[`PatternEngine`]** — plays the LED animations of
//!   [`patterns`] on a [`Tca6424a`] using an injected delay.
//! - **[`ResetLine`]** — optional active-low reset pin.
//!
//! # Quick start
//!
//! ```ignore
//! use embassy_time::{Delay, Duration};
//! use tca6424a::{ExpanderConfig, Mode, PatternEngine, Tca6424a};
//!
//! // Any `embedded-hal-async` I2C implementation
//! let expander = Tca6424a::new(i2c, &ExpanderConfig::default());
//! let mut engine = PatternEngine::new(expander, Delay);
//!
//! engine.expander_mut().configure_all_outputs().await?;
//! engine.move1(Mode::Lighting, Duration::from_millis(50)).await?;
//! ```
//!
//! # Features
//!
//! - **`defmt`** — [`defmt::Format`] implementations on public types and
//!   debug/trace logging of register traffic.

#![no_std]

#[cfg(test)]
extern crate std;

mod config;
mod driver;
mod error;
mod expander;
pub mod patterns;
pub mod pins;
pub mod registers;
mod reset;

#[cfg(test)]
mod mock;

// ── Re-exports for convenience ───────────────────────────────────────────

pub use config::{AddressError, ExpanderConfig, MAX_DEVICES};
pub use error::ExpanderError;
pub use expander::{RegisterDump, Tca6424a};
pub use patterns::{Action, Mode, Pattern, PatternEngine, PatternState, Step, DEMO_PROGRAM};
pub use pins::{Level, OutputRequest, PinsError};
pub use registers::{Port, ALTERNATE_ADDRESS, DEFAULT_ADDRESS, PIN_COUNT, PORT_COUNT};
pub use reset::ResetLine;
