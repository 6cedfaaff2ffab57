//! Error types for the expander driver.

use core::fmt;

use crate::config::AddressError;
use crate::pins::PinsError;
use crate::registers::InvalidPort;

/// Errors that can occur when driving the expander.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpanderError<E> {
    /// Underlying I2C bus error.
    I2c(E),

    /// No device acknowledged the given 7-bit address.
    DeviceNotFound(u8),

    /// Device address list rejected (not 7-bit, or a chip given twice).
    InvalidAddress(AddressError),

    /// Port index out of valid range (must be 0–2).
    InvalidPort(u8),

    /// Malformed pin bit string.
    InvalidPins(PinsError),

    /// Output request is neither `all=0`, `all=1` nor a pin bit string.
    InvalidRequest,
}

impl<E> ExpanderError<E> {
    /// `true` for errors caused by the caller's arguments rather than the
    /// hardware.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            ExpanderError::InvalidAddress(_)
                | ExpanderError::InvalidPort(_)
                | ExpanderError::InvalidPins(_)
                | ExpanderError::InvalidRequest
        )
    }
}

impl<E> From<InvalidPort> for ExpanderError<E> {
    fn from(InvalidPort(port): InvalidPort) -> Self {
        ExpanderError::InvalidPort(port)
    }
}

impl<E> From<AddressError> for ExpanderError<E> {
    fn from(error: AddressError) -> Self {
        ExpanderError::InvalidAddress(error)
    }
}

impl<E> From<PinsError> for ExpanderError<E> {
    fn from(error: PinsError) -> Self {
        ExpanderError::InvalidPins(error)
    }
}

impl<E: fmt::Debug> fmt::Display for ExpanderError<E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ExpanderError::I2c(e) => write!(f, "I2C error: {:?}", e),
            ExpanderError::DeviceNotFound(address) => {
                write!(f, "No device found at address 0x{:02X}", address)
            }
            ExpanderError::InvalidAddress(e) => write!(f, "Invalid device address: {}", e),
            ExpanderError::InvalidPort(port) => write!(f, "Invalid port {} (must be 0-2)", port),
            ExpanderError::InvalidPins(e) => write!(f, "Invalid pin string: {}", e),
            ExpanderError::InvalidRequest => {
                write!(f, "Invalid output request (expected all=0, all=1 or 24 x 0/1)")
            }
        }
    }
}

#[cfg(feature = "defmt")]
impl<E: defmt::Format> defmt::Format for ExpanderError<E> {
    fn format(&self, f: defmt::Formatter) {
        match self {
            ExpanderError::I2c(e) => defmt::write!(f, "I2C error: {}", e),
            ExpanderError::DeviceNotFound(address) => {
                defmt::write!(f, "No device found at address {=u8:#x}", *address)
            }
            ExpanderError::InvalidAddress(e) => defmt::write!(f, "Invalid device address: {}", e),
            ExpanderError::InvalidPort(port) => defmt::write!(f, "Invalid port {}", port),
            ExpanderError::InvalidPins(e) => defmt::write!(f, "Invalid pin string: {}", e),
            ExpanderError::InvalidRequest => defmt::write!(f, "Invalid output request"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::string::ToString;

    type Error = ExpanderError<()>;

    #[test]
    fn argument_errors_are_grouped() {
        assert!(Error::InvalidPort(3).is_invalid_argument());
        assert!(Error::InvalidPins(PinsError::Length(23)).is_invalid_argument());
        assert!(Error::InvalidRequest.is_invalid_argument());
        assert!(!Error::I2c(()).is_invalid_argument());
        assert!(!Error::DeviceNotFound(0x22).is_invalid_argument());
        assert!(Error::InvalidAddress(AddressError::Duplicate(0x22)).is_invalid_argument());
    }

    #[test]
    fn invalid_port_converts() {
        let error: Error = InvalidPort(7).into();
        assert_eq!(error, Error::InvalidPort(7));
    }

    #[test]
    fn address_error_converts() {
        let error: Error = AddressError::OutOfRange(0xA2).into();
        assert_eq!(error, Error::InvalidAddress(AddressError::OutOfRange(0xA2)));
        assert_eq!(
            error.to_string(),
            "Invalid device address: 0xA2 is not a 7-bit address"
        );
    }

    #[test]
    fn display_names_the_address() {
        assert_eq!(
            Error::DeviceNotFound(0x23).to_string(),
            "No device found at address 0x23"
        );
    }
}
