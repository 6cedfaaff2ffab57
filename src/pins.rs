//! Text encodings of the 24 output pins.
//!
//! A pin string is exactly 24 characters of `'0'`/`'1'`, one 8-character
//! group per port in port order, most significant bit first within each
//! group:
//!
//! ```text
//! 11111111 00000000 10000001
//! └ port 0 ┘└ port 1 ┘└ port 2 ┘   →   [0xFF, 0x00, 0x81]
//! ```
//!
//! [`OutputRequest`] adds the `all=0` / `all=1` shorthands accepted by the
//! command-line tools shipped with the PMOD board.

use core::fmt;

use crate::registers::{PIN_COUNT, PORT_COUNT};

/// Why a pin string was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinsError {
    /// String does not contain exactly 24 characters (actual count).
    Length(usize),
    /// Character at this position is not `'0'` or `'1'`.
    Character(usize),
}

impl fmt::Display for PinsError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PinsError::Length(len) => {
                write!(f, "needs {} values '0' or '1' (got {})", PIN_COUNT, len)
            }
            PinsError::Character(pos) => write!(f, "character {} is not '0' or '1'", pos),
        }
    }
}

/// Decode a 24-character pin string into one byte per port.
///
/// # Errors
/// * [`PinsError::Length`] if the string is not 24 characters long
/// * [`PinsError::Character`] for the first character outside `'0'`/`'1'`
pub fn parse_pins(pins: &str) -> Result<[u8; PORT_COUNT], PinsError> {
    let len = pins.chars().count();
    if len != PIN_COUNT {
        return Err(PinsError::Length(len));
    }

    let mut ports = [0u8; PORT_COUNT];
    for (pos, c) in pins.bytes().enumerate() {
        let bit = match c {
            b'0' => 0,
            b'1' => 1,
            _ => return Err(PinsError::Character(pos)),
        };
        let port = &mut ports[pos / 8];
        *port = (*port << 1) | bit;
    }

    Ok(ports)
}

/// Encode port bytes back into a pin string.
pub fn format_pins(ports: [u8; PORT_COUNT]) -> heapless::String<PIN_COUNT> {
    ports
        .into_iter()
        .flat_map(|byte| (0..8).rev().map(move |bit| (byte >> bit) & 1))
        .map(|bit| if bit == 1 { '1' } else { '0' })
        .collect()
}

/// Steady output level for every pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    /// All pins driven low (`0x00`).
    Low,
    /// All pins driven high (`0xFF`).
    High,
}

impl Level {
    /// Port byte for this level.
    pub const fn byte(self) -> u8 {
        match self {
            Level::Low => 0x00,
            Level::High => 0xFF,
        }
    }
}

/// A parsed output request: `all=0`, `all=1`, or a 24-character pin string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutputRequest {
    /// Every pin at the same level.
    All(Level),
    /// Individual pin values, one byte per port.
    Pins([u8; PORT_COUNT]),
}

impl OutputRequest {
    /// Parse a request as typed on the command line.
    ///
    /// Returns `None` when the text is neither an `all=` form nor starts
    /// like a pin string. A string that starts with `'0'`/`'1'` is treated
    /// as a pin string and its validation error is returned.
    pub fn parse(request: &str) -> Option<Result<Self, PinsError>> {
        match request {
            "all=0" => Some(Ok(OutputRequest::All(Level::Low))),
            "all=1" => Some(Ok(OutputRequest::All(Level::High))),
            s if s.starts_with('0') || s.starts_with('1') => {
                Some(parse_pins(s).map(OutputRequest::Pins))
            }
            _ => None,
        }
    }

    /// Port bytes this request writes.
    pub fn ports(self) -> [u8; PORT_COUNT] {
        match self {
            OutputRequest::All(level) => [level.byte(); PORT_COUNT],
            OutputRequest::Pins(ports) => ports,
        }
    }
}

// ── Unit Tests ───────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_port_groups_msb_first() {
        assert_eq!(parse_pins("111111110000000011111111"), Ok([0xFF, 0x00, 0xFF]));
        assert_eq!(parse_pins("100000000000000100001111"), Ok([0x80, 0x01, 0x0F]));
        assert_eq!(parse_pins("010101010101010101010101"), Ok([0x55, 0x55, 0x55]));
    }

    #[test]
    fn decoded_bytes_encode_back() {
        let text = "010011110011010101011111";
        let ports = parse_pins(text).unwrap();
        assert_eq!(ports, [0x4F, 0x35, 0x5F]);
        assert_eq!(format_pins(ports).as_str(), text);
    }

    #[test]
    fn rejects_wrong_length() {
        assert_eq!(parse_pins(""), Err(PinsError::Length(0)));
        assert_eq!(parse_pins("11111111000000001111111"), Err(PinsError::Length(23)));
        assert_eq!(parse_pins("1111111100000000111111110"), Err(PinsError::Length(25)));
    }

    #[test]
    fn rejects_foreign_characters() {
        assert_eq!(parse_pins("11111111000000001111111x"), Err(PinsError::Character(23)));
        assert_eq!(parse_pins("211111110000000011111111"), Err(PinsError::Character(0)));
        assert_eq!(parse_pins("11111111 000000001111111"), Err(PinsError::Character(8)));
    }

    #[test]
    fn multibyte_characters_count_as_one() {
        // 23 ASCII digits plus one 2-byte character: right length, wrong content.
        assert_eq!(parse_pins("11111111000000001111111é"), Err(PinsError::Character(23)));
    }

    #[test]
    fn parses_requests() {
        assert_eq!(OutputRequest::parse("all=0"), Some(Ok(OutputRequest::All(Level::Low))));
        assert_eq!(OutputRequest::parse("all=1"), Some(Ok(OutputRequest::All(Level::High))));
        assert_eq!(
            OutputRequest::parse("000000001111111100000000"),
            Some(Ok(OutputRequest::Pins([0x00, 0xFF, 0x00])))
        );
        assert_eq!(OutputRequest::parse("10"), Some(Err(PinsError::Length(2))));
        assert_eq!(OutputRequest::parse("all=2"), None);
        assert_eq!(OutputRequest::parse("on"), None);
    }

    #[test]
    fn request_port_bytes() {
        assert_eq!(OutputRequest::All(Level::High).ports(), [0xFF; 3]);
        assert_eq!(OutputRequest::All(Level::Low).ports(), [0x00; 3]);
        assert_eq!(OutputRequest::Pins([1, 2, 3]).ports(), [1, 2, 3]);
    }
}
