//! Driver error type

use core::fmt;

/// Errors returned by the register bus, the base driver and the quirk layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The SPI transaction failed
    Bus,
    /// A register value could not be decoded
    Deserialization,
    /// The FIFO reported a zero or implausibly long packet length
    InvalidPayload,
    /// A packet was received but its CRC flag is cleared
    CrcMismatch,
    /// Empty output buffer or non-finite scan parameters
    InvalidParameters,
    /// The frequency lies outside the bands supported by the synthesizer
    InvalidFrequency,
    /// A typed register was declared at an address of the wrong class
    InvalidAddress(u8),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bus => f.write_str("SPI bus error"),
            Self::Deserialization => f.write_str("failed to decode register value"),
            Self::InvalidPayload => f.write_str("invalid packet length in RX FIFO"),
            Self::CrcMismatch => f.write_str("packet CRC mismatch"),
            Self::InvalidParameters => f.write_str("invalid parameters"),
            Self::InvalidFrequency => f.write_str("frequency out of range"),
            Self::InvalidAddress(address) => {
                write!(f, "register 0x{address:02X} used with the wrong access mode")
            }
        }
    }
}
