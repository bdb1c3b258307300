//! Status registers
//!
//! Read-only registers at 0x30-0x3D. On the E07-400MM these are only
//! readable in burst mode; a single-byte access to the same addresses is a
//! command strobe.

use core::convert::Infallible;

use regiface::{register, FromByteArray, ReadableRegister};

use super::BurstOnly;

/// Chip part number (address: 0x30)
#[register(0x30u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister)]
pub struct PartNumber {
    /// Part number, 0x00 on genuine CC1101 silicon
    pub value: u8,
}

impl BurstOnly for PartNumber {}

impl FromByteArray for PartNumber {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self { value: bytes[0] })
    }
}

/// Chip version number (address: 0x31)
#[register(0x31u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister)]
pub struct Version {
    /// Version number
    pub value: u8,
}

impl BurstOnly for Version {}

impl FromByteArray for Version {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self { value: bytes[0] })
    }
}

/// Link quality and CRC status (address: 0x33)
///
/// The same layout is used for the second status byte the packet engine
/// appends to every received payload.
#[register(0x33u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Lqi {
    /// CRC of the last packet matched
    pub crc_ok: bool,
    /// 7-bit link quality indicator, lower is better
    pub lqi: u8,
}

impl BurstOnly for Lqi {}

impl FromByteArray for Lqi {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            crc_ok: bytes[0] & 0x80 != 0,
            lqi: bytes[0] & 0x7F,
        })
    }
}

/// Received signal strength indication (address: 0x34)
///
/// Two's complement value in 0.5 dB steps, see [`crate::rssi::raw_to_dbm`].
#[register(0x34u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rssi {
    /// Raw RSSI byte
    pub raw: u8,
}

impl Rssi {
    /// RSSI in dBm
    pub fn dbm(self) -> f32 {
        crate::rssi::raw_to_dbm(self.raw)
    }
}

impl BurstOnly for Rssi {}

impl FromByteArray for Rssi {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self { raw: bytes[0] })
    }
}
