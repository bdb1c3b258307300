//! Packet handling registers
//!
//! PKTCTRL1 and PKTCTRL0 control the packet engine:
//! - Preamble quality threshold for sync word qualification
//! - CRC calculation and automatic flush on CRC error
//! - Appending of the RSSI and LQI/CRC status bytes to the RX FIFO
//! - Address filtering
//! - Whitening, packet format and length mode
//!
//! # Important Notes
//! The E07-400MM corrupts subsequent FIFO operations when PKTCTRL0 is changed
//! by two partial writes in quick succession. Always write a fully populated
//! value and let the chip settle afterwards.

use core::convert::Infallible;

use bitflags::bitflags;
use regiface::{register, FromByteArray, ReadableRegister, ToByteArray, WritableRegister};

use super::SingleAccess;

bitflags! {
    /// Single-bit options of PKTCTRL1
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Pktctrl1Flags: u8 {
        /// Flush the RX FIFO automatically when the CRC check fails
        const CRC_AUTOFLUSH = 1 << 3;
        /// Append the RSSI and LQI/CRC status bytes to each received payload
        const APPEND_STATUS = 1 << 2;
    }
}

/// Address filtering mode (PKTCTRL1[1:0])
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AddressCheck {
    /// No address check
    None = 0,
    /// Address check, no broadcast
    Address = 1,
    /// Address check with 0x00 broadcast
    Broadcast = 2,
    /// Address check with 0x00 and 0xFF broadcast
    BroadcastAll = 3,
}

impl From<u8> for AddressCheck {
    fn from(value: u8) -> Self {
        match value & 0x03 {
            0 => Self::None,
            1 => Self::Address,
            2 => Self::Broadcast,
            _ => Self::BroadcastAll,
        }
    }
}

/// Packet automation control 1 (address: 0x07)
///
/// Reset value 0x04: no preamble qualifier, no autoflush, status bytes
/// appended, no address check.
#[register(0x07u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct Pktctrl1 {
    /// Preamble quality estimator threshold (3 bits)
    pub preamble_quality_threshold: u8,
    /// Autoflush and status byte options
    pub flags: Pktctrl1Flags,
    /// Address filtering mode
    pub address_check: AddressCheck,
}

impl Default for Pktctrl1 {
    fn default() -> Self {
        Self {
            preamble_quality_threshold: 0,
            flags: Pktctrl1Flags::APPEND_STATUS,
            address_check: AddressCheck::None,
        }
    }
}

impl SingleAccess for Pktctrl1 {}

impl FromByteArray for Pktctrl1 {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            preamble_quality_threshold: bytes[0] >> 5,
            flags: Pktctrl1Flags::from_bits_truncate(bytes[0]),
            address_check: AddressCheck::from(bytes[0]),
        })
    }
}

impl ToByteArray for Pktctrl1 {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([(self.preamble_quality_threshold & 0x07) << 5
            | self.flags.bits()
            | self.address_check as u8])
    }
}

/// Packet format (PKTCTRL0[5:4])
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PacketFormat {
    /// Normal mode, FIFOs for RX and TX
    Normal = 0,
    /// Synchronous serial mode
    SynchronousSerial = 1,
    /// Random TX mode, PN9 data
    RandomTx = 2,
    /// Asynchronous serial mode
    AsynchronousSerial = 3,
}

impl From<u8> for PacketFormat {
    fn from(value: u8) -> Self {
        match value & 0x03 {
            0 => Self::Normal,
            1 => Self::SynchronousSerial,
            2 => Self::RandomTx,
            _ => Self::AsynchronousSerial,
        }
    }
}

/// Packet length configuration (PKTCTRL0[1:0])
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LengthConfig {
    /// Length set by PKTLEN
    Fixed = 0,
    /// Length given by the first byte after the sync word
    Variable = 1,
    /// Infinite packet length
    Infinite = 2,
    /// Reserved encoding
    Reserved = 3,
}

impl From<u8> for LengthConfig {
    fn from(value: u8) -> Self {
        match value & 0x03 {
            0 => Self::Fixed,
            1 => Self::Variable,
            2 => Self::Infinite,
            _ => Self::Reserved,
        }
    }
}

/// Packet automation control 0 (address: 0x08)
#[register(0x08u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct Pktctrl0 {
    /// Data whitening
    pub white_data: bool,
    /// Packet format of RX and TX data
    pub format: PacketFormat,
    /// CRC calculation in TX and CRC check in RX
    pub crc_enabled: bool,
    /// Packet length mode
    pub length_config: LengthConfig,
}

impl Default for Pktctrl0 {
    fn default() -> Self {
        Self {
            white_data: true,
            format: PacketFormat::Normal,
            crc_enabled: true,
            length_config: LengthConfig::Variable,
        }
    }
}

impl SingleAccess for Pktctrl0 {}

impl FromByteArray for Pktctrl0 {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            white_data: bytes[0] & 0x40 != 0,
            format: PacketFormat::from(bytes[0] >> 4),
            crc_enabled: bytes[0] & 0x04 != 0,
            length_config: LengthConfig::from(bytes[0]),
        })
    }
}

impl ToByteArray for Pktctrl0 {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([(self.white_data as u8) << 6
            | (self.format as u8) << 4
            | (self.crc_enabled as u8) << 2
            | self.length_config as u8])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pktctrl1_reset_value() {
        assert_eq!(Pktctrl1::default().to_bytes(), Ok([0x04]));
        assert_eq!(Pktctrl1::from_bytes([0x04]), Ok(Pktctrl1::default()));
    }

    #[test]
    fn pktctrl1_fields() {
        let reg = Pktctrl1::from_bytes([0b101_0_1_1_10]).unwrap();
        assert_eq!(reg.preamble_quality_threshold, 0b101);
        assert_eq!(reg.flags, Pktctrl1Flags::CRC_AUTOFLUSH | Pktctrl1Flags::APPEND_STATUS);
        assert_eq!(reg.address_check, AddressCheck::Broadcast);
    }

    #[test]
    fn pktctrl0_reset_value() {
        assert_eq!(Pktctrl0::default().to_bytes(), Ok([0x45]));
        let reg = Pktctrl0::from_bytes([0x45]).unwrap();
        assert!(reg.white_data);
        assert!(reg.crc_enabled);
        assert_eq!(reg.length_config, LengthConfig::Variable);
    }
}
