//! Modem configuration registers
//!
//! MDMCFG2 carries two independent fields that matter to the quirk layer:
//! the modulation format, owned by the base driver, and the sync word
//! qualifier mode. Changing one must never clobber the other.

use core::convert::Infallible;

use regiface::{register, FromByteArray, ReadableRegister, ToByteArray, WritableRegister};

use super::SingleAccess;

/// Modulation format (MDMCFG2[6:4])
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ModFormat {
    /// 2-FSK
    Fsk2,
    /// GFSK
    Gfsk,
    /// ASK/OOK
    AskOok,
    /// 4-FSK
    Fsk4,
    /// MSK
    Msk,
    /// Reserved encoding, kept verbatim so read-modify-write preserves it
    Reserved(u8),
}

impl ModFormat {
    const fn bits(self) -> u8 {
        match self {
            Self::Fsk2 => 0b000,
            Self::Gfsk => 0b001,
            Self::AskOok => 0b011,
            Self::Fsk4 => 0b100,
            Self::Msk => 0b111,
            Self::Reserved(bits) => bits & 0x07,
        }
    }
}

impl From<u8> for ModFormat {
    fn from(value: u8) -> Self {
        match value & 0x07 {
            0b000 => Self::Fsk2,
            0b001 => Self::Gfsk,
            0b011 => Self::AskOok,
            0b100 => Self::Fsk4,
            0b111 => Self::Msk,
            reserved => Self::Reserved(reserved),
        }
    }
}

/// Sync word qualifier mode (MDMCFG2[2:0])
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SyncMode {
    /// No preamble/sync detection
    None = 0b000,
    /// 15 of 16 sync word bits detected
    Bits15Of16 = 0b001,
    /// 16 of 16 sync word bits detected
    Bits16Of16 = 0b010,
    /// 30 of 32 sync word bits detected
    Bits30Of32 = 0b011,
    /// No preamble/sync, carrier sense above threshold
    CarrierSense = 0b100,
    /// 15 of 16 bits plus carrier sense
    Bits15Of16CarrierSense = 0b101,
    /// 16 of 16 bits plus carrier sense
    Bits16Of16CarrierSense = 0b110,
    /// 30 of 32 bits plus carrier sense
    Bits30Of32CarrierSense = 0b111,
}

impl From<u8> for SyncMode {
    fn from(value: u8) -> Self {
        match value & 0x07 {
            0b000 => Self::None,
            0b001 => Self::Bits15Of16,
            0b010 => Self::Bits16Of16,
            0b011 => Self::Bits30Of32,
            0b100 => Self::CarrierSense,
            0b101 => Self::Bits15Of16CarrierSense,
            0b110 => Self::Bits16Of16CarrierSense,
            _ => Self::Bits30Of32CarrierSense,
        }
    }
}

/// Modem configuration 2 (address: 0x12)
///
/// Reset value 0x02: DC blocking filter on, 2-FSK, no Manchester coding,
/// 16/16 sync word bits.
#[register(0x12u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct Mdmcfg2 {
    /// Disable the digital DC blocking filter
    pub dc_filter_off: bool,
    /// Modulation format
    pub mod_format: ModFormat,
    /// Manchester encoding/decoding
    pub manchester: bool,
    /// Sync word qualifier mode
    pub sync_mode: SyncMode,
}

impl Default for Mdmcfg2 {
    fn default() -> Self {
        Self {
            dc_filter_off: false,
            mod_format: ModFormat::Fsk2,
            manchester: false,
            sync_mode: SyncMode::Bits16Of16,
        }
    }
}

impl SingleAccess for Mdmcfg2 {}

impl FromByteArray for Mdmcfg2 {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            dc_filter_off: bytes[0] & 0x80 != 0,
            mod_format: ModFormat::from(bytes[0] >> 4),
            manchester: bytes[0] & 0x08 != 0,
            sync_mode: SyncMode::from(bytes[0]),
        })
    }
}

impl ToByteArray for Mdmcfg2 {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([(self.dc_filter_off as u8) << 7
            | self.mod_format.bits() << 4
            | (self.manchester as u8) << 3
            | self.sync_mode as u8])
    }
}
