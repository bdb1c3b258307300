//! Transceiver capability interface and the generic CC1101 driver
//!
//! [`Transceiver`] is the narrow set of operations the compatibility layer
//! needs from a base driver: register access, mode commands and frequency
//! control. [`Cc1101`] implements it the way a driver written against the
//! datasheet would, and [`crate::E07400mm`] wraps any implementation to
//! correct it for the clone.

use core::convert::Infallible;

use log::debug;
use regiface::{Command, FromByteArray, ReadableRegister, ToByteArray, WritableRegister};

use crate::address::{BurstAddress, ConfigAddress};
use crate::commands::{Sfrx, Sidle, Sres, Srx};
use crate::device::{BusObserver, Device};
use crate::registers::{
    AddressCheck, BurstOnly, LengthConfig, Mdmcfg2, ModFormat, PacketFormat, Pktctrl0, Pktctrl1,
    Pktctrl1Flags, SingleAccess,
};
use crate::{Error, NoParameters};

/// Crystal frequency of the E07-400MM module
pub const CRYSTAL_MHZ: f32 = 26.0;

/// Frequency bands the synthesizer can tune, inclusive, in MHz
pub const BANDS_MHZ: [(f32, f32); 3] = [(300.0, 348.0), (387.0, 464.0), (779.0, 928.0)];

/// Register access, mode commands and frequency control of a CC1101-family radio
///
/// Single-byte accessors take a [`ConfigAddress`] and burst reads take a
/// [`BurstAddress`], so status and FIFO registers cannot be routed through
/// the single-byte path.
pub trait Transceiver {
    /// Tunes the synthesizer. Leaves the radio in IDLE.
    fn set_frequency(&mut self, mhz: f32) -> Result<(), Error>;

    /// Sends a command strobe.
    fn send_command<C>(&mut self, command: C) -> Result<(), Error>
    where
        C: Command<IdType = u8, CommandParameters = NoParameters>;

    /// Enters IDLE.
    fn standby(&mut self) -> Result<(), Error> {
        self.send_command(Sidle)
    }

    /// Flushes the RX FIFO and enters RX.
    fn start_receive(&mut self) -> Result<(), Error>;

    /// Writes one configuration register.
    fn set_register(&mut self, address: ConfigAddress, value: u8) -> Result<(), Error>;

    /// Reads one configuration register.
    fn get_register(&mut self, address: ConfigAddress) -> Result<u8, Error>;

    /// Reads `bytes.len()` bytes from `address` in burst mode.
    fn read_register_burst(&mut self, address: BurstAddress, bytes: &mut [u8]) -> Result<(), Error>;

    /// Selects OOK (`true`) or 2-FSK (`false`) modulation.
    fn set_ook(&mut self, enabled: bool) -> Result<(), Error>;

    /// Configures the packet engine for variable length packets with
    /// appended status bytes.
    fn packet_mode(&mut self) -> Result<(), Error>;

    /// Whether received packets are CRC checked.
    fn crc_enabled(&self) -> bool;

    /// Reads a typed configuration register.
    fn read_config<R>(&mut self) -> Result<R, Error>
    where
        R: ReadableRegister<IdType = u8> + FromByteArray<Array = [u8; 1]> + SingleAccess,
    {
        let address = ConfigAddress::new(R::id()).ok_or(Error::InvalidAddress(R::id()))?;
        let value = self.get_register(address)?;

        R::from_bytes([value]).map_err(|_| Error::Deserialization)
    }

    /// Writes a typed configuration register in one access.
    fn write_config<R>(&mut self, register: R) -> Result<(), Error>
    where
        R: WritableRegister<IdType = u8>
            + ToByteArray<Error = Infallible, Array = [u8; 1]>
            + SingleAccess,
    {
        let address = ConfigAddress::new(R::id()).ok_or(Error::InvalidAddress(R::id()))?;
        let [value] = register.to_bytes().unwrap_or_else(|never| match never {});

        self.set_register(address, value)
    }

    /// Reads a typed status register in burst mode.
    fn read_status<R>(&mut self) -> Result<R, Error>
    where
        R: ReadableRegister<IdType = u8> + FromByteArray<Array = [u8; 1]> + BurstOnly,
    {
        let address = BurstAddress::status(R::id()).ok_or(Error::InvalidAddress(R::id()))?;
        let mut value = [0u8];
        self.read_register_burst(address, &mut value)?;

        R::from_bytes(value).map_err(|_| Error::Deserialization)
    }
}

/// Converts a frequency to the 24-bit FREQ2..FREQ0 control word.
pub fn frequency_word(mhz: f32) -> u32 {
    (f64::from(mhz) * 65536.0 / f64::from(CRYSTAL_MHZ) + 0.5) as u32
}

/// Generic CC1101 driver
///
/// Behaves like a datasheet-driven driver: modulation changes only touch the
/// modulation format, and the packet engine is configured with partial
/// read-modify-write cycles. Both are wrong for the E07-400MM; wrap it in
/// [`crate::E07400mm`] when talking to a clone.
pub struct Cc1101<SPI, O = ()> {
    device: Device<SPI, O>,
    crc_on: bool,
}

impl<SPI, O> Cc1101<SPI, O> {
    /// Creates a driver on top of a register bus.
    ///
    /// CRC checking is assumed enabled, matching the chip's reset state.
    pub fn new(device: Device<SPI, O>) -> Self {
        Self {
            device,
            crc_on: true,
        }
    }

    /// Returns the register bus.
    pub fn device(&self) -> &Device<SPI, O> {
        &self.device
    }

    /// Releases the register bus.
    pub fn release(self) -> Device<SPI, O> {
        self.device
    }
}

impl<SPI, O> Cc1101<SPI, O>
where
    SPI: embedded_hal::spi::SpiDevice,
    O: BusObserver,
{
    /// Resets the chip to its register defaults.
    pub fn reset(&mut self) -> Result<(), Error> {
        self.device.execute_command(Sres)?;
        self.crc_on = true;
        Ok(())
    }

    /// Enables or disables CRC calculation and checking.
    pub fn set_crc(&mut self, enabled: bool) -> Result<(), Error> {
        let mut ctrl0: Pktctrl0 = self.device.read_register()?;
        ctrl0.crc_enabled = enabled;
        self.device.write_register(ctrl0)?;
        self.crc_on = enabled;
        Ok(())
    }
}

impl<SPI, O> Transceiver for Cc1101<SPI, O>
where
    SPI: embedded_hal::spi::SpiDevice,
    O: BusObserver,
{
    fn set_frequency(&mut self, mhz: f32) -> Result<(), Error> {
        let in_band = BANDS_MHZ
            .iter()
            .any(|&(low, high)| (low..=high).contains(&mhz));
        if !in_band {
            return Err(Error::InvalidFrequency);
        }

        self.standby()?;

        let word = frequency_word(mhz);
        self.device.write_burst(
            ConfigAddress::FREQ2,
            &[(word >> 16) as u8, (word >> 8) as u8, word as u8],
        )
    }

    fn send_command<C>(&mut self, command: C) -> Result<(), Error>
    where
        C: Command<IdType = u8, CommandParameters = NoParameters>,
    {
        self.device.execute_command(command)
    }

    fn start_receive(&mut self) -> Result<(), Error> {
        self.device.execute_command(Sidle)?;
        self.device.execute_command(Sfrx)?;
        self.device.execute_command(Srx)?;
        debug!("rx armed");
        Ok(())
    }

    fn set_register(&mut self, address: ConfigAddress, value: u8) -> Result<(), Error> {
        self.device.write_single(address, value)
    }

    fn get_register(&mut self, address: ConfigAddress) -> Result<u8, Error> {
        self.device.read_single(address)
    }

    fn read_register_burst(&mut self, address: BurstAddress, bytes: &mut [u8]) -> Result<(), Error> {
        self.device.read_burst(address, bytes)
    }

    fn set_ook(&mut self, enabled: bool) -> Result<(), Error> {
        let mut mdmcfg2: Mdmcfg2 = self.device.read_register()?;
        mdmcfg2.mod_format = if enabled {
            ModFormat::AskOok
        } else {
            ModFormat::Fsk2
        };
        self.device.write_register(mdmcfg2)
    }

    fn packet_mode(&mut self) -> Result<(), Error> {
        let mut ctrl1: Pktctrl1 = self.device.read_register()?;
        ctrl1.flags = Pktctrl1Flags::APPEND_STATUS;
        ctrl1.address_check = AddressCheck::None;
        self.device.write_register(ctrl1)?;

        let mut ctrl0: Pktctrl0 = self.device.read_register()?;
        ctrl0.white_data = false;
        ctrl0.format = PacketFormat::Normal;
        self.device.write_register(ctrl0)?;

        let mut ctrl0: Pktctrl0 = self.device.read_register()?;
        ctrl0.crc_enabled = self.crc_on;
        ctrl0.length_config = LengthConfig::Variable;
        self.device.write_register(ctrl0)
    }

    fn crc_enabled(&self) -> bool {
        self.crc_on
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frequency_words() {
        assert_eq!(frequency_word(433.0), 0x10A762);
        assert_eq!(frequency_word(868.0), 0x216276);
        assert_eq!(frequency_word(433.92), 0x10B071);
        assert_eq!(frequency_word(315.0), 0x0C1D8A);
    }
}
