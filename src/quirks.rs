//! E07-400MM compatibility layer
//!
//! The E07-400MM is a CC1101 clone that differs from the datasheet in a few
//! undocumented ways:
//!
//! - Status registers (0x30-0x3D) and the FIFO (0x3F) only answer burst reads.
//! - PKTCTRL0 must not be changed by several partial writes, and the chip
//!   corrupts FIFO operations if it is accessed too soon after the packet
//!   engine is reconfigured.
//! - Changing the modulation does not restore the sync word qualifier, so a
//!   receiver that was left with sync detection disabled never sees a packet.
//!
//! [`E07400mm`] wraps any [`Transceiver`] and corrects these. It implements
//! [`Transceiver`] itself, so code written against the trait dispatches to
//! the corrected [`set_ook`](E07400mm::set_ook) and
//! [`packet_mode`](E07400mm::packet_mode) without knowing which variant it
//! holds. [`Radio`] goes one step further and picks the base driver or the
//! compatibility layer from the PARTNUM and VERSION the chip reports.

use embedded_hal::delay::DelayNs;
use log::debug;

use crate::address::{BurstAddress, ConfigAddress};
use crate::config::Settings;
use crate::driver::Transceiver;
use crate::packet::PacketRecord;
use crate::registers::{
    AddressCheck, LengthConfig, Mdmcfg2, PartNumber, Pktctrl0, Pktctrl1, Pktctrl1Flags, Rssi,
    SyncMode, Version,
};
use crate::{Command, Error, NoParameters};

/// Silicon variant behind the SPI bus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Variant {
    /// Texas Instruments CC1101
    Genuine,
    /// Clone such as the E07-400MM
    NonGenuine {
        /// Reported part number
        part: u8,
        /// Reported version
        version: u8,
    },
}

impl Variant {
    /// Identifies the chip from its PARTNUM and VERSION status registers.
    ///
    /// Genuine CC1101 silicon reports part 0x00 and version 0x04, 0x14 or 0x17.
    pub fn detect<T: Transceiver>(radio: &mut T) -> Result<Self, Error> {
        let part: PartNumber = radio.read_status()?;
        let version: Version = radio.read_status()?;

        let variant = match (part.value, version.value) {
            (0x00, 0x04 | 0x14 | 0x17) => Self::Genuine,
            (part, version) => Self::NonGenuine { part, version },
        };
        debug!("detected {:?}", variant);

        Ok(variant)
    }
}

/// E07-400MM compatibility layer
///
/// Owns the wrapped base driver and the microsecond delay used for the
/// packet engine settle time and the scan dwell time.
pub struct E07400mm<T, D> {
    pub(crate) radio: T,
    pub(crate) delay: D,
    pub(crate) settings: Settings,
    pub(crate) packet_length: Option<u8>,
    pub(crate) last_packet: Option<PacketRecord>,
}

impl<T, D> E07400mm<T, D> {
    /// Wraps `radio` with the default [`Settings`].
    pub fn new(radio: T, delay: D) -> Self {
        Self::with_settings(radio, delay, Settings::default())
    }

    /// Wraps `radio` with custom settings.
    pub fn with_settings(radio: T, delay: D, settings: Settings) -> Self {
        Self {
            radio,
            delay,
            settings,
            packet_length: None,
            last_packet: None,
        }
    }

    /// Active settings
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The wrapped base driver
    pub fn inner(&self) -> &T {
        &self.radio
    }

    /// Releases the base driver and the delay.
    pub fn release(self) -> (T, D) {
        (self.radio, self.delay)
    }
}

impl<T, D> E07400mm<T, D>
where
    T: Transceiver,
    D: DelayNs,
{
    /// Current RSSI in dBm, read live from the RSSI status register.
    pub fn get_rssi(&mut self) -> Result<f32, Error> {
        let rssi: Rssi = self.radio.read_status()?;
        Ok(rssi.dbm())
    }

    /// Selects OOK or 2-FSK modulation and re-enables 16/16 sync word detection.
    ///
    /// The base driver leaves MDMCFG2[2:0] untouched, so a previous scan can
    /// leave the receiver deaf to packets after a modulation change.
    pub fn set_ook(&mut self, enabled: bool) -> Result<(), Error> {
        self.radio.set_ook(enabled)?;
        self.restore_sync_mode()
    }

    /// Configures variable length packets with appended status bytes.
    ///
    /// PKTCTRL1 is written as one value, then the length mode bits of
    /// PKTCTRL0 are updated, then the chip is left alone for
    /// [`Settings::packet_mode_settle_us`].
    pub fn packet_mode(&mut self) -> Result<(), Error> {
        let ctrl1 = Pktctrl1 {
            preamble_quality_threshold: 0,
            flags: Pktctrl1Flags::APPEND_STATUS,
            address_check: AddressCheck::None,
        };
        self.radio.write_config(ctrl1)?;

        let mut ctrl0: Pktctrl0 = self.radio.read_config()?;
        ctrl0.length_config = LengthConfig::Variable;
        self.radio.write_config(ctrl0)?;

        self.delay.delay_us(self.settings.packet_mode_settle_us);
        debug!("packet mode configured");

        Ok(())
    }

    fn restore_sync_mode(&mut self) -> Result<(), Error> {
        let mut mdmcfg2: Mdmcfg2 = self.radio.read_config()?;
        mdmcfg2.sync_mode = SyncMode::Bits16Of16;
        self.radio.write_config(mdmcfg2)?;
        debug!("sync mode restored to 16/16");

        Ok(())
    }
}

impl<T, D> Transceiver for E07400mm<T, D>
where
    T: Transceiver,
    D: DelayNs,
{
    fn set_frequency(&mut self, mhz: f32) -> Result<(), Error> {
        self.radio.set_frequency(mhz)
    }

    fn send_command<C>(&mut self, command: C) -> Result<(), Error>
    where
        C: Command<IdType = u8, CommandParameters = NoParameters>,
    {
        self.radio.send_command(command)
    }

    fn standby(&mut self) -> Result<(), Error> {
        self.radio.standby()
    }

    fn start_receive(&mut self) -> Result<(), Error> {
        self.radio.start_receive()
    }

    fn set_register(&mut self, address: ConfigAddress, value: u8) -> Result<(), Error> {
        self.radio.set_register(address, value)
    }

    fn get_register(&mut self, address: ConfigAddress) -> Result<u8, Error> {
        self.radio.get_register(address)
    }

    fn read_register_burst(&mut self, address: BurstAddress, bytes: &mut [u8]) -> Result<(), Error> {
        self.radio.read_register_burst(address, bytes)
    }

    fn set_ook(&mut self, enabled: bool) -> Result<(), Error> {
        E07400mm::set_ook(self, enabled)
    }

    fn packet_mode(&mut self) -> Result<(), Error> {
        E07400mm::packet_mode(self)
    }

    fn crc_enabled(&self) -> bool {
        self.radio.crc_enabled()
    }
}

/// Driver selected from the detected silicon variant
///
/// Genuine CC1101 parts keep the base driver; clones get the
/// [`E07400mm`] corrections. Both arms implement [`Transceiver`], so callers
/// hold one type and never pick the variant themselves.
pub enum Radio<T, D> {
    /// Genuine CC1101 behind the base driver
    Genuine {
        /// Base driver
        radio: T,
        /// Delay, handed back by [`Radio::release`]
        delay: D,
    },
    /// Clone behind the compatibility layer
    NonGenuine(E07400mm<T, D>),
}

impl<T, D> Radio<T, D> {
    /// Whether the clone corrections are active
    pub fn is_non_genuine(&self) -> bool {
        matches!(self, Self::NonGenuine(_))
    }

    /// Releases the base driver and the delay.
    pub fn release(self) -> (T, D) {
        match self {
            Self::Genuine { radio, delay } => (radio, delay),
            Self::NonGenuine(radio) => radio.release(),
        }
    }
}

impl<T, D> Radio<T, D>
where
    T: Transceiver,
    D: DelayNs,
{
    /// Reads PARTNUM and VERSION and wraps `radio` for the detected variant.
    pub fn detect(radio: T, delay: D) -> Result<Self, Error> {
        Self::detect_with_settings(radio, delay, Settings::default())
    }

    /// [`detect`](Self::detect) with custom settings for a clone.
    pub fn detect_with_settings(mut radio: T, delay: D, settings: Settings) -> Result<Self, Error> {
        match Variant::detect(&mut radio)? {
            Variant::Genuine => Ok(Self::Genuine { radio, delay }),
            Variant::NonGenuine { .. } => Ok(Self::NonGenuine(E07400mm::with_settings(
                radio, delay, settings,
            ))),
        }
    }
}

macro_rules! dispatch {
    ($self:ident, $radio:ident => $call:expr) => {
        match $self {
            Radio::Genuine { radio: $radio, .. } => $call,
            Radio::NonGenuine($radio) => $call,
        }
    };
}

impl<T, D> Transceiver for Radio<T, D>
where
    T: Transceiver,
    D: DelayNs,
{
    fn set_frequency(&mut self, mhz: f32) -> Result<(), Error> {
        dispatch!(self, radio => radio.set_frequency(mhz))
    }

    fn send_command<C>(&mut self, command: C) -> Result<(), Error>
    where
        C: Command<IdType = u8, CommandParameters = NoParameters>,
    {
        dispatch!(self, radio => radio.send_command(command))
    }

    fn standby(&mut self) -> Result<(), Error> {
        dispatch!(self, radio => radio.standby())
    }

    fn start_receive(&mut self) -> Result<(), Error> {
        dispatch!(self, radio => radio.start_receive())
    }

    fn set_register(&mut self, address: ConfigAddress, value: u8) -> Result<(), Error> {
        dispatch!(self, radio => radio.set_register(address, value))
    }

    fn get_register(&mut self, address: ConfigAddress) -> Result<u8, Error> {
        dispatch!(self, radio => radio.get_register(address))
    }

    fn read_register_burst(&mut self, address: BurstAddress, bytes: &mut [u8]) -> Result<(), Error> {
        dispatch!(self, radio => radio.read_register_burst(address, bytes))
    }

    fn set_ook(&mut self, enabled: bool) -> Result<(), Error> {
        dispatch!(self, radio => Transceiver::set_ook(radio, enabled))
    }

    fn packet_mode(&mut self) -> Result<(), Error> {
        dispatch!(self, radio => Transceiver::packet_mode(radio))
    }

    fn crc_enabled(&self) -> bool {
        dispatch!(self, radio => radio.crc_enabled())
    }
}
