//! Register address classes and the access policy of the E07-400MM
//!
//! The CC1101 register map is split into two disjoint classes:
//!
//! - Configuration registers (0x00-0x2E) accept plain single-byte access as
//!   well as burst access.
//! - Status registers (0x30-0x3D) and the FIFO (0x3F) must be read in burst
//!   mode on the clone. A single-byte access to 0x30-0x3D is decoded by the
//!   chip as a command strobe, and a single-byte FIFO read returns garbage on
//!   the E07-400MM.
//!
//! The two classes are separate types so that a single-byte read of a
//! burst-only address cannot be written down at all.

/// Read bit of the SPI header byte
pub const READ: u8 = 0x80;

/// Burst bit of the SPI header byte
pub const BURST: u8 = 0x40;

/// Address of the TX/RX FIFO
pub const FIFO: u8 = 0x3F;

const ADDRESS_MASK: u8 = 0x3F;
const LAST_CONFIG: u8 = 0x2E;
const FIRST_STATUS: u8 = 0x30;
const LAST_STATUS: u8 = 0x3D;

/// Access mode required for a register address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AccessMode {
    /// One byte per transaction, header without the burst bit
    Single,
    /// Streaming access, header with the burst bit set
    Burst,
}

impl AccessMode {
    /// Returns the access mode the clone requires for `address`.
    ///
    /// The read and burst bits of `address` are ignored.
    pub const fn for_address(address: u8) -> Self {
        match address & ADDRESS_MASK {
            FIRST_STATUS..=LAST_STATUS | FIFO => Self::Burst,
            _ => Self::Single,
        }
    }
}

/// Address of a configuration register (0x00-0x2E)
///
/// Only configuration addresses may be used with single-byte access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConfigAddress(u8);

impl ConfigAddress {
    /// Packet automation control 1
    pub const PKTCTRL1: Self = Self(0x07);
    /// Packet automation control 0
    pub const PKTCTRL0: Self = Self(0x08);
    /// Frequency control word, high byte
    pub const FREQ2: Self = Self(0x0D);
    /// Modem configuration 2
    pub const MDMCFG2: Self = Self(0x12);

    /// Creates a configuration address, or `None` if `address` lies outside
    /// the configuration register range.
    pub const fn new(address: u8) -> Option<Self> {
        if address <= LAST_CONFIG {
            Some(Self(address))
        } else {
            None
        }
    }

    /// Raw register address
    pub const fn get(self) -> u8 {
        self.0
    }

    pub(crate) const fn read_header(self) -> u8 {
        self.0 | READ
    }

    pub(crate) const fn write_header(self) -> u8 {
        self.0
    }

    pub(crate) const fn burst_write_header(self) -> u8 {
        self.0 | BURST
    }
}

/// Address that is accessed in burst mode
///
/// Covers the status registers, the FIFO and configuration registers read
/// as a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BurstAddress(u8);

impl BurstAddress {
    /// The RX FIFO
    pub const FIFO: Self = Self(FIFO);

    /// Creates the burst address of a status register, or `None` if `address`
    /// is not a status register.
    pub const fn status(address: u8) -> Option<Self> {
        match address {
            FIRST_STATUS..=LAST_STATUS => Some(Self(address)),
            _ => None,
        }
    }

    /// Raw register address, without header bits
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Header byte for a burst read of this address.
    pub const fn read_header(self) -> u8 {
        self.0 | READ | BURST
    }
}

impl From<ConfigAddress> for BurstAddress {
    fn from(address: ConfigAddress) -> Self {
        Self(address.0)
    }
}
