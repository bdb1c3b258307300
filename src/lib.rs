#![no_std]
//! E07-400MM Radio Driver
//!
//! This crate provides a compatibility layer for the E07-400MM, a clone of the
//! Texas Instruments CC1101 sub-GHz transceiver. The clone deviates from the
//! CC1101 datasheet in ways a generic driver does not expect, and this crate
//! encodes those deviations as explicit policy.
//!
//! # Features
//! - Frequency bands: 300-348, 387-464 and 779-928 MHz
//! - Burst-only access to status registers and the FIFO, enforced by type
//! - Packet reassembly of variable length packets with RSSI and LQI/CRC status bytes
//! - Atomic packet engine configuration with a settle delay
//! - Sync word detection restored on every modulation change
//! - RSSI spectrum scanning with microsecond dwell times
//!
//! # Architecture
//! The driver is organized into several modules:
//!
//! - [`device`]: Register bus interface over an SPI device
//!   - Single-byte access to configuration registers
//!   - Burst access to status registers and the RX FIFO
//!   - Command strobes
//!
//! - [`address`]: Register address classes and the access policy
//!
//! - [`registers`]: Typed register definitions
//!
//! - [`commands`]: Command strobes of the main radio state machine
//!
//! - [`driver`]: The [`Transceiver`] capability interface and a generic
//!   [`Cc1101`] implementation
//!
//! - [`E07400mm`]: The compatibility layer wrapping any [`Transceiver`]
//!   - [`packet`]: FIFO packet reassembly
//!   - [`scan`]: RSSI spectrum scanning
//!
//! - [`Radio`]: Base driver or [`E07400mm`], chosen from the detected chip variant
//!
//! # Usage
//! Registers and commands are described with the `regiface` crate, the bus is
//! any `embedded-hal` [`SpiDevice`](embedded_hal::spi::SpiDevice) and timing
//! uses a [`DelayNs`](embedded_hal::delay::DelayNs) with microsecond
//! resolution. A scheduler tick based delay is too coarse for the AGC dwell
//! time and the packet engine settle time.
//!
//! 1. Create a [`Device`] with your SPI device
//! 2. Wrap it in a [`Cc1101`] base driver
//! 3. Wrap that in an [`E07400mm`] with a delay
//! 4. Configure the packet engine and modulation
//! 5. Enter RX and read packets, or scan
//!
//! # Example
//! ```no_run
//! use embedded_hal::{delay::DelayNs, spi::SpiDevice};
//! use e07_400mm::{Cc1101, Device, E07400mm, Error, ScanPoint, ScanRequest, Transceiver};
//!
//! fn listen<SPI: SpiDevice, D: DelayNs>(spi: SPI, delay: D) -> Result<(), Error> {
//!     let mut radio = E07400mm::new(Cc1101::new(Device::new(spi)), delay);
//!
//!     radio.packet_mode()?;
//!     radio.set_ook(false)?;
//!     radio.set_frequency(433.92)?;
//!     radio.start_receive()?;
//!
//!     let mut buf = [0u8; 64];
//!     let packet = radio.read_data(&mut buf)?;
//!     let _payload = &buf[..packet.written];
//!
//!     let mut spectrum = [ScanPoint::default(); 11];
//!     radio.scan(
//!         &mut spectrum,
//!         ScanRequest { center_mhz: 433.92, step_khz: 100.0, dwell_us: 3000 },
//!     )?;
//!     Ok(())
//! }
//! ```
//!
//! # Important Notes
//! - Never read 0x30-0x3D or 0x3F with a single-byte access; on the clone
//!   the former are strobes and the latter returns garbage
//! - Call [`E07400mm::set_ook`] rather than the base driver's after a scan
//! - The length cache of [`E07400mm::get_packet_length`] is reset by every
//!   [`E07400mm::read_data`] and every scan

use regiface::*;

pub mod address;
pub mod commands;
pub mod config;
pub mod device;
pub mod driver;
mod error;
pub mod packet;
mod quirks;
pub mod registers;
pub mod rssi;
pub mod scan;

pub use address::{AccessMode, BurstAddress, ConfigAddress};
pub use commands::*;
pub use config::Settings;
pub use device::{BusObserver, Device, TransferCounter};
pub use driver::{Cc1101, Transceiver};
pub use error::Error;
pub use packet::PacketRecord;
pub use quirks::{E07400mm, Radio, Variant};
pub use registers::*;
pub use rssi::{raw_to_dbm, INVALID_RSSI};
pub use scan::{ScanPoint, ScanRequest};
